//! mapoverlay draws model-authored map annotations onto a background image.
//!
//! The input is free-form text from a language model that is expected, but not guaranteed, to
//! contain one small SVG-like block. The output is the background with the annotations
//! composited on top.
//!
//! # Pipeline overview
//!
//! 1. **Recover**: `&str -> Document` (reasoning removal, block extraction, namespace repair,
//!    strict parse; any failure substitutes the fallback triangle)
//! 2. **Rasterize**: `Document -> Overlay` (800x600 premultiplied RGBA8, document order,
//!    translate-only groups)
//! 3. **Composite**: `Overlay + background -> image` (stretch to the background, source-over)
//! 4. **Write**: encode to the output path via a temporary sibling and rename
//!
//! Absorbed problems (bad markup, bad attributes, missing background with a usable fallback)
//! are collected in [`Diagnostics`]. Only the conditions in [`OverlayError`] abort a render.
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
pub mod config;
pub mod markup;
pub mod pipeline;
pub mod render;
pub mod style;
pub mod transform;

pub use config::{RenderConfig, ResizeFilter};
pub use foundation::core::{CANVAS_HEIGHT, CANVAS_WIDTH, Canvas, Point, Rgba8, Vec2};
pub use foundation::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use foundation::error::{OverlayError, OverlayResult};
pub use markup::recover::{MarkupSource, Recovered, recover_document};
pub use markup::tree::{Document, Node, NodeKind};
pub use pipeline::{OverlayRenderer, RenderReport, render_map};
pub use render::{Overlay, TextRasterizer};
