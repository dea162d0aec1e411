//! Attribute resolution: raw strings to typed lengths, colors and paint.
//!
//! Every resolver is total. Bad input degrades to a default, never to an error.

pub mod color;
pub mod length;
pub mod resolve;

pub use color::resolve_color;
pub use length::resolve_length;
pub use resolve::{ResolvedStyle, Resolver, resolve_opacity, resolve_stroke_width};
