//! Rasterization of the recovered tree and compositing onto the background.

pub mod composite;
pub mod primitive;
pub mod raster;
pub mod text;

pub use composite::{Background, composite, load_background, write_output};
pub use primitive::{Primitive, TextRun};
pub use raster::{Overlay, rasterize};
pub use text::{TextLayer, TextRasterizer};
