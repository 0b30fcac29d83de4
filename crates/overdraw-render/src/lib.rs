//! Overdraw Render Library
//!
//! Renderer abstraction for Overdraw layer lists.
//! The default implementation is a CPU rasterizer that exports PNG frames.

mod background;
mod raster;
mod renderer;

pub use background::Background;
pub use raster::{RasterRenderer, encode_png};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
