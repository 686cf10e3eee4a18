//! Core domain types for jop.
//!
//! - `Colour` - RGBA colour values
//! - `Palette` - the fixed indexed palette and nearest-colour search
//! - `CanvasGeometry` - the canvas size table
//! - `PixelBlock` - palette indices for one canvas
//! - `RasterImage` - free-size colour images

mod block;
mod canvas;
mod colour;
mod palette;
mod raster;

pub use block::PixelBlock;
pub use canvas::{CanvasEntry, CanvasGeometry, CanvasSize, PIXELS_PER_BLOCK};
pub use colour::Colour;
pub use palette::{Palette, PaletteEntry, PaletteIndex, MAX_PALETTE_LEN};
pub use raster::RasterImage;
