//! jop - Joy of Painting canvas converter
//!
//! Converts raster images into palette-indexed canvas files for the Joy of
//! Painting mod, splitting large images across a grid of canvases, and
//! stitches canvas files back into images.

pub mod cli;
pub mod codec;
pub mod config;
pub mod discovery;
pub mod error;
pub mod grid;
pub mod output;
pub mod raster;
pub mod render;
pub mod types;

pub use codec::{CanvasCodec, CanvasFile, CanvasHeader, EXTENSION, FORMAT_VERSION, HEADER_LEN, MAGIC};
pub use config::{Config, Tables};
pub use discovery::{load_tile_set, TileSet};
pub use error::{JopError, Result};
pub use grid::{
    parse_tile_name, EdgePolicy, GridLayout, GridManifest, GridStitcher, GridTiler, StitchedGrid,
    TileCoord, TileOptions,
};
pub use raster::{load_raster, save_raster, RasterFormat};
pub use render::{expand_block, DitherMethod, Quantizer};
pub use types::{
    CanvasEntry, CanvasGeometry, CanvasSize, Colour, Palette, PaletteEntry, PaletteIndex,
    PixelBlock, RasterImage,
};
