//! Palette expansion and preview output.

use std::path::Path;

use crate::codec::HEADER_LEN;
use crate::error::{JopError, Result};
use crate::raster::save_raster;
use crate::types::{Colour, Palette, PixelBlock, RasterImage};

/// Map every index of a block back to its palette colour.
///
/// Fails on the first index outside the palette; the reported offset is the
/// byte position the index would occupy in a canvas file.
pub fn expand_block(palette: &Palette, block: &PixelBlock) -> Result<RasterImage> {
    let pixels = block
        .indices()
        .iter()
        .enumerate()
        .map(|(i, &index)| {
            palette
                .colour(index)
                .ok_or(JopError::PaletteIndexOutOfRange {
                    index,
                    offset: HEADER_LEN + i,
                    palette_len: palette.len(),
                })
        })
        .collect::<Result<Vec<Colour>>>()?;

    RasterImage::from_pixels(block.width(), block.height(), pixels)
}

/// Write a scaled preview of an image. The format follows the extension.
///
/// # Arguments
///
/// * `image` - The image to preview
/// * `path` - Output file path
/// * `scale` - Integer scale factor (0 and 1 mean no scaling)
pub fn write_preview(image: &RasterImage, path: &Path, scale: u32) -> Result<()> {
    save_raster(path, &image.scaled(scale))
}
