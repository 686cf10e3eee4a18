//! Recompose decoded canvas tiles into one raster image.

use rayon::prelude::*;

use crate::codec::{CanvasCodec, CanvasFile};
use crate::error::{JopError, Result};
use crate::render::expand_block;
use crate::types::{CanvasGeometry, CanvasSize, Colour, Palette, PixelBlock, RasterImage};

use super::{GridLayout, TileCoord, DEFAULT_MAX_TILES};

/// A reassembled grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchedGrid {
    pub image: RasterImage,
    /// Canvas size shared by every tile.
    pub size: CanvasSize,
    pub columns: u32,
    pub rows: u32,
}

/// Reassembles tiles produced by the tiler (or painted in-game).
#[derive(Debug, Clone, Copy)]
pub struct GridStitcher<'a> {
    palette: &'a Palette,
    geometry: &'a CanvasGeometry,
    max_tiles: usize,
}

impl<'a> GridStitcher<'a> {
    pub fn new(palette: &'a Palette, geometry: &'a CanvasGeometry) -> Self {
        Self {
            palette,
            geometry,
            max_tiles: DEFAULT_MAX_TILES,
        }
    }

    /// Largest grid area accepted, counting gaps.
    pub fn with_max_tiles(mut self, max_tiles: usize) -> Self {
        self.max_tiles = max_tiles;
        self
    }

    /// Decode and stitch canvas files.
    ///
    /// The output covers the whole grid; no cropping is applied.
    pub fn stitch(&self, tiles: &GridLayout<CanvasFile>) -> Result<StitchedGrid> {
        tiles.ensure_within(self.max_tiles)?;
        tiles.ensure_complete()?;

        let codec = CanvasCodec::new(self.palette, self.geometry);
        let entries: Vec<(TileCoord, &CanvasFile)> = tiles.iter().collect();

        let decoded: Vec<(TileCoord, Result<(PixelBlock, CanvasSize)>)> = entries
            .into_par_iter()
            .map(|(coord, file)| (coord, codec.decode_file(file)))
            .collect();

        let mut blocks = GridLayout::new();
        for (coord, result) in decoded {
            blocks.insert(coord, result?)?;
        }

        self.stitch_blocks(&blocks)
    }

    /// Stitch already-decoded blocks.
    pub fn stitch_blocks(&self, tiles: &GridLayout<(PixelBlock, CanvasSize)>) -> Result<StitchedGrid> {
        tiles.ensure_within(self.max_tiles)?;
        let (columns, rows) = tiles.ensure_complete()?;

        let expected = tiles
            .get(TileCoord::new(0, 0))
            .map(|(_, size)| *size)
            .ok_or(JopError::IncompleteGrid {
                missing: vec![TileCoord::new(0, 0)],
                total: 1,
            })?;

        for (coord, (_, size)) in tiles.iter() {
            if *size != expected {
                return Err(JopError::InconsistentTileSize {
                    coord,
                    expected,
                    actual: *size,
                });
            }
        }

        let (tw, th) = self.geometry.resolution_of(expected);
        for (_, (block, _)) in tiles.iter() {
            if block.dimensions() != (tw, th) {
                return Err(JopError::DimensionMismatch {
                    expected: (tw, th),
                    actual: block.dimensions(),
                });
            }
        }

        let entries: Vec<(TileCoord, &PixelBlock)> =
            tiles.iter().map(|(coord, (block, _))| (coord, block)).collect();

        let expanded: Vec<(TileCoord, Result<RasterImage>)> = entries
            .into_par_iter()
            .map(|(coord, block)| (coord, expand_block(self.palette, block)))
            .collect();

        let (Some(width), Some(height)) = (columns.checked_mul(tw), rows.checked_mul(th)) else {
            return Err(JopError::ImageTooLarge {
                columns: columns.into(),
                rows: rows.into(),
                max_tiles: self.max_tiles,
            });
        };

        // Offsets stay below width and height, which fit in u32
        let mut image = RasterImage::new(width, height, Colour::TRANSPARENT);
        for (coord, tile) in expanded {
            blit(&mut image, &tile?, coord.column * tw, coord.row * th);
        }

        Ok(StitchedGrid {
            image,
            size: expected,
            columns,
            rows,
        })
    }
}

fn blit(dest: &mut RasterImage, src: &RasterImage, x0: u32, y0: u32) {
    for y in 0..src.height() {
        for x in 0..src.width() {
            if let Some(colour) = src.get(x, y) {
                dest.set(x0 + x, y0 + y, colour);
            }
        }
    }
}
