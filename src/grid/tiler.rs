//! Split a raster image into a grid of canvas-sized tiles.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;

use crate::codec::{CanvasCodec, CanvasFile};
use crate::error::{JopError, Result};
use crate::render::{DitherMethod, Quantizer};
use crate::types::{CanvasGeometry, CanvasSize, Colour, Palette, PixelBlock, RasterImage};

use super::{GridLayout, TileCoord};

/// Default cap on the number of tiles one image may produce.
pub const DEFAULT_MAX_TILES: usize = 1024;

/// What to do with the part of the image that does not fill a whole tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// Drop partial tiles; the grid covers only whole tiles.
    Crop,
    /// Extend partial tiles with the background colour.
    #[default]
    Pad,
}

impl FromStr for EdgePolicy {
    type Err = JopError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "crop" => Ok(EdgePolicy::Crop),
            "pad" => Ok(EdgePolicy::Pad),
            _ => Err(JopError::InvalidEdgePolicy {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgePolicy::Crop => write!(f, "crop"),
            EdgePolicy::Pad => write!(f, "pad"),
        }
    }
}

/// Per-run tiling options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileOptions {
    /// Canvas size shared by every tile.
    pub size: CanvasSize,
    pub edge: EdgePolicy,
    pub dither: DitherMethod,
}

impl TileOptions {
    pub fn new(size: CanvasSize) -> Self {
        Self {
            size,
            edge: EdgePolicy::default(),
            dither: DitherMethod::default(),
        }
    }

    pub fn with_edge(mut self, edge: EdgePolicy) -> Self {
        self.edge = edge;
        self
    }

    pub fn with_dither(mut self, dither: DitherMethod) -> Self {
        self.dither = dither;
        self
    }
}

/// Splits images into quantized, encoded canvas tiles.
#[derive(Debug, Clone, Copy)]
pub struct GridTiler<'a> {
    palette: &'a Palette,
    geometry: &'a CanvasGeometry,
    max_tiles: usize,
}

impl<'a> GridTiler<'a> {
    pub fn new(palette: &'a Palette, geometry: &'a CanvasGeometry) -> Self {
        Self {
            palette,
            geometry,
            max_tiles: DEFAULT_MAX_TILES,
        }
    }

    pub fn with_max_tiles(mut self, max_tiles: usize) -> Self {
        self.max_tiles = max_tiles;
        self
    }

    /// Grid `(columns, rows)` for an image of `width` x `height`.
    ///
    /// Pad rounds up, crop rounds down. An empty grid is a dimension error.
    pub fn grid_dimensions(
        &self,
        width: u32,
        height: u32,
        options: &TileOptions,
    ) -> Result<(u32, u32)> {
        if !self.geometry.contains(options.size) {
            return Err(JopError::UnknownCanvasSize {
                id: options.size.id,
            });
        }

        let (tw, th) = self.geometry.resolution_of(options.size);
        let (columns, rows) = match options.edge {
            EdgePolicy::Pad => (width.div_ceil(tw), height.div_ceil(th)),
            EdgePolicy::Crop => (width / tw, height / th),
        };

        if columns == 0 || rows == 0 {
            return Err(JopError::DimensionMismatch {
                expected: (tw, th),
                actual: (width, height),
            });
        }

        if columns as u64 * rows as u64 > self.max_tiles as u64 {
            return Err(JopError::ImageTooLarge {
                columns: columns.into(),
                rows: rows.into(),
                max_tiles: self.max_tiles,
            });
        }

        Ok((columns, rows))
    }

    /// Quantize each tile region into a block, without encoding.
    pub fn quantize_tiles(
        &self,
        image: &RasterImage,
        options: &TileOptions,
    ) -> Result<GridLayout<PixelBlock>> {
        let (columns, rows) = self.grid_dimensions(image.width(), image.height(), options)?;
        let (tw, th) = self.geometry.resolution_of(options.size);

        let quantizer = Quantizer::new(self.palette, options.dither);
        let fill = self.padding_index();

        let coords: Vec<TileCoord> = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| TileCoord::new(column, row)))
            .collect();

        let blocks: Vec<(TileCoord, PixelBlock)> = coords
            .into_par_iter()
            .map(|coord| {
                let block = quantize_region(image, &quantizer, coord, (tw, th), fill);
                (coord, block)
            })
            .collect();

        GridLayout::from_tiles(blocks)
    }

    /// Split, quantize and encode an image into canvas files.
    pub fn tile(&self, image: &RasterImage, options: &TileOptions) -> Result<GridLayout<CanvasFile>> {
        let blocks = self.quantize_tiles(image, options)?;
        let codec = CanvasCodec::new(self.palette, self.geometry);

        let encoded: Vec<(TileCoord, Result<CanvasFile>)> = blocks
            .into_iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(coord, block)| (coord, codec.encode(&block, options.size)))
            .collect();

        let mut layout = GridLayout::new();
        for (coord, file) in encoded {
            layout.insert(coord, file?)?;
        }
        Ok(layout)
    }

    /// Index written where a padded tile extends past the image.
    fn padding_index(&self) -> u8 {
        let fill = self.palette.background_colour().unwrap_or(Colour::TRANSPARENT);
        self.palette.nearest_index(fill)
    }
}

/// Quantize the region of `image` covered by the tile at `coord`. Pixels
/// past the image edge take `fill`.
fn quantize_region(
    image: &RasterImage,
    quantizer: &Quantizer<'_>,
    coord: TileCoord,
    (tw, th): (u32, u32),
    fill: u8,
) -> PixelBlock {
    let mut block = PixelBlock::new(tw, th, fill);
    let x0 = coord.column * tw;
    let y0 = coord.row * th;

    for y in 0..th {
        for x in 0..tw {
            let (gx, gy) = (x0 + x, y0 + y);
            if let Some(colour) = image.get(gx, gy) {
                block.set(x, y, quantizer.quantize(gx, gy, colour));
            }
        }
    }

    block
}
