//! Palette quantization with optional ordered dithering.
//!
//! Dithering here is a pure function of pixel position and source colour:
//! the same image always produces the same indices, tile by tile, no matter
//! which order tiles are processed in.

use std::fmt;
use std::str::FromStr;

use crate::error::{JopError, Result};
use crate::types::{Colour, Palette, PaletteIndex, PixelBlock, RasterImage};

/// Dithering method for colour quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherMethod {
    /// Direct nearest-colour mapping.
    #[default]
    None,
    /// Ordered dithering using a Bayer 4x4 threshold matrix.
    Ordered,
}

impl FromStr for DitherMethod {
    type Err = JopError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(DitherMethod::None),
            "ordered" | "bayer" => Ok(DitherMethod::Ordered),
            _ => Err(JopError::Parse {
                message: format!("Unknown dither method '{}'", s),
                help: Some("Use 'none' or 'ordered'".to_string()),
            }),
        }
    }
}

impl fmt::Display for DitherMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DitherMethod::None => write!(f, "none"),
            DitherMethod::Ordered => write!(f, "ordered"),
        }
    }
}

/// Bayer 4x4 threshold matrix, values in [0, 16).
const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Maximum per-channel offset span applied by ordered dithering.
const DITHER_SPREAD: f32 = 32.0;

/// Maps colours at image coordinates to palette indices.
#[derive(Debug, Clone, Copy)]
pub struct Quantizer<'a> {
    palette: &'a Palette,
    dither: DitherMethod,
}

impl<'a> Quantizer<'a> {
    pub fn new(palette: &'a Palette, dither: DitherMethod) -> Self {
        Self { palette, dither }
    }

    /// Quantize the colour found at absolute image position `(x, y)`.
    pub fn quantize(&self, x: u32, y: u32, colour: Colour) -> PaletteIndex {
        match self.dither {
            DitherMethod::None => self.palette.nearest_index(colour),
            DitherMethod::Ordered => {
                if colour.is_transparent() {
                    return self.palette.nearest_index(colour);
                }
                self.palette.nearest_index(ordered_offset(x, y, colour))
            }
        }
    }

    /// Quantize a whole raster into a block of the same dimensions.
    pub fn quantize_image(&self, image: &RasterImage) -> PixelBlock {
        let mut block = PixelBlock::new(image.width(), image.height(), 0);
        for y in 0..image.height() {
            for x in 0..image.width() {
                if let Some(colour) = image.get(x, y) {
                    block.set(x, y, self.quantize(x, y, colour));
                }
            }
        }
        block
    }
}

/// Shift each channel by the Bayer threshold for `(x, y)`.
fn ordered_offset(x: u32, y: u32, colour: Colour) -> Colour {
    let threshold = BAYER_4X4[(y % 4) as usize][(x % 4) as usize] as f32 / 16.0 - 0.5;
    let offset = threshold * DITHER_SPREAD;

    let shift = |c: u8| (c as f32 + offset).round().clamp(0.0, 255.0) as u8;
    Colour::new(shift(colour.r), shift(colour.g), shift(colour.b), colour.a)
}
