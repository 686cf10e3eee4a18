//! Raster file formats over the `image` crate.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbImage};

use crate::error::{JopError, Result};
use crate::types::{Colour, RasterImage};

/// A raster format images can be loaded from and saved to.
pub trait RasterFormat: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lower-case extensions, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    fn decode(&self, bytes: &[u8]) -> Result<RasterImage>;

    fn encode(&self, image: &RasterImage) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PngFormat;

/// JPEG has no alpha; transparent pixels are flattened onto white.
#[derive(Debug, Clone, Copy)]
pub struct JpegFormat {
    pub quality: u8,
}

impl Default for JpegFormat {
    fn default() -> Self {
        Self { quality: 90 }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BmpFormat;

impl RasterFormat for PngFormat {
    fn name(&self) -> &'static str {
        "png"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["png"]
    }

    fn decode(&self, bytes: &[u8]) -> Result<RasterImage> {
        decode_with(bytes, ImageFormat::Png)
    }

    fn encode(&self, image: &RasterImage) -> Result<Vec<u8>> {
        encode_with(DynamicImage::ImageRgba8(image.to_rgba8()), ImageFormat::Png)
    }
}

impl RasterFormat for JpegFormat {
    fn name(&self) -> &'static str {
        "jpeg"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["jpg", "jpeg"]
    }

    fn decode(&self, bytes: &[u8]) -> Result<RasterImage> {
        decode_with(bytes, ImageFormat::Jpeg)
    }

    fn encode(&self, image: &RasterImage) -> Result<Vec<u8>> {
        let rgb = flatten_onto(image, Colour::WHITE);
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, self.quality)
            .encode_image(&rgb)
            .map_err(|e| JopError::Image {
                message: format!("Failed to encode JPEG: {}", e),
            })?;
        Ok(bytes)
    }
}

impl RasterFormat for BmpFormat {
    fn name(&self) -> &'static str {
        "bmp"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["bmp"]
    }

    fn decode(&self, bytes: &[u8]) -> Result<RasterImage> {
        decode_with(bytes, ImageFormat::Bmp)
    }

    fn encode(&self, image: &RasterImage) -> Result<Vec<u8>> {
        encode_with(DynamicImage::ImageRgba8(image.to_rgba8()), ImageFormat::Bmp)
    }
}

fn decode_with(bytes: &[u8], format: ImageFormat) -> Result<RasterImage> {
    let img = image::load_from_memory_with_format(bytes, format).map_err(|e| JopError::Image {
        message: format!("Failed to decode {:?} image: {}", format, e),
    })?;
    Ok(RasterImage::from_rgba8(&img.to_rgba8()))
}

fn encode_with(img: DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, format).map_err(|e| JopError::Image {
        message: format!("Failed to encode {:?} image: {}", format, e),
    })?;
    Ok(cursor.into_inner())
}

/// Alpha-composite every pixel over an opaque background.
fn flatten_onto(image: &RasterImage, background: Colour) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let c = image.get(x, y).unwrap_or(background);
        let a = c.a as u32;
        let blend = |fg: u8, bg: u8| ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8;
        image::Rgb([
            blend(c.r, background.r),
            blend(c.g, background.g),
            blend(c.b, background.b),
        ])
    })
}
