//! Arbitrary-size RGBA raster images.

use image::{Rgba, RgbaImage};

use crate::error::{JopError, Result};

use super::Colour;

/// A row-major grid of colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<Colour>,
}

impl RasterImage {
    /// Create an image filled with one colour.
    pub fn new(width: u32, height: u32, fill: Colour) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    /// Wrap row-major pixels. The length must be exactly `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Colour>) -> Result<Self> {
        if pixels.len() != width as usize * height as usize {
            return Err(JopError::DimensionMismatch {
                expected: (width, height),
                actual: (pixels.len() as u32, 1),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from nested rows, as used by the tests and previews.
    pub fn from_rows(rows: &[Vec<Colour>]) -> Result<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.len()) as u32;
        let pixels: Vec<Colour> = rows.iter().flatten().copied().collect();
        Self::from_pixels(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[Colour] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Colour> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Set the colour at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, colour: Colour) {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize] = colour;
        }
    }

    /// Copy the region at `(x, y)` of size `width` x `height`, clamped to the
    /// image bounds.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> RasterImage {
        let x0 = x.min(self.width);
        let y0 = y.min(self.height);
        let w = width.min(self.width - x0);
        let h = height.min(self.height - y0);

        let mut pixels = Vec::with_capacity(w as usize * h as usize);
        for row in y0..y0 + h {
            let start = row as usize * self.width as usize + x0 as usize;
            pixels.extend_from_slice(&self.pixels[start..start + w as usize]);
        }

        RasterImage {
            width: w,
            height: h,
            pixels,
        }
    }

    /// Nearest-neighbour integer upscale. A scale of 0 is treated as 1.
    pub fn scaled(&self, scale: u32) -> RasterImage {
        let scale = scale.max(1);
        if scale == 1 {
            return self.clone();
        }

        let width = self.width * scale;
        let height = self.height * scale;
        let mut out = RasterImage::new(width, height, Colour::TRANSPARENT);

        for y in 0..height {
            for x in 0..width {
                let src = self.pixels[(y / scale) as usize * self.width as usize + (x / scale) as usize];
                out.pixels[y as usize * width as usize + x as usize] = src;
            }
        }

        out
    }

    pub fn from_rgba8(img: &RgbaImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            pixels: img.pixels().map(|p| Colour::from_rgba(p.0)).collect(),
        }
    }

    pub fn to_rgba8(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            Rgba(self.pixels[y as usize * self.width as usize + x as usize].to_rgba())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> RasterImage {
        RasterImage::from_rows(&[
            vec![Colour::BLACK, Colour::WHITE, Colour::BLACK],
            vec![Colour::WHITE, Colour::BLACK, Colour::WHITE],
        ])
        .unwrap()
    }

    #[test]
    fn test_from_rows() {
        let img = checker();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get(1, 0), Some(Colour::WHITE));
        assert_eq!(img.get(1, 1), Some(Colour::BLACK));
        assert_eq!(img.get(3, 1), None);
    }

    #[test]
    fn test_crop_clamps() {
        let img = checker();
        let c = img.crop(1, 0, 10, 10);
        assert_eq!(c.dimensions(), (2, 2));
        assert_eq!(c.get(0, 0), Some(Colour::WHITE));
        assert_eq!(c.get(1, 1), Some(Colour::WHITE));

        let empty = img.crop(5, 5, 2, 2);
        assert_eq!(empty.dimensions(), (0, 0));
    }

    #[test]
    fn test_scaled() {
        let img = RasterImage::from_rows(&[vec![Colour::BLACK, Colour::WHITE]]).unwrap();
        let s = img.scaled(2);
        assert_eq!(s.dimensions(), (4, 2));
        assert_eq!(s.get(1, 1), Some(Colour::BLACK));
        assert_eq!(s.get(2, 0), Some(Colour::WHITE));
        assert_eq!(img.scaled(0), img);
    }

    #[test]
    fn test_rgba8_round_trip() {
        let mut img = checker();
        img.set(2, 1, Colour::new(10, 20, 30, 40));
        let rgba = img.to_rgba8();
        assert_eq!(rgba.get_pixel(2, 1).0, [10, 20, 30, 40]);
        assert_eq!(RasterImage::from_rgba8(&rgba), img);
    }
}
