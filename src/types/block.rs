//! Palette-indexed pixel blocks.

use crate::error::{JopError, Result};

use super::PaletteIndex;

/// A row-major grid of palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBlock {
    width: u32,
    height: u32,
    indices: Vec<PaletteIndex>,
}

impl PixelBlock {
    /// Create a block filled with a single index.
    pub fn new(width: u32, height: u32, fill: PaletteIndex) -> Self {
        Self {
            width,
            height,
            indices: vec![fill; width as usize * height as usize],
        }
    }

    /// Wrap row-major indices. The length must be exactly `width * height`.
    pub fn from_indices(width: u32, height: u32, indices: Vec<PaletteIndex>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if indices.len() != expected {
            return Err(JopError::DimensionMismatch {
                expected: (width, height),
                actual: (indices.len() as u32, 1),
            });
        }
        Ok(Self {
            width,
            height,
            indices,
        })
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

    pub fn get(&self, x: u32, y: u32) -> Option<PaletteIndex> {
        if x < self.width && y < self.height {
            Some(self.indices[self.offset(x, y)])
        } else {
            None
        }
    }

    /// Set the index at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, index: PaletteIndex) {
        if x < self.width && y < self.height {
            let offset = self.offset(x, y);
            self.indices[offset] = index;
        }
    }

    pub fn indices(&self) -> &[PaletteIndex] {
        &self.indices
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills() {
        let block = PixelBlock::new(3, 2, 7);
        assert_eq!(block.dimensions(), (3, 2));
        assert_eq!(block.indices(), &[7; 6]);
    }

    #[test]
    fn test_row_major_layout() {
        let block = PixelBlock::from_indices(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(block.get(2, 0), Some(2));
        assert_eq!(block.get(0, 1), Some(3));
        assert_eq!(block.get(3, 0), None);
    }

    #[test]
    fn test_from_indices_wrong_length() {
        assert!(matches!(
            PixelBlock::from_indices(4, 4, vec![0; 15]),
            Err(JopError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_set() {
        let mut block = PixelBlock::new(2, 2, 0);
        block.set(1, 1, 9);
        block.set(5, 5, 9);
        assert_eq!(block.indices(), &[0, 0, 0, 9]);
    }
}
