//! Canvas geometry: the enumerated canvas sizes and their pixel resolutions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{JopError, Result};

/// Pixels along one edge of a canvas block.
pub const PIXELS_PER_BLOCK: u32 = 16;

/// A canvas size measured in blocks, identified on the wire by `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasSize {
    pub id: u8,
    pub width_blocks: u32,
    pub height_blocks: u32,
}

impl CanvasSize {
    pub const fn new(id: u8, width_blocks: u32, height_blocks: u32) -> Self {
        Self {
            id,
            width_blocks,
            height_blocks,
        }
    }

    pub fn block_count(&self) -> u32 {
        self.width_blocks * self.height_blocks
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} block (id {})",
            self.width_blocks, self.height_blocks, self.id
        )
    }
}

/// A named row of the canvas size table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasEntry {
    pub id: u8,
    pub name: String,
    /// Width in blocks.
    pub width: u32,
    /// Height in blocks.
    pub height: u32,
}

impl CanvasEntry {
    pub fn new(id: u8, name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id,
            name: name.into(),
            width,
            height,
        }
    }

    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.id, self.width, self.height)
    }
}

/// The fixed canvas size table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasGeometry {
    pixels_per_block: u32,
    entries: Vec<CanvasEntry>,
}

impl CanvasGeometry {
    /// Build a geometry table. Ids and names must be unique and every size
    /// must be at least one block in each dimension.
    pub fn new(pixels_per_block: u32, entries: Vec<CanvasEntry>) -> Result<Self> {
        if pixels_per_block == 0 {
            return Err(config_error("pixels_per_block must be at least 1".to_string()));
        }
        if entries.is_empty() {
            return Err(config_error("The canvas size table is empty".to_string()));
        }

        for (i, entry) in entries.iter().enumerate() {
            if entry.width == 0 || entry.height == 0 {
                return Err(config_error(format!(
                    "Canvas size '{}' must be at least 1x1 blocks",
                    entry.name
                )));
            }
            let rest = &entries[i + 1..];
            if rest.iter().any(|e| e.id == entry.id) {
                return Err(config_error(format!("Canvas size id {} is used twice", entry.id)));
            }
            if rest.iter().any(|e| e.name.eq_ignore_ascii_case(&entry.name)) {
                return Err(config_error(format!(
                    "Canvas size name '{}' is used twice",
                    entry.name
                )));
            }
        }

        Ok(Self {
            pixels_per_block,
            entries,
        })
    }

    /// The Joy of Painting canvas types.
    pub fn joy_of_painting() -> Self {
        Self {
            pixels_per_block: PIXELS_PER_BLOCK,
            entries: vec![
                CanvasEntry::new(0, "small", 1, 1),
                CanvasEntry::new(1, "large", 2, 2),
                CanvasEntry::new(2, "long", 2, 1),
                CanvasEntry::new(3, "tall", 1, 2),
            ],
        }
    }

    pub fn pixels_per_block(&self) -> u32 {
        self.pixels_per_block
    }

    pub fn entries(&self) -> &[CanvasEntry] {
        &self.entries
    }

    /// Pixel resolution `(width, height)` of a canvas size.
    pub fn resolution_of(&self, size: CanvasSize) -> (u32, u32) {
        (
            size.width_blocks * self.pixels_per_block,
            size.height_blocks * self.pixels_per_block,
        )
    }

    /// Number of index bytes a canvas of this size holds.
    pub fn pixel_count(&self, size: CanvasSize) -> usize {
        let (w, h) = self.resolution_of(size);
        w as usize * h as usize
    }

    pub fn by_id(&self, id: u8) -> Option<CanvasSize> {
        self.entries.iter().find(|e| e.id == id).map(CanvasEntry::size)
    }

    /// Look up a size by name, case-insensitively.
    pub fn by_name(&self, name: &str) -> Option<CanvasSize> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .map(CanvasEntry::size)
    }

    pub fn name_of(&self, size: CanvasSize) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.size() == size)
            .map(|e| e.name.as_str())
    }

    /// Whether `size` is exactly a row of this table.
    pub fn contains(&self, size: CanvasSize) -> bool {
        self.by_id(size.id) == Some(size)
    }

    /// Choose the size whose resolution covers `width` x `height` with the
    /// least wasted area. Ties go to the fewest blocks, then the narrowest.
    pub fn best_fit(&self, width: u32, height: u32) -> Result<CanvasSize> {
        let requested = width as u64 * height as u64;

        self.entries
            .iter()
            .map(CanvasEntry::size)
            .filter(|&size| {
                let (w, h) = self.resolution_of(size);
                w >= width && h >= height
            })
            .min_by_key(|&size| {
                let (w, h) = self.resolution_of(size);
                let waste = w as u64 * h as u64 - requested;
                (waste, size.block_count(), size.width_blocks)
            })
            .ok_or(JopError::NoFittingCanvasSize { width, height })
    }
}

impl Default for CanvasGeometry {
    fn default() -> Self {
        Self::joy_of_painting()
    }
}

fn config_error(message: String) -> JopError {
    JopError::Config {
        message,
        help: Some("Check the `canvas` section of jop.yaml".to_string()),
    }
}
