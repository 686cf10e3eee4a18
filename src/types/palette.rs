//! Fixed colour palette and nearest-colour quantization.
//!
//! Palette indices are the wire representation of canvas files, so the
//! entry order must match the in-game palette exactly.

use serde::{Deserialize, Serialize};

use crate::error::{JopError, Result};

use super::Colour;

/// A single byte selecting one palette entry.
pub type PaletteIndex = u8;

/// Largest palette a one-byte index can address.
pub const MAX_PALETTE_LEN: usize = 256;

/// A named palette colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub colour: Colour,
}

impl PaletteEntry {
    pub fn new(name: impl Into<String>, colour: Colour) -> Self {
        Self {
            name: name.into(),
            colour,
        }
    }
}

/// The dye colours, in dye id order.
const DYES: [(&str, Colour); 16] = [
    ("white", Colour::rgb(0xF9, 0xFF, 0xFE)),
    ("orange", Colour::rgb(0xF9, 0x80, 0x1D)),
    ("magenta", Colour::rgb(0xC7, 0x4E, 0xBD)),
    ("light_blue", Colour::rgb(0x3A, 0xB3, 0xDA)),
    ("yellow", Colour::rgb(0xFE, 0xD8, 0x3D)),
    ("lime", Colour::rgb(0x80, 0xC7, 0x1F)),
    ("pink", Colour::rgb(0xF3, 0x8B, 0xAA)),
    ("gray", Colour::rgb(0x47, 0x4F, 0x52)),
    ("light_gray", Colour::rgb(0x9D, 0x9D, 0x97)),
    ("cyan", Colour::rgb(0x16, 0x9C, 0x9C)),
    ("purple", Colour::rgb(0x89, 0x32, 0xB8)),
    ("blue", Colour::rgb(0x3C, 0x44, 0xAA)),
    ("brown", Colour::rgb(0x83, 0x54, 0x32)),
    ("green", Colour::rgb(0x5E, 0x7C, 0x16)),
    ("red", Colour::rgb(0xB0, 0x2E, 0x26)),
    ("black", Colour::rgb(0x1D, 0x1D, 0x21)),
];

/// An ordered, immutable set of distinct colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    name: String,
    entries: Vec<PaletteEntry>,
    background: Option<PaletteIndex>,
}

impl Palette {
    /// Build a palette, checking that it is addressable and unambiguous.
    ///
    /// Entries must be non-empty, at most 256 long, and pairwise distinct in
    /// RGB. `background` is the index transparent pixels quantize to.
    pub fn new(
        name: impl Into<String>,
        entries: Vec<PaletteEntry>,
        background: Option<PaletteIndex>,
    ) -> Result<Self> {
        let name = name.into();

        if entries.is_empty() {
            return Err(config_error(format!("Palette '{}' has no colours", name)));
        }
        if entries.len() > MAX_PALETTE_LEN {
            return Err(config_error(format!(
                "Palette '{}' has {} colours; at most {} fit in a byte index",
                name,
                entries.len(),
                MAX_PALETTE_LEN
            )));
        }

        for (i, a) in entries.iter().enumerate() {
            if let Some(b) = entries[i + 1..].iter().find(|b| b.colour.same_rgb(a.colour)) {
                return Err(config_error(format!(
                    "Palette '{}' lists {} twice ('{}' and '{}')",
                    name,
                    a.colour.opaque(),
                    a.name,
                    b.name
                )));
            }
        }

        if let Some(bg) = background {
            if bg as usize >= entries.len() {
                return Err(config_error(format!(
                    "Palette '{}' background index {} is out of range",
                    name, bg
                )));
            }
        }

        Ok(Self {
            name,
            entries,
            background,
        })
    }

    /// The builtin 16-colour dye palette with white as background.
    pub fn dyes() -> Self {
        Self {
            name: "dyes".to_string(),
            entries: DYES
                .iter()
                .map(|(name, colour)| PaletteEntry::new(*name, *colour))
                .collect(),
            background: Some(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// The colour at `index`, if it exists.
    pub fn colour(&self, index: PaletteIndex) -> Option<Colour> {
        self.entries.get(index as usize).map(|e| e.colour)
    }

    pub fn contains_index(&self, index: PaletteIndex) -> bool {
        (index as usize) < self.entries.len()
    }

    pub fn background_index(&self) -> Option<PaletteIndex> {
        self.background
    }

    pub fn background_colour(&self) -> Option<Colour> {
        self.background.and_then(|i| self.colour(i))
    }

    /// Find the palette index nearest to `colour`.
    ///
    /// Fully transparent colours map to the background index when the palette
    /// has one. Otherwise the search is squared RGB distance with ties going
    /// to the lowest index.
    pub fn nearest_index(&self, colour: Colour) -> PaletteIndex {
        if colour.is_transparent() {
            if let Some(bg) = self.background {
                return bg;
            }
        }

        let mut best_index = 0;
        let mut best_dist = u32::MAX;

        for (i, entry) in self.entries.iter().enumerate() {
            let dist = colour.distance_sq(entry.colour);
            if dist < best_dist {
                best_dist = dist;
                best_index = i;
                if dist == 0 {
                    break;
                }
            }
        }

        best_index as PaletteIndex
    }

    /// Quantize a colour and return the palette colour it maps to.
    pub fn quantize(&self, colour: Colour) -> Colour {
        self.entries[self.nearest_index(colour) as usize].colour
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dyes()
    }
}

fn config_error(message: String) -> JopError {
    JopError::Config {
        message,
        help: Some("Check the `palette` section of jop.yaml".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey_palette() -> Palette {
        Palette::new(
            "greys",
            vec![
                PaletteEntry::new("black", Colour::BLACK),
                PaletteEntry::new("grey", Colour::rgb(128, 128, 128)),
                PaletteEntry::new("white", Colour::WHITE),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_dyes_are_valid() {
        let dyes = Palette::dyes();
        let rebuilt = Palette::new("dyes", dyes.entries().to_vec(), Some(0)).unwrap();
        assert_eq!(rebuilt, dyes);
        assert_eq!(dyes.len(), 16);
        assert_eq!(dyes.background_colour(), Some(Colour::rgb(0xF9, 0xFF, 0xFE)));
    }

    #[test]
    fn test_exact_colours_are_idempotent() {
        let dyes = Palette::dyes();
        for (i, entry) in dyes.entries().iter().enumerate() {
            assert_eq!(dyes.nearest_index(entry.colour) as usize, i);
            assert_eq!(dyes.quantize(entry.colour), entry.colour);
        }
    }

    #[test]
    fn test_nearest_index() {
        let p = grey_palette();
        assert_eq!(p.nearest_index(Colour::rgb(10, 10, 10)), 0);
        assert_eq!(p.nearest_index(Colour::rgb(120, 140, 128)), 1);
        assert_eq!(p.nearest_index(Colour::rgb(250, 250, 250)), 2);
    }

    #[test]
    fn test_ties_resolve_to_lowest_index() {
        let p = Palette::new(
            "pair",
            vec![
                PaletteEntry::new("low", Colour::rgb(0, 0, 0)),
                PaletteEntry::new("high", Colour::rgb(2, 0, 0)),
            ],
            None,
        )
        .unwrap();
        assert_eq!(p.nearest_index(Colour::rgb(1, 0, 0)), 0);
    }

    #[test]
    fn test_transparent_uses_background() {
        let dyes = Palette::dyes();
        assert_eq!(dyes.nearest_index(Colour::TRANSPARENT), 0);
        assert_eq!(dyes.nearest_index(Colour::new(0x1D, 0x1D, 0x21, 0)), 0);
        // Partially transparent pixels still quantize by colour
        assert_eq!(dyes.nearest_index(Colour::new(0x1D, 0x1D, 0x21, 1)), 15);
    }

    #[test]
    fn test_transparent_without_background_uses_rgb() {
        let p = grey_palette();
        assert_eq!(p.nearest_index(Colour::new(255, 255, 255, 0)), 2);
        assert_eq!(p.nearest_index(Colour::TRANSPARENT), 0);
    }

    #[test]
    fn test_rejects_duplicate_rgb() {
        let err = Palette::new(
            "dup",
            vec![
                PaletteEntry::new("a", Colour::rgb(1, 2, 3)),
                PaletteEntry::new("b", Colour::new(1, 2, 3, 128)),
            ],
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn test_rejects_empty_and_bad_background() {
        assert!(Palette::new("empty", vec![], None).is_err());
        let entries = vec![PaletteEntry::new("a", Colour::BLACK)];
        assert!(Palette::new("bg", entries, Some(1)).is_err());
    }

    #[test]
    fn test_rejects_oversized_palette() {
        let entries: Vec<PaletteEntry> = (0..257u32)
            .map(|i| PaletteEntry::new(format!("c{}", i), Colour::rgb((i % 256) as u8, (i / 256) as u8, 0)))
            .collect();
        assert!(Palette::new("big", entries, None).is_err());
    }

    #[test]
    fn test_colour_lookup() {
        let p = grey_palette();
        assert_eq!(p.colour(1), Some(Colour::rgb(128, 128, 128)));
        assert_eq!(p.colour(3), None);
        assert!(p.contains_index(2));
        assert!(!p.contains_index(3));
    }
}
