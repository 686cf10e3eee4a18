//! Multi-canvas grids.
//!
//! A grid is a rectangle of same-sized canvases addressed by `(column, row)`
//! from the top-left. Tile file names carry their coordinate so a grid can be
//! reassembled from names alone.

mod manifest;
mod stitcher;
mod tiler;

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::EXTENSION;
use crate::error::{JopError, Result};

pub use manifest::{GridManifest, ManifestTile, MANIFEST_SUFFIX};
pub use stitcher::{GridStitcher, StitchedGrid};
pub use tiler::{EdgePolicy, GridTiler, TileOptions, DEFAULT_MAX_TILES};

/// Zero-padding width of each coordinate in tile names.
pub const TILE_INDEX_WIDTH: usize = 3;

/// Most missing coordinates listed in an incomplete-grid error.
pub const MISSING_REPORT_LIMIT: usize = 16;

/// Position of a tile in its grid. Orders column first, then row, matching
/// the lexical order of tile names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TileCoord {
    pub column: u32,
    pub row: u32,
}

impl TileCoord {
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// `<base>_<column>_<row>` with zero-padded coordinates.
    pub fn tile_name(&self, base: &str) -> String {
        format!(
            "{}_{:0width$}_{:0width$}",
            base,
            self.column,
            self.row,
            width = TILE_INDEX_WIDTH
        )
    }

    /// `tile_name` plus the canvas file extension.
    pub fn tile_file_name(&self, base: &str) -> String {
        format!("{}.{}", self.tile_name(base), EXTENSION)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Split a tile name into its base name and coordinate.
///
/// Accepts names with or without the canvas extension. The base may itself
/// contain underscores; the last two `_`-separated fields are the column and
/// row.
pub fn parse_tile_name(name: &str) -> Result<(String, TileCoord)> {
    let invalid = || JopError::InvalidTileName {
        name: name.to_string(),
    };

    let stem = match name.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case(EXTENSION) => stem,
        _ => name,
    };

    let mut parts = stem.rsplitn(3, '_');
    let row = parts.next().ok_or_else(invalid)?;
    let column = parts.next().ok_or_else(invalid)?;
    let base = parts.next().ok_or_else(invalid)?;

    if base.is_empty() {
        return Err(invalid());
    }

    let number = |s: &str| -> Result<u32> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        s.parse().map_err(|_| invalid())
    };

    Ok((base.to_string(), TileCoord::new(number(column)?, number(row)?)))
}

/// Tiles keyed by grid coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout<T> {
    tiles: BTreeMap<TileCoord, T>,
}

impl<T> GridLayout<T> {
    pub fn new() -> Self {
        Self {
            tiles: BTreeMap::new(),
        }
    }

    /// Collect tiles, rejecting repeated coordinates.
    pub fn from_tiles(tiles: impl IntoIterator<Item = (TileCoord, T)>) -> Result<Self> {
        let mut layout = Self::new();
        for (coord, tile) in tiles {
            layout.insert(coord, tile)?;
        }
        Ok(layout)
    }

    pub fn insert(&mut self, coord: TileCoord, tile: T) -> Result<()> {
        match self.tiles.entry(coord) {
            btree_map::Entry::Occupied(_) => Err(JopError::DuplicateTile { coord }),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(tile);
                Ok(())
            }
        }
    }

    pub fn get(&self, coord: TileCoord) -> Option<&T> {
        self.tiles.get(&coord)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, &T)> {
        self.tiles.iter().map(|(c, t)| (*c, t))
    }

    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.tiles.keys().copied()
    }

    fn max_coord(&self) -> Option<(u32, u32)> {
        let column = self.tiles.keys().map(|c| c.column).max()?;
        let row = self.tiles.keys().map(|c| c.row).max()?;
        Some((column, row))
    }

    /// `(columns, rows)` of the rectangle spanned from `(0, 0)`.
    pub fn span(&self) -> (u64, u64) {
        self.max_coord()
            .map_or((0, 0), |(c, r)| (u64::from(c) + 1, u64::from(r) + 1))
    }

    /// Coordinates absent from the rectangle spanned from `(0, 0)`, in
    /// row-major order, up to `MISSING_REPORT_LIMIT`. An empty layout is
    /// missing `(0, 0)`.
    pub fn missing(&self) -> Vec<TileCoord> {
        let Some((max_column, max_row)) = self.max_coord() else {
            return vec![TileCoord::new(0, 0)];
        };

        // Each step either passes a present tile or records a missing one
        let mut missing = Vec::new();
        'scan: for row in 0..=max_row {
            for column in 0..=max_column {
                let coord = TileCoord::new(column, row);
                if !self.tiles.contains_key(&coord) {
                    missing.push(coord);
                    if missing.len() == MISSING_REPORT_LIMIT {
                        break 'scan;
                    }
                }
            }
        }
        missing
    }

    /// Reject a layout whose spanned rectangle holds more than `max_tiles`.
    pub fn ensure_within(&self, max_tiles: usize) -> Result<()> {
        let (columns, rows) = self.span();
        match columns.checked_mul(rows) {
            Some(area) if area <= max_tiles as u64 => Ok(()),
            _ => Err(JopError::ImageTooLarge {
                columns,
                rows,
                max_tiles,
            }),
        }
    }

    /// Check the tiles form a gap-free rectangle from `(0, 0)` and return its
    /// `(columns, rows)`.
    pub fn ensure_complete(&self) -> Result<(u32, u32)> {
        let (columns, rows) = self.span();
        let area = columns.saturating_mul(rows);
        let present = self.tiles.len() as u64;

        // Keys are unique and inside the rectangle, so a full count means no gaps
        if self.tiles.is_empty() || area != present {
            return Err(JopError::IncompleteGrid {
                missing: self.missing(),
                total: area.saturating_sub(present).max(1),
            });
        }

        match (u32::try_from(columns), u32::try_from(rows)) {
            (Ok(columns), Ok(rows)) => Ok((columns, rows)),
            _ => Err(JopError::ImageTooLarge {
                columns,
                rows,
                max_tiles: self.tiles.len(),
            }),
        }
    }
}

impl<T> Default for GridLayout<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for GridLayout<T> {
    type Item = (TileCoord, T);
    type IntoIter = btree_map::IntoIter<TileCoord, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tile_names() {
        let coord = TileCoord::new(2, 11);
        assert_eq!(coord.tile_name("mona"), "mona_002_011");
        assert_eq!(coord.tile_file_name("mona"), "mona_002_011.paint");
    }

    #[test]
    fn test_tile_file_names_sort_by_coordinate() {
        let coords = [
            TileCoord::new(0, 0),
            TileCoord::new(0, 1),
            TileCoord::new(1, 0),
            TileCoord::new(10, 2),
            TileCoord::new(9, 12),
        ];
        let mut sorted = coords;
        sorted.sort();

        let mut names: Vec<String> = coords.iter().map(|c| c.tile_file_name("art")).collect();
        names.sort();
        let expected: Vec<String> = sorted.iter().map(|c| c.tile_file_name("art")).collect();

        assert_eq!(names, expected);
    }

    #[test]
    fn test_parse_round_trip() {
        for (base, coord) in [
            ("art", TileCoord::new(0, 0)),
            ("my_big_art", TileCoord::new(3, 14)),
            ("x", TileCoord::new(1234, 7)),
        ] {
            assert_eq!(
                parse_tile_name(&coord.tile_file_name(base)).unwrap(),
                (base.to_string(), coord)
            );
            assert_eq!(
                parse_tile_name(&coord.tile_name(base)).unwrap(),
                (base.to_string(), coord)
            );
        }
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        for name in [
            "art.paint",
            "art_1.paint",
            "_001_002.paint",
            "art_a_2.paint",
            "art_1_.paint",
            "art_-1_2.paint",
            "art_+1_2",
            "art_99999999999_0",
            "art_1_2.png",
        ] {
            assert!(
                matches!(parse_tile_name(name), Err(JopError::InvalidTileName { .. })),
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_parse_extension_any_case() {
        assert_eq!(
            parse_tile_name("ART_001_002.PAINT").unwrap(),
            ("ART".to_string(), TileCoord::new(1, 2))
        );
        assert_eq!(
            parse_tile_name("art_000_003.Paint").unwrap(),
            ("art".to_string(), TileCoord::new(0, 3))
        );
    }

    #[test]
    fn test_far_coordinates_do_not_overflow() {
        let layout =
            GridLayout::from_tiles([(TileCoord::new(0, 0), ()), (TileCoord::new(u32::MAX, 0), ())])
                .unwrap();

        assert_eq!(layout.span(), (1 << 32, 1));
        assert!(matches!(
            layout.ensure_within(1024),
            Err(JopError::ImageTooLarge { columns, rows: 1, max_tiles: 1024 }) if columns == 1 << 32
        ));
        match layout.ensure_complete() {
            Err(JopError::IncompleteGrid { missing, total }) => {
                assert_eq!(missing.len(), MISSING_REPORT_LIMIT);
                assert_eq!(missing[0], TileCoord::new(1, 0));
                assert_eq!(total, (1 << 32) - 2);
            }
            other => panic!("expected IncompleteGrid, got {:?}", other),
        }

        let corner = GridLayout::from_tiles([(TileCoord::new(u32::MAX, u32::MAX), ())]).unwrap();
        assert_eq!(corner.missing().len(), MISSING_REPORT_LIMIT);
        assert!(matches!(corner.ensure_within(usize::MAX), Err(JopError::ImageTooLarge { .. })));
    }

    #[test]
    fn test_missing_reports_gap() {
        let layout = GridLayout::from_tiles([
            (TileCoord::new(0, 0), ()),
            (TileCoord::new(1, 0), ()),
            (TileCoord::new(0, 1), ()),
        ])
        .unwrap();

        assert_eq!(layout.missing(), vec![TileCoord::new(1, 1)]);
        match layout.ensure_complete() {
            Err(JopError::IncompleteGrid { missing, total }) => {
                assert_eq!(missing, vec![TileCoord::new(1, 1)]);
                assert_eq!(total, 1);
            }
            other => panic!("expected IncompleteGrid, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_origin() {
        let layout = GridLayout::from_tiles([(TileCoord::new(1, 0), ())]).unwrap();
        assert_eq!(layout.missing(), vec![TileCoord::new(0, 0)]);

        let empty: GridLayout<()> = GridLayout::new();
        assert_eq!(empty.missing(), vec![TileCoord::new(0, 0)]);
    }

    #[test]
    fn test_complete_grid() {
        let layout = GridLayout::from_tiles(
            (0..3).flat_map(|r| (0..2).map(move |c| (TileCoord::new(c, r), c + r))),
        )
        .unwrap();
        assert_eq!(layout.ensure_complete().unwrap(), (2, 3));
        assert_eq!(layout.span(), (2, 3));
        assert!(layout.ensure_within(6).is_ok());
        assert!(matches!(layout.ensure_within(5), Err(JopError::ImageTooLarge { .. })));
        assert_eq!(layout.get(TileCoord::new(1, 2)), Some(&3));
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = GridLayout::from_tiles([(TileCoord::new(0, 0), 1), (TileCoord::new(0, 0), 2)])
            .unwrap_err();
        assert!(matches!(err, JopError::DuplicateTile { coord } if coord == TileCoord::new(0, 0)));
    }

    #[test]
    fn test_tile_name_snapshot() {
        let names: Vec<String> = [(0, 0), (1, 0), (0, 1), (12, 3)]
            .iter()
            .map(|&(c, r)| TileCoord::new(c, r).tile_file_name("sunset"))
            .collect();
        insta::assert_snapshot!(names.join("\n"), @r"
        sunset_000_000.paint
        sunset_001_000.paint
        sunset_000_001.paint
        sunset_012_003.paint
        ");
    }
}
