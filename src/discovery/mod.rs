//! Finding and loading the canvas files of one grid.
//!
//! # Example
//!
//! ```ignore
//! use jop::discovery::load_tile_set;
//!
//! let set = load_tile_set(&[PathBuf::from("out/")])?;
//! println!("{}: {} tiles", set.base_name, set.tiles.len());
//! ```

mod scanner;

use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::CanvasFile;
use crate::error::{JopError, Result};
use crate::grid::{parse_tile_name, GridLayout, TileCoord};

pub use scanner::{is_canvas_file, scan_directory, scan_paths};

/// The canvas files of one grid, read from disk.
#[derive(Debug)]
pub struct TileSet {
    pub base_name: String,
    /// Directory holding the first tile; the grid manifest is looked up here.
    pub directory: PathBuf,
    pub tiles: GridLayout<CanvasFile>,
}

/// Assign each path a base name and grid coordinate.
///
/// A single file whose name carries no coordinate is tile `(0, 0)` of a
/// one-canvas grid. All files must share one base name.
pub fn group_tiles(paths: &[PathBuf]) -> Result<(String, GridLayout<PathBuf>)> {
    let [first, ..] = paths else {
        return Err(JopError::Parse {
            message: "No canvas files found".to_string(),
            help: Some("Pass .paint files or a directory containing them".to_string()),
        });
    };

    if let [only] = paths {
        let name = file_name(only);
        let (base, coord) = parse_tile_name(&name).unwrap_or_else(|_| (stem(only), TileCoord::new(0, 0)));
        return Ok((base, GridLayout::from_tiles([(coord, only.clone())])?));
    }

    let (base, _) = parse_tile_name(&file_name(first))?;
    let mut layout = GridLayout::new();

    for path in paths {
        let (other, coord) = parse_tile_name(&file_name(path))?;
        if other != base {
            return Err(JopError::Parse {
                message: format!("Tiles from more than one grid: '{}' and '{}'", base, other),
                help: Some("Export one grid at a time".to_string()),
            });
        }
        layout.insert(coord, path.clone())?;
    }

    Ok((base, layout))
}

/// Scan, group and read a tile set.
pub fn load_tile_set(inputs: &[PathBuf]) -> Result<TileSet> {
    let paths = scan_paths(inputs)?;
    let (base_name, layout) = group_tiles(&paths)?;

    let directory = layout
        .iter()
        .next()
        .and_then(|(_, p)| p.parent())
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let mut tiles = GridLayout::new();
    for (coord, path) in layout.iter() {
        let bytes = fs::read(path).map_err(|e| JopError::Io {
            path: path.clone(),
            message: format!("Failed to read canvas: {}", e),
        })?;
        tiles.insert(coord, CanvasFile::from_bytes(bytes))?;
    }

    Ok(TileSet {
        base_name,
        directory,
        tiles,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from("out").join(n)).collect()
    }

    #[test]
    fn test_group_tiles() {
        let (base, layout) = group_tiles(&paths(&[
            "lake_000_000.paint",
            "lake_001_000.paint",
            "lake_000_001.paint",
        ]))
        .unwrap();

        assert_eq!(base, "lake");
        assert_eq!(layout.len(), 3);
        assert_eq!(
            layout.get(TileCoord::new(0, 1)),
            Some(&PathBuf::from("out/lake_000_001.paint"))
        );
    }

    #[test]
    fn test_group_single_plain_file() {
        let (base, layout) = group_tiles(&paths(&["portrait.paint"])).unwrap();
        assert_eq!(base, "portrait");
        assert_eq!(layout.coords().collect::<Vec<_>>(), vec![TileCoord::new(0, 0)]);
    }

    #[test]
    fn test_group_single_named_tile_keeps_coordinate() {
        let (base, layout) = group_tiles(&paths(&["lake_002_001.paint"])).unwrap();
        assert_eq!(base, "lake");
        assert_eq!(layout.coords().collect::<Vec<_>>(), vec![TileCoord::new(2, 1)]);
    }

    #[test]
    fn test_group_rejects_mixed_bases() {
        assert!(matches!(
            group_tiles(&paths(&["lake_000_000.paint", "sky_000_000.paint"])),
            Err(JopError::Parse { .. })
        ));
    }

    #[test]
    fn test_group_rejects_unnamed_file_in_grid() {
        assert!(matches!(
            group_tiles(&paths(&["lake_000_000.paint", "extra.paint"])),
            Err(JopError::InvalidTileName { .. })
        ));
    }

    #[test]
    fn test_load_upper_case_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ART_000_000.PAINT"), b"one").unwrap();
        fs::write(dir.path().join("ART_000_001.PAINT"), b"two").unwrap();

        let set = load_tile_set(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(set.base_name, "ART");
        assert_eq!(set.tiles.ensure_complete().unwrap(), (1, 2));
    }

    #[test]
    fn test_group_empty() {
        assert!(matches!(group_tiles(&[]), Err(JopError::Parse { .. })));
    }

    #[test]
    fn test_load_tile_set() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("art_000_000.paint"), b"one").unwrap();
        fs::write(dir.path().join("art_001_000.paint"), b"two").unwrap();

        let set = load_tile_set(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(set.base_name, "art");
        assert_eq!(set.directory, dir.path());
        assert_eq!(
            set.tiles.get(TileCoord::new(1, 0)).map(|f| f.as_bytes()),
            Some(&b"two"[..])
        );
    }
}
