//! Configuration file (jop.yaml) parsing.
//!
//! Every field is optional. The palette and canvas size tables default to the
//! builtin dye palette and Joy of Painting sizes; supplying them lets the
//! tables track a modded game without a rebuild.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{JopError, Result};
use crate::grid::DEFAULT_MAX_TILES;
use crate::types::{CanvasEntry, CanvasGeometry, Palette, PaletteEntry, PaletteIndex, PIXELS_PER_BLOCK};

/// File looked up in the current directory when no path is given.
pub const CONFIG_FILE: &str = "jop.yaml";

/// Default integer scale for preview images.
pub const DEFAULT_PREVIEW_SCALE: u32 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Largest grid a single import may produce.
    #[serde(default = "default_max_tiles")]
    pub max_tiles: usize,

    #[serde(default = "default_preview_scale")]
    pub preview_scale: u32,

    #[serde(default)]
    pub palette: Option<PaletteConfig>,

    #[serde(default)]
    pub canvas: Option<CanvasConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    #[serde(default = "default_palette_name")]
    pub name: String,
    #[serde(default)]
    pub background: Option<PaletteIndex>,
    pub colours: Vec<PaletteEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "default_pixels_per_block")]
    pub pixels_per_block: u32,
    pub sizes: Vec<CanvasEntry>,
}

fn default_max_tiles() -> usize {
    DEFAULT_MAX_TILES
}

fn default_preview_scale() -> u32 {
    DEFAULT_PREVIEW_SCALE
}

fn default_palette_name() -> String {
    "custom".to_string()
}

fn default_pixels_per_block() -> u32 {
    PIXELS_PER_BLOCK
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_tiles: default_max_tiles(),
            preview_scale: default_preview_scale(),
            palette: None,
            canvas: None,
        }
    }
}

/// The immutable tables every command works against.
#[derive(Debug, Clone)]
pub struct Tables {
    pub palette: Palette,
    pub geometry: CanvasGeometry,
    pub max_tiles: usize,
}

impl Config {
    /// Load config from a jop.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| JopError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse config from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| JopError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILE)),
        })
    }

    /// Resolve the config to use: an explicit path, else `jop.yaml` in `dir`
    /// if present, else defaults. Returns the path that was read, if any.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Ok((Self::load(&candidate)?, Some(candidate)));
        }

        Ok((Self::default(), None))
    }

    /// Build and validate the palette and size tables.
    pub fn tables(&self) -> Result<Tables> {
        if self.max_tiles == 0 {
            return Err(JopError::Config {
                message: "max_tiles must be at least 1".to_string(),
                help: None,
            });
        }

        let palette = match &self.palette {
            Some(p) => Palette::new(p.name.clone(), p.colours.clone(), p.background)?,
            None => Palette::dyes(),
        };

        let geometry = match &self.canvas {
            Some(c) => CanvasGeometry::new(c.pixels_per_block, c.sizes.clone())?,
            None => CanvasGeometry::joy_of_painting(),
        };

        Ok(Tables {
            palette,
            geometry,
            max_tiles: self.max_tiles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Colour;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_tiles, DEFAULT_MAX_TILES);
        assert_eq!(config.preview_scale, 8);
    }

    #[test]
    fn test_default_tables() {
        let tables = Config::default().tables().unwrap();
        assert_eq!(tables.palette, Palette::dyes());
        assert_eq!(tables.geometry, CanvasGeometry::joy_of_painting());
        assert_eq!(tables.max_tiles, 1024);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r##"
max_tiles: 64
preview_scale: 4
palette:
  name: mono
  background: 1
  colours:
    - { name: black, colour: "#000000" }
    - { name: white, colour: "#FFFFFF" }
canvas:
  pixels_per_block: 8
  sizes:
    - { id: 0, name: small, width: 1, height: 1 }
    - { id: 5, name: poster, width: 3, height: 4 }
"##;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.max_tiles, 64);
        assert_eq!(config.preview_scale, 4);

        let tables = config.tables().unwrap();
        assert_eq!(tables.palette.name(), "mono");
        assert_eq!(tables.palette.len(), 2);
        assert_eq!(tables.palette.background_index(), Some(1));
        assert_eq!(tables.palette.colour(1), Some(Colour::WHITE));

        let poster = tables.geometry.by_name("poster").unwrap();
        assert_eq!(tables.geometry.resolution_of(poster), (24, 32));
        assert_eq!(tables.geometry.by_id(5), Some(poster));
    }

    #[test]
    fn test_invalid_tables() {
        let dup = r##"
palette:
  colours:
    - { name: a, colour: "#102030" }
    - { name: b, colour: "#102030" }
"##;
        assert!(matches!(
            Config::parse(dup).unwrap().tables(),
            Err(JopError::Config { .. })
        ));

        let zero = "max_tiles: 0";
        assert!(matches!(
            Config::parse(zero).unwrap().tables(),
            Err(JopError::Config { .. })
        ));

        assert!(matches!(
            Config::parse("max_tiles: [1, 2]"),
            Err(JopError::Config { .. })
        ));
    }

    #[test]
    fn test_discover() {
        let dir = TempDir::new().unwrap();

        let (config, path) = Config::discover(None, dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.is_none());

        std::fs::write(dir.path().join(CONFIG_FILE), "max_tiles: 9").unwrap();
        let (config, path) = Config::discover(None, dir.path()).unwrap();
        assert_eq!(config.max_tiles, 9);
        assert_eq!(path, Some(dir.path().join(CONFIG_FILE)));

        let other = dir.path().join("other.yaml");
        std::fs::write(&other, "preview_scale: 2").unwrap();
        let (config, _) = Config::discover(Some(other.as_path()), dir.path()).unwrap();
        assert_eq!(config.preview_scale, 2);
        assert_eq!(config.max_tiles, DEFAULT_MAX_TILES);

        assert!(matches!(
            Config::discover(Some(dir.path().join("missing.yaml").as_path()), dir.path()),
            Err(JopError::Io { .. })
        ));
    }
}
