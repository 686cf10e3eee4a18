//! Grid manifest written next to imported tiles.
//!
//! Records what the tiler did so an export can crop padding back off.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{JopError, Result};
use crate::types::CanvasSize;

use super::{EdgePolicy, GridLayout};

/// File name suffix appended to the base name.
pub const MANIFEST_SUFFIX: &str = ".grid.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestTile {
    pub file: String,
    pub column: u32,
    pub row: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridManifest {
    pub base_name: String,
    /// Canvas size name, for humans.
    pub canvas: String,
    pub size_id: u8,
    pub columns: u32,
    pub rows: u32,
    pub source_width: u32,
    pub source_height: u32,
    pub edge: String,
    pub tiles: Vec<ManifestTile>,
}

impl GridManifest {
    /// Describe a tiled grid. The layout must be complete.
    pub fn new<T>(
        base_name: &str,
        canvas: &str,
        size: CanvasSize,
        source: (u32, u32),
        edge: EdgePolicy,
        layout: &GridLayout<T>,
    ) -> Result<Self> {
        let (columns, rows) = layout.ensure_complete()?;
        let tiles = layout
            .coords()
            .map(|coord| ManifestTile {
                file: coord.tile_file_name(base_name),
                column: coord.column,
                row: coord.row,
            })
            .collect();

        Ok(Self {
            base_name: base_name.to_string(),
            canvas: canvas.to_string(),
            size_id: size.id,
            columns,
            rows,
            source_width: source.0,
            source_height: source.1,
            edge: edge.to_string(),
            tiles,
        })
    }

    /// `<base><MANIFEST_SUFFIX>`
    pub fn file_name(base_name: &str) -> String {
        format!("{}{}", base_name, MANIFEST_SUFFIX)
    }

    pub fn source_dimensions(&self) -> (u32, u32) {
        (self.source_width, self.source_height)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| JopError::Parse {
            message: format!("Failed to serialize grid manifest: {}", e),
            help: None,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| JopError::Parse {
            message: format!("Invalid grid manifest: {}", e),
            help: Some(format!(
                "Expected the {} file written by `jop import`",
                MANIFEST_SUFFIX
            )),
        })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| JopError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write grid manifest: {}", e),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| JopError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read grid manifest: {}", e),
        })?;
        Self::parse(&content)
    }
}
