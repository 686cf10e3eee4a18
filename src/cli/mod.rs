pub mod completions;
pub mod export;
pub mod import;
pub mod inspect;
pub mod palette;
pub mod sizes;

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::config::{Config, Tables};
use crate::error::{JopError, Result};
use crate::output::{display_path, Printer};
use crate::types::{CanvasGeometry, CanvasSize};

/// jop - Joy of Painting canvas converter
#[derive(Parser, Debug)]
#[command(name = "jop")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert an image into one canvas or a grid of canvases
    Import(import::ImportArgs),

    /// Stitch canvas files back into an image
    Export(export::ExportArgs),

    /// Decode canvas files and report what they contain
    Inspect(inspect::InspectArgs),

    /// Print the palette, or palette usage of an image
    Palette(palette::PaletteArgs),

    /// Print the canvas size table
    Sizes(sizes::SizesArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Resolve jop.yaml (explicit path or current directory) and build the
/// tables.
pub fn load_tables(config: Option<&Path>, printer: &Printer) -> Result<(Config, Tables)> {
    let cwd = std::env::current_dir()?;
    let (config, path) = Config::discover(config, &cwd)?;
    if let Some(path) = &path {
        printer.info("Config", &display_path(path));
    }
    let tables = config.tables()?;
    Ok((config, tables))
}

/// Look up a canvas size by name.
pub fn resolve_canvas(geometry: &CanvasGeometry, name: &str) -> Result<CanvasSize> {
    geometry.by_name(name).ok_or_else(|| {
        let names: Vec<&str> = geometry.entries().iter().map(|e| e.name.as_str()).collect();
        JopError::Parse {
            message: format!("Unknown canvas size '{}'", name),
            help: Some(format!("Available sizes: {}", names.join(", "))),
        }
    })
}

/// Parse a "WxH" dimension string into (width, height).
pub fn parse_dimensions(s: &str) -> Result<(u32, u32)> {
    let parts: Vec<&str> = s.splitn(2, |c| c == 'x' || c == 'X').collect();
    if parts.len() != 2 {
        return Err(JopError::Parse {
            message: format!("Invalid dimensions '{}': expected WxH (e.g. 3x2)", s),
            help: Some("Use the format WxH, for example: 3x2, 128x64".to_string()),
        });
    }

    let w: u32 = parts[0].parse().map_err(|_| JopError::Parse {
        message: format!("Invalid width '{}' in dimensions '{}'", parts[0], s),
        help: Some("Width must be a positive integer".to_string()),
    })?;

    let h: u32 = parts[1].parse().map_err(|_| JopError::Parse {
        message: format!("Invalid height '{}' in dimensions '{}'", parts[1], s),
        help: Some("Height must be a positive integer".to_string()),
    })?;

    if w == 0 || h == 0 {
        return Err(JopError::Parse {
            message: format!("Dimensions must be non-zero, got {}x{}", w, h),
            help: Some("Both width and height must be at least 1".to_string()),
        });
    }

    Ok((w, h))
}
