//! Export command implementation.
//!
//! Stitches the canvas files of one grid back into a raster image.

use std::path::PathBuf;

use clap::Args;

use crate::config::Tables;
use crate::discovery::{load_tile_set, TileSet};
use crate::error::{JopError, Result};
use crate::grid::{GridManifest, GridStitcher, StitchedGrid};
use crate::output::{display_path, plural, Printer};
use crate::raster::{resize, save_raster, FilterType};
use crate::types::RasterImage;

use super::{load_tables, parse_dimensions};

/// Stitch canvas files into an image
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Canvas files and/or directories containing them
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output image; the format follows the extension (.png, .jpg, .bmp)
    #[arg(long, short)]
    pub output: PathBuf,

    /// Integer upscale factor
    #[arg(long, default_value = "1")]
    pub scale: u32,

    /// Resize to WxH after cropping (nearest neighbour)
    #[arg(long)]
    pub size: Option<String>,

    /// Crop to WxH from the top-left corner
    #[arg(long, conflicts_with = "crop_source")]
    pub crop: Option<String>,

    /// Crop back to the imported image size recorded in the grid manifest
    #[arg(long)]
    pub crop_source: bool,

    /// Config file (default: ./jop.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: ExportArgs, printer: &Printer) -> Result<RasterImage> {
    let (_, tables) = load_tables(args.config.as_deref(), printer)?;
    export(&args, &tables, printer)
}

/// Run an export against already-resolved tables. Returns the image written.
pub fn export(args: &ExportArgs, tables: &Tables, printer: &Printer) -> Result<RasterImage> {
    let crop = args.crop.as_deref().map(parse_dimensions).transpose()?;
    let size = args.size.as_deref().map(parse_dimensions).transpose()?;

    let set = load_tile_set(&args.inputs)?;
    printer.info(
        "Found",
        &format!("{} for '{}'", plural(set.tiles.len(), "canvas", "canvases"), set.base_name),
    );

    let stitched = GridStitcher::new(&tables.palette, &tables.geometry)
        .with_max_tiles(tables.max_tiles)
        .stitch(&set.tiles)?;
    printer.status(
        "Stitching",
        &format!(
            "{}x{} grid of {} ({}x{})",
            stitched.columns,
            stitched.rows,
            stitched.size,
            stitched.image.width(),
            stitched.image.height()
        ),
    );

    let source = if args.crop_source {
        Some(source_dimensions(&set, &stitched, printer)?)
    } else {
        None
    };

    let mut image = stitched.image;

    if let Some((w, h)) = crop {
        if w > image.width() || h > image.height() {
            printer.warning(
                "Warning",
                &format!(
                    "Crop {}x{} exceeds the stitched {}x{} image; clamping",
                    w,
                    h,
                    image.width(),
                    image.height()
                ),
            );
        }
        image = image.crop(0, 0, w, h);
    } else if let Some((w, h)) = source {
        image = image.crop(0, 0, w, h);
    }

    if let Some((w, h)) = size {
        image = resize(&image, w, h, FilterType::Nearest);
    }

    let image = image.scaled(args.scale);
    save_raster(&args.output, &image)?;

    printer.status(
        "Finished",
        &format!(
            "{} ({}x{})",
            printer.cyan(&display_path(&args.output)),
            image.width(),
            image.height()
        ),
    );

    Ok(image)
}

/// Pre-padding image size from the grid manifest next to the tiles.
///
/// The manifest must describe the same canvas size as the tiles.
fn source_dimensions(set: &TileSet, stitched: &StitchedGrid, printer: &Printer) -> Result<(u32, u32)> {
    let path = set.directory.join(GridManifest::file_name(&set.base_name));
    let manifest = GridManifest::load(&path)?;

    if manifest.size_id != stitched.size.id {
        return Err(JopError::Parse {
            message: format!(
                "{} describes {} canvases (id {}) but the tiles are {}",
                display_path(&path),
                manifest.canvas,
                manifest.size_id,
                stitched.size
            ),
            help: Some("The manifest belongs to another import; pass --crop WxH instead".to_string()),
        });
    }

    let (columns, rows) = (stitched.columns, stitched.rows);
    if manifest.columns != columns || manifest.rows != rows {
        printer.warning(
            "Warning",
            &format!(
                "{} describes a {}x{} grid but {}x{} tiles were found",
                display_path(&path),
                manifest.columns,
                manifest.rows,
                columns,
                rows
            ),
        );
    }

    Ok(manifest.source_dimensions())
}
