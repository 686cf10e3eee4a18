//! Import command implementation.
//!
//! Converts a raster image into one canvas file, or a grid of canvas files
//! plus a grid manifest.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::codec::CanvasFile;
use crate::config::Tables;
use crate::error::{JopError, Result};
use crate::grid::{EdgePolicy, GridLayout, GridManifest, GridStitcher, GridTiler, TileOptions};
use crate::output::{display_path, plural, Printer};
use crate::raster::{load_raster, resize, FilterType};
use crate::render::{write_preview, DitherMethod};
use crate::types::{CanvasSize, RasterImage};

use super::{load_tables, parse_dimensions, resolve_canvas};

/// Canvas size used with `--grid` when none is named.
const DEFAULT_GRID_CANVAS: &str = "large";

/// Convert an image into canvas files
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Image to convert (PNG, JPEG or BMP)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output directory
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,

    /// Base name for generated files (default: input filename stem)
    #[arg(long)]
    pub name: Option<String>,

    /// Canvas size name (small, large, long, tall)
    #[arg(long)]
    pub canvas: Option<String>,

    /// Resize the image to exactly COLSxROWS canvases (e.g. 3x2)
    #[arg(long)]
    pub grid: Option<String>,

    /// Partial edge tiles: pad or crop
    #[arg(long, default_value = "pad")]
    pub edge: String,

    /// Dithering: none or ordered
    #[arg(long, default_value = "none")]
    pub dither: String,

    /// Also write <NAME>_preview.png showing the quantized result
    #[arg(long)]
    pub preview: bool,

    /// Integer scale for the preview (default: from config, else 8)
    #[arg(long)]
    pub preview_scale: Option<u32>,

    /// Largest number of canvases to produce
    #[arg(long)]
    pub max_tiles: Option<usize>,

    /// Config file (default: ./jop.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Where the tiles and extras of one import were written.
#[derive(Debug)]
pub struct ImportReport {
    pub files: Vec<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub preview: Option<PathBuf>,
    pub columns: u32,
    pub rows: u32,
}

pub fn run(args: ImportArgs, printer: &Printer) -> Result<ImportReport> {
    let (config, tables) = load_tables(args.config.as_deref(), printer)?;
    let preview_scale = args.preview_scale.unwrap_or(config.preview_scale);
    import(&args, &tables, preview_scale, printer)
}

/// Run an import against already-resolved tables.
pub fn import(
    args: &ImportArgs,
    tables: &Tables,
    preview_scale: u32,
    printer: &Printer,
) -> Result<ImportReport> {
    let path = &args.input;
    let edge: EdgePolicy = args.edge.parse()?;
    let dither: DitherMethod = args.dither.parse()?;
    let grid = args.grid.as_deref().map(parse_dimensions).transpose()?;
    let max_tiles = args.max_tiles.unwrap_or(tables.max_tiles);

    let source = load_raster(path)?;
    let (w, h) = source.dimensions();
    if w == 0 || h == 0 {
        return Err(JopError::Image {
            message: format!("{} has zero dimensions ({}x{})", display_path(path), w, h),
        });
    }
    printer.info("Loaded", &format!("{} ({}x{})", display_path(path), w, h));

    let base_name = args.name.clone().unwrap_or_else(|| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("canvas")
            .to_string()
    });

    let (size, image) = select_size(args, tables, grid, max_tiles, source)?;
    let canvas_name = tables.geometry.name_of(size).unwrap_or("custom").to_string();

    let options = TileOptions::new(size).with_edge(edge).with_dither(dither);
    let tiler = GridTiler::new(&tables.palette, &tables.geometry).with_max_tiles(max_tiles);
    let (columns, rows) = tiler.grid_dimensions(image.width(), image.height(), &options)?;

    printer.status(
        "Importing",
        &format!(
            "{}x{} grid of {} canvases ({})",
            columns,
            rows,
            canvas_name,
            plural(columns as usize * rows as usize, "tile", "tiles")
        ),
    );

    let tiles = tiler.tile(&image, &options)?;

    fs::create_dir_all(&args.output).map_err(|e| JopError::Io {
        path: args.output.clone(),
        message: format!("Failed to create output directory: {}", e),
    })?;

    let single = grid.is_none() && tiles.len() == 1;
    let mut files = Vec::with_capacity(tiles.len());

    for (coord, file) in tiles.iter() {
        let out = args.output.join(coord.tile_file_name(&base_name));
        write_canvas(&out, file)?;
        files.push(out);
    }

    let manifest = if single {
        None
    } else {
        let manifest = GridManifest::new(
            &base_name,
            &canvas_name,
            size,
            image.dimensions(),
            edge,
            &tiles,
        )?;
        let out = args.output.join(GridManifest::file_name(&base_name));
        manifest.write(&out)?;
        Some(out)
    };

    let preview = if args.preview {
        let out = args.output.join(format!("{}_preview.png", base_name));
        write_grid_preview(tables, &tiles, max_tiles, &out, preview_scale)?;
        printer.info("Preview", &display_path(&out));
        Some(out)
    } else {
        None
    };

    printer.status(
        "Finished",
        &format!(
            "{} in {}",
            plural(files.len(), "canvas", "canvases"),
            printer.cyan(&display_path(&args.output))
        ),
    );

    Ok(ImportReport {
        files,
        manifest,
        preview,
        columns,
        rows,
    })
}

/// Choose the canvas size and the image to tile.
///
/// `--grid` resizes to fill the grid exactly, `--canvas` keeps native
/// resolution, and with neither the smallest canvas that fits is used.
/// A `--grid` over `max_tiles` fails before anything is resized.
fn select_size(
    args: &ImportArgs,
    tables: &Tables,
    grid: Option<(u32, u32)>,
    max_tiles: usize,
    image: RasterImage,
) -> Result<(CanvasSize, RasterImage)> {
    let geometry = &tables.geometry;

    match (grid, args.canvas.as_deref()) {
        (Some((columns, rows)), canvas) => {
            let size = resolve_canvas(geometry, canvas.unwrap_or(DEFAULT_GRID_CANVAS))?;
            let too_large = || JopError::ImageTooLarge {
                columns: columns.into(),
                rows: rows.into(),
                max_tiles,
            };
            if u64::from(columns) * u64::from(rows) > max_tiles as u64 {
                return Err(too_large());
            }

            let (tw, th) = geometry.resolution_of(size);
            let width = columns.checked_mul(tw).ok_or_else(too_large)?;
            let height = rows.checked_mul(th).ok_or_else(too_large)?;
            Ok((size, resize(&image, width, height, FilterType::Triangle)))
        }
        (None, Some(name)) => Ok((resolve_canvas(geometry, name)?, image)),
        (None, None) => Ok((geometry.best_fit(image.width(), image.height())?, image)),
    }
}

fn write_canvas(path: &Path, file: &CanvasFile) -> Result<()> {
    fs::write(path, file.as_bytes()).map_err(|e| JopError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write canvas: {}", e),
    })
}

fn write_grid_preview(
    tables: &Tables,
    tiles: &GridLayout<CanvasFile>,
    max_tiles: usize,
    path: &Path,
    scale: u32,
) -> Result<()> {
    let stitched = GridStitcher::new(&tables.palette, &tables.geometry)
        .with_max_tiles(max_tiles)
        .stitch(tiles)?;
    write_preview(&stitched.image, path, scale)
}
