use miette::Diagnostic;
use thiserror::Error;

use crate::grid::TileCoord;
use crate::types::CanvasSize;

/// Main error type for jop operations
#[derive(Error, Diagnostic, Debug)]
pub enum JopError {
    #[error("IO error: {0}")]
    #[diagnostic(code(jop::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(jop::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(jop::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(jop::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Image error: {message}")]
    #[diagnostic(code(jop::image))]
    Image { message: String },

    #[error(
        "Dimension mismatch: expected {} pixels, got {}",
        format_dims(.expected),
        format_dims(.actual)
    )]
    #[diagnostic(code(jop::dimensions))]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Unrecognized format: expected magic {expected:?}, found {found:?}")]
    #[diagnostic(
        code(jop::codec::format),
        help("The file is not a canvas file written by this tool")
    )]
    UnrecognizedFormat { expected: Vec<u8>, found: Vec<u8> },

    #[error("Unsupported canvas format version {version} (supported: {supported})")]
    #[diagnostic(code(jop::codec::version))]
    UnsupportedVersion { version: u8, supported: u8 },

    #[error("Unknown canvas size id {id}")]
    #[diagnostic(
        code(jop::codec::size),
        help("The canvas size table does not contain this id; check the `canvas` section of jop.yaml")
    )]
    UnknownCanvasSize { id: u8 },

    #[error("Truncated data at byte {offset}: expected {expected} bytes, found {actual}")]
    #[diagnostic(code(jop::codec::truncated))]
    TruncatedData {
        offset: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Trailing data: expected {expected} pixel bytes, found {actual}")]
    #[diagnostic(code(jop::codec::trailing))]
    TrailingData { expected: usize, actual: usize },

    #[error("Palette index {index} at byte {offset} is out of range (palette has {palette_len} colours)")]
    #[diagnostic(
        code(jop::codec::index),
        help("The file was written against a different palette, or it is corrupt")
    )]
    PaletteIndexOutOfRange {
        index: u8,
        offset: usize,
        palette_len: usize,
    },

    #[error("No canvas size fits {width}x{height} pixels")]
    #[diagnostic(
        code(jop::geometry::fit),
        help("Pass --canvas or --grid to split the image across several canvases")
    )]
    NoFittingCanvasSize { width: u32, height: u32 },

    #[error("Image needs a {columns}x{rows} grid, more than the limit of {max_tiles} tiles")]
    #[diagnostic(
        code(jop::grid::too_large),
        help("Use a larger canvas size, --grid, or raise max_tiles")
    )]
    ImageTooLarge {
        columns: u64,
        rows: u64,
        max_tiles: usize,
    },

    #[error("Invalid edge policy '{value}'")]
    #[diagnostic(code(jop::grid::edge), help("Use 'pad' or 'crop'"))]
    InvalidEdgePolicy { value: String },

    #[error("Incomplete grid: missing {}", format_missing(.missing, .total))]
    #[diagnostic(code(jop::grid::incomplete))]
    IncompleteGrid {
        /// The first missing coordinates in row-major order.
        missing: Vec<TileCoord>,
        /// How many coordinates are missing in all.
        total: u64,
    },

    #[error("Tile {coord} is a {actual} canvas, expected {expected}")]
    #[diagnostic(code(jop::grid::tile_size))]
    InconsistentTileSize {
        coord: TileCoord,
        expected: CanvasSize,
        actual: CanvasSize,
    },

    #[error("Tile {coord} appears more than once")]
    #[diagnostic(code(jop::grid::duplicate))]
    DuplicateTile { coord: TileCoord },

    #[error("Invalid tile name '{name}'")]
    #[diagnostic(
        code(jop::grid::name),
        help("Tile files are named <base>_<column>_<row>.paint, e.g. art_000_001.paint")
    )]
    InvalidTileName { name: String },
}

fn format_dims(dims: &(u32, u32)) -> String {
    format!("{}x{}", dims.0, dims.1)
}

fn format_missing(coords: &[TileCoord], total: &u64) -> String {
    let listed = coords
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    match total.checked_sub(coords.len() as u64) {
        Some(more) if more > 0 => format!("{} and {} more", listed, more),
        _ => listed,
    }
}

pub type Result<T> = std::result::Result<T, JopError>;
