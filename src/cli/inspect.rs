//! Inspect command implementation.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::codec::CanvasCodec;
use crate::config::Tables;
use crate::error::{JopError, Result};
use crate::output::{display_path, plural, Printer};

use super::load_tables;

/// Decode canvas files and report their size and contents
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Canvas files to inspect
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Config file (default: ./jop.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// What a canvas file holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasSummary {
    pub size_id: u8,
    pub size_name: String,
    pub width: u32,
    pub height: u32,
    /// Number of distinct palette indices used.
    pub colours: usize,
}

pub fn run(args: InspectArgs, printer: &Printer) -> Result<()> {
    let (_, tables) = load_tables(args.config.as_deref(), printer)?;

    let mut failed = 0;
    for path in &args.files {
        match inspect_file(path, &tables) {
            Ok(summary) => println!(
                "{}\t{} (id {})\t{}x{}\t{}",
                display_path(path),
                summary.size_name,
                summary.size_id,
                summary.width,
                summary.height,
                plural(summary.colours, "colour", "colours")
            ),
            Err(err) => {
                failed += 1;
                printer.error("Invalid", &format!("{}: {}", display_path(path), err));
            }
        }
    }

    if failed > 0 {
        return Err(JopError::Parse {
            message: format!(
                "{} of {} could not be decoded",
                failed,
                plural(args.files.len(), "file", "files")
            ),
            help: None,
        });
    }

    printer.status("Inspected", &plural(args.files.len(), "file", "files"));
    Ok(())
}

/// Decode one file and summarize it.
pub fn inspect_file(path: &Path, tables: &Tables) -> Result<CanvasSummary> {
    let bytes = fs::read(path).map_err(|e| JopError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read canvas: {}", e),
    })?;

    let codec = CanvasCodec::new(&tables.palette, &tables.geometry);
    let (block, size) = codec.decode(&bytes)?;
    let colours: BTreeSet<u8> = block.indices().iter().copied().collect();

    Ok(CanvasSummary {
        size_id: size.id,
        size_name: tables.geometry.name_of(size).unwrap_or("?").to_string(),
        width: block.width(),
        height: block.height(),
        colours: colours.len(),
    })
}
