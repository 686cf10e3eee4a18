use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::output::Printer;
use crate::types::CanvasGeometry;

use super::load_tables;

/// Print the canvas size table
#[derive(Args, Debug)]
pub struct SizesArgs {
    /// Config file (default: ./jop.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: SizesArgs, printer: &Printer) -> Result<()> {
    let (_, tables) = load_tables(args.config.as_deref(), printer)?;
    for line in size_table(&tables.geometry) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per size: id, name, blocks, pixels.
pub fn size_table(geometry: &CanvasGeometry) -> Vec<String> {
    geometry
        .entries()
        .iter()
        .map(|entry| {
            let (w, h) = geometry.resolution_of(entry.size());
            format!(
                "{:<3} {:<8} {}x{} blocks  {}x{} px",
                entry.id, entry.name, entry.width, entry.height, w, h
            )
        })
        .collect()
}
