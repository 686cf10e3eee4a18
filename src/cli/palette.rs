use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::raster::load_raster;
use crate::render::{DitherMethod, Quantizer};
use crate::types::{Palette, PaletteIndex, RasterImage};

use super::load_tables;

/// Print the palette, or which palette colours an image quantizes to
#[derive(Args, Debug)]
pub struct PaletteArgs {
    /// Image to quantize and count
    pub image: Option<PathBuf>,

    /// Maximum number of colours to output
    #[arg(long)]
    pub max: Option<usize>,

    /// Dithering used when counting: none or ordered
    #[arg(long, default_value = "none")]
    pub dither: String,

    /// Config file (default: ./jop.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: PaletteArgs, printer: &Printer) -> Result<()> {
    let (_, tables) = load_tables(args.config.as_deref(), printer)?;
    let palette = &tables.palette;

    let Some(path) = &args.image else {
        for (i, entry) in palette.entries().iter().enumerate() {
            let marker = if palette.background_index() == Some(i as PaletteIndex) {
                " (background)"
            } else {
                ""
            };
            println!("{:>3} {:<12} {}{}", i, entry.name, entry.colour, marker);
        }
        return Ok(());
    };

    let dither: DitherMethod = args.dither.parse()?;
    let image = load_raster(path)?;
    let mut usage = index_usage(palette, &image, dither);

    if let Some(max) = args.max {
        usage.truncate(max);
    }

    printer.status(
        "Quantized",
        &format!(
            "{} to {}",
            display_path(path),
            plural(usage.len(), "colour", "colours")
        ),
    );

    for (index, count) in usage {
        let entry = &palette.entries()[index as usize];
        println!("{:>3} {:<12} {} {}", index, entry.name, entry.colour, count);
    }

    Ok(())
}

/// Pixel count per palette index after quantization, most used first.
/// Unused indices are omitted; ties keep index order.
pub fn index_usage(
    palette: &Palette,
    image: &RasterImage,
    dither: DitherMethod,
) -> Vec<(PaletteIndex, usize)> {
    let block = Quantizer::new(palette, dither).quantize_image(image);

    let mut counts = vec![0usize; palette.len()];
    for &index in block.indices() {
        counts[index as usize] += 1;
    }

    let mut usage: Vec<(PaletteIndex, usize)> = counts
        .into_iter()
        .enumerate()
        .filter(|&(_, n)| n > 0)
        .map(|(i, n)| (i as PaletteIndex, n))
        .collect();
    usage.sort_by(|a, b| b.1.cmp(&a.1));
    usage
}
