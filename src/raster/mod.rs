//! Raster image files.
//!
//! Everything that touches PNG/JPEG/BMP bytes lives here; the rest of the
//! crate only sees [`RasterImage`].

mod formats;

use std::fs;
use std::path::Path;

use image::imageops;
pub use image::imageops::FilterType;

use crate::error::{JopError, Result};
use crate::types::RasterImage;

pub use formats::{BmpFormat, JpegFormat, PngFormat, RasterFormat};

static PNG: PngFormat = PngFormat;
static JPEG: JpegFormat = JpegFormat { quality: 90 };
static BMP: BmpFormat = BmpFormat;

/// All supported formats, in sniffing order.
pub fn formats() -> [&'static dyn RasterFormat; 3] {
    [&PNG, &JPEG, &BMP]
}

/// Select a format by file extension (case-insensitive).
pub fn format_for_path(path: &Path) -> Option<&'static dyn RasterFormat> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    formats()
        .into_iter()
        .find(|f| f.extensions().contains(&ext.as_str()))
}

/// Select a format by content.
pub fn sniff_format(bytes: &[u8]) -> Option<&'static dyn RasterFormat> {
    let name = match image::guess_format(bytes).ok()? {
        image::ImageFormat::Png => "png",
        image::ImageFormat::Jpeg => "jpeg",
        image::ImageFormat::Bmp => "bmp",
        _ => return None,
    };
    formats().into_iter().find(|f| f.name() == name)
}

/// Load an image, trusting the extension first and sniffing the content if
/// that fails.
pub fn load_raster(path: &Path) -> Result<RasterImage> {
    let bytes = fs::read(path).map_err(|e| JopError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read image: {}", e),
    })?;

    let by_extension = format_for_path(path).map(|f| f.decode(&bytes));
    match by_extension {
        Some(Ok(image)) => Ok(image),
        Some(Err(err)) => match sniff_format(&bytes) {
            Some(format) => format.decode(&bytes),
            None => Err(err),
        },
        None => match sniff_format(&bytes) {
            Some(format) => format.decode(&bytes),
            None => Err(JopError::Image {
                message: format!("Unrecognized image format: {}", path.display()),
            }),
        },
    }
}

/// Save an image in the format named by the path's extension.
pub fn save_raster(path: &Path, image: &RasterImage) -> Result<()> {
    let format = format_for_path(path).ok_or_else(|| JopError::Image {
        message: format!(
            "Unsupported output format: {} (use .png, .jpg or .bmp)",
            path.display()
        ),
    })?;

    let bytes = format.encode(image)?;
    fs::write(path, bytes).map_err(|e| JopError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write {}: {}", format.name(), e),
    })
}

/// Resample to an exact size.
pub fn resize(image: &RasterImage, width: u32, height: u32, filter: FilterType) -> RasterImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    let resized = imageops::resize(&image.to_rgba8(), width, height, filter);
    RasterImage::from_rgba8(&resized)
}
