//! File system scanner for canvas files.
//!
//! Directories are scanned one level deep; grids live side by side in a
//! single folder.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::codec::EXTENSION;
use crate::error::{JopError, Result};

/// Check whether a path has the canvas file extension.
pub fn is_canvas_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(EXTENSION))
}

/// Canvas files directly inside `dir`, sorted by path.
pub fn scan_directory(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_canvas_file(p))
        .collect();

    found.sort();
    found
}

/// Expand a mix of files and directories into canvas file paths.
///
/// Files named explicitly are kept whatever their extension. Missing paths
/// are an error.
pub fn scan_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut result = Vec::new();

    for path in paths {
        if path.is_dir() {
            result.extend(scan_directory(path));
        } else if path.is_file() {
            result.push(path.clone());
        } else {
            return Err(JopError::Io {
                path: path.clone(),
                message: "No such file or directory".to_string(),
            });
        }
    }

    result.sort();
    result.dedup();
    Ok(result)
}
