// ABOUTME: Utility functions for the slidecraft application
// ABOUTME: Provides path checks, directory creation, PNG listing and output file numbering

use crate::errors::{Result, SlideError};
use std::path::{Path, PathBuf};

fn expect_kind(path: &Path, is_kind: fn(&Path) -> bool, kind: &str) -> Result<()> {
    if !path.exists() {
        return Err(SlideError::PathNotFoundError(path.to_path_buf()));
    }
    if !is_kind(path) {
        return Err(SlideError::ValidationError(format!(
            "Path is not {}: {:?}",
            kind, path
        )));
    }
    Ok(())
}

/// Validate that a file exists
pub fn validate_file_exists(path: &Path) -> Result<()> {
    expect_kind(path, Path::is_file, "a file")
}

/// Validate that a directory exists
pub fn validate_directory_exists(path: &Path) -> Result<()> {
    expect_kind(path, Path::is_dir, "a directory")
}

/// Create `path` and its parents unless it is already a directory
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(SlideError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Get the absolute path
pub fn get_absolute_path(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| {
        SlideError::ValidationError(format!("Failed to get absolute path for {:?}: {}", path, e))
    })
}

/// PNG files directly inside `dir`, in glob order.
///
/// The directory part is escaped, so names such as `deck[1]` are matched literally.
pub fn png_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.png",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let files: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| SlideError::ValidationError(format!("Invalid glob pattern: {}", e)))?
        .flatten()
        .collect();
    Ok(files)
}

/// Next free `<n>.png` in `dir`: one past the largest numeric stem, or `1.png`.
///
/// Non-numeric PNG names are ignored; a missing directory yields `1.png`.
pub fn next_numbered_filename(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        return Ok(dir.join("1.png"));
    }

    let highest = png_files(dir)?
        .iter()
        .filter_map(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .filter(|stem| !stem.is_empty() && stem.chars().all(|c| c.is_ascii_digit()))
                .and_then(|stem| stem.parse::<u64>().ok())
        })
        .max();

    let next = highest.map_or(1, |n| n + 1);
    Ok(dir.join(format!("{}.png", next)))
}
