//! File utility methods
//!
//! Artifact files are named `IMG_<timestamp>_<uuid8>.<ext>` so that outputs
//! sort chronologically while staying collision-free across rapid attempts.

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::PickError;

const DEFAULT_EXTENSION: &str = "jpg";

/// Allocate a fresh, uniquely named image file path inside `dir`, creating
/// the directory if needed. The file itself is not created; the first writer
/// does that.
pub fn image_file(dir: &Path, extension: &str) -> Result<PathBuf, PickError> {
    fs::create_dir_all(dir).map_err(|e| {
        PickError::FileCreationFailed(format!("cannot create {}: {}", dir.display(), e))
    })?;

    let uuid = Uuid::new_v4().simple().to_string();
    let file_name = format!("IMG_{}_{}.{}", timestamp(), &uuid[..8], extension);
    Ok(dir.join(file_name))
}

/// Current local time as `yyyyMMdd_HHmmssSSS`
fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S%3f").to_string()
}

/// Image extension of `path`, lowercased, defaulting to `jpg`
pub fn image_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
