//! Domain models for pick operations

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the image comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Gallery,
    Camera,
    FrontCamera,
    #[default]
    Both,
}

/// Orchestration stage that produced an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Capture,
    Crop,
    Compress,
}

/// A file produced (or handed over) by one orchestration stage.
///
/// Ownership drives cleanup: owned artifacts are temporary files created by the
/// library and are deleted once a later stage supersedes them. Unowned
/// artifacts are the user's original files (e.g. a gallery selection) and are
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    path: PathBuf,
    stage: Stage,
    owned: bool,
}

impl Artifact {
    /// An artifact whose file the library created and is responsible for
    pub fn owned(path: impl Into<PathBuf>, stage: Stage) -> Self {
        Self {
            path: path.into(),
            stage,
            owned: true,
        }
    }

    /// An artifact backed by a file the library must never delete
    pub fn unowned(path: impl Into<PathBuf>, stage: Stage) -> Self {
        Self {
            path: path.into(),
            stage,
            owned: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }

    /// File size in bytes
    pub fn file_size(&self) -> std::io::Result<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }

    /// Best-effort removal of the backing file. Unowned artifacts and
    /// deletion failures are silently left alone.
    pub fn discard(&self) {
        if self.owned {
            let _ = fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discard_owned_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("owned.jpg");
        fs::write(&path, b"data").unwrap();

        let artifact = Artifact::owned(&path, Stage::Capture);
        artifact.discard();
        assert!(!path.exists());
    }

    #[test]
    fn test_discard_unowned_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("original.jpg");
        fs::write(&path, b"data").unwrap();

        let artifact = Artifact::unowned(&path, Stage::Capture);
        artifact.discard();
        assert!(path.exists());
    }

    #[test]
    fn test_discard_missing_file_is_silent() {
        let artifact = Artifact::owned("/nonexistent/path.jpg", Stage::Crop);
        artifact.discard();
    }

    #[test]
    fn test_file_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sized.jpg");
        fs::write(&path, vec![0u8; 1024]).unwrap();

        let artifact = Artifact::unowned(&path, Stage::Capture);
        assert_eq!(artifact.file_size().unwrap(), 1024);
    }

    #[test]
    fn test_image_source_serde() {
        let json = serde_json::to_string(&ImageSource::FrontCamera).unwrap();
        assert_eq!(json, "\"front_camera\"");
        let back: ImageSource = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ImageSource::FrontCamera);
    }
}
