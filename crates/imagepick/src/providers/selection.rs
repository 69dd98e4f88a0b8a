//! Gallery-style capture over a preselected file list
//!
//! The portable stand-in for a platform gallery picker: the host has already
//! let the user choose files (through a dialog, CLI arguments, a drop target)
//! and hands the paths over. Selected files stay owned by the user and are
//! never deleted by the flow.

use async_trait::async_trait;
use std::path::PathBuf;

use imagepick_core::{Artifact, ImageSource, MimeFilter, PickError, PickRequest, Stage};

use super::{CaptureOutcome, CaptureProvider};

/// Capture provider returning an already-made selection
#[derive(Debug, Clone, Default)]
pub struct FileSelectionProvider {
    selection: Vec<PathBuf>,
}

impl FileSelectionProvider {
    pub fn new<I, P>(selection: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            selection: selection.into_iter().map(Into::into).collect(),
        }
    }

    pub fn single(path: impl Into<PathBuf>) -> Self {
        Self {
            selection: vec![path.into()],
        }
    }
}

#[async_trait]
impl CaptureProvider for FileSelectionProvider {
    async fn capture(&self, request: &PickRequest) -> Result<CaptureOutcome, PickError> {
        if matches!(
            request.source,
            ImageSource::Camera | ImageSource::FrontCamera
        ) {
            return Err(PickError::ProviderUnavailable(
                "file selection cannot serve a camera request".to_string(),
            ));
        }

        // An empty selection is the user declining the picker
        if self.selection.is_empty() {
            return Ok(CaptureOutcome::Cancelled);
        }

        let paths = if request.multiple {
            &self.selection[..]
        } else {
            &self.selection[..1]
        };

        let filter = MimeFilter::new(request.mime_types.iter().cloned());
        let mut artifacts = Vec::with_capacity(paths.len());
        for path in paths {
            if !path.is_file() {
                return Err(PickError::InvalidRequest(format!(
                    "selected file {} does not exist",
                    path.display()
                )));
            }
            filter.validate(path)?;
            artifacts.push(Artifact::unowned(path.clone(), Stage::Capture));
        }

        tracing::debug!(count = artifacts.len(), "file selection captured");
        Ok(CaptureOutcome::Captured(artifacts))
    }
}
