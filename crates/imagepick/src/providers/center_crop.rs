//! Non-interactive crop provider
//!
//! Crops the centered region with the requested aspect ratio and clamps the
//! result to the request's max resolution, re-encoding in the source format.
//! A free crop (no aspect ratio) keeps the full frame, since there is no user
//! to drag the region around.

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

use imagepick_core::{Artifact, PickError, PickRequest};
use imagepick_processing::codec::{self, ImageKind};
use imagepick_processing::{crop, resize};

use super::{CropOutcome, CropProvider};

#[derive(Debug, Clone, Copy, Default)]
pub struct CenterCropProvider;

#[async_trait]
impl CropProvider for CenterCropProvider {
    async fn crop(
        &self,
        source: &Artifact,
        request: &PickRequest,
        output: &Path,
    ) -> Result<CropOutcome, PickError> {
        let spec = request.crop.ok_or_else(|| {
            PickError::InvalidRequest("crop provider invoked without a crop spec".to_string())
        })?;
        let max_resolution = request.max_resolution;
        let source_path = source.path().to_path_buf();
        let output_path: PathBuf = output.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let img = codec::decode(&source_path).map_err(|e| {
                PickError::ImageProcessing(format!(
                    "failed to decode {}: {}",
                    source_path.display(),
                    e
                ))
            })?;

            let img = match spec.aspect {
                Some((x, y)) => crop::crop_to_aspect(&img, x, y)
                    .map_err(|e| PickError::ImageProcessing(e.to_string()))?,
                None => img,
            };
            let img = match max_resolution {
                Some((width, height)) => resize::scale_to_fit(&img, width, height),
                None => img,
            };

            let data = codec::encode(&img, ImageKind::from_path(&output_path))
                .map_err(|e| PickError::ImageProcessing(format!("failed to encode crop: {}", e)))?;
            fs::write(&output_path, data).map_err(|e| {
                PickError::FileCreationFailed(format!(
                    "cannot write {}: {}",
                    output_path.display(),
                    e
                ))
            })?;

            Ok(CropOutcome::Cropped)
        })
        .await
        .map_err(|e| PickError::Internal(format!("crop worker failed: {}", e)))?
    }
}
