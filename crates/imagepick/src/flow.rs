//! Pick flow orchestration
//!
//! Sequences capture → crop → compress over provider seams, tracking the
//! stage as a tagged enum and deleting superseded temporary files as soon as
//! the next stage has produced a replacement. A flow is consumed by `run()`:
//! one pick operation per instance, terminal outcomes are final.

use std::fs;
use std::sync::Arc;

use imagepick_core::{file_util, Artifact, PickError, PickRequest, Stage};
use imagepick_processing::{CompressionConstraints, Compressor};

use crate::providers::{CaptureOutcome, CaptureProvider, CropOutcome, CropProvider};

/// Stage of a pick operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    Idle,
    Capturing,
    Cropping,
    Compressing,
    Done,
    Cancelled,
    Error,
}

/// Terminal result of a pick operation that did not fail
#[derive(Debug, Clone)]
pub enum PickOutcome {
    /// Final artifact(s); a single entry unless gallery multi-select was used
    Picked(Vec<Artifact>),
    /// The user backed out at some stage
    Cancelled,
}

impl PickOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PickOutcome::Cancelled)
    }

    /// Final artifacts; empty when cancelled
    pub fn artifacts(&self) -> &[Artifact] {
        match self {
            PickOutcome::Picked(artifacts) => artifacts,
            PickOutcome::Cancelled => &[],
        }
    }

    pub fn into_artifacts(self) -> Vec<Artifact> {
        match self {
            PickOutcome::Picked(artifacts) => artifacts,
            PickOutcome::Cancelled => Vec::new(),
        }
    }
}

/// One pick operation
pub struct PickFlow {
    request: PickRequest,
    capture: Arc<dyn CaptureProvider>,
    crop: Option<Arc<dyn CropProvider>>,
    stage: FlowStage,
}

impl PickFlow {
    pub fn new(request: PickRequest, capture: Arc<dyn CaptureProvider>) -> Self {
        Self {
            request,
            capture,
            crop: None,
            stage: FlowStage::Idle,
        }
    }

    /// Provider used when the request enables cropping
    pub fn with_crop_provider(mut self, provider: Arc<dyn CropProvider>) -> Self {
        self.crop = Some(provider);
        self
    }

    pub fn request(&self) -> &PickRequest {
        &self.request
    }

    /// Run the flow to a terminal state. Cancellation from any stage is
    /// reported as `Ok(PickOutcome::Cancelled)`; errors have already cleaned
    /// up every owned artifact the flow produced.
    pub async fn run(mut self) -> Result<PickOutcome, PickError> {
        match self.execute().await {
            Ok(outcome) => {
                self.transition(if outcome.is_cancelled() {
                    FlowStage::Cancelled
                } else {
                    FlowStage::Done
                });
                Ok(outcome)
            }
            Err(err) if err.is_cancellation() => {
                self.transition(FlowStage::Cancelled);
                Ok(PickOutcome::Cancelled)
            }
            Err(err) => {
                self.transition(FlowStage::Error);
                tracing::warn!(error = %err, error_type = err.error_type(), "pick flow failed");
                Err(err)
            }
        }
    }

    async fn execute(&mut self) -> Result<PickOutcome, PickError> {
        self.transition(FlowStage::Capturing);
        let mut current = match self.capture.capture(&self.request).await {
            Ok(CaptureOutcome::Captured(artifacts)) if !artifacts.is_empty() => artifacts,
            Ok(CaptureOutcome::Captured(_)) => {
                return Err(PickError::ImageProcessing(
                    "capture provider returned no image".to_string(),
                ))
            }
            Ok(CaptureOutcome::Cancelled) => return Ok(PickOutcome::Cancelled),
            Err(err) if err.is_cancellation() => return Ok(PickOutcome::Cancelled),
            Err(err) => return Err(err),
        };

        if self.request.is_crop_enabled() {
            self.transition(FlowStage::Cropping);
            match self.run_crop_stage(&current).await {
                Ok(Some(cropped)) => {
                    // Crop output supersedes the capture artifacts. Camera
                    // temp files are owned and get deleted here; gallery
                    // originals are unowned and stay.
                    discard_all(&current);
                    current = cropped;
                }
                Ok(None) => {
                    discard_all(&current);
                    return Ok(PickOutcome::Cancelled);
                }
                Err(err) => {
                    discard_all(&current);
                    return Err(err);
                }
            }
        }

        let constraints = CompressionConstraints {
            max_resolution: self.request.max_resolution,
            max_file_size: self.request.max_file_size,
        };
        if !constraints.is_empty() {
            current = self.run_compress_stage(current, constraints).await?;
        }

        Ok(PickOutcome::Picked(current))
    }

    /// Crop every captured artifact. `Ok(None)` means the user cancelled.
    async fn run_crop_stage(
        &self,
        artifacts: &[Artifact],
    ) -> Result<Option<Vec<Artifact>>, PickError> {
        let provider = self.crop.as_ref().ok_or_else(|| {
            PickError::ProviderUnavailable(
                "crop requested but no crop provider is configured".to_string(),
            )
        })?;

        let save_dir = self.request.save_dir();
        let mut cropped: Vec<Artifact> = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            let extension = file_util::image_extension(artifact.path());
            let output = match file_util::image_file(&save_dir, &extension) {
                Ok(path) => path,
                Err(err) => {
                    discard_all(&cropped);
                    return Err(err);
                }
            };

            match provider.crop(artifact, &self.request, &output).await {
                Ok(CropOutcome::Cropped) => {
                    cropped.push(Artifact::owned(output, Stage::Crop));
                }
                Ok(CropOutcome::Cancelled) => {
                    let _ = fs::remove_file(&output);
                    discard_all(&cropped);
                    return Ok(None);
                }
                Err(err) => {
                    let _ = fs::remove_file(&output);
                    discard_all(&cropped);
                    if err.is_cancellation() {
                        return Ok(None);
                    }
                    return Err(err);
                }
            }
        }
        Ok(Some(cropped))
    }

    /// Compress every artifact that violates the constraints; compliant ones
    /// pass through untouched.
    async fn run_compress_stage(
        &mut self,
        current: Vec<Artifact>,
        constraints: CompressionConstraints,
    ) -> Result<Vec<Artifact>, PickError> {
        let compressor = Compressor::new(constraints, self.request.save_dir());

        let mut results: Vec<Artifact> = Vec::with_capacity(current.len());
        for (index, artifact) in current.iter().enumerate() {
            let step = self.compress_one(&compressor, artifact).await;
            match step {
                Ok(compressed) => results.push(compressed),
                Err(err) => {
                    discard_all(&results);
                    discard_all(&current[index..]);
                    return Err(err);
                }
            }
        }
        Ok(results)
    }

    async fn compress_one(
        &mut self,
        compressor: &Compressor,
        artifact: &Artifact,
    ) -> Result<Artifact, PickError> {
        if !compressor.is_compression_required(artifact.path())? {
            // Already within budget: hand the artifact through unmodified
            return Ok(artifact.clone());
        }

        if self.stage != FlowStage::Compressing {
            self.transition(FlowStage::Compressing);
        }
        let output = compressor.compress(artifact.path().to_path_buf()).await?;
        artifact.discard();
        Ok(Artifact::owned(output, Stage::Compress))
    }

    fn transition(&mut self, to: FlowStage) {
        tracing::debug!(from = ?self.stage, to = ?to, "pick flow transition");
        self.stage = to;
    }
}

/// Best-effort removal of every owned artifact in the slice
fn discard_all(artifacts: &[Artifact]) {
    for artifact in artifacts {
        artifact.discard();
    }
}
