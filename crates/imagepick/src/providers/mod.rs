//! Provider seams for the platform-specific parts of a pick operation
//!
//! Capture (camera or gallery UI) and interactive cropping live outside this
//! library; hosts implement these traits around whatever their platform
//! offers. Cancellation is an outcome rather than an error so callers can
//! tell "the user changed their mind" apart from failures.

use async_trait::async_trait;
use std::path::Path;

use imagepick_core::{Artifact, PickError, PickRequest};

mod center_crop;
mod selection;

pub use center_crop::CenterCropProvider;
pub use selection::FileSelectionProvider;

/// Result of a capture attempt
#[derive(Debug, Clone)]
pub enum CaptureOutcome {
    /// One or more images were obtained. Artifacts backed by the user's own
    /// files (gallery selections) must be marked unowned.
    Captured(Vec<Artifact>),
    /// The user backed out of the capture UI
    Cancelled,
}

/// Result of a crop attempt
#[derive(Debug, Clone, Copy)]
pub enum CropOutcome {
    /// The cropped image was written to the requested output path
    Cropped,
    /// The user backed out of the crop UI
    Cancelled,
}

/// Obtains the initial image(s) for a pick operation.
///
/// Implementations map platform failures onto the pick taxonomy: a rejected
/// runtime permission becomes [`PickError::PermissionDenied`], a missing
/// camera/picker app becomes [`PickError::ProviderUnavailable`]. An
/// unanswered permission prompt simply keeps the returned future pending.
#[async_trait]
pub trait CaptureProvider: Send + Sync {
    async fn capture(&self, request: &PickRequest) -> Result<CaptureOutcome, PickError>;
}

/// Crops a captured artifact into `output`.
///
/// The orchestrator allocates `output` (same extension as the source) and
/// owns its lifecycle; implementations only write to it. The crop aspect
/// ratio and max result size come from the request.
#[async_trait]
pub trait CropProvider: Send + Sync {
    async fn crop(
        &self,
        source: &Artifact,
        request: &PickRequest,
        output: &Path,
    ) -> Result<CropOutcome, PickError>;
}
