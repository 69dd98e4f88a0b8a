//! Error types module
//!
//! All failures of a pick operation are unified under the [`PickError`] enum.
//! Cancellation is part of the taxonomy so provider implementations can bail
//! out with `?`, but the orchestrator folds it into the distinguished
//! cancelled outcome before results reach the caller.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum PickError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Failed to create file: {0}")]
    FileCreationFailed(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Compression exhausted after {attempts} attempts")]
    CompressionExhausted { attempts: u32 },

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for PickError {
    fn from(err: io::Error) -> Self {
        PickError::Internal(format!("IO error: {}", err))
    }
}

impl PickError {
    /// Get the error type name for log fields and result summaries
    pub fn error_type(&self) -> &'static str {
        match self {
            PickError::PermissionDenied(_) => "PermissionDenied",
            PickError::ProviderUnavailable(_) => "ProviderUnavailable",
            PickError::FileCreationFailed(_) => "FileCreationFailed",
            PickError::ImageProcessing(_) => "ImageProcessing",
            PickError::CompressionExhausted { .. } => "CompressionExhausted",
            PickError::UserCancelled => "UserCancelled",
            PickError::InvalidRequest(_) => "InvalidRequest",
            PickError::Internal(_) => "Internal",
        }
    }

    /// Whether this error represents user cancellation rather than a failure
    pub fn is_cancellation(&self) -> bool {
        matches!(self, PickError::UserCancelled)
    }
}
