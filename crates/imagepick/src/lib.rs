//! Imagepick: capture, crop and compress images through pluggable providers
//!
//! A pick operation is a [`PickFlow`]: it asks a [`CaptureProvider`] for one
//! or more images, optionally routes them through a [`CropProvider`], runs the
//! resolution-ladder compressor when constraints demand it, and hands the
//! final artifacts back, deleting every superseded temporary file along the
//! way. Hosts with a real camera or gallery UI implement the provider traits;
//! the bundled [`FileSelectionProvider`] and [`CenterCropProvider`] cover
//! headless hosts and tests.
//!
//! ```no_run
//! use std::sync::Arc;
//! use imagepick::{FileSelectionProvider, CenterCropProvider, PickFlow, PickRequest};
//!
//! # async fn example() -> Result<(), imagepick::PickError> {
//! let request = PickRequest::builder()
//!     .gallery_only()
//!     .crop_square()
//!     .max_result_size(1080, 1920)
//!     .compress(1024)
//!     .build()?;
//!
//! let gallery = Arc::new(FileSelectionProvider::single("/photos/holiday.jpg"));
//! let outcome = PickFlow::new(request, gallery)
//!     .with_crop_provider(Arc::new(CenterCropProvider))
//!     .run()
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod flow;
pub mod providers;

// Re-export commonly used types
pub use flow::{FlowStage, PickFlow, PickOutcome};
pub use imagepick_core::{Artifact, CropSpec, ImageSource, PickError, PickRequest, Stage};
pub use providers::{
    CaptureOutcome, CaptureProvider, CenterCropProvider, CropOutcome, CropProvider,
    FileSelectionProvider,
};
