//! Pick request configuration
//!
//! A [`PickRequest`] is the immutable configuration bag for one pick
//! operation. It is assembled through [`PickRequestBuilder`], which validates
//! the combination before the flow starts.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::PickError;
use crate::models::ImageSource;

/// Crop stage configuration.
///
/// `aspect = None` leaves the aspect ratio to the crop provider (free crop).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropSpec {
    pub aspect: Option<(f32, f32)>,
}

impl CropSpec {
    pub fn free() -> Self {
        Self { aspect: None }
    }

    pub fn with_aspect(x: f32, y: f32) -> Self {
        Self {
            aspect: Some((x, y)),
        }
    }

    pub fn square() -> Self {
        Self::with_aspect(1.0, 1.0)
    }
}

/// Configuration for a single pick operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickRequest {
    pub source: ImageSource,
    /// MIME allowlist for gallery selection. Empty means any image.
    pub mime_types: Vec<String>,
    pub crop: Option<CropSpec>,
    /// Max width/height of the final image
    pub max_resolution: Option<(u32, u32)>,
    /// Max byte size of the final image
    pub max_file_size: Option<u64>,
    /// Allow gallery multi-select
    pub multiple: bool,
    /// Directory for intermediate and final artifacts. Defaults to the
    /// process temp directory when unset.
    pub save_dir: Option<PathBuf>,
}

impl PickRequest {
    pub fn builder() -> PickRequestBuilder {
        PickRequestBuilder::default()
    }

    /// Whether the crop stage is enabled
    pub fn is_crop_enabled(&self) -> bool {
        self.crop.is_some()
    }

    /// Whether any compression constraint is configured
    pub fn has_compression_constraints(&self) -> bool {
        self.max_file_size.is_some() || self.max_resolution.is_some()
    }

    /// Directory artifacts are written to
    pub fn save_dir(&self) -> PathBuf {
        self.save_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// Builder for [`PickRequest`]
#[derive(Debug, Clone, Default)]
pub struct PickRequestBuilder {
    source: ImageSource,
    mime_types: Vec<String>,
    crop: Option<CropSpec>,
    max_resolution: Option<(u32, u32)>,
    max_file_size: Option<u64>,
    multiple: bool,
    save_dir: Option<PathBuf>,
}

impl PickRequestBuilder {
    /// Specify the image source (camera, gallery or both)
    pub fn provider(mut self, source: ImageSource) -> Self {
        self.source = source;
        self
    }

    /// Only capture using the camera
    pub fn camera_only(mut self) -> Self {
        self.source = ImageSource::Camera;
        self
    }

    /// Only pick from the gallery
    pub fn gallery_only(mut self) -> Self {
        self.source = ImageSource::Gallery;
        self
    }

    /// Restrict MIME types for gallery selection, e.g.
    /// `["image/png", "image/jpeg"]`. An empty list keeps the default of
    /// accepting any image.
    pub fn gallery_mime_types<I, S>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mime_types = mime_types.into_iter().map(Into::into).collect();
        self
    }

    /// Crop the image, letting the provider choose the aspect ratio
    pub fn crop(mut self) -> Self {
        self.crop = Some(CropSpec::free());
        self
    }

    /// Crop the image to a fixed aspect ratio
    pub fn crop_ratio(mut self, x: f32, y: f32) -> Self {
        self.crop = Some(CropSpec::with_aspect(x, y));
        self
    }

    /// Crop a square image, useful for profile pictures
    pub fn crop_square(self) -> Self {
        self.crop_ratio(1.0, 1.0)
    }

    /// Max width and height of the final image
    pub fn max_result_size(mut self, width: u32, height: u32) -> Self {
        self.max_resolution = Some((width, height));
        self
    }

    /// Compress the image until its size is below `max_size_kb` KiB
    pub fn compress(mut self, max_size_kb: u64) -> Self {
        self.max_file_size = Some(max_size_kb * 1024);
        self
    }

    /// Allow selecting several gallery images at once
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Directory to store intermediate and final artifacts in
    pub fn save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> Result<PickRequest, PickError> {
        if let Some((w, h)) = self.max_resolution {
            if w == 0 || h == 0 {
                return Err(PickError::InvalidRequest(
                    "max result size dimensions must be non-zero".to_string(),
                ));
            }
        }
        if self.max_file_size == Some(0) {
            return Err(PickError::InvalidRequest(
                "max file size must be non-zero".to_string(),
            ));
        }
        if let Some(CropSpec {
            aspect: Some((x, y)),
        }) = self.crop
        {
            if x <= 0.0 || y <= 0.0 {
                return Err(PickError::InvalidRequest(format!(
                    "crop aspect ratio must be positive, got {}:{}",
                    x, y
                )));
            }
        }

        Ok(PickRequest {
            source: self.source,
            mime_types: self.mime_types,
            crop: self.crop,
            max_resolution: self.max_resolution,
            max_file_size: self.max_file_size,
            multiple: self.multiple,
            save_dir: self.save_dir,
        })
    }
}
