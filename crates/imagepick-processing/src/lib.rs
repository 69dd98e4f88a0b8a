//! Imagepick Processing Library
//!
//! This crate provides the image-side machinery of a pick operation: format
//! detection and codecs, aspect-preserving downscaling, center cropping, EXIF
//! attribute copying, and the resolution-ladder compression search.

pub mod codec;
pub mod compressor;
pub mod crop;
pub mod exif_copy;
pub mod ladder;
pub mod resize;

// Re-export commonly used types
pub use codec::ImageKind;
pub use compressor::{CompressionConstraints, Compressor};
pub use ladder::RESOLUTION_LADDER;
