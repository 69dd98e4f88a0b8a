//! Image codec wrappers
//!
//! Decode, dimension probing, and per-format encoding. The output format
//! follows the source file: PNG stays PNG, WebP stays WebP, and everything
//! else is encoded as JPEG.

use anyhow::Result;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// JPEG quality used when re-encoding. PNG and WebP outputs are lossless.
const JPEG_QUALITY: f32 = 90.0;

/// Image format a pick artifact is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    WebP,
}

impl ImageKind {
    /// Format by file extension; anything unknown becomes JPEG
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("png") => ImageKind::Png,
            Some("webp") => ImageKind::WebP,
            _ => ImageKind::Jpeg,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::WebP => "webp",
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::WebP => "image/webp",
        }
    }
}

/// Decode an image file
pub fn decode(path: &Path) -> Result<DynamicImage> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(img)
}

/// Read the pixel dimensions of an image file without a full decode
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32)> {
    let dims = image::image_dimensions(path)?;
    Ok(dims)
}

/// Encode an image in the given format
pub fn encode(img: &DynamicImage, kind: ImageKind) -> Result<Vec<u8>> {
    match kind {
        ImageKind::Jpeg => encode_jpeg(img),
        ImageKind::Png => encode_png(img),
        ImageKind::WebP => encode_webp(img),
    }
}

/// Encode to JPEG using mozjpeg
fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>> {
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(JPEG_QUALITY);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp.start_compress(Vec::new())?;
    comp.write_scanlines(&rgb_img)?;
    let jpeg_data = comp.finish()?;

    Ok(jpeg_data)
}

/// Encode to PNG
fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);

    img.write_to(&mut cursor, ImageFormat::Png)?;

    Ok(buffer)
}

/// Encode to lossless WebP
fn encode_webp(img: &DynamicImage) -> Result<Vec<u8>> {
    let (width, height) = (img.width(), img.height());
    let rgba_img = img.to_rgba8();

    let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
    let webp_data = encoder.encode_lossless();

    Ok(webp_data.to_vec())
}
