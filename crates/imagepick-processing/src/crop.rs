//! Center crop to an aspect ratio
//!
//! The deterministic region used by the non-interactive crop provider. An
//! interactive host lets the user drag the region instead; this picks the
//! centered one.

use anyhow::Result;
use image::DynamicImage;

/// Centered crop region `(x, y, width, height)` for the target aspect ratio
pub fn center_crop_region(width: u32, height: u32, aspect_x: f32, aspect_y: f32) -> (u32, u32, u32, u32) {
    let target_ratio = aspect_x / aspect_y;
    let current_ratio = width as f32 / height as f32;

    let (crop_width, crop_height) = if current_ratio > target_ratio {
        // Too wide: trim the sides
        let w = ((height as f32 * target_ratio).round() as u32).clamp(1, width);
        (w, height)
    } else {
        // Too tall: trim top and bottom
        let h = ((width as f32 / target_ratio).round() as u32).clamp(1, height);
        (width, h)
    };

    let x = (width - crop_width) / 2;
    let y = (height - crop_height) / 2;
    (x, y, crop_width, crop_height)
}

/// Crop `img` to the centered region with the given aspect ratio
pub fn crop_to_aspect(img: &DynamicImage, aspect_x: f32, aspect_y: f32) -> Result<DynamicImage> {
    if aspect_x <= 0.0 || aspect_y <= 0.0 {
        return Err(anyhow::anyhow!(
            "invalid aspect ratio {}:{}",
            aspect_x,
            aspect_y
        ));
    }

    let (x, y, width, height) = center_crop_region(img.width(), img.height(), aspect_x, aspect_y);
    if (width, height) == (img.width(), img.height()) {
        return Ok(img.clone());
    }
    Ok(img.crop_imm(x, y, width, height))
}
