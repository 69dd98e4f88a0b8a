//! Aspect-preserving downscale

use image::DynamicImage;

/// Dimensions that fit inside `(max_width, max_height)` while preserving the
/// source aspect ratio. Never upscales.
pub fn fit_within(
    orig_width: u32,
    orig_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if orig_width <= max_width && orig_height <= max_height {
        return (orig_width, orig_height);
    }

    let scale = (max_width as f32 / orig_width as f32)
        .min(max_height as f32 / orig_height as f32);
    let width = ((orig_width as f32 * scale).round() as u32).max(1);
    let height = ((orig_height as f32 * scale).round() as u32).max(1);
    (width, height)
}

/// Select appropriate filter type based on resize ratio
pub fn select_filter(
    orig_width: u32,
    orig_height: u32,
    new_width: u32,
    new_height: u32,
) -> image::imageops::FilterType {
    let width_ratio = orig_width as f32 / new_width as f32;
    let height_ratio = orig_height as f32 / new_height as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        image::imageops::FilterType::Triangle
    } else if max_ratio > 1.5 {
        image::imageops::FilterType::CatmullRom
    } else {
        image::imageops::FilterType::Lanczos3
    }
}

/// Downscale `img` so it fits inside `(max_width, max_height)`. Images
/// already within the bounds are returned unchanged.
pub fn scale_to_fit(img: &DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (orig_width, orig_height) = (img.width(), img.height());
    let (width, height) = fit_within(orig_width, orig_height, max_width, max_height);

    if (width, height) == (orig_width, orig_height) {
        return img.clone();
    }

    let filter = select_filter(orig_width, orig_height, width, height);
    img.resize_exact(width, height, filter)
}
