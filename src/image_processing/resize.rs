use anyhow::{anyhow, Result};
use fast_image_resize::{images::Image, PixelType, ResizeOptions, Resizer};
use image::RgbaImage;

/// Decide the displayed size of a `width`x`height` image bounded by `max_size`.
///
/// Images that already fit are never upscaled. Otherwise the longer side is
/// clamped to `max_size` and the shorter one follows the aspect ratio; a
/// square image is treated as width-constrained. Returns `None` for an image
/// with a zero dimension.
pub fn fit_dimensions(width: u32, height: u32, max_size: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }

    // A zero bound would collapse the image, keep at least one pixel
    let max_size = max_size.max(1);

    if width <= max_size && height <= max_size {
        return Some((width, height));
    }

    if width >= height {
        Some((max_size, scale_side(height, max_size, width)))
    } else {
        Some((scale_side(width, max_size, height), max_size))
    }
}

/// `round(side * max_size / long_side)`, never below one pixel
fn scale_side(side: u32, max_size: u32, long_side: u32) -> u32 {
    let numerator = side as u64 * max_size as u64;
    let long_side = long_side as u64;
    let rounded = (2 * numerator + long_side) / (2 * long_side);
    rounded.max(1) as u32
}

/// Resize an RGBA image to exact dimensions using high-quality algorithm
pub fn resize_image(img: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage> {
    let (src_width, src_height) = img.dimensions();

    if src_width == width && src_height == height {
        return Ok(img.clone());
    }
    if src_width == 0 || src_height == 0 {
        return Err(anyhow!("Source image has a zero dimension"));
    }
    if width == 0 || height == 0 {
        return Err(anyhow!("Target size {}x{} has a zero dimension", width, height));
    }

    let src_image = Image::from_vec_u8(
        src_width,
        src_height,
        img.as_raw().clone(),
        PixelType::U8x4,
    )?;

    let mut dst_image = Image::new(width, height, PixelType::U8x4);

    let mut resizer = Resizer::new();
    resizer.resize(&src_image, &mut dst_image, Some(&ResizeOptions::default()))?;

    RgbaImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| anyhow!("Resized buffer does not match {}x{}", width, height))
}
