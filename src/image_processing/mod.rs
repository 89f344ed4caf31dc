pub mod resize;

use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::Path;

pub use resize::fit_dimensions;

/// File extensions offered by the photo picker
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff",
];

/// A decoded photo ready to be displayed
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledImage {
    pub pixels: RgbaImage,
}

impl ScaledImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

/// Read only the image header to get its native size
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path)
        .with_context(|| format!("Failed to read image header: {}", path.display()))
}

/// Target size for `path` under `max_size`, without decoding pixel data.
/// `Ok(None)` means the header reports a degenerate size.
pub fn target_dimensions(path: &Path, max_size: u32) -> Result<Option<(u32, u32)>> {
    let (width, height) = probe_dimensions(path)?;
    Ok(fit_dimensions(width, height, max_size))
}

/// Load `path` scaled to fit inside `max_size` x `max_size`.
///
/// `Ok(None)` is returned when the header reports a zero width or height;
/// callers treat it exactly like an unreadable file: there is no image.
pub fn scaled_image(path: &Path, max_size: u32) -> Result<Option<ScaledImage>> {
    let Some((width, height)) = target_dimensions(path, max_size)? else {
        return Ok(None);
    };

    let decoded = image::open(path)
        .with_context(|| format!("Failed to decode image: {}", path.display()))?
        .to_rgba8();

    let pixels = resize::resize_image(&decoded, width, height)
        .with_context(|| format!("Failed to scale image: {}", path.display()))?;

    Ok(Some(ScaledImage { pixels }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, RgbImage};
    use tempfile::tempdir;

    fn write_test_image(path: &Path, width: u32, height: u32) {
        let img: RgbImage = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        img.save(path).unwrap();
    }

    #[test]
    fn test_probe_reads_header_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("probe.png");
        write_test_image(&path, 64, 48);

        assert_eq!(probe_dimensions(&path).unwrap(), (64, 48));
    }

    #[test]
    fn test_scaled_image_keeps_small_images() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("small.png");
        write_test_image(&path, 120, 80);

        let scaled = scaled_image(&path, 300).unwrap().unwrap();
        assert_eq!(scaled.dimensions(), (120, 80));
        assert_eq!(scaled.pixels.get_pixel(10, 20).0, [10, 20, 128, 255]);
    }

    #[test]
    fn test_scaled_image_downscales_landscape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.png");
        write_test_image(&path, 600, 400);

        let scaled = scaled_image(&path, 300).unwrap().unwrap();
        assert_eq!(scaled.dimensions(), (300, 200));
    }

    #[test]
    fn test_scaled_image_downscales_portrait() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tall.png");
        write_test_image(&path, 400, 600);

        let scaled = scaled_image(&path, 150).unwrap().unwrap();
        assert_eq!(scaled.dimensions(), (100, 150));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(scaled_image(&dir.path().join("nope.png"), 300).is_err());
    }

    #[test]
    fn test_non_image_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(scaled_image(&path, 300).is_err());
    }
}
