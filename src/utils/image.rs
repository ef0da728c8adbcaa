//! Image loading utilities.

use image::{ImageBuffer, RgbImage};
use std::path::Path;

use crate::core::errors::{ClassifyError, ClassifyResult};

/// Loads an image from a file path and converts it to an `RgbImage`.
///
/// Handles any container format the `image` crate can decode.
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be opened or decoded.
pub fn load_image(path: &Path) -> ClassifyResult<RgbImage> {
    let img = image::open(path).map_err(ClassifyError::ImageLoad)?;
    Ok(img.to_rgb8())
}

/// Creates an `RgbImage` from raw pixel data.
///
/// The data must be packed RGB (3 bytes per pixel) and its length must match
/// the given dimensions; `None` otherwise. Used when the host hands over an
/// already-decoded bitmap instead of a file path.
pub fn create_rgb_image(width: u32, height: u32, data: Vec<u8>) -> Option<RgbImage> {
    if data.len() != (width as usize) * (height as usize) * 3 {
        return None;
    }

    ImageBuffer::from_raw(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_buffer_with_matching_length_becomes_an_image() {
        let image = create_rgb_image(2, 2, vec![0u8; 12]).unwrap();
        assert_eq!(image.dimensions(), (2, 2));
    }

    #[test]
    fn raw_buffer_with_wrong_length_is_rejected() {
        assert!(create_rgb_image(2, 2, vec![0u8; 11]).is_none());
    }

    #[test]
    fn missing_file_is_an_image_load_error() {
        let result = load_image(Path::new("no/such/bird.jpg"));
        assert!(matches!(result, Err(ClassifyError::ImageLoad(_))));
    }
}
