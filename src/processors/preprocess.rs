//! Chest X-ray preprocessing.
//!
//! Transforms raw image bytes into the fixed-shape normalized tensor the
//! classifier expects: (1, 200, 200, 3) in HWC order, pixel intensities
//! scaled from 0-255 to [0,1]. The transform is a deterministic, pure
//! function of the image bytes.

use crate::core::Tensor4D;
use crate::core::errors::{PredictError, PredictResult};
use image::DynamicImage;
use image::imageops::FilterType;
use ndarray::Array4;
use std::path::Path;

/// Target width the model was trained on.
pub const INPUT_WIDTH: u32 = 200;
/// Target height the model was trained on.
pub const INPUT_HEIGHT: u32 = 200;

/// Loads an image from disk and preprocesses it into the model input tensor.
///
/// # Errors
///
/// Returns a decode error if the file cannot be decoded as an image. Callers
/// must treat this as request-scoped, never fatal.
pub fn preprocess_image_file(path: &Path) -> PredictResult<Tensor4D> {
    let img = image::open(path).map_err(PredictError::Decode)?;
    Ok(preprocess_image(&img))
}

/// Decodes an in-memory image and preprocesses it into the model input
/// tensor.
///
/// # Errors
///
/// Returns a decode error if the bytes are not a supported image format.
pub fn preprocess_image_bytes(bytes: &[u8]) -> PredictResult<Tensor4D> {
    let img = image::load_from_memory(bytes).map_err(PredictError::Decode)?;
    Ok(preprocess_image(&img))
}

/// Preprocesses a decoded image into the (1, 200, 200, 3) input tensor.
///
/// Any non-square input is stretched to the target size; there is no
/// cropping or aspect-ratio handling.
pub fn preprocess_image(img: &DynamicImage) -> Tensor4D {
    let resized = img
        .resize_exact(INPUT_WIDTH, INPUT_HEIGHT, FilterType::Triangle)
        .to_rgb8();

    let mut tensor = Array4::<f32>::zeros((
        1,
        INPUT_HEIGHT as usize,
        INPUT_WIDTH as usize,
        3,
    ));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, y as usize, x as usize, c]] = pixel[c] as f32 / 255.0;
        }
    }
    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid_image(width: u32, height: u32, value: u8) -> DynamicImage {
        let mut img = RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgb([value, value, value]);
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_output_shape_is_fixed() {
        let tensor = preprocess_image(&solid_image(640, 480, 128));
        assert_eq!(tensor.shape(), &[1, 200, 200, 3]);
    }

    #[test]
    fn test_non_square_input_is_stretched() {
        // A 1000x10 strip still lands on the fixed target shape.
        let tensor = preprocess_image(&solid_image(1000, 10, 7));
        assert_eq!(tensor.shape(), &[1, 200, 200, 3]);
    }

    #[test]
    fn test_values_are_scaled_to_unit_range() {
        let tensor = preprocess_image(&solid_image(50, 50, 255));
        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < f32::EPSILON);

        let zeros = preprocess_image(&solid_image(50, 50, 0));
        assert!(zeros.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_preprocess_is_deterministic() {
        let img = solid_image(321, 123, 200);
        let a = preprocess_image(&img);
        let b = preprocess_image(&img);
        assert_eq!(a, b);
    }

    #[test]
    fn test_undecodable_bytes_are_a_decode_error() {
        let result = preprocess_image_bytes(b"this is not an image");
        assert!(matches!(result, Err(PredictError::Decode(_))));
    }

    #[test]
    fn test_png_bytes_round_trip() {
        let img = solid_image(30, 40, 90);
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();

        let tensor = preprocess_image_bytes(buf.get_ref()).unwrap();
        assert_eq!(tensor.shape(), &[1, 200, 200, 3]);
        assert!((tensor[[0, 100, 100, 0]] - 90.0 / 255.0).abs() < 1e-6);
    }
}
