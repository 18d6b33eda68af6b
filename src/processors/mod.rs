//! Image processing utilities for the prediction pipeline.

pub mod preprocess;

pub use preprocess::{preprocess_image, preprocess_image_bytes, preprocess_image_file};
