//! Core types for the prediction service: configuration, errors, and the
//! ONNX inference engine.

pub mod config;
pub mod errors;
pub mod inference;

pub use config::AppConfig;
pub use errors::{ErrorKind, PredictError, PredictResult};
pub use inference::OrtClassifier;

/// A 4-dimensional f32 tensor in NHWC layout, the model's input shape.
pub type Tensor4D = ndarray::Array4<f32>;
