//! ONNX Runtime inference engine for the pneumonia classifier.
//!
//! Wraps a pool of ONNX Runtime sessions behind mutexes with round-robin
//! dispatch. The mutex-per-session design makes thread safety explicit
//! instead of assuming the runtime is reentrant: concurrent requests never
//! share a session, and a pool size above one restores parallelism.

use crate::core::Tensor4D;
use crate::core::errors::{PredictError, PredictResult};
use ort::logging::LogLevel;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A pooled ONNX Runtime classifier session.
///
/// Loaded once at startup and shared read-only across requests for the
/// lifetime of the process. Input and output tensor names are discovered
/// from session metadata, so the artifact does not need to follow a naming
/// convention.
pub struct OrtClassifier {
    sessions: Vec<Mutex<Session>>,
    next_idx: AtomicUsize,
    input_name: String,
    output_name: String,
    model_path: PathBuf,
}

impl std::fmt::Debug for OrtClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtClassifier")
            .field("sessions", &self.sessions.len())
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("model_path", &self.model_path)
            .finish()
    }
}

impl OrtClassifier {
    /// Loads the model artifact and constructs a session pool of the given
    /// size.
    ///
    /// # Errors
    ///
    /// Returns a session error if the artifact is missing or malformed, or
    /// an invalid-metadata error if the model declares no inputs or outputs.
    pub fn from_file(model_path: impl AsRef<Path>, pool_size: usize) -> PredictResult<Self> {
        let path = model_path.as_ref();
        let pool_size = pool_size.max(1);

        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let session = Session::builder()?
                .with_log_level(LogLevel::Error)?
                .commit_from_file(path)?;
            sessions.push(session);
        }

        let (input_name, output_name) = {
            let session = &sessions[0];
            let input = session.inputs.first().ok_or_else(|| {
                PredictError::config(format!(
                    "model at '{}' declares no inputs",
                    path.display()
                ))
            })?;
            let output = session.outputs.first().ok_or_else(|| {
                PredictError::config(format!(
                    "model at '{}' declares no outputs",
                    path.display()
                ))
            })?;
            (input.name.clone(), output.name.clone())
        };

        Ok(Self {
            sessions: sessions.into_iter().map(Mutex::new).collect(),
            next_idx: AtomicUsize::new(0),
            input_name,
            output_name,
            model_path: path.to_path_buf(),
        })
    }

    /// Returns the model path associated with this engine.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Runs one forward pass and returns the model's scalar output.
    ///
    /// The binary classifier emits a single sigmoid value in [0,1]; the
    /// first element of the output tensor is that value.
    pub fn infer_scalar(&self, x: &Tensor4D) -> PredictResult<f32> {
        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            PredictError::inference(
                format!("failed to convert input tensor with shape {:?}", x.shape()),
                e,
            )
        })?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let idx = self.next_idx.fetch_add(1, Ordering::Relaxed) % self.sessions.len();
        let mut session = self.sessions[idx].lock().map_err(|_| {
            PredictError::inference(
                format!("session {idx} mutex poisoned"),
                std::io::Error::other("a previous inference panicked"),
            )
        })?;

        let outputs = session.run(inputs)?;
        let (shape, data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(PredictError::Session)?;

        data.first().copied().ok_or_else(|| {
            PredictError::inference(
                format!(
                    "model output '{}' has empty shape {:?}",
                    self.output_name, shape
                ),
                std::io::Error::other("no scalar to read"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_file_is_an_error() {
        let result = OrtClassifier::from_file("does_not_exist.onnx", 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_pool_size_zero_is_clamped_to_one() {
        // Construction fails on the missing file, not on the pool size.
        let result = OrtClassifier::from_file("does_not_exist.onnx", 0);
        assert!(result.is_err());
    }
}
