//! Error types for the prediction service.
//!
//! This module defines the error taxonomy used throughout the service:
//! validation, decode, inference, io, configuration, and model-availability
//! errors. Every error carries enough context for structured logging, while
//! [`PredictError::client_message`] exposes only a category-safe message to
//! HTTP clients so internal detail never leaks into response bodies.

use thiserror::Error;

/// Coarse error category used to pick the HTTP status and client message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client supplied an invalid request (missing file, empty filename).
    Validation,
    /// Uploaded bytes could not be decoded as an image.
    Decode,
    /// Model invocation failed.
    Inference,
    /// Scratch storage or other IO failed.
    Io,
    /// Startup-scoped configuration problem.
    Config,
    /// The model handle is not loaded.
    ModelUnavailable,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Decode => write!(f, "decode"),
            ErrorKind::Inference => write!(f, "inference"),
            ErrorKind::Io => write!(f, "io"),
            ErrorKind::Config => write!(f, "configuration"),
            ErrorKind::ModelUnavailable => write!(f, "model unavailable"),
        }
    }
}

/// Errors that can occur while serving a prediction request or starting the
/// service.
#[derive(Error, Debug)]
pub enum PredictError {
    /// The request was malformed (missing `file` field, empty filename,
    /// unreadable multipart body).
    #[error("invalid request: {message}")]
    Validation {
        /// Description of what was wrong with the request.
        message: String,
    },

    /// The uploaded bytes could not be decoded as an image.
    #[error("image decode")]
    Decode(#[source] image::ImageError),

    /// Model invocation failed.
    #[error("inference failed: {context}")]
    Inference {
        /// Additional context about where inference broke down.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// The model handle is not loaded; the service is running degraded.
    #[error("model is not loaded")]
    ModelUnavailable,

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl PredictError {
    /// Creates a validation error from a client-facing message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an inference error with context and an underlying cause.
    pub fn inference(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns the coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PredictError::Validation { .. } => ErrorKind::Validation,
            PredictError::Decode(_) => ErrorKind::Decode,
            PredictError::Inference { .. } | PredictError::Session(_) => ErrorKind::Inference,
            PredictError::Config { .. } => ErrorKind::Config,
            PredictError::ModelUnavailable => ErrorKind::ModelUnavailable,
            PredictError::Io(_) => ErrorKind::Io,
        }
    }

    /// Returns the message exposed to HTTP clients.
    ///
    /// Validation messages are client-authored context and are returned
    /// verbatim; every other category maps to a fixed string so exception
    /// detail is never disclosed over the wire. The full chain is still
    /// available for logging via the `Error` impl.
    pub fn client_message(&self) -> String {
        match self {
            PredictError::Validation { message } => message.clone(),
            PredictError::Decode(_) => "could not decode uploaded file as an image".to_string(),
            PredictError::Inference { .. } | PredictError::Session(_) => {
                "inference failed".to_string()
            }
            PredictError::Config { .. } => "service misconfigured".to_string(),
            PredictError::ModelUnavailable => "model is not loaded".to_string(),
            PredictError::Io(_) => "internal storage error".to_string(),
        }
    }
}

/// Convenient result alias for service operations.
pub type PredictResult<T> = Result<T, PredictError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_surfaced_verbatim() {
        let err = PredictError::validation("No file part");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.client_message(), "No file part");
    }

    #[test]
    fn test_internal_detail_is_not_surfaced() {
        let io = std::io::Error::other("/secret/path blew up");
        let err = PredictError::inference("forward pass", io);
        assert_eq!(err.kind(), ErrorKind::Inference);
        assert_eq!(err.client_message(), "inference failed");
        assert!(!err.client_message().contains("/secret/path"));
    }

    #[test]
    fn test_io_errors_map_to_storage_message() {
        let err = PredictError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.client_message(), "internal storage error");
    }

    #[test]
    fn test_model_unavailable_category() {
        let err = PredictError::ModelUnavailable;
        assert_eq!(err.kind(), ErrorKind::ModelUnavailable);
        assert_eq!(err.client_message(), "model is not loaded");
    }
}
