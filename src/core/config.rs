//! Environment-backed service configuration.
//!
//! Every setting has a default matching the reference deployment and can be
//! overridden through an environment variable:
//!
//! | Variable            | Default                  |
//! |---------------------|--------------------------|
//! | `MODEL_PATH`        | `./Model/pneumonia.onnx` |
//! | `HOST`              | `0.0.0.0`                |
//! | `PORT`              | `10000`                  |
//! | `UPLOAD_DIR`        | `/tmp/uploads`           |
//! | `SESSION_POOL_SIZE` | `1`                      |
//!
//! Log verbosity is controlled through `RUST_LOG` (tracing `EnvFilter`).

use crate::core::errors::{PredictError, PredictResult};
use std::path::PathBuf;

/// Default model artifact path.
pub const DEFAULT_MODEL_PATH: &str = "./Model/pneumonia.onnx";
/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default bind port.
pub const DEFAULT_PORT: u16 = 10000;
/// Default scratch directory for uploaded files.
pub const DEFAULT_UPLOAD_DIR: &str = "/tmp/uploads";

/// Service configuration resolved from the environment.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AppConfig {
    /// Path to the ONNX model artifact.
    pub model_path: PathBuf,
    /// Host address to bind the HTTP listener to.
    pub host: String,
    /// Port to bind the HTTP listener to.
    pub port: u16,
    /// Scratch directory for per-request uploads.
    pub upload_dir: PathBuf,
    /// Number of ONNX sessions to keep in the inference pool.
    pub session_pool_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            session_pool_size: 1,
        }
    }
}

impl AppConfig {
    /// Resolves the configuration from process environment variables,
    /// falling back to defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `PORT` or `SESSION_POOL_SIZE` is set
    /// but not parseable.
    pub fn from_env() -> PredictResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration through an arbitrary lookup function.
    ///
    /// Separated from [`AppConfig::from_env`] so tests can inject variables
    /// without mutating process state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PredictResult<Self> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                PredictError::config(format!("PORT must be a valid port number, got '{raw}'"))
            })?,
            None => defaults.port,
        };

        let session_pool_size = match lookup("SESSION_POOL_SIZE") {
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                PredictError::config(format!(
                    "SESSION_POOL_SIZE must be a positive integer, got '{raw}'"
                ))
            })?,
            None => defaults.session_pool_size,
        };

        Ok(Self {
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            session_pool_size,
        })
    }

    /// Validates the configuration.
    ///
    /// The model path is deliberately not checked for existence here: a
    /// missing artifact degrades the service at load time instead of failing
    /// validation, so the process can still serve 503s.
    pub fn validate(&self) -> PredictResult<()> {
        if self.host.trim().is_empty() {
            return Err(PredictError::config("HOST must not be empty"));
        }
        if self.session_pool_size == 0 {
            return Err(PredictError::config(
                "SESSION_POOL_SIZE must be greater than 0",
            ));
        }
        if self.upload_dir.as_os_str().is_empty() {
            return Err(PredictError::config("UPLOAD_DIR must not be empty"));
        }
        Ok(())
    }

    /// Returns the socket address string to bind the listener to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
