//! # Pneumonia Detection API
//!
//! A single-endpoint HTTP service that classifies chest X-ray images as
//! "Normal" or "Pneumonia" using a pre-trained ONNX model. The model is
//! loaded once at startup and shared read-only across requests; each
//! request uploads an image, which is preprocessed into a (1, 200, 200, 3)
//! normalized tensor, run through one forward pass, and mapped to a label
//! with a confidence score.
//!
//! ## Endpoints
//!
//! - `GET /` — liveness and model availability
//! - `POST /predict/pneumonia` — multipart upload (`file` field), returns
//!   `{prediction, confidence, timestamp}`
//!
//! ## Modules
//!
//! * [`core`] - Configuration, error taxonomy, and the ONNX inference engine
//! * [`processors`] - Image preprocessing into the model input tensor
//! * [`predictor`] - The classifier seam and label mapping
//! * [`server`] - Router, handlers, CORS, and scratch storage
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pneumonia_api::core::{AppConfig, OrtClassifier};
//! use pneumonia_api::server::{self, AppState, ScratchDir};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let scratch = ScratchDir::ensure(&config.upload_dir)?;
//! let classifier = OrtClassifier::from_file(&config.model_path, 1)?;
//! let state = AppState::new(Some(Arc::new(classifier)), scratch);
//!
//! let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
//! axum::serve(listener, server::router(state)).await?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod predictor;
pub mod processors;
pub mod server;
