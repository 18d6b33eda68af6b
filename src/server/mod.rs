//! HTTP surface of the service: shared state, router assembly, handlers,
//! CORS, and scratch storage.

pub mod cors;
pub mod handlers;
pub mod scratch;

use crate::predictor::Classifier;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;

pub use scratch::{ScratchDir, ScratchFile};

/// Maximum accepted request body size (50 MiB).
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Shared per-process state handed to every request handler.
///
/// The classifier is `None` when the model failed to load at startup; the
/// service then serves 503s instead of crashing (degraded mode).
#[derive(Clone)]
pub struct AppState {
    /// The loaded classifier, or `None` in degraded mode.
    pub classifier: Option<Arc<dyn Classifier>>,
    /// Scratch directory for per-request uploads.
    pub scratch: Arc<ScratchDir>,
}

impl AppState {
    /// Creates the shared state from an optional classifier and a scratch
    /// directory.
    pub fn new(classifier: Option<Arc<dyn Classifier>>, scratch: ScratchDir) -> Self {
        Self {
            classifier,
            scratch: Arc::new(scratch),
        }
    }
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/predict/pneumonia", post(handlers::predict))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(middleware::from_fn(cors::permissive_cors))
        .with_state(state)
}
