//! HTTP request handlers.
//!
//! Implements the two endpoints of the service: the health check at `GET /`
//! and the prediction endpoint at `POST /predict/pneumonia`. The prediction
//! handler walks the full request cycle: validate the multipart upload,
//! persist it to scratch storage, preprocess, infer, respond. Scratch
//! cleanup is guaranteed by the guard's `Drop` on every exit path.

use crate::core::errors::{ErrorKind, PredictError};
use crate::predictor::classify;
use crate::processors::preprocess_image_file;
use crate::server::AppState;
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Timestamp format used in prediction responses.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Health check payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"healthy"` or `"unavailable"`.
    pub status: String,
    /// Human-readable status line.
    pub message: String,
    /// Crate version.
    pub version: String,
}

/// Successful prediction payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Predicted label, `"Normal"` or `"Pneumonia"`.
    pub prediction: String,
    /// Raw model output in [0,1].
    pub confidence: f32,
    /// Local time the prediction was served, `YYYY-MM-DD HH:MM`.
    pub timestamp: String,
}

/// Error payload returned for every failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Category-safe error message.
    pub error: String,
}

/// Wrapper turning [`PredictError`] into an HTTP response.
///
/// Logs the full error chain and returns only the category-safe message to
/// the client.
pub struct ApiError(PredictError);

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = match kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Decode | ErrorKind::Inference | ErrorKind::Io | ErrorKind::Config => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!(error = ?self.0, %kind, "prediction request failed");
        } else {
            tracing::debug!(error = ?self.0, %kind, "rejected request");
        }
        let body = Json(ErrorResponse {
            error: self.0.client_message(),
        });
        (status, body).into_response()
    }
}

/// `GET /` — service liveness and model availability.
pub async fn health(State(state): State<AppState>) -> Response {
    let version = env!("CARGO_PKG_VERSION").to_string();
    if state.classifier.is_some() {
        let body = HealthResponse {
            status: "healthy".to_string(),
            message: "Pneumonia Detection API is active".to_string(),
            version,
        };
        (StatusCode::OK, Json(body)).into_response()
    } else {
        let body = HealthResponse {
            status: "unavailable".to_string(),
            message: "model is not loaded".to_string(),
            version,
        };
        (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
    }
}

/// `POST /predict/pneumonia` — classify an uploaded chest X-ray.
pub async fn predict(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PredictResponse>, ApiError> {
    let classifier = state
        .classifier
        .clone()
        .ok_or(PredictError::ModelUnavailable)?;

    let upload = read_upload(multipart).await?;
    // Guard deletes the scratch file on success, error, and panic unwind.
    let scratch = state.scratch.store(&upload.filename, &upload.bytes)?;

    let tensor = preprocess_image_file(scratch.path())?;
    let prediction = classify(classifier.as_ref(), &tensor)?;

    tracing::info!(
        prediction = prediction.label,
        confidence = prediction.confidence,
        "served prediction"
    );
    Ok(Json(PredictResponse {
        prediction: prediction.label.to_string(),
        confidence: prediction.confidence,
        timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
    }))
}

/// Fallback handler for unknown routes.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Resource not found".to_string(),
        }),
    )
}

struct Upload {
    filename: String,
    bytes: axum::body::Bytes,
}

/// Pulls the `file` field out of the multipart body.
///
/// Rejects requests without a `file` field or with an empty filename. The
/// file's content type and extension are deliberately not validated;
/// non-image payloads fail later at decode time.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, PredictError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| PredictError::validation("malformed multipart body"))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(PredictError::validation("No file selected"));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|_| PredictError::validation("could not read uploaded file"))?;
        return Ok(Upload { filename, bytes });
    }

    Err(PredictError::validation("No file part"))
}
