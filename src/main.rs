//! Service entry point: logging, configuration, model load, serve.

use pneumonia_api::core::{AppConfig, OrtClassifier};
use pneumonia_api::predictor::Classifier;
use pneumonia_api::server::{self, AppState, ScratchDir};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    config.validate()?;

    let scratch = ScratchDir::ensure(&config.upload_dir)?;

    // A failed model load degrades the service instead of aborting it:
    // health and predict answer 503 until the artifact is fixed and the
    // process restarted.
    let classifier: Option<Arc<dyn Classifier>> =
        match OrtClassifier::from_file(&config.model_path, config.session_pool_size) {
            Ok(classifier) => {
                info!(
                    model_path = %config.model_path.display(),
                    pool_size = config.session_pool_size,
                    "model loaded"
                );
                Some(Arc::new(classifier))
            }
            Err(err) => {
                error!(
                    error = ?err,
                    model_path = %config.model_path.display(),
                    "failed to load model, serving degraded"
                );
                None
            }
        };

    let state = AppState::new(classifier, scratch);
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %config.bind_addr(), "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
