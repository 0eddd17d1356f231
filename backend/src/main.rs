//! LOGIS:COPE - Backend Server
//!
//! Loads the call-count pipeline once and serves predictions for the Busan
//! emergency-call dashboard.

use std::sync::Arc;

use anyhow::Context;
use logiscope_server::{create_app, init_tracing, AppState, Config, PredictionService};
use shared::{LinearPipeline, Regressor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    // Initialize tracing
    init_tracing(config.logging.json);

    tracing::info!("Starting LOGIS:COPE Server");
    tracing::info!("Environment: {}", config.environment);

    // Load the model once; it is read-only for the life of the process
    tracing::info!("Loading model from {}", config.model.artifact_path);
    let pipeline = LinearPipeline::load(&config.model.artifact_path)
        .with_context(|| format!("failed to load model {}", config.model.artifact_path))?;
    let metadata = pipeline.metadata();
    tracing::info!(
        model = %metadata.name,
        version = %metadata.version,
        fingerprint = %metadata.fingerprint,
        "Model loaded"
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        predictions: PredictionService::new(Arc::new(pipeline)),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = config.bind_address();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
