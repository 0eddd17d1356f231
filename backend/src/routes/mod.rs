//! Route definitions for the LOGIS:COPE server

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Static district table for the region drop-down
        .route("/regions", get(handlers::list_regions))
        // Loaded model metadata
        .route("/model", get(handlers::get_model))
        // Feature preview
        .route("/features", post(handlers::enrich_observation))
        // Call-count prediction
        .route("/predictions", post(handlers::predict_call_count))
}
