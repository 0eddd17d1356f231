//! HTTP handlers for call-count prediction

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;
use shared::{transform, EnrichedObservation, ModelMetadata, ObservationForm};
use uuid::Uuid;

use crate::error::AppResult;
use crate::AppState;

/// Model identity echoed with every prediction
#[derive(Debug, Serialize)]
pub struct ModelRef {
    pub name: String,
    pub version: String,
}

/// Prediction response
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub request_id: Uuid,
    pub predicted_count: f64,
    pub display_count: i64,
    pub model: ModelRef,
    pub features: EnrichedObservation,
    pub message_en: String,
    pub message_ko: String,
}

/// Predict the call count for a date, district and weather readings
pub async fn predict_call_count(
    State(state): State<AppState>,
    payload: Result<Json<ObservationForm>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(form) = payload?;
    let request_id = Uuid::new_v4();

    let observation = transform(form).map_err(|e| {
        tracing::warn!(%request_id, field = e.field(), "Rejected observation: {}", e);
        e
    })?;

    let prediction = state.predictions.predict(&observation).map_err(|e| {
        tracing::error!(%request_id, district = %observation.district, "Prediction failed: {}", e);
        e
    })?;

    let metadata = state.predictions.metadata();
    tracing::info!(
        %request_id,
        district = %observation.district,
        model_version = %metadata.version,
        predicted = prediction.display_count,
        "Predicted call count"
    );

    Ok(Json(PredictionResponse {
        request_id,
        predicted_count: prediction.predicted_count,
        display_count: prediction.display_count,
        model: ModelRef {
            name: metadata.name.clone(),
            version: metadata.version.clone(),
        },
        message_en: format!("Expected calls: {}", prediction.display_count),
        message_ko: format!("예상 신고건수: {}건", prediction.display_count),
        features: observation,
    }))
}

/// Describe the loaded model
pub async fn get_model(State(state): State<AppState>) -> Json<ModelMetadata> {
    Json(state.predictions.metadata().clone())
}
