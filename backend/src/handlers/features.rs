//! HTTP handlers for the feature transform and the district table

use axum::{extract::rejection::JsonRejection, Json};
use shared::{district_table, transform, DistrictEntry, EnrichedObservation, ObservationForm};

use crate::error::AppResult;

/// List Busan districts with their region groups
pub async fn list_regions() -> Json<Vec<DistrictEntry>> {
    Json(district_table())
}

/// Enrich an observation without scoring it
pub async fn enrich_observation(
    payload: Result<Json<ObservationForm>, JsonRejection>,
) -> AppResult<Json<EnrichedObservation>> {
    let Json(form) = payload?;
    let observation = transform(form).map_err(|e| {
        tracing::warn!(field = e.field(), "Rejected observation: {}", e);
        e
    })?;
    Ok(Json(observation))
}
