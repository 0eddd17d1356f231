//! Prediction service wrapping the frozen call-count pipeline

use std::sync::Arc;

use serde::Serialize;
use shared::{check_schema, EnrichedObservation, FeatureRow, ModelMetadata, PredictionError, Regressor};

/// Scores enriched observations against the loaded model.
///
/// Holds the model behind an `Arc`; the model is never mutated after
/// startup, so clones share it freely across requests.
#[derive(Clone)]
pub struct PredictionService {
    model: Arc<dyn Regressor>,
}

/// Outcome of scoring one observation
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Prediction {
    /// Model output clamped at zero
    pub predicted_count: f64,
    /// `predicted_count` rounded for display
    pub display_count: i64,
}

impl Prediction {
    fn from_score(score: f64) -> Self {
        let predicted_count = score.max(0.0);
        Self {
            predicted_count,
            display_count: predicted_count.round() as i64,
        }
    }
}

impl PredictionService {
    pub fn new(model: Arc<dyn Regressor>) -> Self {
        Self { model }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        self.model.metadata()
    }

    /// Score one observation.
    ///
    /// The row is checked against the model's declared schema before the
    /// model sees it. Errors stay with this call; the service is unaffected.
    pub fn predict(&self, observation: &EnrichedObservation) -> Result<Prediction, PredictionError> {
        let row = FeatureRow::from_observation(observation);
        check_schema(&self.metadata().input_schema, &row)?;

        let score = self.model.predict(&row)?;
        if !score.is_finite() {
            return Err(PredictionError::Scoring(format!(
                "model returned a non-finite score ({})",
                score
            )));
        }

        tracing::debug!(
            model = %self.metadata().name,
            version = %self.metadata().version,
            score,
            "Scored observation"
        );
        Ok(Prediction::from_score(score))
    }
}
