//! Frozen regression pipeline
//!
//! The call-count model is trained elsewhere and exported as a JSON artifact:
//! an intercept plus one term per input column. Numeric terms are
//! standardized (`(x - mean) / scale`) and weighted; categorical terms look up
//! a weight per category, with unseen categories contributing nothing.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::PredictionError;
use crate::features::{feature_schema, FeatureRow, FeatureValue};
use crate::types::{ColumnKind, ColumnSpec};

/// One fitted term of the pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureTerm {
    Numeric {
        name: String,
        mean: f64,
        scale: f64,
        weight: f64,
    },
    Categorical {
        name: String,
        #[serde(default)]
        weights: HashMap<String, f64>,
    },
}

impl FeatureTerm {
    pub fn name(&self) -> &str {
        match self {
            FeatureTerm::Numeric { name, .. } | FeatureTerm::Categorical { name, .. } => name,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            FeatureTerm::Numeric { .. } => ColumnKind::Numeric,
            FeatureTerm::Categorical { .. } => ColumnKind::Categorical,
        }
    }

    /// Contribution of `value` to the prediction
    fn contribution(&self, value: &FeatureValue) -> Result<f64, PredictionError> {
        match (self, value) {
            (FeatureTerm::Numeric { mean, scale, weight, .. }, FeatureValue::Numeric(x)) => {
                if !x.is_finite() {
                    return Err(PredictionError::Scoring(format!(
                        "column '{}' is not finite",
                        self.name()
                    )));
                }
                Ok(weight * (x - mean) / scale)
            }
            (FeatureTerm::Categorical { weights, .. }, FeatureValue::Categorical(category)) => {
                Ok(weights.get(category).copied().unwrap_or(0.0))
            }
            _ => Err(PredictionError::SchemaMismatch(format!(
                "column '{}' expected {:?}, got {:?}",
                self.name(),
                self.kind(),
                value.kind()
            ))),
        }
    }
}

/// Serialized pipeline as exported after training
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineArtifact {
    pub name: String,
    pub version: String,
    #[serde(default = "default_target")]
    pub target: String,
    pub intercept: f64,
    pub features: Vec<FeatureTerm>,
}

fn default_target() -> String {
    "call_count".to_string()
}

impl PipelineArtifact {
    /// Input schema declared by the artifact
    pub fn input_schema(&self) -> Vec<ColumnSpec> {
        self.features
            .iter()
            .map(|term| ColumnSpec::new(term.name(), term.kind()))
            .collect()
    }

    /// Reject artifacts that could never score a row
    fn check_terms(&self) -> Result<(), PredictionError> {
        if !self.intercept.is_finite() {
            return Err(PredictionError::Artifact("intercept is not finite".into()));
        }
        for term in &self.features {
            match term {
                FeatureTerm::Numeric { name, mean, scale, weight } => {
                    if !mean.is_finite() || !weight.is_finite() {
                        return Err(PredictionError::Artifact(format!(
                            "term '{}' has a non-finite coefficient",
                            name
                        )));
                    }
                    if !scale.is_finite() || *scale == 0.0 {
                        return Err(PredictionError::Artifact(format!(
                            "term '{}' has an unusable scale {}",
                            name, scale
                        )));
                    }
                }
                FeatureTerm::Categorical { name, weights } => {
                    if weights.values().any(|w| !w.is_finite()) {
                        return Err(PredictionError::Artifact(format!(
                            "term '{}' has a non-finite category weight",
                            name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Describes a loaded model for health checks and the model endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelMetadata {
    pub name: String,
    pub version: String,
    pub target: String,
    /// SHA-256 of the artifact bytes, hex encoded
    pub fingerprint: String,
    pub input_schema: Vec<ColumnSpec>,
}

/// A frozen model that scores one feature row
pub trait Regressor: Send + Sync {
    fn metadata(&self) -> &ModelMetadata;

    /// Raw prediction for a row that already matches `metadata().input_schema`
    fn predict(&self, row: &FeatureRow) -> Result<f64, PredictionError>;
}

/// Verify that a row carries exactly the expected columns, in order
pub fn check_schema(expected: &[ColumnSpec], row: &FeatureRow) -> Result<(), PredictionError> {
    let actual = row.schema();
    if actual.len() != expected.len() {
        return Err(PredictionError::SchemaMismatch(format!(
            "expected {} columns, got {}",
            expected.len(),
            actual.len()
        )));
    }
    for (position, (want, got)) in expected.iter().zip(&actual).enumerate() {
        if want != got {
            return Err(PredictionError::SchemaMismatch(format!(
                "column {} expected {}, got {}",
                position, want, got
            )));
        }
    }
    Ok(())
}

/// Linear pipeline backed by a [`PipelineArtifact`]
#[derive(Debug, Clone)]
pub struct LinearPipeline {
    artifact: PipelineArtifact,
    metadata: ModelMetadata,
}

impl LinearPipeline {
    /// Parse an artifact and check it against the transform's feature schema
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PredictionError> {
        let artifact: PipelineArtifact = serde_json::from_slice(bytes)
            .map_err(|e| PredictionError::Artifact(e.to_string()))?;
        artifact.check_terms()?;

        let input_schema = artifact.input_schema();
        let expected = feature_schema();
        if input_schema != expected {
            let names: Vec<String> = input_schema.iter().map(ToString::to_string).collect();
            return Err(PredictionError::SchemaMismatch(format!(
                "artifact '{}' expects [{}]",
                artifact.name,
                names.join(", ")
            )));
        }

        let metadata = ModelMetadata {
            name: artifact.name.clone(),
            version: artifact.version.clone(),
            target: artifact.target.clone(),
            fingerprint: format!("{:x}", Sha256::digest(bytes)),
            input_schema,
        };

        Ok(Self { artifact, metadata })
    }

    /// Read and parse an artifact file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PredictionError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            PredictionError::Artifact(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_slice(&bytes)
    }

    pub fn artifact(&self) -> &PipelineArtifact {
        &self.artifact
    }
}

impl Regressor for LinearPipeline {
    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn predict(&self, row: &FeatureRow) -> Result<f64, PredictionError> {
        check_schema(&self.metadata.input_schema, row)?;

        let mut score = self.artifact.intercept;
        for (term, (_, value)) in self.artifact.features.iter().zip(row.iter()) {
            score += term.contribution(value)?;
        }

        if !score.is_finite() {
            return Err(PredictionError::Scoring(format!(
                "model produced a non-finite score ({})",
                score
            )));
        }
        Ok(score)
    }
}
