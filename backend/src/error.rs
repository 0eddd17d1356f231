//! Error handling for the LOGIS:COPE server
//!
//! Provides consistent error responses in English and Korean

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{FeatureError, PredictionError};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("Parse error: {0}")]
    Parse(FeatureError),

    #[error("Validation error: {0}")]
    Validation(FeatureError),

    #[error("Malformed request body: {0}")]
    BadRequest(String),

    // Model errors
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Scoring error: {0}")]
    Scoring(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<FeatureError> for AppError {
    fn from(err: FeatureError) -> Self {
        match err {
            FeatureError::Parse { .. } => AppError::Parse(err),
            FeatureError::Validation { .. } => AppError::Validation(err),
        }
    }
}

impl From<PredictionError> for AppError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::SchemaMismatch(msg) => AppError::SchemaMismatch(msg),
            PredictionError::Scoring(msg) => AppError::Scoring(msg),
            PredictionError::Artifact(msg) => AppError::Configuration(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_ko: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Parse(err) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "PARSE_ERROR".to_string(),
                    message_en: err.to_string(),
                    message_ko: "날짜 형식이 올바르지 않습니다".to_string(),
                    field: Some(err.field().to_string()),
                },
            ),
            AppError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: err.to_string(),
                    message_ko: format!("입력값이 올바르지 않습니다: {}", err.field()),
                    field: Some(err.field().to_string()),
                },
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "BAD_REQUEST".to_string(),
                    message_en: msg.clone(),
                    message_ko: "요청 형식이 올바르지 않습니다".to_string(),
                    field: None,
                },
            ),
            AppError::SchemaMismatch(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "SCHEMA_MISMATCH".to_string(),
                    message_en: format!("Feature schema mismatch: {}", msg),
                    message_ko: format!("예측 중 오류 발생: {}", msg),
                    field: None,
                },
            ),
            AppError::Scoring(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "SCORING_ERROR".to_string(),
                    message_en: format!("Prediction failed: {}", msg),
                    message_ko: format!("예측 중 오류 발생: {}", msg),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: format!("Configuration error: {}", msg),
                    message_ko: format!("설정 오류: {}", msg),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
