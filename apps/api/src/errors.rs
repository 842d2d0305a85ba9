use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors raised while loading the corpus, fitting the model, or reading
/// the fitted state back during ranking.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Malformed corpus: empty file, missing column, or an empty field.
    #[error("Corpus data error: {0}")]
    Data(String),

    /// Fewer than two usable job titles survived label-space filtering.
    #[error("Insufficient training data: {0}")]
    InsufficientData(String),

    /// A predicted title has no entry in the requirement map.
    #[error("Data consistency error: job title '{0}' has no requirement entry")]
    DataConsistency(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Model(ModelError::DataConsistency(title)) => {
                tracing::error!("Predicted title '{title}' missing from requirement map");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATA_CONSISTENCY_ERROR",
                    "The recommendation model is inconsistent with its corpus".to_string(),
                )
            }
            AppError::Model(e) => {
                tracing::error!("Model error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MODEL_ERROR",
                    e.to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
