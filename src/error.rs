//! Error taxonomy for loading, inference, the HTTP surface and the client.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure while reading or validating the artifact at startup.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to read artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("artifact columns do not match request schema: {0}")]
    Schema(String),

    #[error("invalid artifact: {0}")]
    Invalid(String),
}

/// Failure while encoding a feature vector or running the estimator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScorerError {
    #[error("{0}")]
    Encoding(String),

    #[error("expected {expected} encoded features, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("{0}")]
    Invalid(String),
}

/// Errors surfaced by the HTTP handlers. Every variant renders as `{"detail": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{detail}")]
    Schema { status: StatusCode, detail: String },

    #[error("Model not loaded")]
    ModelNotLoaded,

    #[error("Prediction error: {0}")]
    Inference(#[from] ScorerError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Schema { status, .. } => *status,
            ApiError::ModelNotLoaded => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Schema {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Errors from [`crate::client::ModelServiceClient`].
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("model service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model service error: {status} {body}")]
    Status { status: u16, body: String },
}
