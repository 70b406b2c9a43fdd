//! Route handlers for `/`, `/health` and `/predict`.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::AppState;
use crate::error::ApiError;
use crate::features::PredictionRequest;
use crate::verdict::{self, PredictionResult};

pub const SERVICE_NAME: &str = "Attack Verdict Model Service";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub model_loaded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: SERVICE_NAME.to_string(),
        model_loaded: state.model.is_loaded(),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.model.is_loaded(),
    })
}

/// The body is validated first (422/400/415 on failure); a missing model then
/// fails with 500 before any inference runs.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let request_id = Uuid::new_v4();

    let Json(request) = payload.map_err(|rejection| {
        warn!(%request_id, error = %rejection.body_text(), "rejected prediction request");
        ApiError::from(rejection)
    })?;

    let Some(scorer) = state.model.scorer() else {
        error!(%request_id, "prediction requested but model not loaded");
        return Err(ApiError::ModelNotLoaded);
    };

    let start = Instant::now();
    let features = request.to_feature_vector();
    let result = verdict::evaluate(scorer.as_ref(), &features).map_err(|e| {
        warn!(%request_id, error = %e, "prediction failed");
        ApiError::from(e)
    })?;

    info!(
        %request_id,
        prediction = result.prediction,
        probability = result.probability,
        attack_detected = result.attack_detected,
        elapsed_us = start.elapsed().as_micros() as u64,
        "prediction"
    );
    Ok(Json(result))
}
