//! Client for a running model service: what a backend calls to get a verdict.

use crate::api::HealthResponse;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::features::PredictionRequest;
use crate::verdict::PredictionResult;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

pub struct ModelServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ModelServiceClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn check<T: DeserializeOwned>(&self, res: reqwest::Response) -> Result<T, ClientError> {
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "model service returned an error");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(res.json::<T>().await?)
    }

    /// `POST /predict`.
    pub async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ClientError> {
        let url = format!("{}/predict", self.base_url);
        let res = self.client.post(&url).json(request).send().await?;
        let result: PredictionResult = self.check(res).await?;
        debug!(
            prediction = result.prediction,
            probability = result.probability,
            "model service verdict"
        );
        Ok(result)
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.base_url);
        let res = self.client.get(&url).send().await?;
        self.check(res).await
    }
}
