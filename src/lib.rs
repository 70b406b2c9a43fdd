//! Verdict service — HTTP wrapper around a pre-trained attack/normal classifier.
//!
//! Modular structure:
//! - [`features`] — Request schema and fixed-order feature vector
//! - [`model`] — `Scorer` trait, pipeline artifact, startup loader
//! - [`verdict`] — Label + distribution → attack verdict
//! - [`api`] — axum routes, shared state, serve loop
//! - [`client`] — HTTP client for a running service
//! - [`logging`] — Structured JSON logging

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;
pub mod verdict;

pub use api::{router, AppState};
pub use client::ModelServiceClient;
pub use config::ServiceConfig;
pub use error::{ApiError, ClientError, ModelError, ScorerError};
pub use features::{FeatureValue, FeatureVector, PredictionRequest, FEATURE_COLUMNS};
pub use logging::StructuredLogger;
pub use model::{ModelHandle, Scorer};
pub use verdict::PredictionResult;
