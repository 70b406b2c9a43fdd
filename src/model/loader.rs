//! Startup artifact loading. A missing or broken artifact leaves the service running without a model.

use super::artifact::Pipeline;
use super::Scorer;
use crate::error::ModelError;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;

/// A successfully loaded artifact and its content digest.
pub struct LoadedModel {
    pub scorer: Arc<dyn Scorer>,
    pub sha256: String,
}

/// Read, parse and validate the artifact at `path`.
pub fn load_scorer(path: &Path) -> Result<LoadedModel, ModelError> {
    let bytes = std::fs::read(path)?;
    let sha256 = format!("{:x}", Sha256::digest(&bytes));
    let pipeline = Pipeline::from_json(&bytes)?;
    Ok(LoadedModel {
        scorer: Arc::new(pipeline),
        sha256,
    })
}

/// Process-wide model slot. Set once at startup, read-only afterwards.
#[derive(Clone)]
pub struct ModelHandle {
    scorer: Option<Arc<dyn Scorer>>,
}

impl ModelHandle {
    /// Load from `path`. On failure, logs and returns an empty handle.
    pub fn load(path: &Path) -> Self {
        match load_scorer(path) {
            Ok(model) => {
                tracing::info!(
                    path = %path.display(),
                    sha256 = %model.sha256,
                    kind = model.scorer.kind(),
                    "model loaded"
                );
                Self {
                    scorer: Some(model.scorer),
                }
            }
            Err(e) => {
                let cwd = std::env::current_dir()
                    .map(|d| d.display().to_string())
                    .unwrap_or_default();
                tracing::error!(
                    path = %path.display(),
                    cwd = %cwd,
                    error = %e,
                    "error loading model; serving without it"
                );
                Self::empty()
            }
        }
    }

    pub fn empty() -> Self {
        Self { scorer: None }
    }

    pub fn from_scorer(scorer: Arc<dyn Scorer>) -> Self {
        Self {
            scorer: Some(scorer),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.scorer.is_some()
    }

    pub fn scorer(&self) -> Option<&Arc<dyn Scorer>> {
        self.scorer.as_ref()
    }
}
