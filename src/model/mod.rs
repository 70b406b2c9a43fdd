//! Scorer abstraction over the loaded artifact, plus the artifact format and loader.

mod artifact;
mod estimator;
mod loader;

pub use artifact::{ColumnStep, HandleUnknown, Pipeline, Preprocessor};
pub use estimator::{Estimator, Tree, TreeNode};
pub use loader::{load_scorer, LoadedModel, ModelHandle};

use crate::error::ScorerError;
use crate::features::FeatureVector;

/// Capabilities of a trained classifier: a label, and optionally a class distribution.
pub trait Scorer: Send + Sync {
    /// Short name of the estimator, for logs.
    fn kind(&self) -> &str;

    fn classify(&self, features: &FeatureVector) -> Result<i64, ScorerError>;

    /// Class probability distribution. `None` when the estimator has no probability output.
    fn score(&self, _features: &FeatureVector) -> Option<Result<Vec<f64>, ScorerError>> {
        None
    }
}
