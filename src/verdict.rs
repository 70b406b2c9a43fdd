//! Turns a scorer's label and class distribution into the attack verdict.

use crate::error::ScorerError;
use crate::features::FeatureVector;
use crate::model::Scorer;
use serde::{Deserialize, Serialize};

/// Distribution used when the scorer has no probability output.
pub const NEUTRAL_DISTRIBUTION: [f64; 2] = [0.5, 0.5];

/// Label of the attack class.
pub const ATTACK_LABEL: i64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: i64,
    /// Probability of the positive (attack) class
    pub probability: f64,
    pub attack_detected: bool,
    /// Lock the session when an attack is detected
    pub locked_state: bool,
}

impl PredictionResult {
    pub fn from_scores(label: i64, distribution: &[f64]) -> Result<Self, ScorerError> {
        let probability = positive_probability(distribution)?;
        let attack_detected = label == ATTACK_LABEL;
        Ok(Self {
            prediction: label,
            probability,
            attack_detected,
            locked_state: attack_detected,
        })
    }
}

/// Second entry when there are two or more classes, otherwise the only entry.
pub fn positive_probability(distribution: &[f64]) -> Result<f64, ScorerError> {
    let p = match distribution {
        [] => return Err(ScorerError::Invalid("empty probability distribution".into())),
        [only] => *only,
        [_, positive, ..] => *positive,
    };
    if !p.is_finite() {
        return Err(ScorerError::Invalid(format!("non-finite probability {}", p)));
    }
    Ok(p.clamp(0.0, 1.0))
}

/// Classify, score (or fall back to the neutral distribution), and derive the verdict.
pub fn evaluate(scorer: &dyn Scorer, features: &FeatureVector) -> Result<PredictionResult, ScorerError> {
    let label = scorer.classify(features)?;
    let distribution = match scorer.score(features) {
        Some(dist) => dist?,
        None => NEUTRAL_DISTRIBUTION.to_vec(),
    };
    PredictionResult::from_scores(label, &distribution)
}
