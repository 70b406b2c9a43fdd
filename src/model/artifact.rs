//! Serialized pipeline artifact: per-column preprocessing followed by one estimator.
//!
//! The artifact owns every encoding decision (vocabularies, scaling, unknown-category
//! policy). This module only interprets what the artifact declares.

use super::estimator::Estimator;
use super::Scorer;
use crate::error::{ModelError, ScorerError};
use crate::features::{FeatureValue, FeatureVector, FEATURE_COLUMNS};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

fn default_classes() -> [i64; 2] {
    [0, 1]
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Error,
    /// Unknown category encodes to all zeros.
    Ignore,
}

/// Transformation for one input column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStep {
    Passthrough,
    StandardScaler {
        mean: f64,
        scale: f64,
    },
    OneHot {
        categories: Vec<String>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
    Ordinal {
        categories: Vec<String>,
    },
}

impl ColumnStep {
    /// Number of encoded outputs this step produces.
    pub fn width(&self) -> usize {
        match self {
            ColumnStep::OneHot { categories, .. } => categories.len(),
            _ => 1,
        }
    }

    fn encode(&self, column: &str, value: &FeatureValue, out: &mut Vec<f64>) -> Result<(), ScorerError> {
        match self {
            ColumnStep::Passthrough => out.push(number(column, value)?),
            ColumnStep::StandardScaler { mean, scale } => {
                out.push((number(column, value)? - mean) / scale)
            }
            ColumnStep::OneHot {
                categories,
                handle_unknown,
            } => {
                let cat = category(column, value)?;
                let hit = categories.iter().position(|c| c == cat);
                if hit.is_none() && *handle_unknown == HandleUnknown::Error {
                    return Err(unknown(column, cat));
                }
                out.extend((0..categories.len()).map(|i| if Some(i) == hit { 1.0 } else { 0.0 }));
            }
            ColumnStep::Ordinal { categories } => {
                let cat = category(column, value)?;
                let pos = categories
                    .iter()
                    .position(|c| c == cat)
                    .ok_or_else(|| unknown(column, cat))?;
                out.push(pos as f64);
            }
        }
        Ok(())
    }
}

fn number(column: &str, value: &FeatureValue) -> Result<f64, ScorerError> {
    value.as_number().ok_or_else(|| {
        ScorerError::Encoding(format!("column {}: expected a number, got {}", column, value))
    })
}

fn category<'a>(column: &str, value: &'a FeatureValue) -> Result<&'a str, ScorerError> {
    value.as_category().ok_or_else(|| {
        ScorerError::Encoding(format!("column {}: expected a category, got {}", column, value))
    })
}

fn unknown(column: &str, cat: &str) -> ScorerError {
    ScorerError::Encoding(format!("column {}: unknown category {:?}", column, cat))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    /// One step per input column, in column order.
    pub steps: Vec<ColumnStep>,
}

impl Preprocessor {
    pub fn output_width(&self) -> usize {
        self.steps.iter().map(ColumnStep::width).sum()
    }

    pub fn transform(&self, features: &FeatureVector) -> Result<Array1<f64>, ScorerError> {
        if features.values.len() != self.steps.len() {
            return Err(ScorerError::Shape {
                expected: self.steps.len(),
                actual: features.values.len(),
            });
        }
        let mut row = Vec::with_capacity(self.output_width());
        for (i, (step, value)) in self.steps.iter().zip(&features.values).enumerate() {
            step.encode(FeatureVector::column_name(i), value, &mut row)?;
        }
        Ok(Array1::from(row))
    }
}

/// Deserialized artifact: what was saved after training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    /// Training column order. Absent in older artifacts.
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    /// Label for estimator output index 0 and 1.
    #[serde(default = "default_classes")]
    pub classes: [i64; 2],
    pub preprocessor: Preprocessor,
    pub estimator: Estimator,
}

impl Pipeline {
    pub fn from_json(data: &[u8]) -> Result<Self, ModelError> {
        let pipeline: Pipeline = serde_json::from_slice(data)?;
        pipeline.validate()?;
        Ok(pipeline)
    }

    /// Declared columns must equal [`FEATURE_COLUMNS`] in name and order.
    pub fn check_columns(&self) -> Result<(), ModelError> {
        let Some(ref columns) = self.columns else {
            tracing::warn!("artifact declares no column list; feature order is unchecked");
            return Ok(());
        };
        if columns.len() != FEATURE_COLUMNS.len() {
            return Err(ModelError::Schema(format!(
                "artifact has {} columns, requests carry {}",
                columns.len(),
                FEATURE_COLUMNS.len()
            )));
        }
        for (i, (got, want)) in columns.iter().zip(FEATURE_COLUMNS).enumerate() {
            if got != want {
                return Err(ModelError::Schema(format!(
                    "column {} is {:?}, expected {:?}",
                    i, got, want
                )));
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        self.check_columns()?;
        if self.preprocessor.steps.len() != FEATURE_COLUMNS.len() {
            return Err(ModelError::Invalid(format!(
                "preprocessor has {} steps, expected {}",
                self.preprocessor.steps.len(),
                FEATURE_COLUMNS.len()
            )));
        }
        for (i, step) in self.preprocessor.steps.iter().enumerate() {
            match step {
                ColumnStep::StandardScaler { mean, scale } => {
                    if !mean.is_finite() || !scale.is_finite() || *scale == 0.0 {
                        return Err(ModelError::Invalid(format!("column {}: bad scaler parameters", i)));
                    }
                }
                ColumnStep::OneHot { categories, .. } | ColumnStep::Ordinal { categories } => {
                    if categories.is_empty() {
                        return Err(ModelError::Invalid(format!("column {}: empty category list", i)));
                    }
                }
                ColumnStep::Passthrough => {}
            }
        }
        self.estimator.validate(self.preprocessor.output_width())
    }
}

impl Scorer for Pipeline {
    fn kind(&self) -> &str {
        self.estimator.kind()
    }

    fn classify(&self, features: &FeatureVector) -> Result<i64, ScorerError> {
        let row = self.preprocessor.transform(features)?;
        let idx = self.estimator.predict_index(row.view())?;
        Ok(self.classes[idx])
    }

    fn score(&self, features: &FeatureVector) -> Option<Result<Vec<f64>, ScorerError>> {
        if !self.estimator.has_proba() {
            return None;
        }
        let row = match self.preprocessor.transform(features) {
            Ok(r) => r,
            Err(e) => return Some(Err(e)),
        };
        self.estimator
            .predict_proba(row.view())
            .map(|r| r.map(|d| d.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::PredictionRequest;

    fn steps() -> Vec<ColumnStep> {
        vec![
            ColumnStep::StandardScaler {
                mean: 500.0,
                scale: 100.0,
            },
            ColumnStep::OneHot {
                categories: vec!["ICMP".into(), "TCP".into(), "UDP".into()],
                handle_unknown: HandleUnknown::Error,
            },
            ColumnStep::Passthrough,
            ColumnStep::Passthrough,
            ColumnStep::Ordinal {
                categories: vec!["AES".into(), "DES".into(), "None".into()],
            },
            ColumnStep::Passthrough,
            ColumnStep::Passthrough,
            ColumnStep::OneHot {
                categories: vec!["Chrome".into(), "Firefox".into()],
                handle_unknown: HandleUnknown::Ignore,
            },
            ColumnStep::Passthrough,
        ]
    }

    fn request() -> PredictionRequest {
        PredictionRequest {
            network_packet_size: 600.0,
            protocol_type: "TCP".into(),
            login_attempts: 3,
            session_duration: 120.5,
            encryption_used: "DES".into(),
            ip_reputation_score: 0.1,
            failed_logins: 2,
            browser_type: "Edge".into(),
            unusual_time_access: 1,
        }
    }

    fn pipeline(estimator: Estimator) -> Pipeline {
        Pipeline {
            columns: Some(FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect()),
            classes: [0, 1],
            preprocessor: Preprocessor { steps: steps() },
            estimator,
        }
    }

    #[test]
    fn transform_encodes_each_column() {
        let pre = Preprocessor { steps: steps() };
        assert_eq!(pre.output_width(), 12);
        let row = pre.transform(&request().to_feature_vector()).unwrap();
        // scaled size, TCP one-hot, DES ordinal, unknown browser ignored
        let expected = [
            1.0, 0.0, 1.0, 0.0, 3.0, 120.5, 1.0, 0.1, 2.0, 0.0, 0.0, 1.0,
        ];
        assert_eq!(row.to_vec(), expected.to_vec());
    }

    #[test]
    fn unknown_category_is_encoding_error() {
        let pre = Preprocessor { steps: steps() };
        let mut req = request();
        req.protocol_type = "SCTP".into();
        let err = pre.transform(&req.to_feature_vector()).unwrap_err();
        assert!(matches!(err, ScorerError::Encoding(_)));
        assert!(err.to_string().contains("protocol_type"));
        assert!(err.to_string().contains("SCTP"));
    }

    #[test]
    fn number_in_category_column_is_error() {
        let pre = Preprocessor { steps: steps() };
        let mut fv = request().to_feature_vector();
        fv.values[1] = FeatureValue::Number(6.0);
        assert!(pre.transform(&fv).is_err());
    }

    #[test]
    fn column_mismatch_rejected() {
        let mut p = pipeline(Estimator::LinearSvc {
            coef: vec![0.0; 12],
            intercept: 0.0,
        });
        p.columns.as_mut().unwrap().swap(0, 1);
        assert!(matches!(p.validate(), Err(ModelError::Schema(_))));
    }

    #[test]
    fn missing_columns_accepted() {
        let mut p = pipeline(Estimator::LinearSvc {
            coef: vec![0.0; 12],
            intercept: 0.0,
        });
        p.columns = None;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn width_mismatch_rejected() {
        let p = pipeline(Estimator::LogisticRegression {
            coef: vec![0.0; 5],
            intercept: 0.0,
        });
        assert!(matches!(p.validate(), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn svc_pipeline_scores_none() {
        let mut coef = vec![0.0; 12];
        coef[8] = 1.0; // failed_logins
        let p = pipeline(Estimator::LinearSvc {
            coef,
            intercept: -1.0,
        });
        p.validate().unwrap();
        let fv = request().to_feature_vector();
        assert_eq!(p.classify(&fv).unwrap(), 1);
        assert!(p.score(&fv).is_none());
    }

    #[test]
    fn custom_classes_are_returned() {
        let mut p = pipeline(Estimator::LogisticRegression {
            coef: vec![0.0; 12],
            intercept: 5.0,
        });
        p.classes = [-1, 1];
        let fv = request().to_feature_vector();
        assert_eq!(p.classify(&fv).unwrap(), 1);
        let dist = p.score(&fv).unwrap().unwrap();
        assert_eq!(dist.len(), 2);
        assert!(dist[1] > 0.99);
    }
}
