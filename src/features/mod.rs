//! Request schema and the ordered feature vector handed to the scorer.

mod request;

pub use request::PredictionRequest;

use std::fmt;

/// Column order the artifact is trained with. Checked against the artifact's
/// declared columns at load time.
pub const FEATURE_COLUMNS: [&str; 9] = [
    "network_packet_size",
    "protocol_type",
    "login_attempts",
    "session_duration",
    "encryption_used",
    "ip_reputation_score",
    "failed_logins",
    "browser_type",
    "unusual_time_access",
];

/// One cell of the feature vector.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl FeatureValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FeatureValue::Category(s) => Some(s),
            FeatureValue::Number(_) => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(n) => write!(f, "{}", n),
            FeatureValue::Category(s) => write!(f, "{:?}", s),
        }
    }
}

/// Fixed-order feature vector (one row) for model input.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub values: Vec<FeatureValue>,
}

impl FeatureVector {
    pub fn new(values: Vec<FeatureValue>) -> Self {
        Self { values }
    }

    /// Column name for a position, if it is one of the fixed columns.
    pub fn column_name(idx: usize) -> &'static str {
        FEATURE_COLUMNS.get(idx).copied().unwrap_or("<extra>")
    }
}
