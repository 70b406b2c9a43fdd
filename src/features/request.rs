//! Incoming `/predict` body → feature vector.

use super::{FeatureValue, FeatureVector};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// All nine fields are required; unknown fields are rejected. Numeric fields
/// accept numeric strings, and counters accept integral floats such as `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictionRequest {
    #[serde(deserialize_with = "lax_f64")]
    pub network_packet_size: f64,
    pub protocol_type: String,
    #[serde(deserialize_with = "lax_i64")]
    pub login_attempts: i64,
    #[serde(deserialize_with = "lax_f64")]
    pub session_duration: f64,
    pub encryption_used: String,
    #[serde(deserialize_with = "lax_f64")]
    pub ip_reputation_score: f64,
    #[serde(deserialize_with = "lax_i64")]
    pub failed_logins: i64,
    pub browser_type: String,
    #[serde(deserialize_with = "lax_i64")]
    pub unusual_time_access: i64,
}

impl PredictionRequest {
    /// Positional mapping in [`super::FEATURE_COLUMNS`] order.
    pub fn to_feature_vector(&self) -> FeatureVector {
        FeatureVector::new(vec![
            FeatureValue::Number(self.network_packet_size),
            FeatureValue::Category(self.protocol_type.clone()),
            FeatureValue::Number(self.login_attempts as f64),
            FeatureValue::Number(self.session_duration),
            FeatureValue::Category(self.encryption_used.clone()),
            FeatureValue::Number(self.ip_reputation_score),
            FeatureValue::Number(self.failed_logins as f64),
            FeatureValue::Category(self.browser_type.clone()),
            FeatureValue::Number(self.unusual_time_access as f64),
        ])
    }
}

struct LaxF64;

impl<'de> Visitor<'de> for LaxF64 {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        match v.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
        }
    }
}

struct LaxI64;

impl LaxI64 {
    fn integral<E: de::Error>(&self, v: f64, unexp: de::Unexpected<'_>) -> Result<i64, E> {
        if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
            Ok(v as i64)
        } else {
            Err(E::invalid_value(unexp, self))
        }
    }
}

impl<'de> Visitor<'de> for LaxI64 {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer, integral float or integer string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        self.integral(v, de::Unexpected::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        let t = v.trim();
        if let Ok(n) = t.parse::<i64>() {
            return Ok(n);
        }
        match t.parse::<f64>() {
            Ok(n) => self.integral(n, de::Unexpected::Str(v)),
            Err(_) => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
        }
    }
}

fn lax_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    d.deserialize_any(LaxF64)
}

fn lax_i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    d.deserialize_any(LaxI64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_COLUMNS;

    const SAMPLE: &str = r#"{
        "network_packet_size": 500,
        "protocol_type": "TCP",
        "login_attempts": 1,
        "session_duration": 120.5,
        "encryption_used": "AES",
        "ip_reputation_score": 0.1,
        "failed_logins": 0,
        "browser_type": "Chrome",
        "unusual_time_access": 0
    }"#;

    fn sample_with(field: &str, value: serde_json::Value) -> serde_json::Value {
        let mut v: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        v[field] = value;
        v
    }

    #[test]
    fn integer_accepted_for_float_field() {
        let req: PredictionRequest = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(req.network_packet_size, 500.0);
    }

    #[test]
    fn vector_follows_column_order() {
        let req: PredictionRequest = serde_json::from_str(SAMPLE).unwrap();
        let fv = req.to_feature_vector();
        assert_eq!(fv.values.len(), FEATURE_COLUMNS.len());
        assert_eq!(fv.values[0], FeatureValue::Number(500.0));
        assert_eq!(fv.values[1], FeatureValue::Category("TCP".into()));
        assert_eq!(fv.values[3], FeatureValue::Number(120.5));
        assert_eq!(fv.values[4], FeatureValue::Category("AES".into()));
        assert_eq!(fv.values[7], FeatureValue::Category("Chrome".into()));
        assert_eq!(fv.values[8], FeatureValue::Number(0.0));
    }

    #[test]
    fn missing_field_rejected() {
        let mut v: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        v.as_object_mut().unwrap().remove("protocol_type");
        let err = serde_json::from_value::<PredictionRequest>(v).unwrap_err();
        assert!(err.to_string().contains("protocol_type"));
    }

    #[test]
    fn unknown_field_rejected() {
        let mut v: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        v.as_object_mut()
            .unwrap()
            .insert("user_id".into(), serde_json::json!(7));
        assert!(serde_json::from_value::<PredictionRequest>(v).is_err());
    }

    #[test]
    fn integral_float_coerced_for_counter() {
        let v = sample_with("login_attempts", serde_json::json!(1.0));
        let req: PredictionRequest = serde_json::from_value(v).unwrap();
        assert_eq!(req.login_attempts, 1);
    }

    #[test]
    fn fractional_float_rejected_for_counter() {
        let v = sample_with("failed_logins", serde_json::json!(1.5));
        assert!(serde_json::from_value::<PredictionRequest>(v).is_err());
    }

    #[test]
    fn numeric_strings_coerced() {
        let mut v = sample_with("network_packet_size", serde_json::json!("500"));
        v["ip_reputation_score"] = serde_json::json!(" 0.25 ");
        v["unusual_time_access"] = serde_json::json!("1");
        v["failed_logins"] = serde_json::json!("2.0");
        let req: PredictionRequest = serde_json::from_value(v).unwrap();
        assert_eq!(req.network_packet_size, 500.0);
        assert_eq!(req.ip_reputation_score, 0.25);
        assert_eq!(req.unusual_time_access, 1);
        assert_eq!(req.failed_logins, 2);
    }

    #[test]
    fn non_numeric_strings_rejected() {
        let v = sample_with("session_duration", serde_json::json!("long"));
        assert!(serde_json::from_value::<PredictionRequest>(v).is_err());
        let v = sample_with("login_attempts", serde_json::json!("1.5"));
        assert!(serde_json::from_value::<PredictionRequest>(v).is_err());
        let v = sample_with("network_packet_size", serde_json::json!("NaN"));
        assert!(serde_json::from_value::<PredictionRequest>(v).is_err());
    }

    #[test]
    fn parses_from_raw_json_text() {
        let text = SAMPLE.replace("\"login_attempts\": 1", "\"login_attempts\": 3.0");
        let req: PredictionRequest = serde_json::from_str(&text).unwrap();
        assert_eq!(req.login_attempts, 3);
    }
}
