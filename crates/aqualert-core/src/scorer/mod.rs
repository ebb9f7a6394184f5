//! External predictive scorer.
//!
//! The scorer receives the full measurement panel and answers with its own
//! Safe/Unsafe call plus a predicted condition. Its answer is untrusted:
//! anything outside the expected values degrades to "unknown" rather than
//! being passed on.

pub mod http;

pub use http::HttpScorer;

use crate::model::{Contaminant, Measurements};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Trait for predictive scoring backends.
pub trait Scorer: Send + Sync {
    /// Score a measurement panel.
    fn score(&self, measurements: &Measurements) -> Result<ScorerAssessment, ScorerError>;

    /// Name of this scoring backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Non-fatal scorer failures. These never fail a report submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum ScorerError {
    #[error("scorer timed out after {0}ms")]
    Timeout(u64),

    #[error("scorer unreachable: {0}")]
    Transport(String),

    #[error("scorer returned HTTP {0}")]
    Status(u16),

    #[error("malformed scorer response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScorerStatus {
    Safe,
    Unsafe,
    /// The scorer answered with something other than Safe/Unsafe.
    Unknown,
}

impl fmt::Display for ScorerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScorerStatus::Safe => write!(f, "Safe"),
            ScorerStatus::Unsafe => write!(f, "Unsafe"),
            ScorerStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Sanitized answer from the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerAssessment {
    pub status: ScorerStatus,
    /// Predicted condition; `None` when absent, empty or "None".
    pub predicted_condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_confidence: Option<f64>,
}

impl ScorerAssessment {
    pub fn safe() -> Self {
        Self {
            status: ScorerStatus::Safe,
            predicted_condition: None,
            safety_confidence: None,
            condition_confidence: None,
        }
    }

    pub fn unsafe_with(condition: &str) -> Self {
        Self {
            status: ScorerStatus::Unsafe,
            predicted_condition: Some(condition.to_string()),
            safety_confidence: None,
            condition_confidence: None,
        }
    }

    pub fn is_unsafe(&self) -> bool {
        self.status == ScorerStatus::Unsafe
    }
}

/// What happened when the scorer was consulted for one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScorerOutcome {
    /// No scorer configured.
    Skipped,
    Assessed(ScorerAssessment),
    Failed { error: ScorerError },
}

impl ScorerOutcome {
    pub fn assessment(&self) -> Option<&ScorerAssessment> {
        match self {
            ScorerOutcome::Assessed(a) => Some(a),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&ScorerError> {
        match self {
            ScorerOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Build the scorer feature map: all twenty features, unmeasured ones as 0.
pub fn feature_panel(measurements: &Measurements) -> BTreeMap<&'static str, f64> {
    Contaminant::ALL
        .iter()
        .filter_map(|c| {
            let name = c.scorer_feature()?;
            let value = measurements
                .get(c)
                .and_then(|v| v.to_f64())
                .unwrap_or(0.0);
            Some((name, value))
        })
        .collect()
}

/// Parse and sanitize a scorer response body.
///
/// Only a body that is not a JSON object is an error; individual fields with
/// unexpected values are dropped or mapped to [`ScorerStatus::Unknown`].
pub fn parse_prediction(body: &[u8]) -> Result<ScorerAssessment, ScorerError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| ScorerError::Malformed(e.to_string()))?;
    let obj = value
        .as_object()
        .ok_or_else(|| ScorerError::Malformed("expected a JSON object".into()))?;

    let status = match obj.get("status").and_then(|s| s.as_str()) {
        Some("Safe") => ScorerStatus::Safe,
        Some("Unsafe") => ScorerStatus::Unsafe,
        _ => ScorerStatus::Unknown,
    };

    let predicted_condition = obj
        .get("predicted_disease")
        .and_then(|s| s.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("none"))
        .map(str::to_string);

    let confidence = |key: &str| {
        obj.get(key)
            .and_then(|c| c.as_f64())
            .filter(|c| (0.0..=1.0).contains(c))
    };

    Ok(ScorerAssessment {
        status,
        predicted_condition,
        safety_confidence: confidence("safety_confidence"),
        condition_confidence: confidence("disease_confidence"),
    })
}
