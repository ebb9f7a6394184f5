use crate::model::Contaminant;
use crate::thresholds::schema::ThresholdCheck;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyStatus {
    Safe,
    Contaminated,
}

impl fmt::Display for SafetyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SafetyStatus::Safe => write!(f, "Safe"),
            SafetyStatus::Contaminated => write!(f, "Contaminated"),
        }
    }
}

/// One contaminant whose measured value violated its rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub contaminant: Contaminant,
    /// The measured value.
    pub value: Decimal,
    /// The rule that was violated.
    pub check: ThresholdCheck,
    /// The bound that was crossed.
    pub limit: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Human-readable explanation.
    pub reason: String,
    /// Remediation advice from the threshold table, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
}

/// Safety classification of one sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyVerdict {
    pub status: SafetyStatus,
    /// Contaminants whose measured value violated their rule. Empty iff Safe.
    pub violated_thresholds: BTreeSet<Contaminant>,
    /// Per-violation detail, in threshold-table order.
    pub violations: Vec<Violation>,
    /// Rules that had no measurement in the sample.
    pub unmeasured_rules: Vec<Contaminant>,
    /// Measurements with no rule (informational only).
    pub informational: Vec<Contaminant>,
}

impl SafetyVerdict {
    pub fn is_safe(&self) -> bool {
        self.status == SafetyStatus::Safe
    }

    /// General guidance for the verdict followed by the advice attached to
    /// each violated rule.
    pub fn recommendations(&self) -> Vec<String> {
        let mut out: Vec<String> = match self.status {
            SafetyStatus::Contaminated => vec![
                "Do not consume water from this source".into(),
                "Conduct immediate water quality testing".into(),
                "Provide alternative safe water sources to the community".into(),
            ],
            SafetyStatus::Safe => vec![
                "Water quality is safe for consumption".into(),
                "Continue regular monitoring".into(),
                "Maintain current water treatment protocols".into(),
            ],
        };
        out.extend(self.violations.iter().filter_map(|v| v.advice.clone()));
        out
    }
}
