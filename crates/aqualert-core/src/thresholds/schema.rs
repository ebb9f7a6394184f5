use crate::model::Contaminant;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A table of safety thresholds, at most one rule per contaminant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub rules: Vec<ThresholdRule>,
}

impl ThresholdTable {
    /// The rule for a contaminant, if it has one.
    pub fn rule_for(&self, contaminant: Contaminant) -> Option<&ThresholdRule> {
        self.rules.iter().find(|r| r.contaminant == contaminant)
    }
}

/// A single contaminant rule within a threshold table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub contaminant: Contaminant,
    pub check: ThresholdCheck,
    /// Unit for display only.
    #[serde(default)]
    pub unit: Option<String>,
    /// Remediation advice shown when this rule is violated.
    #[serde(default)]
    pub advice: Option<String>,
}

/// Comparison applied to a measured value. Limits are exact decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdCheck {
    /// Unsafe when the value is strictly above the limit.
    GreaterThan(Decimal),
    /// Unsafe when the value is strictly below the limit.
    LessThan(Decimal),
    /// Unsafe when the value is strictly below `low` or strictly above `high`.
    OutsideRange { low: Decimal, high: Decimal },
}

impl ThresholdCheck {
    pub fn is_violated_by(&self, value: Decimal) -> bool {
        match *self {
            ThresholdCheck::GreaterThan(limit) => value > limit,
            ThresholdCheck::LessThan(limit) => value < limit,
            ThresholdCheck::OutsideRange { low, high } => value < low || value > high,
        }
    }

    /// The bound the value crossed, for reporting.
    pub fn crossed_limit(&self, value: Decimal) -> Decimal {
        match *self {
            ThresholdCheck::GreaterThan(limit) | ThresholdCheck::LessThan(limit) => limit,
            ThresholdCheck::OutsideRange { low, high } => {
                if value < low {
                    low
                } else {
                    high
                }
            }
        }
    }
}

impl fmt::Display for ThresholdCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdCheck::GreaterThan(limit) => write!(f, "> {limit}"),
            ThresholdCheck::LessThan(limit) => write!(f, "< {limit}"),
            ThresholdCheck::OutsideRange { low, high } => write!(f, "outside [{low}, {high}]"),
        }
    }
}
