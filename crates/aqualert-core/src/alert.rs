use crate::classify::SafetyVerdict;
use crate::config::DEFAULT_ALERT_AUDIENCE;
use crate::model::{Contaminant, VillageId, WaterBodyId, WaterSample};
use crate::scorer::ScorerAssessment;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::info;

/// Placeholder condition when the scorer gave no prediction.
pub const NO_CONDITION: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertType {
    WaterContamination,
    RoutineCheck,
    HealthOutbreak,
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertType::WaterContamination => write!(f, "Water contamination"),
            AlertType::RoutineCheck => write!(f, "Routine check"),
            AlertType::HealthOutbreak => write!(f, "Health outbreak"),
        }
    }
}

/// Which signal raised the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertTrigger {
    Thresholds,
    Scorer,
    Both,
}

/// A notification record addressed to a village. Persisting it, and assigning
/// its identifier, is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub village_id: VillageId,
    pub water_body_id: WaterBodyId,
    pub date: NaiveDate,
    pub risk_level: RiskLevel,
    pub likely_condition: String,
    pub alert_type: AlertType,
    pub audience: String,
    pub trigger: AlertTrigger,
    /// Contaminants over their limit (empty for scorer-only alerts).
    pub violated_thresholds: BTreeSet<Contaminant>,
}

/// Caller-configurable parts of alert construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPolicy {
    /// Recipients written into every alert.
    pub audience: String,
    /// Risk level when only the scorer flagged the sample.
    pub scorer_only_risk: RiskLevel,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            audience: DEFAULT_ALERT_AUDIENCE.to_string(),
            scorer_only_risk: RiskLevel::Medium,
        }
    }
}

impl AlertPolicy {
    pub fn with_audience(audience: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
            ..Default::default()
        }
    }
}

/// Decide whether a classified sample warrants an alert and build it.
///
/// The threshold verdict and the scorer are OR'd: either one reporting
/// unsafe water yields exactly one alert. Contaminated verdicts are always
/// `High` risk.
pub fn decide_alert(
    sample: &WaterSample,
    village_id: VillageId,
    verdict: &SafetyVerdict,
    scorer: Option<&ScorerAssessment>,
    policy: &AlertPolicy,
) -> Option<Alert> {
    let by_thresholds = !verdict.is_safe();
    let by_scorer = scorer.is_some_and(|a| a.is_unsafe());

    let (trigger, risk_level) = match (by_thresholds, by_scorer) {
        (false, false) => return None,
        (true, false) => (AlertTrigger::Thresholds, RiskLevel::High),
        (true, true) => (AlertTrigger::Both, RiskLevel::High),
        (false, true) => (AlertTrigger::Scorer, policy.scorer_only_risk),
    };

    let likely_condition = scorer
        .and_then(|a| a.predicted_condition.clone())
        .unwrap_or_else(|| NO_CONDITION.to_string());

    info!(
        village_id,
        water_body_id = sample.water_body_id,
        risk = %risk_level,
        ?trigger,
        "water contamination alert raised"
    );

    Some(Alert {
        village_id,
        water_body_id: sample.water_body_id,
        date: sample.sampled_at,
        risk_level,
        likely_condition,
        alert_type: AlertType::WaterContamination,
        audience: policy.audience.clone(),
        trigger,
        violated_thresholds: verdict.violated_thresholds.clone(),
    })
}
