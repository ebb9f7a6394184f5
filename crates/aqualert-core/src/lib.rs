pub mod alert;
pub mod classify;
pub mod config;
pub mod error;
pub mod model;
pub mod payload;
pub mod registry;
pub mod scorer;
pub mod summary;
pub mod thresholds;

use alert::{decide_alert, Alert, AlertPolicy};
use chrono::NaiveDate;
use classify::SafetyVerdict;
use config::{EngineConfig, ENV_SCORER_URL};
use error::AqualertError;
use model::{VillageId, WaterSample, WorkerId};
use payload::ReportPayload;
use registry::VillageLookup;
use scorer::{HttpScorer, Scorer, ScorerError, ScorerOutcome};
use serde::{Deserialize, Serialize};
use thresholds::schema::ThresholdTable;
use tracing::{info, warn};

/// Everything the engine concluded about one submitted sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub sample: WaterSample,
    pub village_id: VillageId,
    pub verdict: SafetyVerdict,
    pub scorer: ScorerOutcome,
    /// The alert to persist, if any.
    pub alert: Option<Alert>,
}

impl Assessment {
    /// The non-fatal scorer failure, if the scorer was consulted and failed.
    pub fn scorer_failure(&self) -> Option<&ScorerError> {
        self.scorer.failure()
    }
}

/// Water-quality classification and alerting engine.
///
/// Holds the read-only threshold table, the alert policy and an optional
/// scorer. Each call is independent; nothing is retained between calls.
pub struct Engine {
    table: ThresholdTable,
    policy: AlertPolicy,
    scorer: Option<Box<dyn Scorer>>,
}

impl Engine {
    /// Build an engine. Refuses an invalid threshold table.
    pub fn new(
        table: ThresholdTable,
        policy: AlertPolicy,
        scorer: Option<Box<dyn Scorer>>,
    ) -> Result<Self, AqualertError> {
        thresholds::validate_table(&table)?;
        info!(
            table = %table.name,
            version = %table.version,
            rules = table.rules.len(),
            scorer = scorer.as_ref().map(|s| s.backend_name()).unwrap_or("none"),
            "engine initialized"
        );
        Ok(Self {
            table,
            policy,
            scorer,
        })
    }

    /// Build an engine from configuration: the configured or built-in table,
    /// the configured audience, and the HTTP scorer when enabled.
    pub fn from_config(config: &EngineConfig) -> Result<Self, AqualertError> {
        let table = match &config.thresholds_path {
            Some(path) => thresholds::load_table(path)?,
            None => thresholds::builtin::default_table()?,
        };

        let scorer: Option<Box<dyn Scorer>> = if config.scorer.enabled {
            let http = HttpScorer::from_config(&config.scorer).map_err(|e| {
                AqualertError::Config {
                    key: ENV_SCORER_URL.to_string(),
                    value: config.scorer.base_url.clone(),
                    reason: e.to_string(),
                }
            })?;
            Some(Box::new(http))
        } else {
            None
        };

        Self::new(
            table,
            AlertPolicy::with_audience(config.alert_audience.clone()),
            scorer,
        )
    }

    /// Classify a sample against the threshold table only.
    pub fn classify(&self, sample: &WaterSample) -> SafetyVerdict {
        classify::classify(&sample.measurements, &self.table)
    }

    /// Validate a submitted payload and assess it.
    pub fn assess_payload(
        &self,
        payload: ReportPayload,
        submitted_on: NaiveDate,
        reported_by: Option<WorkerId>,
        lookup: &dyn VillageLookup,
    ) -> Result<Assessment, AqualertError> {
        let sample = payload.into_sample(submitted_on, reported_by)?;
        self.assess(sample, lookup)
    }

    /// Classify a sample, consult the scorer, and decide on an alert.
    ///
    /// Fails only when the water body is unknown. A scorer failure is logged
    /// and reported in [`Assessment::scorer`]; the threshold verdict stands.
    pub fn assess(
        &self,
        sample: WaterSample,
        lookup: &dyn VillageLookup,
    ) -> Result<Assessment, AqualertError> {
        let village_id = lookup
            .village_of(sample.water_body_id)
            .ok_or(AqualertError::WaterBodyNotFound(sample.water_body_id))?;

        let verdict = self.classify(&sample);

        let scorer = match &self.scorer {
            None => ScorerOutcome::Skipped,
            Some(scorer) => match scorer.score(&sample.measurements) {
                Ok(assessment) => ScorerOutcome::Assessed(assessment),
                Err(error) => {
                    warn!(
                        backend = scorer.backend_name(),
                        water_body_id = sample.water_body_id,
                        %error,
                        "scorer unavailable, using threshold verdict only"
                    );
                    ScorerOutcome::Failed { error }
                }
            },
        };

        let alert = decide_alert(
            &sample,
            village_id,
            &verdict,
            scorer.assessment(),
            &self.policy,
        );

        Ok(Assessment {
            sample,
            village_id,
            verdict,
            scorer,
            alert,
        })
    }
}
