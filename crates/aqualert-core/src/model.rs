use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type VillageId = i64;
pub type WaterBodyId = i64;
pub type WorkerId = i64;

/// A named chemical, biological or field-kit measurement in the sample panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contaminant {
    Aluminium,
    Ammonia,
    Arsenic,
    Barium,
    Cadmium,
    Chloramine,
    Chromium,
    Copper,
    #[serde(alias = "flouride")]
    Fluoride,
    Bacteria,
    Viruses,
    Lead,
    Nitrates,
    Nitrites,
    Mercury,
    Perchlorate,
    Radium,
    Selenium,
    Silver,
    Uranium,
    Ph,
    Tds,
    Ecoli,
    Turbidity,
    DissolvedOxygen,
}

impl Contaminant {
    pub const ALL: [Contaminant; 25] = [
        Contaminant::Aluminium,
        Contaminant::Ammonia,
        Contaminant::Arsenic,
        Contaminant::Barium,
        Contaminant::Cadmium,
        Contaminant::Chloramine,
        Contaminant::Chromium,
        Contaminant::Copper,
        Contaminant::Fluoride,
        Contaminant::Bacteria,
        Contaminant::Viruses,
        Contaminant::Lead,
        Contaminant::Nitrates,
        Contaminant::Nitrites,
        Contaminant::Mercury,
        Contaminant::Perchlorate,
        Contaminant::Radium,
        Contaminant::Selenium,
        Contaminant::Silver,
        Contaminant::Uranium,
        Contaminant::Ph,
        Contaminant::Tds,
        Contaminant::Ecoli,
        Contaminant::Turbidity,
        Contaminant::DissolvedOxygen,
    ];

    /// Canonical lowercase key, as used in payloads and threshold tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Contaminant::Aluminium => "aluminium",
            Contaminant::Ammonia => "ammonia",
            Contaminant::Arsenic => "arsenic",
            Contaminant::Barium => "barium",
            Contaminant::Cadmium => "cadmium",
            Contaminant::Chloramine => "chloramine",
            Contaminant::Chromium => "chromium",
            Contaminant::Copper => "copper",
            Contaminant::Fluoride => "fluoride",
            Contaminant::Bacteria => "bacteria",
            Contaminant::Viruses => "viruses",
            Contaminant::Lead => "lead",
            Contaminant::Nitrates => "nitrates",
            Contaminant::Nitrites => "nitrites",
            Contaminant::Mercury => "mercury",
            Contaminant::Perchlorate => "perchlorate",
            Contaminant::Radium => "radium",
            Contaminant::Selenium => "selenium",
            Contaminant::Silver => "silver",
            Contaminant::Uranium => "uranium",
            Contaminant::Ph => "ph",
            Contaminant::Tds => "tds",
            Contaminant::Ecoli => "ecoli",
            Contaminant::Turbidity => "turbidity",
            Contaminant::DissolvedOxygen => "dissolved_oxygen",
        }
    }

    /// Feature name expected by the external scorer, or `None` for field-kit
    /// readings the scorer model was not trained on.
    pub fn scorer_feature(&self) -> Option<&'static str> {
        match self {
            Contaminant::Ph
            | Contaminant::Tds
            | Contaminant::Ecoli
            | Contaminant::Turbidity
            | Contaminant::DissolvedOxygen => None,
            // The scorer model spells it this way.
            Contaminant::Fluoride => Some("flouride"),
            other => Some(other.as_str()),
        }
    }

    /// Look up a contaminant by key, tolerating case, surrounding whitespace
    /// and the `flouride` spelling.
    pub fn from_key(key: &str) -> Option<Contaminant> {
        let key = key.trim().to_lowercase().replace(['-', ' '], "_");
        if key == "flouride" {
            return Some(Contaminant::Fluoride);
        }
        Contaminant::ALL.into_iter().find(|c| c.as_str() == key)
    }
}

impl fmt::Display for Contaminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measured concentrations keyed by contaminant. Absent keys are "not measured".
pub type Measurements = BTreeMap<Contaminant, Decimal>;

/// The measured panel for one water body at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterSample {
    pub water_body_id: WaterBodyId,
    pub sampled_at: NaiveDate,
    #[serde(default)]
    pub reported_by: Option<WorkerId>,
    pub measurements: Measurements,
}

impl WaterSample {
    pub fn new(water_body_id: WaterBodyId, sampled_at: NaiveDate) -> Self {
        Self {
            water_body_id,
            sampled_at,
            reported_by: None,
            measurements: Measurements::new(),
        }
    }

    pub fn with(mut self, contaminant: Contaminant, value: Decimal) -> Self {
        self.measurements.insert(contaminant, value);
        self
    }

    pub fn reported_by(mut self, worker_id: WorkerId) -> Self {
        self.reported_by = Some(worker_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_accepts_aliases() {
        assert_eq!(Contaminant::from_key("Arsenic"), Some(Contaminant::Arsenic));
        assert_eq!(Contaminant::from_key("flouride"), Some(Contaminant::Fluoride));
        assert_eq!(
            Contaminant::from_key("dissolved oxygen"),
            Some(Contaminant::DissolvedOxygen)
        );
        assert_eq!(Contaminant::from_key("plutonium"), None);
    }

    #[test]
    fn test_scorer_features_cover_twenty_names() {
        let features: Vec<&str> = Contaminant::ALL
            .iter()
            .filter_map(|c| c.scorer_feature())
            .collect();
        assert_eq!(features.len(), 20);
        assert!(features.contains(&"flouride"));
        assert!(!features.contains(&"ph"));
    }

    #[test]
    fn test_serde_alias_for_fluoride() {
        let c: Contaminant = serde_json::from_str("\"flouride\"").unwrap();
        assert_eq!(c, Contaminant::Fluoride);
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"fluoride\"");
    }
}
