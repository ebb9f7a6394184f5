use crate::classify::{classify, SafetyStatus};
use crate::error::AqualertError;
use crate::model::{Contaminant, VillageId, WaterBodyId, WaterSample};
use crate::registry::Directory;
use crate::thresholds::schema::ThresholdTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Current status of a water body, `Unknown` when it has never been sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterStatus {
    Safe,
    Contaminated,
    Unknown,
}

impl From<SafetyStatus> for WaterStatus {
    fn from(status: SafetyStatus) -> Self {
        match status {
            SafetyStatus::Safe => WaterStatus::Safe,
            SafetyStatus::Contaminated => WaterStatus::Contaminated,
        }
    }
}

impl fmt::Display for WaterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaterStatus::Safe => write!(f, "Safe"),
            WaterStatus::Contaminated => write!(f, "Contaminated"),
            WaterStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterBodyStatus {
    pub water_body_id: WaterBodyId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub status: WaterStatus,
    pub last_updated: Option<NaiveDate>,
    pub violated_thresholds: BTreeSet<Contaminant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillageSummary {
    pub village_id: VillageId,
    pub village_name: String,
    pub water_bodies: Vec<WaterBodyStatus>,
    pub total: usize,
    pub safe: usize,
    pub contaminated: usize,
    pub unknown: usize,
}

/// The current sample per water body: the most recent by date, and among
/// samples with the same date the one submitted last.
pub fn latest_samples(samples: &[WaterSample]) -> HashMap<WaterBodyId, &WaterSample> {
    let mut latest: HashMap<WaterBodyId, &WaterSample> = HashMap::new();
    for sample in samples {
        let newer = latest
            .get(&sample.water_body_id)
            .map_or(true, |current| sample.sampled_at >= current.sampled_at);
        if newer {
            latest.insert(sample.water_body_id, sample);
        }
    }
    latest
}

/// Summarize the current water status of every water body in a village.
pub fn summarize_village(
    directory: &Directory,
    village_id: VillageId,
    samples: &[WaterSample],
    table: &ThresholdTable,
) -> Result<VillageSummary, AqualertError> {
    let village = directory
        .village(village_id)
        .ok_or(AqualertError::VillageNotFound(village_id))?;

    let latest = latest_samples(samples);

    let mut water_bodies: Vec<WaterBodyStatus> = directory
        .water_bodies_in(village_id)
        .into_iter()
        .map(|wb| match latest.get(&wb.id) {
            Some(sample) => {
                let verdict = classify(&sample.measurements, table);
                WaterBodyStatus {
                    water_body_id: wb.id,
                    name: wb.name.clone(),
                    kind: wb.kind.clone(),
                    status: verdict.status.into(),
                    last_updated: Some(sample.sampled_at),
                    violated_thresholds: verdict.violated_thresholds,
                }
            }
            None => WaterBodyStatus {
                water_body_id: wb.id,
                name: wb.name.clone(),
                kind: wb.kind.clone(),
                status: WaterStatus::Unknown,
                last_updated: None,
                violated_thresholds: BTreeSet::new(),
            },
        })
        .collect();
    water_bodies.sort_by(|a, b| a.name.cmp(&b.name));

    let count = |status: WaterStatus| water_bodies.iter().filter(|w| w.status == status).count();
    let (safe, contaminated, unknown) = (
        count(WaterStatus::Safe),
        count(WaterStatus::Contaminated),
        count(WaterStatus::Unknown),
    );

    Ok(VillageSummary {
        village_id,
        village_name: village.name.clone(),
        total: water_bodies.len(),
        safe,
        contaminated,
        unknown,
        water_bodies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::builtin::default_table;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn directory() -> Directory {
        Directory::from_json(
            r#"{
                "villages": [{ "id": 1, "name": "Rampur" }],
                "water_bodies": [
                    { "id": 10, "village_id": 1, "name": "North well" },
                    { "id": 11, "village_id": 1, "name": "Temple pond" },
                    { "id": 12, "village_id": 1, "name": "Hand pump" },
                    { "id": 20, "village_id": 2, "name": "Elsewhere" }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_latest_sample_supersedes_older() {
        let samples = vec![
            WaterSample::new(10, day(3)).with(Contaminant::Lead, dec!(0.5)),
            WaterSample::new(10, day(1)).with(Contaminant::Lead, dec!(0.9)),
            WaterSample::new(10, day(3)).with(Contaminant::Lead, dec!(0.001)),
        ];
        let latest = latest_samples(&samples);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[&10].measurements[&Contaminant::Lead], dec!(0.001));
    }

    #[test]
    fn test_village_summary_counts() {
        let samples = vec![
            // North well: contaminated earlier, clean now.
            WaterSample::new(10, day(1)).with(Contaminant::Arsenic, dec!(0.2)),
            WaterSample::new(10, day(4)).with(Contaminant::Arsenic, dec!(0.001)),
            // Temple pond: contaminated.
            WaterSample::new(11, day(2)).with(Contaminant::Ecoli, dec!(3)),
            // Other village, ignored.
            WaterSample::new(20, day(2)).with(Contaminant::Ecoli, dec!(3)),
        ];
        let summary = summarize_village(&directory(), 1, &samples, &default_table().unwrap())
            .unwrap();
        assert_eq!(summary.village_name, "Rampur");
        assert_eq!(summary.total, 3);
        assert_eq!(summary.safe, 1);
        assert_eq!(summary.contaminated, 1);
        assert_eq!(summary.unknown, 1);

        let names: Vec<&str> = summary.water_bodies.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Hand pump", "North well", "Temple pond"]);
        assert_eq!(summary.water_bodies[0].status, WaterStatus::Unknown);
        assert_eq!(summary.water_bodies[1].last_updated, Some(day(4)));
        assert!(summary.water_bodies[2]
            .violated_thresholds
            .contains(&Contaminant::Ecoli));
    }

    #[test]
    fn test_unknown_village() {
        assert!(matches!(
            summarize_village(&directory(), 7, &[], &default_table().unwrap()),
            Err(AqualertError::VillageNotFound(7))
        ));
    }
}
