use crate::error::AqualertError;
use crate::model::{Contaminant, Measurements, WaterBodyId, WaterSample, WorkerId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// A single reading as submitted: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawReading {
    Number(f64),
    Text(String),
}

/// A submitted water-quality report, before validation.
///
/// Unknown keys are ignored. Every panel entry is optional; `null` and `""`
/// both mean "not measured".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportPayload {
    pub water_body_id: WaterBodyId,
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub aluminium: Option<RawReading>,
    #[serde(default)]
    pub ammonia: Option<RawReading>,
    #[serde(default)]
    pub arsenic: Option<RawReading>,
    #[serde(default)]
    pub barium: Option<RawReading>,
    #[serde(default)]
    pub cadmium: Option<RawReading>,
    #[serde(default)]
    pub chloramine: Option<RawReading>,
    #[serde(default)]
    pub chromium: Option<RawReading>,
    #[serde(default)]
    pub copper: Option<RawReading>,
    #[serde(default, alias = "flouride")]
    pub fluoride: Option<RawReading>,
    #[serde(default)]
    pub bacteria: Option<RawReading>,
    #[serde(default)]
    pub viruses: Option<RawReading>,
    #[serde(default)]
    pub lead: Option<RawReading>,
    #[serde(default)]
    pub nitrates: Option<RawReading>,
    #[serde(default)]
    pub nitrites: Option<RawReading>,
    #[serde(default)]
    pub mercury: Option<RawReading>,
    #[serde(default)]
    pub perchlorate: Option<RawReading>,
    #[serde(default)]
    pub radium: Option<RawReading>,
    #[serde(default)]
    pub selenium: Option<RawReading>,
    #[serde(default)]
    pub silver: Option<RawReading>,
    #[serde(default)]
    pub uranium: Option<RawReading>,

    #[serde(default)]
    pub ph: Option<RawReading>,
    #[serde(default)]
    pub tds: Option<RawReading>,
    #[serde(default)]
    pub ecoli: Option<RawReading>,
    #[serde(default)]
    pub turbidity: Option<RawReading>,
    #[serde(default)]
    pub dissolved_oxygen: Option<RawReading>,
}

impl ReportPayload {
    /// Panel entries paired with their contaminant, in panel order.
    pub fn readings(&self) -> [(Contaminant, Option<&RawReading>); 25] {
        [
            (Contaminant::Aluminium, self.aluminium.as_ref()),
            (Contaminant::Ammonia, self.ammonia.as_ref()),
            (Contaminant::Arsenic, self.arsenic.as_ref()),
            (Contaminant::Barium, self.barium.as_ref()),
            (Contaminant::Cadmium, self.cadmium.as_ref()),
            (Contaminant::Chloramine, self.chloramine.as_ref()),
            (Contaminant::Chromium, self.chromium.as_ref()),
            (Contaminant::Copper, self.copper.as_ref()),
            (Contaminant::Fluoride, self.fluoride.as_ref()),
            (Contaminant::Bacteria, self.bacteria.as_ref()),
            (Contaminant::Viruses, self.viruses.as_ref()),
            (Contaminant::Lead, self.lead.as_ref()),
            (Contaminant::Nitrates, self.nitrates.as_ref()),
            (Contaminant::Nitrites, self.nitrites.as_ref()),
            (Contaminant::Mercury, self.mercury.as_ref()),
            (Contaminant::Perchlorate, self.perchlorate.as_ref()),
            (Contaminant::Radium, self.radium.as_ref()),
            (Contaminant::Selenium, self.selenium.as_ref()),
            (Contaminant::Silver, self.silver.as_ref()),
            (Contaminant::Uranium, self.uranium.as_ref()),
            (Contaminant::Ph, self.ph.as_ref()),
            (Contaminant::Tds, self.tds.as_ref()),
            (Contaminant::Ecoli, self.ecoli.as_ref()),
            (Contaminant::Turbidity, self.turbidity.as_ref()),
            (Contaminant::DissolvedOxygen, self.dissolved_oxygen.as_ref()),
        ]
    }

    /// Validate the payload into a [`WaterSample`].
    ///
    /// `submitted_on` is used when the payload carries no date.
    pub fn into_sample(
        self,
        submitted_on: NaiveDate,
        reported_by: Option<WorkerId>,
    ) -> Result<WaterSample, AqualertError> {
        let sampled_at = match self.date.as_deref().map(str::trim) {
            None | Some("") => submitted_on,
            Some(s) => parse_date(s)?,
        };

        let mut measurements = Measurements::new();
        for (contaminant, raw) in self.readings() {
            if let Some(raw) = raw {
                if let Some(value) = parse_reading(contaminant, raw)? {
                    measurements.insert(contaminant, value);
                }
            }
        }

        Ok(WaterSample {
            water_body_id: self.water_body_id,
            sampled_at,
            reported_by,
            measurements,
        })
    }
}

/// Parse a sample date in `YYYY-MM-DD` form.
pub fn parse_date(s: &str) -> Result<NaiveDate, AqualertError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| AqualertError::InvalidDate(s.to_string()))
}

/// Smallest positive reading a `Decimal` can hold.
const SMALLEST_POSITIVE: Decimal = Decimal::from_parts(1, 0, 0, false, 28);

/// Parse one submitted reading into a non-negative decimal.
///
/// Returns `Ok(None)` for an empty string. A positive reading never becomes
/// zero: values below the decimal resolution are raised to the smallest
/// positive decimal, and JSON numbers beyond the decimal range saturate at
/// `Decimal::MAX`.
pub fn parse_reading(
    contaminant: Contaminant,
    raw: &RawReading,
) -> Result<Option<Decimal>, AqualertError> {
    let (text, positive) = match raw {
        // f64 Display never uses exponent notation, so this round-trips
        // through Decimal without binary noise (0.01 stays 0.01).
        RawReading::Number(n) => (n.to_string(), *n > 0.0),
        RawReading::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            (s.to_string(), s.bytes().any(|b| matches!(b, b'1'..=b'9')))
        }
    };

    let invalid = || AqualertError::InvalidMeasurement {
        field: contaminant.as_str().to_string(),
        value: text.clone(),
    };

    let value = match (raw, Decimal::from_str(&text)) {
        (_, Ok(value)) => value,
        (RawReading::Number(n), Err(_)) if n.is_finite() && *n > 0.0 => {
            warn!(%contaminant, value = %text, "reading exceeds decimal range, saturating");
            Decimal::MAX
        }
        _ => return Err(invalid()),
    };
    if value < Decimal::ZERO {
        return Err(invalid());
    }
    if value.is_zero() && positive {
        warn!(%contaminant, value = %text, "reading below decimal resolution, keeping it positive");
        return Ok(Some(SMALLEST_POSITIVE));
    }
    Ok(Some(value.normalize()))
}
