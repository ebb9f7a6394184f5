pub mod assess;
pub mod status;
pub mod thresholds;

use aqualert_core::error::AqualertError;
use aqualert_core::payload::ReportPayload;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<ReportPayload>),
    One(Box<ReportPayload>),
}

/// Read a JSON file holding one report payload or an array of them.
pub fn load_payloads(path: &Path) -> Result<Vec<ReportPayload>, AqualertError> {
    let bytes = std::fs::read(path)?;
    let payloads = match serde_json::from_slice::<OneOrMany>(&bytes)? {
        OneOrMany::Many(payloads) => payloads,
        OneOrMany::One(payload) => vec![*payload],
    };
    Ok(payloads)
}
