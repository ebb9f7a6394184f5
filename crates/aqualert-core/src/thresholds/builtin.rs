use crate::error::AqualertError;
use crate::thresholds::schema::ThresholdTable;
use crate::thresholds::validate_table;

const VILLAGE_DRINKING_WATER_JSON: &str =
    include_str!("../../thresholds/village-drinking-water.json");

/// Available predefined threshold tables.
pub const PRESETS: &[&str] = &["village"];

/// The table used when no other is configured.
pub const DEFAULT_PRESET: &str = "village";

/// Load a predefined threshold table by name.
pub fn load_preset(name: &str) -> Result<ThresholdTable, AqualertError> {
    match name {
        "village" => {
            let table: ThresholdTable = serde_json::from_str(VILLAGE_DRINKING_WATER_JSON)?;
            validate_table(&table)?;
            Ok(table)
        }
        _ => Err(AqualertError::ThresholdInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

/// Load the default threshold table.
pub fn default_table() -> Result<ThresholdTable, AqualertError> {
    load_preset(DEFAULT_PRESET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Contaminant;
    use crate::thresholds::schema::ThresholdCheck;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_table_limits() {
        let table = default_table().unwrap();
        let expected = [
            (
                Contaminant::Ph,
                ThresholdCheck::OutsideRange {
                    low: dec!(6.5),
                    high: dec!(8.5),
                },
            ),
            (Contaminant::Nitrates, ThresholdCheck::GreaterThan(dec!(50))),
            (Contaminant::Fluoride, ThresholdCheck::GreaterThan(dec!(1.5))),
            (Contaminant::Arsenic, ThresholdCheck::GreaterThan(dec!(0.01))),
            (Contaminant::Ecoli, ThresholdCheck::GreaterThan(dec!(0))),
            (Contaminant::Tds, ThresholdCheck::GreaterThan(dec!(500))),
            (Contaminant::Lead, ThresholdCheck::GreaterThan(dec!(0.015))),
            (Contaminant::Mercury, ThresholdCheck::GreaterThan(dec!(0.002))),
            (Contaminant::Cadmium, ThresholdCheck::GreaterThan(dec!(0.005))),
            (Contaminant::Bacteria, ThresholdCheck::GreaterThan(dec!(100))),
            (Contaminant::Viruses, ThresholdCheck::GreaterThan(dec!(0))),
        ];
        assert_eq!(table.rules.len(), expected.len());
        for (contaminant, check) in expected {
            let rule = table.rule_for(contaminant).unwrap();
            assert_eq!(rule.check, check, "{contaminant}");
        }
    }

    #[test]
    fn test_unknown_preset() {
        assert!(load_preset("xyz").is_err());
    }
}
