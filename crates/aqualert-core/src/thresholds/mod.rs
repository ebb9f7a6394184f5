pub mod builtin;
pub mod schema;

use crate::error::AqualertError;
use crate::model::Contaminant;
use rust_decimal::Decimal;
use schema::{ThresholdCheck, ThresholdTable};
use std::collections::HashSet;
use std::path::Path;

/// Load a threshold table from a JSON file.
pub fn load_table(path: &Path) -> Result<ThresholdTable, AqualertError> {
    let content = std::fs::read_to_string(path).map_err(|e| AqualertError::ThresholdLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_table(&content, path)
}

/// Parse a threshold table from a JSON string.
pub fn parse_table(json: &str, source: &Path) -> Result<ThresholdTable, AqualertError> {
    let table: ThresholdTable =
        serde_json::from_str(json).map_err(|e| AqualertError::ThresholdLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_table(&table)?;
    Ok(table)
}

/// Parse a threshold table from a JSON string (no file path context).
pub fn parse_table_str(json: &str) -> Result<ThresholdTable, AqualertError> {
    let table: ThresholdTable = serde_json::from_str(json)?;
    validate_table(&table)?;
    Ok(table)
}

/// Validate that a threshold table is well-formed.
pub fn validate_table(table: &ThresholdTable) -> Result<(), AqualertError> {
    if table.rules.is_empty() {
        return Err(AqualertError::ThresholdInvalid("rules must not be empty".into()));
    }

    let mut seen: HashSet<Contaminant> = HashSet::new();
    for rule in &table.rules {
        if !seen.insert(rule.contaminant) {
            return Err(AqualertError::ThresholdInvalid(format!(
                "contaminant '{}' has more than one rule",
                rule.contaminant
            )));
        }

        let negative = |limit: Decimal| limit < Decimal::ZERO;
        match rule.check {
            ThresholdCheck::GreaterThan(limit) | ThresholdCheck::LessThan(limit) => {
                if negative(limit) {
                    return Err(AqualertError::ThresholdInvalid(format!(
                        "contaminant '{}' has negative limit {}",
                        rule.contaminant, limit
                    )));
                }
            }
            ThresholdCheck::OutsideRange { low, high } => {
                if negative(low) || negative(high) {
                    return Err(AqualertError::ThresholdInvalid(format!(
                        "contaminant '{}' has a negative range bound",
                        rule.contaminant
                    )));
                }
                if low >= high {
                    return Err(AqualertError::ThresholdInvalid(format!(
                        "contaminant '{}' has empty range [{}, {}]",
                        rule.contaminant, low, high
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_valid_table() {
        let json = r#"{
            "name": "Test",
            "version": "1.0",
            "rules": [
                { "contaminant": "lead", "check": { "greater_than": "0.015" } }
            ]
        }"#;
        let table = parse_table_str(json).unwrap();
        assert_eq!(table.name, "Test");
        assert_eq!(table.rules.len(), 1);
        assert!(table.rule_for(Contaminant::Lead).is_some());
        assert!(table.rule_for(Contaminant::Arsenic).is_none());
    }

    #[test]
    fn test_empty_rules_rejected() {
        let json = r#"{ "name": "Bad", "version": "1.0", "rules": [] }"#;
        assert!(parse_table_str(json).is_err());
    }

    #[test]
    fn test_duplicate_contaminant_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "rules": [
                { "contaminant": "lead", "check": { "greater_than": "0.015" } },
                { "contaminant": "lead", "check": { "greater_than": "0.01" } }
            ]
        }"#;
        assert!(matches!(
            parse_table_str(json),
            Err(AqualertError::ThresholdInvalid(_))
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "rules": [
                { "contaminant": "ph", "check": { "outside_range": { "low": "8.5", "high": "6.5" } } }
            ]
        }"#;
        assert!(parse_table_str(json).is_err());
    }

    #[test]
    fn test_negative_limit_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "rules": [
                { "contaminant": "tds", "check": { "greater_than": "-1" } }
            ]
        }"#;
        assert!(parse_table_str(json).is_err());
    }

    #[test]
    fn test_unknown_contaminant_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "rules": [
                { "contaminant": "kryptonite", "check": { "greater_than": "1" } }
            ]
        }"#;
        assert!(parse_table_str(json).is_err());
    }

    #[test]
    fn test_load_table_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "name": "Site", "version": "2", "rules": [
                {{ "contaminant": "nitrates", "check": {{ "greater_than": "45" }} }}
            ] }}"#
        )
        .unwrap();
        let table = load_table(file.path()).unwrap();
        assert_eq!(table.version, "2");
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = load_table(Path::new("/nonexistent/thresholds.json")).unwrap_err();
        assert!(matches!(err, AqualertError::ThresholdLoad { .. }));
        assert!(err.to_string().contains("/nonexistent/thresholds.json"));
    }
}
