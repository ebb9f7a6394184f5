use aqualert_core::error::AqualertError;
use aqualert_core::model::Contaminant;
use aqualert_core::thresholds::schema::ThresholdTable;
use aqualert_core::thresholds::{self, builtin};
use std::path::Path;

pub fn list() -> Result<(), AqualertError> {
    println!("Available threshold tables:\n");
    for name in builtin::PRESETS {
        let table = builtin::load_preset(name)?;
        let default_marker = if *name == builtin::DEFAULT_PRESET {
            " [default]"
        } else {
            ""
        };
        println!(
            "  {:<8} {} (v{}){}",
            name, table.name, table.version, default_marker
        );
        if let Some(ref desc) = table.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str, contaminant: Option<&str>) -> Result<(), AqualertError> {
    let table = builtin::load_preset(preset)?;

    if let Some(key) = contaminant {
        return explain_one(&table, key);
    }

    println!("{} (version {})\n", table.name, table.version);
    if let Some(ref desc) = table.description {
        println!("{}\n", desc);
    }

    println!("A sample is Contaminated if any measured contaminant violates its rule.");
    println!("Unmeasured contaminants never count as a violation. Contaminants");
    println!("without a rule are shown for information only.\n");

    println!("Rules:\n");
    let max_name_len = table
        .rules
        .iter()
        .map(|r| r.contaminant.as_str().len())
        .max()
        .unwrap_or(12);

    println!(
        "  {:<width$}  {:<24}  Unit",
        "Contaminant",
        "Unsafe when",
        width = max_name_len + 2
    );
    println!("  {}", "-".repeat(max_name_len + 2 + 24 + 14));
    for rule in &table.rules {
        println!(
            "  {:<width$}  {:<24}  {}",
            rule.contaminant.as_str(),
            rule.check.to_string(),
            rule.unit.as_deref().unwrap_or("-"),
            width = max_name_len + 2
        );
    }

    let informational: Vec<&str> = Contaminant::ALL
        .iter()
        .filter(|c| table.rule_for(**c).is_none())
        .map(|c| c.as_str())
        .collect();
    if !informational.is_empty() {
        println!("\nInformational only: {}", informational.join(", "));
    }
    println!();

    Ok(())
}

fn explain_one(table: &ThresholdTable, key: &str) -> Result<(), AqualertError> {
    let contaminant =
        Contaminant::from_key(key).ok_or_else(|| AqualertError::UnknownContaminant(key.into()))?;
    match table.rule_for(contaminant) {
        Some(rule) => {
            let unit = rule.unit.as_deref().map(|u| format!(" {u}")).unwrap_or_default();
            println!("{contaminant}: unsafe when {}{unit}", rule.check);
            if let Some(ref advice) = rule.advice {
                println!("  {advice}");
            }
        }
        None => println!("{contaminant}: no rule in {}, informational only", table.name),
    }
    Ok(())
}

pub fn schema() -> Result<(), AqualertError> {
    print!(
        r#"Threshold Table Format
======================

A threshold table lists, per contaminant, the condition under which a
measured value makes the water unsafe.

Top-level fields:
  name          (string, required)  Human-readable name of the table
  description   (string, optional)  What this table is for
  version       (string, required)  Version identifier (e.g., "2024.1")
  rules         (array, required)   Contaminant rules (see below), at most
                                    one per contaminant

Each rule in the "rules" array:
  contaminant   (string, required)  One of the panel keys, e.g. "arsenic",
                                    "ph", "dissolved_oxygen"
  check         (object, required)  Exactly one of:
                                      {{ "greater_than": "<limit>" }}
                                      {{ "less_than": "<limit>" }}
                                      {{ "outside_range": {{ "low": "<x>", "high": "<y>" }} }}
                                    Limits are quoted decimals and must not be
                                    negative; low must be below high.
  unit          (string, optional)  Unit for display
  advice        (string, optional)  Recommendation shown when violated

Example:
{{
  "name": "Site limits",
  "version": "1.0",
  "rules": [
    {{ "contaminant": "ph", "check": {{ "outside_range": {{ "low": "6.5", "high": "8.5" }} }}, "unit": "pH" }},
    {{ "contaminant": "arsenic", "check": {{ "greater_than": "0.01" }}, "unit": "mg/L",
      "advice": "Arsenic above limit - use filtered supply" }}
  ]
}}
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), AqualertError> {
    let table = thresholds::load_table(file)?;

    println!("Threshold table '{}' (v{}) is valid.", table.name, table.version);
    println!("  Rules: {} contaminants", table.rules.len());

    let missing_units: Vec<&str> = table
        .rules
        .iter()
        .filter(|r| r.unit.is_none())
        .map(|r| r.contaminant.as_str())
        .collect();
    if !missing_units.is_empty() {
        println!("\nWarnings:");
        println!("  - no unit for: {}", missing_units.join(", "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explain_single_contaminant() {
        assert!(explain("village", Some("arsenic")).is_ok());
        assert!(explain("village", Some("flouride")).is_ok());
        assert!(explain("village", Some("turbidity")).is_ok());
    }

    #[test]
    fn test_explain_unknown_contaminant() {
        assert!(matches!(
            explain("village", Some("plutonium")),
            Err(AqualertError::UnknownContaminant(ref key)) if key == "plutonium"
        ));
    }
}
