use crate::classify::outcome::{SafetyStatus, SafetyVerdict, Violation};
use crate::model::{Contaminant, Measurements};
use crate::thresholds::schema::{ThresholdRule, ThresholdTable};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::debug;

/// Classify a measurement panel against a threshold table.
///
/// Total over any input: contaminants without a rule are informational, and
/// a rule whose contaminant was not measured never counts as a violation.
pub fn classify(measurements: &Measurements, table: &ThresholdTable) -> SafetyVerdict {
    let mut violations = Vec::new();
    let mut unmeasured_rules = Vec::new();

    for rule in &table.rules {
        match measurements.get(&rule.contaminant) {
            Some(&value) => {
                if let Some(violation) = evaluate(rule, value) {
                    violations.push(violation);
                }
            }
            None => unmeasured_rules.push(rule.contaminant),
        }
    }

    let informational: Vec<Contaminant> = measurements
        .keys()
        .copied()
        .filter(|c| table.rule_for(*c).is_none())
        .collect();

    let violated_thresholds: BTreeSet<Contaminant> =
        violations.iter().map(|v| v.contaminant).collect();

    let status = if violated_thresholds.is_empty() {
        SafetyStatus::Safe
    } else {
        SafetyStatus::Contaminated
    };

    SafetyVerdict {
        status,
        violated_thresholds,
        violations,
        unmeasured_rules,
        informational,
    }
}

/// Evaluate one rule against a measured value.
fn evaluate(rule: &ThresholdRule, value: Decimal) -> Option<Violation> {
    if !rule.check.is_violated_by(value) {
        debug!(contaminant = %rule.contaminant, %value, check = %rule.check, "within limit");
        return None;
    }

    let reason = match rule.unit.as_deref() {
        Some(unit) => format!(
            "{}: {} {} {} -> unsafe",
            rule.contaminant, value, unit, rule.check
        ),
        None => format!("{}: {} {} -> unsafe", rule.contaminant, value, rule.check),
    };
    debug!(contaminant = %rule.contaminant, %value, check = %rule.check, "threshold violated");

    Some(Violation {
        contaminant: rule.contaminant,
        value,
        check: rule.check,
        limit: rule.check.crossed_limit(value),
        unit: rule.unit.clone(),
        reason,
        advice: rule.advice.clone(),
    })
}
