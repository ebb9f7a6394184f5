use aqualert_core::registry::Directory;
use aqualert_core::scorer::ScorerOutcome;
use aqualert_core::summary::VillageSummary;
use aqualert_core::Assessment;

pub fn print_assessments(assessments: &[Assessment], directory: &Directory) {
    for (i, a) in assessments.iter().enumerate() {
        if i > 0 {
            println!();
        }

        let water_body = directory
            .water_body(a.sample.water_body_id)
            .map(|wb| wb.name.clone())
            .unwrap_or_else(|| format!("#{}", a.sample.water_body_id));
        let village = directory
            .village(a.village_id)
            .map(|v| v.name.clone())
            .unwrap_or_else(|| format!("#{}", a.village_id));

        println!("=== {} ({}) on {} ===\n", water_body, village, a.sample.sampled_at);
        println!("  Verdict: {}", a.verdict.status);

        if !a.verdict.violations.is_empty() {
            println!("\n  Violations:");
            for v in &a.verdict.violations {
                println!("    {}", v.reason);
            }
        }

        match &a.scorer {
            ScorerOutcome::Skipped => {}
            ScorerOutcome::Assessed(s) => {
                let condition = s.predicted_condition.as_deref().unwrap_or("none");
                println!("\n  Scorer: {} (predicted condition: {})", s.status, condition);
            }
            ScorerOutcome::Failed { error } => {
                println!("\n  Scorer: unavailable ({error}); threshold verdict only");
            }
        }

        match &a.alert {
            Some(alert) => {
                println!(
                    "\n  ALERT: {} risk, {} -> {} (likely condition: {})",
                    alert.risk_level, alert.alert_type, alert.audience, alert.likely_condition
                );
            }
            None => println!("\n  No alert."),
        }

        let recommendations = a.verdict.recommendations();
        println!("\n  Recommendations:");
        for r in &recommendations {
            println!("    - {r}");
        }
    }
}

pub fn print_summary(summary: &VillageSummary) {
    println!("=== {} ===\n", summary.village_name);
    println!(
        "  {} water bodies: {} safe, {} contaminated, {} unknown\n",
        summary.total, summary.safe, summary.contaminated, summary.unknown
    );

    let max_name = summary
        .water_bodies
        .iter()
        .map(|w| w.name.len())
        .max()
        .unwrap_or(10);

    for w in &summary.water_bodies {
        let updated = w
            .last_updated
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never sampled".into());
        let violated: Vec<&str> = w.violated_thresholds.iter().map(|c| c.as_str()).collect();
        let detail = if violated.is_empty() {
            String::new()
        } else {
            format!("  ({})", violated.join(", "))
        };
        println!(
            "  {:<width$}  {:<12}  {}{}",
            w.name,
            w.status.to_string(),
            updated,
            detail,
            width = max_name
        );
    }
    println!();
}
