use aqualert_core::config::EngineConfig;
use aqualert_core::error::AqualertError;
use aqualert_core::model::WorkerId;
use aqualert_core::payload::{parse_date, ReportPayload};
use aqualert_core::registry::Directory;
use aqualert_core::{Assessment, Engine};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::commands::load_payloads;
use crate::output;

pub struct AssessArgs {
    pub input_file: PathBuf,
    pub directory: PathBuf,
    pub thresholds: Option<PathBuf>,
    pub worker: Option<i64>,
    pub scorer_url: Option<String>,
    pub no_scorer: bool,
    pub timeout_ms: Option<u64>,
    pub audience: Option<String>,
    pub date: Option<String>,
    pub output: String,
}

pub fn run(args: AssessArgs) -> Result<(), AqualertError> {
    // Flags override the environment.
    let mut config = EngineConfig::from_env()?;
    if let Some(path) = args.thresholds {
        config.thresholds_path = Some(path);
    }
    if let Some(url) = args.scorer_url {
        config.scorer.base_url = url;
    }
    if let Some(ms) = args.timeout_ms {
        config.scorer = config.scorer.with_timeout_ms(ms)?;
    }
    if args.no_scorer {
        config.scorer.enabled = false;
    }
    if let Some(audience) = args.audience {
        config.alert_audience = audience;
    }

    let submitted_on = match args.date.as_deref() {
        Some(d) => parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };

    let engine = Engine::from_config(&config)?;
    let directory = Directory::load(&args.directory)?;
    let payloads = load_payloads(&args.input_file)?;
    info!(reports = payloads.len(), "assessing reports");

    let total = payloads.len();
    let mut assessments = Vec::with_capacity(total);
    let mut failures = Vec::new();
    for (index, result) in assess_reports(&engine, &directory, payloads, submitted_on, args.worker)
        .into_iter()
        .enumerate()
    {
        match result {
            Ok(assessment) => assessments.push(assessment),
            Err(e) => failures.push((index, e)),
        }
    }

    match args.output.as_str() {
        "json" => output::json::print(&assessments)?,
        _ => output::table::print_assessments(&assessments, &directory),
    }

    for (index, e) in &failures {
        eprintln!("Report #{}: {e}", index + 1);
    }
    if !failures.is_empty() {
        return Err(AqualertError::ReportsFailed {
            failed: failures.len(),
            total,
        });
    }

    Ok(())
}

/// Assess each report independently. A rejected report does not stop the
/// ones after it; results come back in input order.
pub fn assess_reports(
    engine: &Engine,
    directory: &Directory,
    payloads: Vec<ReportPayload>,
    submitted_on: NaiveDate,
    worker: Option<WorkerId>,
) -> Vec<Result<Assessment, AqualertError>> {
    payloads
        .into_iter()
        .enumerate()
        .map(|(index, payload)| {
            let water_body_id = payload.water_body_id;
            let result = match worker {
                Some(worker_id) => directory.check_assignment(worker_id, water_body_id),
                None => Ok(()),
            }
            .and_then(|()| engine.assess_payload(payload, submitted_on, worker, directory));
            if let Err(ref e) = result {
                warn!(report = index + 1, water_body_id, error = %e, "report rejected");
            }
            result
        })
        .collect()
}
