use aqualert_core::error::AqualertError;
use aqualert_core::registry::Directory;
use aqualert_core::summary::summarize_village;
use aqualert_core::thresholds::{self, builtin};
use std::path::PathBuf;

use crate::commands::load_payloads;
use crate::output;

pub fn run(
    samples_file: PathBuf,
    directory: PathBuf,
    village_id: i64,
    thresholds_file: Option<PathBuf>,
    output_format: &str,
) -> Result<(), AqualertError> {
    let table = match thresholds_file {
        Some(path) => thresholds::load_table(&path)?,
        None => builtin::default_table()?,
    };
    let directory = Directory::load(&directory)?;

    let today = chrono::Local::now().date_naive();
    let samples = load_payloads(&samples_file)?
        .into_iter()
        .map(|p| p.into_sample(today, None))
        .collect::<Result<Vec<_>, _>>()?;

    let summary = summarize_village(&directory, village_id, &samples, &table)?;

    match output_format {
        "json" => output::json::print(&summary)?,
        _ => output::table::print_summary(&summary),
    }

    Ok(())
}
