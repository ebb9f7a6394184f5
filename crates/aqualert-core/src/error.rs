use std::path::PathBuf;

use crate::model::{VillageId, WaterBodyId, WorkerId};

#[derive(Debug, thiserror::Error)]
pub enum AqualertError {
    #[error("failed to load threshold table from {path}: {reason}")]
    ThresholdLoad { path: PathBuf, reason: String },

    #[error("invalid threshold table: {0}")]
    ThresholdInvalid(String),

    #[error("failed to load directory from {path}: {reason}")]
    DirectoryLoad { path: PathBuf, reason: String },

    #[error("invalid configuration: {key}={value} ({reason})")]
    Config {
        key: String,
        value: String,
        reason: String,
    },

    #[error("village {0} not found")]
    VillageNotFound(VillageId),

    #[error("water body {0} not found")]
    WaterBodyNotFound(WaterBodyId),

    #[error("worker {worker_id} is not assigned to water body {water_body_id}")]
    WorkerNotAssigned {
        worker_id: WorkerId,
        water_body_id: WaterBodyId,
    },

    #[error("invalid measurement for '{field}': {value}")]
    InvalidMeasurement { field: String, value: String },

    #[error("invalid sample date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("unknown contaminant '{0}'")]
    UnknownContaminant(String),

    #[error("{failed} of {total} reports could not be assessed")]
    ReportsFailed { failed: usize, total: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
