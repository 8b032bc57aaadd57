//! Crate-wide error type.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the data source, persistence and import/export layers.
///
/// Layout, projection and view-state code never returns these: those paths
/// degrade to an empty or default state instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("project '{0}' not found")]
    ProjectNotFound(String),

    #[error("task '{0}' not found")]
    TaskNotFound(String),

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required columns (found: {found:?})")]
    MissingColumns { found: Vec<String> },

    #[error("no importable tasks found ({skipped} rows skipped)")]
    EmptyImport { skipped: usize },

    #[error("summary unavailable: {0}")]
    Summary(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
