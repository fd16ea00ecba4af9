//! Error type for I/O-bound operations
//!
//! Per-row lookup failures are not errors at this level; they are reported
//! through [`LookupOutcome`](rfoasis_core::LookupOutcome).

use std::path::PathBuf;

use rfoasis_core::StreamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RfError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed reference data in {} (record {record}): {reason}", path.display())]
    ReferenceData {
        path: PathBuf,
        /// 1-based line or feature number
        record: usize,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Loss stream error: {0}")]
    Stream(#[from] StreamError),
}

impl RfError {
    pub(crate) fn reference(path: impl Into<PathBuf>, record: usize, reason: impl Into<String>) -> Self {
        RfError::ReferenceData {
            path: path.into(),
            record,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RfError>;
