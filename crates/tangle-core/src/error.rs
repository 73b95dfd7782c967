//! Error type for analysis runs

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failures that abort a run. Per-file problems and unresolved conflicts are not errors.
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("project root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("cannot read project root {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("analysis timed out after {limit:?} during {phase}")]
    Timeout { limit: Duration, phase: String },

    #[error("invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ResolverError>;
