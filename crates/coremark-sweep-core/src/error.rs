//! Error types for the sweep core.

use crate::metrics::Field;
use crate::runner::Step;
use std::path::PathBuf;

/// The run log does not carry a complete metrics record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// A field could not be located after the fields preceding it.
    #[error("no match: `{field}` not found in run output")]
    FieldNotFound { field: Field },

    /// A field was located but its digits do not fit the record's numeric type.
    #[error("invalid value for `{field}`: {text}")]
    InvalidNumber { field: Field, text: String },
}

/// Failure of the external build/run collaborator.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("failed to spawn `{program}` for step `{step}`: {source}")]
    Spawn {
        step: Step,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("step `{step}` failed (exit code {code:?}): {stderr_tail}")]
    StepFailed {
        step: Step,
        code: Option<i32>,
        stderr_tail: String,
    },

    #[error("step `{step}` produced no output")]
    EmptyOutput { step: Step },
}

/// Sweep configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<inline>".into()))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported XLEN {0} (expected 32 or 64)")]
    InvalidXlen(u32),

    #[error("unsupported XLEN `{0}` (expected 32 or 64)")]
    UnparsableXlen(String),

    #[error("configuration #{index} has an empty name")]
    EmptyConfiguration { index: usize },
}

/// Result table rendering errors.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
