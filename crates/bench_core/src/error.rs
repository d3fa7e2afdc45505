//! Errors raised while running or parsing a bench invocation

use std::path::PathBuf;

use thiserror::Error;

use crate::params::BenchParams;

/// Any failure of a single bench invocation.
///
/// All variants are fatal to the sweep that hit them; nothing is retried.
#[derive(Debug, Error)]
pub enum BenchError {
    /// The trailing summary block did not contain a required label.
    #[error("bench output is missing the `{label}` metric")]
    MissingMetric { label: String },

    /// The binary ran but exited unsuccessfully.
    #[error("bench with {params} failed: {message}")]
    InvocationFailed { params: BenchParams, message: String },

    /// The binary could not be started, or its output could not be read.
    #[error("failed to run {}: {source}", binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BenchError {
    pub fn missing_metric(label: &str) -> Self {
        BenchError::MissingMetric {
            label: label.to_string(),
        }
    }
}
