//! Validation errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::compare::Operator;
use crate::diag::DecodeError;

/// Validation result type
pub type Result<T> = std::result::Result<T, Error>;

/// Validation errors.
///
/// Every variant aborts the current run; nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{message}")]
    Precondition { message: String },

    #[error("{label}: {}", threshold_detail(.operator, .value, .reference, .threshold, .error))]
    ThresholdExceeded {
        label: String,
        operator: Operator,
        value: f64,
        reference: f64,
        threshold: f64,
        error: f64,
    },

    #[error("{label}: {value} not equal to {expected} with value {error}")]
    ExactMismatch {
        label: String,
        value: f64,
        expected: f64,
        error: f64,
    },

    #[error("File {} not generated", .path.display())]
    MissingFile { path: PathBuf },

    #[error("Directory {} should be present where you run this script", .path.display())]
    MissingOutputDir { path: PathBuf },

    #[error("corrupt diagnostic {}: {source}", .path.display())]
    CorruptData {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("malformed scalar file {} (line {line}): {message}", .path.display())]
    MalformedScalars {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("unrecognized scenario `{name}` (registered: {})", .known.join(", "))]
    UnknownScenario { name: String, known: Vec<String> },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Stable reason code, used in JSON reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Precondition { .. } => "precondition",
            Self::ThresholdExceeded { .. } => "threshold_exceeded",
            Self::ExactMismatch { .. } => "exact_mismatch",
            Self::MissingFile { .. } | Self::MissingOutputDir { .. } => "missing_resource",
            Self::CorruptData { .. } => "corrupt_data",
            Self::MalformedScalars { .. } => "malformed_scalars",
            Self::UnknownScenario { .. } => "unknown_scenario",
            Self::Io { .. } => "io",
        }
    }

    /// True for comparison failures, as opposed to setup or input problems.
    pub fn is_comparison_failure(&self) -> bool {
        matches!(
            self,
            Self::ThresholdExceeded { .. } | Self::ExactMismatch { .. }
        )
    }
}

fn threshold_detail(
    operator: &Operator,
    value: &f64,
    reference: &f64,
    threshold: &f64,
    error: &f64,
) -> String {
    match operator {
        Operator::LessThan => format!("{value} > {threshold} with error {error}"),
        Operator::Relative => format!(
            "{value} vs {reference}, with error {error} for relative threshold {threshold}"
        ),
        _ => format!(
            "{value} vs {reference} with error {error} for {operator} threshold {threshold}"
        ),
    }
}
