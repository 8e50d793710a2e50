//! Run configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Relative threshold used when none is given.
pub const DEFAULT_THRESHOLD: f64 = 1e-10;

/// Directory, relative to the working directory, holding simulation output.
pub const DEFAULT_OUTPUT_DIR: &str = "diags";

/// Whether derived scalars are compared or only reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    #[default]
    Evaluate,
    /// Read and derive every scalar, skip all comparisons.
    ReportOnly,
}

/// Parameters for one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub threshold: f64,
    pub output_dir: String,
    pub mode: EvaluationMode,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            mode: EvaluationMode::Evaluate,
        }
    }
}

impl ValidationConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<String>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn evaluates(&self) -> bool {
        self.mode == EvaluationMode::Evaluate
    }

    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(Error::precondition(format!(
                "threshold must be a finite non-negative number, got {}",
                self.threshold
            )));
        }
        if self.output_dir.trim().is_empty() {
            return Err(Error::precondition("output directory name is empty"));
        }
        Ok(())
    }
}
