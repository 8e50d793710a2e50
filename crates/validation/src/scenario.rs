//! The scenario pattern.
//!
//! A scenario declares a [`Manifest`] and a validation procedure. The
//! procedure reads files through its [`ScenarioContext`], derives scalars,
//! and hands each one to [`ScenarioContext::check`]. The first failing check
//! aborts the run.
//!
//! Phases run in a fixed order: existence (manifest), then whatever the
//! scenario reads and compares. [`execute`] drives the existence phase so
//! no scenario can compare anything before every expected file is known to
//! exist.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::compare::{Operator, evaluate};
use crate::config::{EvaluationMode, ValidationConfig};
use crate::diag::{DiagnosticRecord1D, ParticleCloudRecord, read_1d_diag, read_particle_cloud};
use crate::error::Result;
use crate::manifest::Manifest;
use crate::scalars::ScalarTable;

/// A named validation procedure bound to one simulation setup.
pub trait ValidationScenario {
    fn name(&self) -> &str;

    /// Files the run must have produced.
    fn manifest(&self) -> Manifest;

    /// Read, derive, and compare. Called after the manifest was verified.
    fn validate(&self, ctx: &mut ScenarioContext) -> Result<()>;
}

/// One comparison performed (or, in report-only mode, skipped).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    pub label: String,
    pub operator: Operator,
    pub measured: f64,
    pub reference: f64,
    pub threshold: f64,
    /// `None` when comparisons are disabled
    pub error: Option<f64>,
}

/// Everything a scenario may touch while it runs.
#[derive(Debug)]
pub struct ScenarioContext {
    output_dir: PathBuf,
    threshold: f64,
    mode: EvaluationMode,
    checks: Vec<CheckRecord>,
}

impl ScenarioContext {
    pub fn new(output_dir: impl Into<PathBuf>, config: &ValidationConfig) -> Self {
        Self {
            output_dir: output_dir.into(),
            threshold: config.threshold,
            mode: config.mode,
            checks: Vec::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// The user-supplied relative threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.output_dir.join(file)
    }

    pub fn read_scalars(&self, file: &str) -> Result<ScalarTable> {
        ScalarTable::read(&self.path(file))
    }

    pub fn read_spectrum(&self, file: &str) -> Result<DiagnosticRecord1D> {
        read_1d_diag(&self.path(file))
    }

    pub fn read_cloud(&self, file: &str) -> Result<ParticleCloudRecord> {
        read_particle_cloud(&self.path(file))
    }

    /// Compare `value` and record the check; fails fast on a mismatch.
    ///
    /// In report-only mode the value is recorded without comparison.
    pub fn check(
        &mut self,
        value: f64,
        reference: f64,
        threshold: f64,
        operator: Operator,
        label: impl Into<String>,
    ) -> Result<()> {
        let label = label.into();
        let error = match self.mode {
            EvaluationMode::Evaluate => {
                let outcome = evaluate(value, reference, threshold, operator, &label)?;
                debug!(label = %label, measured = value, error = outcome.error, "check passed");
                Some(outcome.error)
            }
            EvaluationMode::ReportOnly => None,
        };
        self.checks.push(CheckRecord {
            label,
            operator,
            measured: value,
            reference,
            threshold,
            error,
        });
        Ok(())
    }

    /// Exact comparison of an integer-valued quantity.
    pub fn check_equal(
        &mut self,
        value: f64,
        expected: f64,
        label: impl Into<String>,
    ) -> Result<()> {
        self.check(value, expected, expected, Operator::Equal, label)
    }

    /// Relative comparison at the user threshold.
    pub fn check_relative(
        &mut self,
        value: f64,
        reference: f64,
        label: impl Into<String>,
    ) -> Result<()> {
        let threshold = self.threshold;
        self.check(value, reference, threshold, Operator::Relative, label)
    }

    pub fn checks(&self) -> &[CheckRecord] {
        &self.checks
    }

    pub fn into_checks(self) -> Vec<CheckRecord> {
        self.checks
    }
}

/// Run a scenario: existence phase, then its own procedure.
pub fn execute(scenario: &dyn ValidationScenario, ctx: &mut ScenarioContext) -> Result<()> {
    let manifest = scenario.manifest();
    info!(
        scenario = scenario.name(),
        files = manifest.len(),
        "checking output files"
    );
    manifest.verify(ctx.output_dir())?;
    scenario.validate(ctx)
}
