//! Run reports.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ValidationConfig;
use crate::error::{Error, Result};
use crate::scenario::CheckRecord;

pub const REPORT_SCHEMA: &str = "minipic.validation/v1";

/// Why a run failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureSummary {
    pub kind: String,
    pub message: String,
}

/// Summary of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub schema: String,
    pub scenario: String,
    pub created_at: String,
    pub config: ValidationConfig,
    pub passed: bool,
    pub checks: Vec<CheckRecord>,
    pub failure: Option<FailureSummary>,
}

impl ValidationReport {
    pub fn passed(scenario: &str, config: &ValidationConfig, checks: Vec<CheckRecord>) -> Self {
        Self::new(scenario, config, checks, None)
    }

    /// Report for a run that stopped on `error`.
    pub fn failed(scenario: &str, config: &ValidationConfig, error: &Error) -> Self {
        let failure = FailureSummary {
            kind: error.kind().to_string(),
            message: error.to_string(),
        };
        Self::new(scenario, config, Vec::new(), Some(failure))
    }

    fn new(
        scenario: &str,
        config: &ValidationConfig,
        checks: Vec<CheckRecord>,
        failure: Option<FailureSummary>,
    ) -> Self {
        Self {
            schema: REPORT_SCHEMA.to_string(),
            scenario: scenario.to_string(),
            created_at: chrono::Local::now().to_rfc3339(),
            config: config.clone(),
            passed: failure.is_none(),
            checks,
            failure,
        }
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let io_err = |source: io::Error| Error::Io {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(self).map_err(|e| io_err(io::Error::other(e)))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, json).map_err(io_err)
    }
}
