//! Validation dispatch.
//!
//! Resolves a scenario by name, locates the output directory under an
//! explicit working directory, runs the scenario, and turns the outcome
//! into a report. The process working directory is never changed.

use std::path::Path;

use tracing::{error, info};

use crate::config::ValidationConfig;
use crate::error::{Error, Result};
use crate::registry;
use crate::report::ValidationReport;
use crate::scenario::{ScenarioContext, execute};

/// Run scenario `name` against the output found under `working_dir`
/// (the current directory when `None`).
///
/// Lookup happens before any filesystem access, so an unknown name fails
/// without touching `working_dir`.
pub fn run(
    name: &str,
    working_dir: Option<&Path>,
    config: &ValidationConfig,
) -> Result<ValidationReport> {
    let descriptor = registry::get(name).ok_or_else(|| Error::UnknownScenario {
        name: name.to_string(),
        known: registry::all_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })?;
    config.validate()?;

    let output_dir = working_dir
        .unwrap_or_else(|| Path::new("."))
        .join(&config.output_dir);
    if !output_dir.is_dir() {
        return Err(Error::MissingOutputDir { path: output_dir });
    }

    info!(
        scenario = descriptor.name,
        output_dir = %output_dir.display(),
        threshold = config.threshold,
        mode = ?config.mode,
        "validation starting"
    );

    let scenario = (descriptor.build)();
    let mut ctx = ScenarioContext::new(output_dir, config);
    if let Err(e) = execute(scenario.as_ref(), &mut ctx) {
        error!(scenario = descriptor.name, kind = e.kind(), "validation failed");
        return Err(e);
    }

    let checks = ctx.into_checks();
    info!(
        scenario = descriptor.name,
        checks = checks.len(),
        "validation passed"
    );
    Ok(ValidationReport::passed(descriptor.name, config, checks))
}

/// Process exit code for a run outcome: 0 on success, 1 on any error.
pub fn exit_code<T, E>(result: &std::result::Result<T, E>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
