use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use minipic_validation::{
    DEFAULT_THRESHOLD, EvaluationMode, ValidationConfig, ValidationReport, dispatch,
};
use tracing::info;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Registered scenario name (see `minipic list`)
    pub setup: String,

    /// Directory containing the simulation's `diags` output (default: current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Relative tolerance for scalar comparisons
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Write a JSON run report to this file
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Derive and log every scalar without comparing
    #[arg(long)]
    pub no_evaluate: bool,
}

impl ValidateArgs {
    pub fn config(&self) -> ValidationConfig {
        let mode = if self.no_evaluate {
            EvaluationMode::ReportOnly
        } else {
            EvaluationMode::Evaluate
        };
        ValidationConfig::default()
            .with_threshold(self.threshold)
            .with_mode(mode)
    }
}

pub fn run(args: ValidateArgs) -> Result<(), String> {
    let config = args.config();
    let result = dispatch::run(&args.setup, args.path.as_deref(), &config);

    if let Some(path) = &args.report {
        let report = match &result {
            Ok(report) => report.clone(),
            Err(e) => ValidationReport::failed(&args.setup, &config, e),
        };
        report.write_json(path).map_err(|e| e.to_string())?;
        info!(report = %path.display(), "report written");
    }

    result.map_err(|e| e.to_string())?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Benchmark `{}` tested with success", args.setup)
        .and_then(|_| stdout.flush())
        .map_err(|e| format!("Failed to write to stdout: {}", e))
}
