//! Regression validation for miniPIC simulation output.
//!
//! A validation run takes a named scenario, finds the `diags` directory a
//! simulation wrote, checks every expected file exists, decodes the text
//! and binary diagnostics, reduces them to scalars, and compares those
//! scalars against golden values. The first failed check stops the run.
//!
//! - [`compare`]: threshold evaluation
//! - [`diag`], [`scalars`]: decoding diagnostic files
//! - [`scenario`], [`scenarios`], [`registry`]: the scenario pattern and the
//!   link-time table of known scenarios
//! - [`dispatch`]: name lookup, directory resolution, and the run itself

pub mod compare;
pub mod config;
pub mod diag;
pub mod dispatch;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod report;
pub mod scalars;
pub mod scenario;
pub mod scenarios;
pub mod sum;

// Re-exported so downstream crates can register scenarios without a direct
// linkme dependency.
pub use linkme;

pub use compare::{Operator, Outcome, evaluate};
pub use config::{DEFAULT_THRESHOLD, EvaluationMode, ValidationConfig};
pub use dispatch::{exit_code, run};
pub use error::{Error, Result};
pub use report::ValidationReport;
pub use scenario::{CheckRecord, ScenarioContext, ValidationScenario};
