//! Expected output files of a scenario.

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// File name of a per-iteration output, e.g. `cloud_s00_050.bin`.
pub fn iteration_file(prefix: &str, iteration: u32, extension: &str) -> String {
    format!("{prefix}_{iteration:03}.{extension}")
}

/// Ordered list of files a run must have produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    files: Vec<String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, name: impl Into<String>) -> Self {
        self.files.push(name.into());
        self
    }

    /// Add `{prefix}_{it:03}.{extension}` for every prefix and iteration,
    /// prefix-major.
    pub fn series(mut self, prefixes: &[&str], iterations: &[u32], extension: &str) -> Self {
        for prefix in prefixes {
            for &iteration in iterations {
                self.files.push(iteration_file(prefix, iteration, extension));
            }
        }
        self
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Fail on the first file missing from `output_dir`, in manifest order.
    pub fn verify(&self, output_dir: &Path) -> Result<()> {
        for name in &self.files {
            let path = output_dir.join(name);
            if !path.is_file() {
                return Err(Error::MissingFile { path });
            }
        }
        debug!(files = self.files.len(), "all manifest files present");
        Ok(())
    }
}
