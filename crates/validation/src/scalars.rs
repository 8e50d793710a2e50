//! Text scalar summaries (`species_XX.txt`, `fields.txt`).
//!
//! One row per output iteration, space-delimited: an integer iteration index
//! followed by floating-point columns. The first non-blank line is a column
//! header when its first token is not an integer. Blank lines are skipped;
//! any other line that does not parse is an error.

use std::path::{Path, PathBuf};

use crate::diag::read_file;
use crate::error::{Error, Result};

/// One parsed row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarRow {
    /// 1-based line number in the source file
    pub line: usize,
    pub iteration: u64,
    pub values: Vec<f64>,
}

/// A parsed scalar summary file.
#[derive(Debug, Clone)]
pub struct ScalarTable {
    pub path: PathBuf,
    pub header: Option<Vec<String>>,
    pub rows: Vec<ScalarRow>,
}

impl ScalarTable {
    /// Read and parse a summary file.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = read_file(path)?;
        let text = String::from_utf8(bytes).map_err(|_| Error::MalformedScalars {
            path: path.to_path_buf(),
            line: 0,
            message: "file is not valid UTF-8".to_string(),
        })?;
        Self::parse(&text, path)
    }

    /// Parse summary text; `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let malformed = |line: usize, message: String| Error::MalformedScalars {
            path: path.to_path_buf(),
            line,
            message,
        };

        let mut header = None;
        let mut rows = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let mut tokens = raw.split_whitespace();
            let Some(first) = tokens.next() else {
                continue;
            };

            let Ok(iteration) = first.parse::<u64>() else {
                if header.is_none() && rows.is_empty() {
                    header = Some(raw.split_whitespace().map(str::to_string).collect());
                    continue;
                }
                return Err(malformed(
                    line,
                    format!("iteration `{first}` is not an integer"),
                ));
            };

            let values = tokens
                .map(|token| {
                    token
                        .parse::<f64>()
                        .map_err(|_| malformed(line, format!("`{token}` is not a number")))
                })
                .collect::<Result<Vec<_>>>()?;

            rows.push(ScalarRow {
                line,
                iteration,
                values,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            header,
            rows,
        })
    }

    pub fn first_row(&self) -> Result<&ScalarRow> {
        self.rows.first().ok_or_else(|| self.empty())
    }

    pub fn last_row(&self) -> Result<&ScalarRow> {
        self.rows.last().ok_or_else(|| self.empty())
    }

    /// Value column `column` (0-based, after the iteration) of `row`.
    pub fn value(&self, row: &ScalarRow, column: usize) -> Result<f64> {
        row.values
            .get(column)
            .copied()
            .ok_or_else(|| Error::MalformedScalars {
                path: self.path.clone(),
                line: row.line,
                message: format!(
                    "expected at least {} value columns, found {}",
                    column + 1,
                    row.values.len()
                ),
            })
    }

    fn empty(&self) -> Error {
        Error::MalformedScalars {
            path: self.path.clone(),
            line: 0,
            message: "no data rows".to_string(),
        }
    }
}
