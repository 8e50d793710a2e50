//! Tolerance-based comparison of a measured value against a reference.
//!
//! [`evaluate`] is the atomic correctness primitive of every scenario. It is
//! pure: the same inputs always produce the same outcome, and a comparison
//! that does not hold is returned as an [`Error`] instead of a partial result.
//!
//! | Operator | Error magnitude | Fails when |
//! |---|---|---|
//! | [`Operator::LessThan`] | `\|value - threshold\|` | `value > threshold` |
//! | [`Operator::Equal`] | `\|value - threshold\|` | magnitude `!= 0` |
//! | [`Operator::Relative`] | `\|value - reference\| / \|reference\|` | magnitude `> threshold` |
//! | [`Operator::Absolute`] | `\|value - reference\|` | magnitude `> threshold` |
//!
//! `LessThan` and `Equal` ignore `reference` and compare against `threshold`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Comparison semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    LessThan,
    Equal,
    Relative,
    Absolute,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::LessThan,
        Operator::Equal,
        Operator::Relative,
        Operator::Absolute,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::LessThan => "less_than",
            Operator::Equal => "equal",
            Operator::Relative => "relative",
            Operator::Absolute => "absolute",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    /// Accepts both the symbolic (`<`, `==`) and the named spellings.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "<" | "less_than" => Ok(Operator::LessThan),
            "==" | "equal" => Ok(Operator::Equal),
            "relative" => Ok(Operator::Relative),
            "absolute" => Ok(Operator::Absolute),
            other => Err(Error::precondition(format!(
                "Operator not recognized {other}"
            ))),
        }
    }
}

/// A single comparison request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub operator: Operator,
    pub reference: f64,
    pub threshold: f64,
    pub label: String,
}

impl Comparison {
    pub fn new(
        operator: Operator,
        reference: f64,
        threshold: f64,
        label: impl Into<String>,
    ) -> Self {
        Self {
            operator,
            reference,
            threshold,
            label: label.into(),
        }
    }

    /// Evaluate `value` against this comparison.
    pub fn evaluate(&self, value: f64) -> Result<Outcome> {
        evaluate(value, self.reference, self.threshold, self.operator, &self.label)
    }
}

/// Result of a comparison that held.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Outcome {
    pub measured: f64,
    pub error: f64,
    pub passed: bool,
}

/// Compare `value` under `operator`, failing on the first violated bound.
pub fn evaluate(
    value: f64,
    reference: f64,
    threshold: f64,
    operator: Operator,
    label: &str,
) -> Result<Outcome> {
    let error = match operator {
        Operator::LessThan => {
            let error = (value - threshold).abs();
            if exceeds(value, threshold) {
                return Err(threshold_exceeded(label, operator, value, reference, threshold, error));
            }
            error
        }
        Operator::Equal => {
            let error = (value - threshold).abs();
            if error != 0.0 {
                return Err(Error::ExactMismatch {
                    label: label.to_string(),
                    value,
                    expected: threshold,
                    error,
                });
            }
            error
        }
        Operator::Relative => {
            if reference == 0.0 {
                return Err(Error::precondition(format!(
                    "{label}: can not evaluate a relative error with reference == 0 \
                     (value {value}, threshold {threshold})"
                )));
            }
            let error = ((value - reference) / reference).abs();
            if exceeds(error, threshold) {
                return Err(threshold_exceeded(label, operator, value, reference, threshold, error));
            }
            error
        }
        Operator::Absolute => {
            let error = (value - reference).abs();
            if exceeds(error, threshold) {
                return Err(threshold_exceeded(label, operator, value, reference, threshold, error));
            }
            error
        }
    };

    Ok(Outcome {
        measured: value,
        error,
        passed: true,
    })
}

/// Like [`evaluate`], but takes the operator by name.
pub fn evaluate_named(
    value: f64,
    reference: f64,
    threshold: f64,
    operator: &str,
    label: &str,
) -> Result<Outcome> {
    let operator = operator.parse::<Operator>()?;
    evaluate(value, reference, threshold, operator, label)
}

// NaN never satisfies a bound.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
fn exceeds(measured: f64, bound: f64) -> bool {
    !(measured <= bound)
}

fn threshold_exceeded(
    label: &str,
    operator: Operator,
    value: f64,
    reference: f64,
    threshold: f64,
    error: f64,
) -> Error {
    Error::ThresholdExceeded {
        label: label.to_string(),
        operator,
        value,
        reference,
        threshold,
        error,
    }
}
