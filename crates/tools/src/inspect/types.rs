//! Summary types for decoded diagnostics.

use serde::Serialize;

/// Basic statistics for a set of values.
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub variance: f64,
    pub percentiles: Percentiles,
}

/// Percentile values.
#[derive(Debug, Clone, Serialize)]
pub struct Percentiles {
    pub p5: f64,
    pub p25: f64,
    pub p75: f64,
    pub p95: f64,
}

impl Statistics {
    /// Compute statistics from a slice of f64 values.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let min = sorted[0];
        let max = sorted[count - 1];
        let mean = minipic_validation::sum::pairwise_sum_by(count, |i| sorted[i]) / count as f64;

        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        let variance =
            minipic_validation::sum::pairwise_sum_by(count, |i| (sorted[i] - mean).powi(2))
                / count as f64;
        let std_dev = variance.sqrt();

        let percentile = |p: f64| -> f64 {
            let idx = (p / 100.0 * (count - 1) as f64) as usize;
            sorted[idx.min(count - 1)]
        };

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            std_dev,
            variance,
            percentiles: Percentiles {
                p5: percentile(5.0),
                p25: percentile(25.0),
                p75: percentile(75.0),
                p95: percentile(95.0),
            },
        })
    }
}

/// One decoded channel.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelSummary {
    pub name: String,
    /// `None` for an empty channel
    pub stats: Option<Statistics>,
}

/// What `inspect` reports about one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub kind: &'static str,
    /// Shape facts, e.g. `("bins", 64)` or `("particles", 1024)`
    pub shape: Vec<(&'static str, usize)>,
    pub channels: Vec<ChannelSummary>,
    /// Scalars the scenarios compare, by name
    pub derived: Vec<(String, f64)>,
    pub sha256: String,
}
