//! Numeric description of one set of ensemble draws
//!
//! Used by the tabulation pipeline to annotate data ranges, and exposed for
//! callers that want a quick look at an ensemble without tabulating it.

use serde::{Deserialize, Serialize};

use crate::quantile::{quantile_sorted, QuantileType};

/// Summary statistics over a slice of draws
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleSummary {
    /// Number of finite draws
    pub count: usize,
    /// Number of missing (non-finite) draws
    pub missing: usize,
    /// Minimum finite draw
    pub min: f64,
    /// Maximum finite draw
    pub max: f64,
    /// Mean of the finite draws
    pub mean: f64,
    /// Standard deviation of the finite draws
    pub std_dev: f64,
    /// Median of the finite draws
    pub median: f64,
}

impl EnsembleSummary {
    /// Compute a summary from raw draws
    ///
    /// Non-finite values count as missing. An all-missing slice yields NaN
    /// statistics with `count == 0`.
    pub fn from_values(values: &[f64]) -> Self {
        let mut finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
        let missing = values.len() - finite.len();
        if finite.is_empty() {
            return Self::empty(missing);
        }

        finite.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let count = finite.len();
        let mean = finite.iter().sum::<f64>() / count as f64;
        let variance = finite.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;
        let median = quantile_sorted(&finite, 0.5, QuantileType::Type7)
            .expect("non-empty sorted slice has a median");

        Self {
            count,
            missing,
            min: finite[0],
            max: finite[count - 1],
            mean,
            std_dev: variance.sqrt(),
            median,
        }
    }

    fn empty(missing: usize) -> Self {
        Self {
            count: 0,
            missing,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            std_dev: f64::NAN,
            median: f64::NAN,
        }
    }

    /// Range of the finite draws (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Whether any finite draw was seen
    pub fn has_data(&self) -> bool {
        self.count > 0
    }
}
