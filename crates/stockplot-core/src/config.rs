//! Pipeline configuration
//!
//! One explicit struct threaded through every call. Defaults live here, at
//! the boundary, not in module-level state.

use serde::{Deserialize, Serialize};

use crate::align::ReferenceSet;
use stockplot_stats::{ProbabilitySet, QuantileType};

/// How missing (NaN) draws are treated when collapsing the ensemble axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingPolicy {
    /// Drop missing draws from each order statistic
    Exclude,
    /// Any missing draw makes the whole statistic missing
    Propagate,
}

impl Default for MissingPolicy {
    fn default() -> Self {
        MissingPolicy::Exclude
    }
}

/// Configuration for one tabulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabulateConfig {
    /// Probabilities to tabulate; validated odd-length set
    pub probabilities: ProbabilitySet,

    /// Quantile interpolation family
    pub interpolation: QuantileType,

    /// Missing-value policy along the ensemble axis
    pub missing: MissingPolicy,

    /// Scalar thresholds to broadcast as a reference layer
    pub reference_points: Option<ReferenceSet>,

    /// Number of individual ensemble members to export as worm traces
    /// (0 disables the overlay)
    pub worm_iters: usize,
}

impl Default for TabulateConfig {
    fn default() -> Self {
        Self {
            probabilities: ProbabilitySet::default(),
            interpolation: QuantileType::default(),
            missing: MissingPolicy::default(),
            reference_points: None,
            worm_iters: 0,
        }
    }
}

impl TabulateConfig {
    /// Create a configuration with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the probability set
    pub fn with_probabilities(mut self, probabilities: ProbabilitySet) -> Self {
        self.probabilities = probabilities;
        self
    }

    /// Set the interpolation family
    pub fn with_interpolation(mut self, interpolation: QuantileType) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Set the missing-value policy
    pub fn with_missing_policy(mut self, missing: MissingPolicy) -> Self {
        self.missing = missing;
        self
    }

    /// Attach reference points to broadcast over matching quantities
    pub fn with_reference_points(mut self, reference_points: ReferenceSet) -> Self {
        self.reference_points = Some(reference_points);
        self
    }

    /// Export the first `n` ensemble members as worm traces
    pub fn with_worm_iters(mut self, n: usize) -> Self {
        self.worm_iters = n;
        self
    }
}
