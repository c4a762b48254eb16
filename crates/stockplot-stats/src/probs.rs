//! Validated probability sets for ribbon tabulation
//!
//! A ribbon plot needs an odd number of distinct probabilities so the
//! middle one can serve as the primary plotted line, with the remaining
//! probabilities paired symmetrically into shaded bands. `ProbabilitySet`
//! enforces that shape once, at the configuration boundary, so the rest of
//! the pipeline never re-checks it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating a probability vector
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbabilityError {
    /// A probability outside the unit interval
    #[error("probability {value} is outside [0, 1]")]
    OutOfRange { value: f64 },

    /// No probabilities left after deduplication
    #[error("probability set is empty")]
    Empty,

    /// An even number of distinct probabilities has no central element
    #[error("probability set has {len} distinct values; an odd count is required so the central quantile is unambiguous")]
    NoCentral { len: usize },
}

/// An ordered, deduplicated, odd-length set of probabilities
///
/// Construction sorts and deduplicates the input, then rejects anything
/// without an unambiguous middle element. The middle probability is the one
/// drawn as the primary line; the rest pair up into ribbons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct ProbabilitySet {
    probs: Vec<f64>,
}

impl ProbabilitySet {
    /// Validate a probability vector
    pub fn new(probs: Vec<f64>) -> Result<Self, ProbabilityError> {
        for &p in &probs {
            if !(0.0..=1.0).contains(&p) || !p.is_finite() {
                return Err(ProbabilityError::OutOfRange { value: p });
            }
        }
        let mut probs = probs;
        probs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        probs.dedup();
        if probs.is_empty() {
            return Err(ProbabilityError::Empty);
        }
        if probs.len() % 2 == 0 {
            return Err(ProbabilityError::NoCentral { len: probs.len() });
        }
        Ok(Self { probs })
    }

    /// The probabilities, ascending
    pub fn as_slice(&self) -> &[f64] {
        &self.probs
    }

    /// Number of distinct probabilities (always odd)
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// A probability set is never empty; kept for API symmetry
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Index of the central probability
    pub fn central_index(&self) -> usize {
        self.probs.len() / 2
    }

    /// The central probability, drawn as the primary line
    pub fn central(&self) -> f64 {
        self.probs[self.central_index()]
    }

    /// (low, high) probability pairs for shaded ribbons, outermost first
    ///
    /// The central probability is never part of a pair.
    pub fn ribbon_pairs(&self) -> Vec<(f64, f64)> {
        let n = self.probs.len();
        (0..n / 2)
            .map(|i| (self.probs[i], self.probs[n - 1 - i]))
            .collect()
    }

    /// Display labels for each probability, e.g. `"10%"`
    pub fn labels(&self) -> Vec<String> {
        self.probs.iter().map(|&p| percent_label(p)).collect()
    }
}

impl Default for ProbabilitySet {
    /// The conventional five-probability ribbon: 10/25/50/75/90
    fn default() -> Self {
        Self::new(vec![0.10, 0.25, 0.50, 0.75, 0.90]).expect("default probabilities are valid")
    }
}

impl TryFrom<Vec<f64>> for ProbabilitySet {
    type Error = ProbabilityError;

    fn try_from(probs: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(probs)
    }
}

impl From<ProbabilitySet> for Vec<f64> {
    fn from(set: ProbabilitySet) -> Self {
        set.probs
    }
}

/// Format a probability as a percentage column label
///
/// Whole percentages drop the fraction: `0.1 → "10%"`, `0.025 → "2.5%"`.
pub fn percent_label(p: f64) -> String {
    let pct = p * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{:.0}%", pct.round())
    } else {
        format!("{}%", pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_set() {
        let set = ProbabilitySet::default();
        assert_eq!(set.len(), 5);
        assert_eq!(set.central(), 0.50);
        assert_eq!(set.central_index(), 2);
    }

    #[test]
    fn test_sorts_and_dedups() {
        let set = ProbabilitySet::new(vec![0.9, 0.5, 0.1, 0.5, 0.9]).unwrap();
        assert_eq!(set.as_slice(), &[0.1, 0.5, 0.9]);
    }

    #[test]
    fn test_even_length_rejected() {
        let err = ProbabilitySet::new(vec![0.25, 0.75]).unwrap_err();
        assert_eq!(err, ProbabilityError::NoCentral { len: 2 });
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(
            ProbabilitySet::new(vec![]).unwrap_err(),
            ProbabilityError::Empty
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            ProbabilitySet::new(vec![0.5, 1.5]),
            Err(ProbabilityError::OutOfRange { .. })
        ));
        assert!(matches!(
            ProbabilitySet::new(vec![f64::NAN]),
            Err(ProbabilityError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_ribbon_pairs_outermost_first() {
        let set = ProbabilitySet::default();
        assert_eq!(set.ribbon_pairs(), vec![(0.10, 0.90), (0.25, 0.75)]);
    }

    #[test]
    fn test_single_probability_has_no_ribbons() {
        let set = ProbabilitySet::new(vec![0.5]).unwrap();
        assert!(set.ribbon_pairs().is_empty());
        assert_eq!(set.central(), 0.5);
    }

    #[test]
    fn test_percent_labels() {
        assert_eq!(percent_label(0.1), "10%");
        assert_eq!(percent_label(0.5), "50%");
        assert_eq!(percent_label(0.025), "2.5%");
        assert_eq!(percent_label(1.0), "100%");
    }

    #[test]
    fn test_serde_round_trip_revalidates() {
        let set = ProbabilitySet::default();
        let json = serde_json::to_string(&set).unwrap();
        let back: ProbabilitySet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);

        let bad: Result<ProbabilitySet, _> = serde_json::from_str("[0.25, 0.75]");
        assert!(bad.is_err());
    }

    proptest! {
        #[test]
        fn odd_sorted_distinct_sets_construct(
            seed in proptest::collection::btree_set(0u32..=1000, 1..20)
        ) {
            let probs: Vec<f64> = seed.iter().map(|&x| x as f64 / 1000.0).collect();
            let result = ProbabilitySet::new(probs.clone());
            if probs.len() % 2 == 1 {
                let set = result.unwrap();
                prop_assert_eq!(set.len(), probs.len());
                prop_assert_eq!(set.central(), probs[probs.len() / 2]);
            } else {
                prop_assert_eq!(
                    result.unwrap_err(),
                    ProbabilityError::NoCentral { len: probs.len() }
                );
            }
        }
    }
}
