//! Sample quantile estimation
//!
//! Implements the nine quantile interpolation families of Hyndman & Fan
//! (1996), matching the numbering used across the major statistics
//! environments. Types 1-3 are discontinuous step estimators; types 4-9
//! interpolate linearly between order statistics.
//!
//! All estimators agree at p = 0 (sample minimum) and p = 1 (sample
//! maximum) and differ only in how plotting positions are assigned in
//! between.

use serde::{Deserialize, Serialize};

/// Quantile interpolation family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantileType {
    /// Inverse of the empirical CDF
    Type1,
    /// Inverse ECDF with averaging at discontinuities
    Type2,
    /// Nearest even order statistic
    Type3,
    /// Linear interpolation of the empirical CDF
    Type4,
    /// Piecewise linear, knots midway through the steps
    Type5,
    /// Plotting position p(k) = k / (n + 1)
    Type6,
    /// Plotting position p(k) = (k - 1) / (n - 1), the common default
    Type7,
    /// Approximately median-unbiased regardless of distribution
    Type8,
    /// Approximately unbiased for the expected normal order statistics
    Type9,
}

impl QuantileType {
    /// The conventional 1-9 index of this family
    pub fn index(&self) -> u8 {
        match self {
            QuantileType::Type1 => 1,
            QuantileType::Type2 => 2,
            QuantileType::Type3 => 3,
            QuantileType::Type4 => 4,
            QuantileType::Type5 => 5,
            QuantileType::Type6 => 6,
            QuantileType::Type7 => 7,
            QuantileType::Type8 => 8,
            QuantileType::Type9 => 9,
        }
    }

    /// Look up a family by its conventional index
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(QuantileType::Type1),
            2 => Some(QuantileType::Type2),
            3 => Some(QuantileType::Type3),
            4 => Some(QuantileType::Type4),
            5 => Some(QuantileType::Type5),
            6 => Some(QuantileType::Type6),
            7 => Some(QuantileType::Type7),
            8 => Some(QuantileType::Type8),
            9 => Some(QuantileType::Type9),
            _ => None,
        }
    }

    /// Whether the estimator is a discontinuous step function of p
    pub fn is_discontinuous(&self) -> bool {
        matches!(
            self,
            QuantileType::Type1 | QuantileType::Type2 | QuantileType::Type3
        )
    }
}

impl Default for QuantileType {
    fn default() -> Self {
        QuantileType::Type7
    }
}

/// Estimate the p-quantile of an ascending slice of finite values
///
/// Returns `None` if the slice is empty or `p` lies outside `[0, 1]`.
/// The caller is responsible for sorting and for removing non-finite
/// values; see [`quantile`] for the convenience wrapper.
pub fn quantile_sorted(sorted: &[f64], p: f64, qtype: QuantileType) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }

    let nf = n as f64;

    // (j, gamma) in one-based order-statistic terms: Q = (1 - gamma) x_j + gamma x_{j+1}
    let (j, gamma) = match qtype {
        QuantileType::Type1 => {
            let h = nf * p;
            let j = h.floor();
            let g = h - j;
            (j as i64, if g > 0.0 { 1.0 } else { 0.0 })
        }
        QuantileType::Type2 => {
            let h = nf * p;
            let j = h.floor();
            let g = h - j;
            (j as i64, if g > 0.0 { 1.0 } else { 0.5 })
        }
        QuantileType::Type3 => {
            let h = nf * p - 0.5;
            let j = h.floor();
            let g = h - j;
            let j = j as i64;
            let gamma = if g == 0.0 && j.rem_euclid(2) == 0 {
                0.0
            } else {
                1.0
            };
            (j, gamma)
        }
        continuous => {
            let h = match continuous {
                QuantileType::Type4 => nf * p,
                QuantileType::Type5 => nf * p + 0.5,
                QuantileType::Type6 => (nf + 1.0) * p,
                QuantileType::Type7 => (nf - 1.0) * p + 1.0,
                QuantileType::Type8 => (nf + 1.0 / 3.0) * p + 1.0 / 3.0,
                QuantileType::Type9 => (nf + 0.25) * p + 0.375,
                _ => unreachable!("discontinuous types handled above"),
            };
            let h = h.clamp(1.0, nf);
            let j = h.floor();
            (j as i64, h - j)
        }
    };

    let nmax = n as i64;
    let lo = sorted[(j.clamp(1, nmax) - 1) as usize];
    let hi = sorted[((j + 1).clamp(1, nmax) - 1) as usize];
    Some(lo + gamma * (hi - lo))
}

/// Estimate the p-quantile of arbitrary data
///
/// Non-finite values are dropped before sorting. Returns `None` if no
/// finite values remain or `p` lies outside `[0, 1]`.
pub fn quantile(data: &[f64], p: f64, qtype: QuantileType) -> Option<f64> {
    let mut values: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    quantile_sorted(&values, p, qtype)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn one_to_ten() -> Vec<f64> {
        (1..=10).map(|x| x as f64).collect()
    }

    #[rstest]
    #[case(QuantileType::Type1, 3.0)]
    #[case(QuantileType::Type2, 3.0)]
    #[case(QuantileType::Type3, 2.0)]
    #[case(QuantileType::Type4, 2.5)]
    #[case(QuantileType::Type5, 3.0)]
    #[case(QuantileType::Type6, 2.75)]
    #[case(QuantileType::Type7, 3.25)]
    #[case(QuantileType::Type8, 2.9166666666666665)]
    #[case(QuantileType::Type9, 2.9375)]
    fn lower_quartile_matches_reference(#[case] qtype: QuantileType, #[case] expected: f64) {
        let data = one_to_ten();
        let q = quantile_sorted(&data, 0.25, qtype).unwrap();
        assert!(
            (q - expected).abs() < 1e-12,
            "type {} gave {}, expected {}",
            qtype.index(),
            q,
            expected
        );
    }

    #[rstest]
    #[case(QuantileType::Type1)]
    #[case(QuantileType::Type2)]
    #[case(QuantileType::Type3)]
    #[case(QuantileType::Type4)]
    #[case(QuantileType::Type5)]
    #[case(QuantileType::Type6)]
    #[case(QuantileType::Type7)]
    #[case(QuantileType::Type8)]
    #[case(QuantileType::Type9)]
    fn extremes_are_min_and_max(#[case] qtype: QuantileType) {
        let data = one_to_ten();
        assert_eq!(quantile_sorted(&data, 0.0, qtype), Some(1.0));
        assert_eq!(quantile_sorted(&data, 1.0, qtype), Some(10.0));
    }

    #[test]
    fn test_median_type7() {
        let data = one_to_ten();
        let q = quantile_sorted(&data, 0.5, QuantileType::Type7).unwrap();
        assert!((q - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_median_small_sample() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&data, 0.5, QuantileType::Type1), Some(2.0));
        assert_eq!(quantile_sorted(&data, 0.5, QuantileType::Type2), Some(2.5));
        assert_eq!(quantile_sorted(&data, 0.5, QuantileType::Type7), Some(2.5));
    }

    #[test]
    fn test_single_value() {
        for idx in 1..=9 {
            let qtype = QuantileType::from_index(idx).unwrap();
            assert_eq!(quantile_sorted(&[42.0], 0.3, qtype), Some(42.0));
        }
    }

    #[test]
    fn test_empty_and_out_of_range() {
        assert_eq!(quantile_sorted(&[], 0.5, QuantileType::Type7), None);
        assert_eq!(quantile_sorted(&[1.0], -0.1, QuantileType::Type7), None);
        assert_eq!(quantile_sorted(&[1.0], 1.1, QuantileType::Type7), None);
    }

    #[test]
    fn test_quantile_filters_non_finite() {
        let data = vec![3.0, f64::NAN, 1.0, 2.0, f64::INFINITY];
        let q = quantile(&data, 0.5, QuantileType::Type7).unwrap();
        assert!((q - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_index_round_trip() {
        for idx in 1..=9u8 {
            let qtype = QuantileType::from_index(idx).unwrap();
            assert_eq!(qtype.index(), idx);
        }
        assert!(QuantileType::from_index(0).is_none());
        assert!(QuantileType::from_index(10).is_none());
    }

    #[test]
    fn test_discontinuous_classification() {
        assert!(QuantileType::Type1.is_discontinuous());
        assert!(QuantileType::Type3.is_discontinuous());
        assert!(!QuantileType::Type7.is_discontinuous());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn quantile_stays_within_sample_range(
                mut data in proptest::collection::vec(-1e6_f64..1e6, 1..200),
                p in 0.0_f64..=1.0,
                idx in 1u8..=9,
            ) {
                data.sort_by(|a, b| a.partial_cmp(b).unwrap());
                let qtype = QuantileType::from_index(idx).unwrap();
                let q = quantile_sorted(&data, p, qtype).unwrap();
                prop_assert!(q >= data[0] - 1e-9);
                prop_assert!(q <= data[data.len() - 1] + 1e-9);
            }

            #[test]
            fn quantile_is_monotone_in_p(
                mut data in proptest::collection::vec(-1e6_f64..1e6, 2..100),
                p1 in 0.0_f64..=1.0,
                p2 in 0.0_f64..=1.0,
                idx in 1u8..=9,
            ) {
                data.sort_by(|a, b| a.partial_cmp(b).unwrap());
                let (lo, hi) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };
                let qtype = QuantileType::from_index(idx).unwrap();
                let qlo = quantile_sorted(&data, lo, qtype).unwrap();
                let qhi = quantile_sorted(&data, hi, qtype).unwrap();
                prop_assert!(qlo <= qhi + 1e-9);
            }
        }
    }
}
