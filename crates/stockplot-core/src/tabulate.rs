//! Quantile tabulation over the ensemble axis
//!
//! Collapses the `Iter` axis of a [`LabeledArray`] to the configured order
//! statistics, producing one long-format row per (coordinate tuple,
//! probability). An array without repeated draws skips tabulation entirely:
//! its raw values are emitted once per coordinate under the central-value
//! sentinel, so downstream stages need no special case.
//!
//! Probability-set validation happens at configuration time
//! ([`stockplot_stats::ProbabilitySet`]); tabulation itself cannot fail.
//! Lanes with no usable draws yield NaN statistics rather than errors.

use ndarray::s;
use serde::{Deserialize, Serialize};

use crate::array::{Axis, LabeledArray};
use crate::config::{MissingPolicy, TabulateConfig};
use crate::pivot;
use crate::table::{AxisRole, ColumnDescriptor, CoordValue, ValueColumn, WideTable, CENTRAL_LABEL};
use stockplot_stats::{percent_label, quantile_sorted};

/// One long-format output row: a coordinate tuple, a probability label,
/// and the corresponding order statistic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileRow {
    /// Coordinate values in canonical axis order (quant, year, unit,
    /// season, area)
    pub coords: Vec<CoordValue>,
    /// The probability, or `None` for the central-value sentinel
    pub prob: Option<f64>,
    /// Display label: `"50%"`, or `"value"` for the sentinel
    pub label: String,
    /// The statistic; NaN when no usable draws were available
    pub value: f64,
}

/// The canonical coordinate columns of a tabulated array
pub fn coord_schema() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("quant", AxisRole::Quantity),
        ColumnDescriptor::new("year", AxisRole::Time),
        ColumnDescriptor::new("unit", AxisRole::Group),
        ColumnDescriptor::new("season", AxisRole::SubPeriod),
        ColumnDescriptor::new("area", AxisRole::Space),
    ]
}

/// Value columns for a tabulation run
///
/// One column per probability when the ensemble axis is real, a single
/// sentinel column otherwise.
pub fn value_columns(cfg: &TabulateConfig, has_ensemble: bool) -> Vec<ValueColumn> {
    if has_ensemble {
        cfg.probabilities
            .as_slice()
            .iter()
            .map(|&p| ValueColumn::quantile(p))
            .collect()
    } else {
        vec![ValueColumn::central()]
    }
}

fn coord_value(axis: Axis, label: &str) -> CoordValue {
    // Years order numerically on the x axis when their labels parse
    if axis == Axis::Year {
        if let Ok(year) = label.parse::<i64>() {
            return CoordValue::Int(year);
        }
    }
    CoordValue::Text(label.to_string())
}

/// Tabulate an array into long-format quantile rows
pub fn tabulate_long(array: &LabeledArray, cfg: &TabulateConfig) -> Vec<QuantileRow> {
    let has_ensemble = array.iter_len() > 1;
    let probs = cfg.probabilities.as_slice();
    let n_per_coord = if has_ensemble { probs.len() } else { 1 };

    let data = array.data();
    let front = data.index_axis(ndarray::Axis(Axis::Iter.index()), 0);
    let mut rows = Vec::with_capacity(front.len() * n_per_coord);

    for ((q, y, u, se, a), _) in front.indexed_iter() {
        let coords = vec![
            coord_value(Axis::Quant, &array.labels(Axis::Quant)[q]),
            coord_value(Axis::Year, &array.labels(Axis::Year)[y]),
            coord_value(Axis::Unit, &array.labels(Axis::Unit)[u]),
            coord_value(Axis::Season, &array.labels(Axis::Season)[se]),
            coord_value(Axis::Area, &array.labels(Axis::Area)[a]),
        ];

        if !has_ensemble {
            rows.push(QuantileRow {
                coords,
                prob: None,
                label: CENTRAL_LABEL.to_string(),
                value: data[[q, y, u, se, a, 0]],
            });
            continue;
        }

        let lane = data.slice(s![q, y, u, se, a, ..]);
        let mut draws: Vec<f64> = lane.iter().copied().collect();
        let poisoned = cfg.missing == MissingPolicy::Propagate
            && draws.iter().any(|x| !x.is_finite());
        draws.retain(|x| x.is_finite());
        draws.sort_by(|a, b| a.partial_cmp(b).unwrap());

        for &p in probs {
            let value = if poisoned {
                f64::NAN
            } else {
                quantile_sorted(&draws, p, cfg.interpolation).unwrap_or(f64::NAN)
            };
            rows.push(QuantileRow {
                coords: coords.clone(),
                prob: Some(p),
                label: percent_label(p),
                value,
            });
        }
    }

    rows
}

/// Tabulate an array straight into a wide table
pub fn tabulate(array: &LabeledArray, cfg: &TabulateConfig) -> WideTable {
    let rows = tabulate_long(array, cfg);
    let values = value_columns(cfg, array.iter_len() > 1);
    pivot::pivot(&rows, coord_schema(), values)
}

/// One worm-trace row: a single ensemble member at a single coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WormRow {
    /// Coordinate values in canonical axis order
    pub coords: Vec<CoordValue>,
    /// Label of the ensemble member
    pub iter: String,
    /// Raw value of that member
    pub value: f64,
}

/// Long-format table of individual ensemble members, for overlaying a few
/// raw trajectories on top of the ribbons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WormTable {
    /// Coordinate columns, matching [`coord_schema`]
    pub coords: Vec<ColumnDescriptor>,
    pub rows: Vec<WormRow>,
}

/// Export the first `n` ensemble members as worm traces
///
/// Members beyond the ensemble length are silently unavailable; asking for
/// more worms than draws yields one trace per draw.
pub fn sample_iters(array: &LabeledArray, n: usize) -> WormTable {
    let n = n.min(array.iter_len());
    let data = array.data();
    let front = data.index_axis(ndarray::Axis(Axis::Iter.index()), 0);
    let mut rows = Vec::with_capacity(front.len() * n);

    for ((q, y, u, se, a), _) in front.indexed_iter() {
        let coords = vec![
            coord_value(Axis::Quant, &array.labels(Axis::Quant)[q]),
            coord_value(Axis::Year, &array.labels(Axis::Year)[y]),
            coord_value(Axis::Unit, &array.labels(Axis::Unit)[u]),
            coord_value(Axis::Season, &array.labels(Axis::Season)[se]),
            coord_value(Axis::Area, &array.labels(Axis::Area)[a]),
        ];
        for i in 0..n {
            rows.push(WormRow {
                coords: coords.clone(),
                iter: array.labels(Axis::Iter)[i].clone(),
                value: data[[q, y, u, se, a, i]],
            });
        }
    }

    WormTable {
        coords: coord_schema(),
        rows,
    }
}
