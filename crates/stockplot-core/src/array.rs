//! Labeled ensemble arrays
//!
//! The input side of the pipeline: a six-axis numeric array in the
//! conventional stock-assessment layout (quantity, year, unit, season,
//! area, iteration), with string labels per axis. Missing observations are
//! NaN, which keeps them distinct from zero throughout the pipeline.

use ndarray::Array6;
use std::fmt;

use crate::error::ArrayError;
use stockplot_stats::EnsembleSummary;

/// The six canonical axes, in storage order
///
/// `Iter` is the ensemble axis: repeated stochastic draws collapsed by the
/// tabulator. The other five become coordinate columns of the output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Quantity name (catch, ssb, rec, ...)
    Quant,
    /// Year
    Year,
    /// Biological group, typically sex
    Unit,
    /// Sub-period within a year
    Season,
    /// Spatial area
    Area,
    /// Ensemble draw
    Iter,
}

impl Axis {
    /// All axes in storage order
    pub const ALL: [Axis; 6] = [
        Axis::Quant,
        Axis::Year,
        Axis::Unit,
        Axis::Season,
        Axis::Area,
        Axis::Iter,
    ];

    /// Position of this axis in the storage order
    pub fn index(&self) -> usize {
        match self {
            Axis::Quant => 0,
            Axis::Year => 1,
            Axis::Unit => 2,
            Axis::Season => 3,
            Axis::Area => 4,
            Axis::Iter => 5,
        }
    }

    /// Conventional short name of the axis
    pub fn name(&self) -> &'static str {
        match self {
            Axis::Quant => "quant",
            Axis::Year => "year",
            Axis::Unit => "unit",
            Axis::Season => "season",
            Axis::Area => "area",
            Axis::Iter => "iter",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// String labels for each axis of a [`LabeledArray`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLabels {
    pub quant: Vec<String>,
    pub year: Vec<String>,
    pub unit: Vec<String>,
    pub season: Vec<String>,
    pub area: Vec<String>,
    pub iter: Vec<String>,
}

impl AxisLabels {
    /// Labels for the given axis
    pub fn get(&self, axis: Axis) -> &[String] {
        match axis {
            Axis::Quant => &self.quant,
            Axis::Year => &self.year,
            Axis::Unit => &self.unit,
            Axis::Season => &self.season,
            Axis::Area => &self.area,
            Axis::Iter => &self.iter,
        }
    }

    /// Labels for a single quantity over a year range, with singleton
    /// unit/season/area axes and `n_iter` numbered draws
    pub fn annual(quant: impl Into<String>, years: std::ops::RangeInclusive<i32>, n_iter: usize) -> Self {
        Self {
            quant: vec![quant.into()],
            year: years.map(|y| y.to_string()).collect(),
            unit: vec!["all".to_string()],
            season: vec!["all".to_string()],
            area: vec!["all".to_string()],
            iter: (1..=n_iter).map(|i| i.to_string()).collect(),
        }
    }

    /// Replace the season labels, e.g. to model quarterly sub-periods
    pub fn with_seasons(mut self, seasons: &[&str]) -> Self {
        self.season = seasons.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Replace the unit labels, e.g. `["F", "M"]` for sexed data
    pub fn with_units(mut self, units: &[&str]) -> Self {
        self.unit = units.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// A six-axis numeric array with named, labeled axes
///
/// Axis lengths are fixed at construction and validated against the label
/// vectors. Values are `f64` with NaN marking missing observations.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledArray {
    labels: AxisLabels,
    data: Array6<f64>,
    /// Units of measurement of the stored values ("t", "1000s", ...)
    measurement_units: Option<String>,
}

impl LabeledArray {
    /// Construct an array, validating labels against the data shape
    pub fn new(labels: AxisLabels, data: Array6<f64>) -> Result<Self, ArrayError> {
        let shape = data.shape().to_vec();
        for axis in Axis::ALL {
            let len = shape[axis.index()];
            if len == 0 {
                return Err(ArrayError::EmptyAxis { axis });
            }
            let n_labels = labels.get(axis).len();
            if n_labels != len {
                return Err(ArrayError::LabelMismatch {
                    axis,
                    labels: n_labels,
                    len,
                });
            }
        }
        Ok(Self {
            labels,
            data,
            measurement_units: None,
        })
    }

    /// Construct an array filled with a constant value
    pub fn filled(labels: AxisLabels, value: f64) -> Result<Self, ArrayError> {
        let dim = (
            labels.quant.len(),
            labels.year.len(),
            labels.unit.len(),
            labels.season.len(),
            labels.area.len(),
            labels.iter.len(),
        );
        Self::new(labels, Array6::from_elem(dim, value))
    }

    /// Set the measurement units of the stored values
    pub fn with_measurement_units(mut self, units: impl Into<String>) -> Self {
        self.measurement_units = Some(units.into());
        self
    }

    /// Units of measurement, if known
    pub fn measurement_units(&self) -> Option<&str> {
        self.measurement_units.as_deref()
    }

    /// Labels along one axis
    pub fn labels(&self, axis: Axis) -> &[String] {
        self.labels.get(axis)
    }

    /// Extent of one axis
    pub fn axis_len(&self, axis: Axis) -> usize {
        self.data.shape()[axis.index()]
    }

    /// Length of the ensemble axis
    pub fn iter_len(&self) -> usize {
        self.axis_len(Axis::Iter)
    }

    /// The raw values
    pub fn data(&self) -> &Array6<f64> {
        &self.data
    }

    /// Mutable access to the raw values
    pub fn data_mut(&mut self) -> &mut Array6<f64> {
        &mut self.data
    }

    /// Summary statistics over every value in the array
    pub fn summary(&self) -> EnsembleSummary {
        let values: Vec<f64> = self.data.iter().copied().collect();
        EnsembleSummary::from_values(&values)
    }
}

/// An ordered mapping from series name to array
///
/// Names should be unique but duplicates are tolerated here and repaired
/// during alignment, never rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedCollection {
    entries: Vec<(String, LabeledArray)>,
}

impl NamedCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named array, keeping insertion order
    pub fn push(&mut self, name: impl Into<String>, array: LabeledArray) {
        self.entries.push((name.into(), array));
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LabeledArray)> {
        self.entries.iter().map(|(n, a)| (n.as_str(), a))
    }
}

impl FromIterator<(String, LabeledArray)> for NamedCollection {
    fn from_iter<I: IntoIterator<Item = (String, LabeledArray)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
