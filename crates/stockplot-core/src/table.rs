//! Typed table schema and the wide output table
//!
//! Axis and facet selection are structural queries over column roles, not
//! string matching on column names. Every coordinate column carries an
//! [`AxisRole`]; every value column carries the probability it holds (or
//! none, for the central-value sentinel of ensembles of size one).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use stockplot_stats::percent_label;

/// Label of the value column emitted when the ensemble axis has length 1
pub const CENTRAL_LABEL: &str = "value";

/// Role of a coordinate column in plot construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisRole {
    /// Quantity name; always faceted first when plural
    Quantity,
    /// Coarse time (year)
    Time,
    /// Sub-period within a year (season)
    SubPeriod,
    /// Biological group (unit)
    Group,
    /// Spatial area
    Space,
    /// Series label attached by alignment
    Series,
    /// Computed fractional-year composite of time and sub-period
    Date,
}

impl fmt::Display for AxisRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AxisRole::Quantity => "quantity",
            AxisRole::Time => "time",
            AxisRole::SubPeriod => "sub-period",
            AxisRole::Group => "group",
            AxisRole::Space => "space",
            AxisRole::Series => "series",
            AxisRole::Date => "date",
        };
        write!(f, "{name}")
    }
}

/// Descriptor for one coordinate column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,
    /// Structural role
    pub role: AxisRole,
}

impl ColumnDescriptor {
    /// Create a new descriptor
    pub fn new(name: impl Into<String>, role: AxisRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// Descriptor for one value column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueColumn {
    /// Display label, e.g. `"50%"`
    pub label: String,
    /// The probability this column holds; `None` for the central sentinel
    pub prob: Option<f64>,
}

impl ValueColumn {
    /// Column for one tabulated probability
    pub fn quantile(prob: f64) -> Self {
        Self {
            label: percent_label(prob),
            prob: Some(prob),
        }
    }

    /// The central-value sentinel column
    pub fn central() -> Self {
        Self {
            label: CENTRAL_LABEL.to_string(),
            prob: None,
        }
    }
}

/// One coordinate cell
///
/// `Real` only appears in computed columns (the date composite); pivot keys
/// are built from `Text` and `Int` values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CoordValue {
    Text(String),
    Int(i64),
    Real(f64),
}

impl CoordValue {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CoordValue::Text(_) => None,
            CoordValue::Int(i) => Some(*i as f64),
            CoordValue::Real(v) => Some(*v),
        }
    }
}

impl fmt::Display for CoordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordValue::Text(s) => write!(f, "{s}"),
            CoordValue::Int(i) => write!(f, "{i}"),
            CoordValue::Real(v) => write!(f, "{v}"),
        }
    }
}

// Manual Eq/Ord/Hash so coordinate tuples can key pivot groups; Real uses
// total ordering over bit patterns.

impl PartialEq for CoordValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CoordValue {}

impl PartialOrd for CoordValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CoordValue {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(v: &CoordValue) -> u8 {
            match v {
                CoordValue::Int(_) => 0,
                CoordValue::Real(_) => 1,
                CoordValue::Text(_) => 2,
            }
        }
        match (self, other) {
            (CoordValue::Int(a), CoordValue::Int(b)) => a.cmp(b),
            (CoordValue::Real(a), CoordValue::Real(b)) => a.total_cmp(b),
            (CoordValue::Text(a), CoordValue::Text(b)) => a.cmp(b),
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }
}

impl Hash for CoordValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CoordValue::Text(s) => s.hash(state),
            CoordValue::Int(i) => i.hash(state),
            CoordValue::Real(v) => v.to_bits().hash(state),
        }
    }
}

/// Schema of a wide table: ordered coordinate and value columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Coordinate columns, in canonical order
    pub coords: Vec<ColumnDescriptor>,
    /// Value columns, ascending by probability
    pub values: Vec<ValueColumn>,
}

impl TableSchema {
    /// Index of the first coordinate column with the given role
    pub fn coord_with_role(&self, role: AxisRole) -> Option<usize> {
        self.coords.iter().position(|c| c.role == role)
    }

    /// Index of the value column matching a probability (or the sentinel)
    pub fn value_index_for(&self, prob: Option<f64>) -> Option<usize> {
        self.values.iter().position(|v| v.prob == prob)
    }

    /// Index of the central value column
    ///
    /// The middle probability column when probabilities are present, else
    /// the central-value sentinel.
    pub fn central_value_index(&self) -> Option<usize> {
        let prob_cols: Vec<usize> = self
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.prob.is_some())
            .map(|(i, _)| i)
            .collect();
        if prob_cols.is_empty() {
            self.values.iter().position(|v| v.prob.is_none())
        } else {
            Some(prob_cols[prob_cols.len() / 2])
        }
    }

    /// (low, high) value-column index pairs for ribbons, outermost first
    pub fn ribbon_pairs(&self) -> Vec<(usize, usize)> {
        let prob_cols: Vec<usize> = self
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.prob.is_some())
            .map(|(i, _)| i)
            .collect();
        let n = prob_cols.len();
        (0..n / 2)
            .map(|i| (prob_cols[i], prob_cols[n - 1 - i]))
            .collect()
    }
}

/// One row of a wide table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WideRow {
    /// Coordinate values, aligned with the schema's coordinate columns
    pub coords: Vec<CoordValue>,
    /// Value cells, aligned with the schema's value columns; `None` marks
    /// a probability that was never tabulated for this coordinate
    pub cells: Vec<Option<f64>>,
}

/// A wide table: one row per coordinate tuple, one column per probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WideTable {
    pub schema: TableSchema,
    pub rows: Vec<WideRow>,
}

impl WideTable {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct values observed in one coordinate column
    pub fn distinct_in_column(&self, coord_index: usize) -> usize {
        let distinct: HashSet<&CoordValue> =
            self.rows.iter().map(|r| &r.coords[coord_index]).collect();
        distinct.len()
    }

    /// Distinct values of one coordinate column, in first-seen row order
    pub fn first_seen_values(&self, coord_index: usize) -> Vec<CoordValue> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for row in &self.rows {
            let value = &row.coords[coord_index];
            if seen.insert(value.clone()) {
                out.push(value.clone());
            }
        }
        out
    }
}
