//! Multi-series alignment
//!
//! Merges independently tabulated series into one wide table tagged with a
//! series column, repairs duplicate series names, and broadcasts scalar
//! reference points over matching quantities as a separate layer.
//!
//! Concatenation is a row-wise union, not a join: series with different
//! coordinate domains simply contribute disjoint rows. Everything recovered
//! locally (renames, unmatched references) is reported through
//! [`AlignDiagnostic`] and logged at warn level rather than failing the
//! call.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

use crate::array::{LabeledArray, NamedCollection};
use crate::config::TabulateConfig;
use crate::error::{StockplotError, StockplotResult};
use crate::table::{
    AxisRole, ColumnDescriptor, CoordValue, TableSchema, ValueColumn, WideRow, WideTable,
};
use crate::tabulate::{coord_schema, tabulate};

/// A scalar threshold associated with a quantity name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    /// Quantity the threshold applies to; matched through the synonym table
    pub name: String,
    /// Threshold value
    pub value: f64,
}

impl ReferencePoint {
    /// Create a new reference point
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A small named set of scalar thresholds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSet {
    points: Vec<ReferencePoint>,
}

impl ReferenceSet {
    /// Create a set from points
    pub fn new(points: Vec<ReferencePoint>) -> Self {
        Self { points }
    }

    /// Append a point
    pub fn push(&mut self, point: ReferencePoint) {
        self.points.push(point);
    }

    /// Iterate the points
    pub fn iter(&self) -> impl Iterator<Item = &ReferencePoint> {
        self.points.iter()
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One broadcast reference value attached to a table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    /// Coordinates of the table row the value is attached to
    pub coords: Vec<CoordValue>,
    /// Name of the reference point
    pub name: String,
    /// Threshold value
    pub value: f64,
}

/// Reference values broadcast across coordinate rows, kept as a layer of
/// its own rather than merged into the value columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLayer {
    pub rows: Vec<ReferenceRow>,
}

/// A locally recovered condition worth surfacing to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlignDiagnostic {
    /// Duplicate series names were rewritten with letter suffixes
    RenamedDuplicate {
        /// The name that occurred more than once
        name: String,
        /// Replacement names, in encounter order
        replacements: Vec<String>,
    },
    /// A reference point matched no tabulated quantity and was dropped
    /// from the layer
    UnmatchedReference { name: String },
}

impl fmt::Display for AlignDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignDiagnostic::RenamedDuplicate { name, replacements } => {
                write!(f, "duplicate series name '{name}' renamed to {replacements:?}")
            }
            AlignDiagnostic::UnmatchedReference { name } => {
                write!(f, "reference point '{name}' matches no tabulated quantity")
            }
        }
    }
}

/// A merged table plus the diagnostics produced while building it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignedCollection {
    pub table: WideTable,
    pub diagnostics: Vec<AlignDiagnostic>,
}

/// The n-th letter suffix: A..Z, then AA, AB, ... (bijective base 26)
///
/// Keeps disambiguation total instead of capping at 26 duplicates.
pub fn letter_suffix(mut index: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    out.reverse();
    String::from_utf8(out).expect("suffix bytes are ASCII")
}

/// Repair duplicate names with letter suffixes in encounter order
///
/// Unique names pass through untouched. Each duplicated name yields one
/// diagnostic documenting the rewrite.
pub fn disambiguate(names: &[String]) -> (Vec<String>, Vec<AlignDiagnostic>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name.as_str()).or_insert(0) += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut renamed = Vec::with_capacity(names.len());
    let mut rewrites: Vec<(String, Vec<String>)> = Vec::new();

    for name in names {
        if counts[name.as_str()] > 1 {
            let occurrence = seen.entry(name.as_str()).or_insert(0);
            let replacement = format!("{}_{}", name, letter_suffix(*occurrence));
            *occurrence += 1;
            match rewrites.iter_mut().find(|(n, _)| n.as_str() == name.as_str()) {
                Some((_, reps)) => reps.push(replacement.clone()),
                None => rewrites.push((name.clone(), vec![replacement.clone()])),
            }
            renamed.push(replacement);
        } else {
            renamed.push(name.clone());
        }
    }

    let diagnostics: Vec<AlignDiagnostic> = rewrites
        .into_iter()
        .map(|(name, replacements)| {
            warn!(name = %name, ?replacements, "duplicate series name renamed");
            AlignDiagnostic::RenamedDuplicate { name, replacements }
        })
        .collect();

    (renamed, diagnostics)
}

#[cfg(feature = "parallel")]
fn tabulate_entries(arrays: &[&LabeledArray], cfg: &TabulateConfig) -> Vec<WideTable> {
    use rayon::prelude::*;
    arrays.par_iter().map(|a| tabulate(a, cfg)).collect()
}

#[cfg(not(feature = "parallel"))]
fn tabulate_entries(arrays: &[&LabeledArray], cfg: &TabulateConfig) -> Vec<WideTable> {
    arrays.iter().map(|a| tabulate(a, cfg)).collect()
}

fn union_value_columns(tables: &[WideTable]) -> Vec<ValueColumn> {
    let mut union: Vec<ValueColumn> = Vec::new();
    for table in tables {
        for column in &table.schema.values {
            if !union.iter().any(|u| u.prob == column.prob) {
                union.push(column.clone());
            }
        }
    }
    // Probability columns ascending, sentinel last
    union.sort_by(|a, b| match (a.prob, b.prob) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap(),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    union
}

/// Tabulate every entry of a collection and merge the results
///
/// Each entry is tabulated independently (in parallel when the `parallel`
/// feature is enabled), tagged with a series column, and unioned row-wise.
pub fn align_collection(
    collection: &NamedCollection,
    cfg: &TabulateConfig,
) -> StockplotResult<AlignedCollection> {
    if collection.is_empty() {
        return Err(StockplotError::EmptyCollection);
    }

    let names: Vec<String> = collection.names().iter().map(|s| s.to_string()).collect();
    let (names, diagnostics) = disambiguate(&names);

    let arrays: Vec<&LabeledArray> = collection.iter().map(|(_, a)| a).collect();
    let tables = tabulate_entries(&arrays, cfg);
    debug!(series = names.len(), "tabulated collection entries");

    let values = union_value_columns(&tables);
    let mut coords = coord_schema();
    coords.push(ColumnDescriptor::new("series", AxisRole::Series));
    let schema = TableSchema {
        coords,
        values: values.clone(),
    };

    let mut rows = Vec::new();
    for (name, table) in names.iter().zip(&tables) {
        // Map this entry's cells onto the union value columns
        let cell_map: Vec<usize> = table
            .schema
            .values
            .iter()
            .map(|v| {
                values
                    .iter()
                    .position(|u| u.prob == v.prob)
                    .expect("union contains every entry column")
            })
            .collect();

        for row in &table.rows {
            let mut cells = vec![None; values.len()];
            for (from, &to) in cell_map.iter().enumerate() {
                cells[to] = row.cells[from];
            }
            let mut coords = row.coords.clone();
            coords.push(CoordValue::Text(name.clone()));
            rows.push(WideRow { coords, cells });
        }
    }

    Ok(AlignedCollection {
        table: WideTable { schema, rows },
        diagnostics,
    })
}

/// Map a quantity name onto its canonical form
///
/// Lowercases and folds the conventional synonyms so a "yield" threshold
/// finds a "catch" series.
pub fn canonical_quantity(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    match lower.as_str() {
        "yield" | "landings" => "catch".to_string(),
        "harvest" | "fbar" => "f".to_string(),
        "recruitment" => "rec".to_string(),
        "biomass" => "ssb".to_string(),
        _ => lower,
    }
}

/// Broadcast reference points across the rows of matching quantities
///
/// Each scalar is attached to every row whose quantity name matches the
/// point's name through [`canonical_quantity`]. Points matching nothing are
/// dropped from the layer but reported, not silently discarded.
pub fn broadcast_references(
    table: &WideTable,
    references: &ReferenceSet,
) -> (Option<ReferenceLayer>, Vec<AlignDiagnostic>) {
    let Some(quant_index) = table.schema.coord_with_role(AxisRole::Quantity) else {
        return (None, Vec::new());
    };

    let mut rows = Vec::new();
    let mut diagnostics = Vec::new();

    for point in references.iter() {
        let target = canonical_quantity(&point.name);
        let mut matched = false;
        for row in &table.rows {
            let quantity = row.coords[quant_index].to_string();
            if canonical_quantity(&quantity) == target {
                matched = true;
                rows.push(ReferenceRow {
                    coords: row.coords.clone(),
                    name: point.name.clone(),
                    value: point.value,
                });
            }
        }
        if !matched {
            warn!(name = %point.name, "reference point matches no tabulated quantity");
            diagnostics.push(AlignDiagnostic::UnmatchedReference {
                name: point.name.clone(),
            });
        }
    }

    let layer = if rows.is_empty() {
        None
    } else {
        Some(ReferenceLayer { rows })
    };
    (layer, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::AxisLabels;

    fn array_for_years(quant: &str, years: std::ops::RangeInclusive<i32>) -> LabeledArray {
        LabeledArray::filled(AxisLabels::annual(quant, years, 1), 1.0).unwrap()
    }

    #[test]
    fn test_letter_suffix_sequence() {
        assert_eq!(letter_suffix(0), "A");
        assert_eq!(letter_suffix(1), "B");
        assert_eq!(letter_suffix(25), "Z");
        assert_eq!(letter_suffix(26), "AA");
        assert_eq!(letter_suffix(27), "AB");
        assert_eq!(letter_suffix(51), "AZ");
        assert_eq!(letter_suffix(52), "BA");
    }

    #[test]
    fn test_disambiguate_unique_names_untouched() {
        let names = vec!["base".to_string(), "alt".to_string()];
        let (renamed, diagnostics) = disambiguate(&names);
        assert_eq!(renamed, names);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_disambiguate_duplicates() {
        let names = vec!["Run".to_string(), "other".to_string(), "Run".to_string()];
        let (renamed, diagnostics) = disambiguate(&names);
        assert_eq!(renamed, vec!["Run_A", "other", "Run_B"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0],
            AlignDiagnostic::RenamedDuplicate {
                name: "Run".to_string(),
                replacements: vec!["Run_A".to_string(), "Run_B".to_string()],
            }
        );
    }

    #[test]
    fn test_align_tags_series_and_unions_rows() {
        let mut collection = NamedCollection::new();
        collection.push("base", array_for_years("catch", 2000..=2002));
        collection.push("alt", array_for_years("catch", 2002..=2004));

        let aligned = align_collection(&collection, &TabulateConfig::default()).unwrap();
        let table = &aligned.table;

        // 3 + 3 rows; disjoint year domains union without joining
        assert_eq!(table.len(), 6);
        let series_index = table.schema.coord_with_role(AxisRole::Series).unwrap();
        assert_eq!(table.distinct_in_column(series_index), 2);
        assert!(aligned.diagnostics.is_empty());
    }

    #[test]
    fn test_align_empty_collection_fails() {
        let collection = NamedCollection::new();
        let err = align_collection(&collection, &TabulateConfig::default()).unwrap_err();
        assert!(matches!(err, StockplotError::EmptyCollection));
    }

    #[test]
    fn test_canonical_quantity_synonyms() {
        assert_eq!(canonical_quantity("yield"), "catch");
        assert_eq!(canonical_quantity("Yield"), "catch");
        assert_eq!(canonical_quantity("harvest"), "f");
        assert_eq!(canonical_quantity("recruitment"), "rec");
        assert_eq!(canonical_quantity("SSB"), "ssb");
    }

    #[test]
    fn test_broadcast_matches_through_synonyms() {
        let table = tabulate(&array_for_years("catch", 2000..=2002), &TabulateConfig::default());
        let references = ReferenceSet::new(vec![ReferencePoint::new("yield", 120.0)]);
        let (layer, diagnostics) = broadcast_references(&table, &references);

        let layer = layer.unwrap();
        assert_eq!(layer.rows.len(), 3);
        assert!(layer.rows.iter().all(|r| r.value == 120.0));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_broadcast_reports_unmatched() {
        let table = tabulate(&array_for_years("catch", 2000..=2002), &TabulateConfig::default());
        let references = ReferenceSet::new(vec![ReferencePoint::new("ssb", 5.0)]);
        let (layer, diagnostics) = broadcast_references(&table, &references);

        assert!(layer.is_none());
        assert_eq!(
            diagnostics,
            vec![AlignDiagnostic::UnmatchedReference {
                name: "ssb".to_string()
            }]
        );
    }
}
