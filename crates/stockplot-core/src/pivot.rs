//! Long-to-wide pivot
//!
//! Groups long-format quantile rows by their coordinate tuple and emits one
//! wide row per group, one cell per value column. The pivot is keyed on
//! exactly the coordinate columns; the ensemble axis was consumed upstream
//! and never appears here. Row order follows first appearance of each
//! coordinate tuple, which preserves the tabulator's canonical axis order.

use std::collections::HashMap;

use crate::table::{ColumnDescriptor, CoordValue, TableSchema, ValueColumn, WideRow, WideTable};
use crate::tabulate::QuantileRow;

/// Pivot long rows into a wide table
///
/// A coordinate tuple missing some probabilities produces `None` cells for
/// them; a probability not named in `values` is dropped. Neither is an
/// error.
pub fn pivot(
    rows: &[QuantileRow],
    coords: Vec<ColumnDescriptor>,
    values: Vec<ValueColumn>,
) -> WideTable {
    let schema = TableSchema { coords, values };
    let n_values = schema.values.len();

    let mut index: HashMap<Vec<CoordValue>, usize> = HashMap::new();
    let mut wide_rows: Vec<WideRow> = Vec::new();

    for row in rows {
        let row_index = match index.get(&row.coords) {
            Some(&i) => i,
            None => {
                wide_rows.push(WideRow {
                    coords: row.coords.clone(),
                    cells: vec![None; n_values],
                });
                let i = wide_rows.len() - 1;
                index.insert(row.coords.clone(), i);
                i
            }
        };
        if let Some(col) = schema.value_index_for(row.prob) {
            wide_rows[row_index].cells[col] = Some(row.value);
        }
    }

    WideTable {
        schema,
        rows: wide_rows,
    }
}

/// Pivot an already-wide table
///
/// Value columns are final once pivoted, so this is the identity; it exists
/// so pipelines that may receive either form can normalize without
/// special-casing.
pub fn repivot(table: WideTable) -> WideTable {
    table
}
