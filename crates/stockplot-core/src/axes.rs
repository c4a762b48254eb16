//! Axis-role selection
//!
//! Inspects a wide table and recommends which columns serve as x, y,
//! ribbons, facets, and legend groups. Selection is a structural query over
//! the schema's [`AxisRole`]s; nothing here renders, and nothing matches on
//! column names.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LayoutError;
use crate::table::{AxisRole, ColumnDescriptor, CoordValue, WideTable};
use stockplot_stats::EnsembleSummary;

/// Recommended axis and grouping roles for one table
///
/// All indices point into the table's schema: coordinate-column indices for
/// `x`, `facets`, and `groups`; value-column indices for `y` and `ribbons`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotLayout {
    /// Primary ordering axis (coordinate column)
    pub x: usize,
    /// Primary plotted line (value column holding the central quantile)
    pub y: usize,
    /// (low, high) value-column pairs per shaded band, outermost first
    pub ribbons: Vec<(usize, usize)>,
    /// Facet panel keys (coordinate columns), quantity first when plural
    pub facets: Vec<usize>,
    /// Legend/color keys (coordinate columns), the series column when
    /// multiple series are present
    pub groups: Vec<usize>,
    /// Finite range over the y and ribbon cells, for renderer scaling
    pub y_range: Option<(f64, f64)>,
}

/// Choose axis roles for a table, extending it with a date composite when
/// the sub-period axis is informative
///
/// With more than one distinct sub-period, year alone would alias several
/// observations onto one x coordinate, so a fractional-year `Date` column
/// is appended and selected instead of the coarse `Time` column.
pub fn annotate(table: WideTable) -> Result<(WideTable, PlotLayout), LayoutError> {
    let y = table
        .schema
        .central_value_index()
        .ok_or(LayoutError::NoValueColumns)?;
    let time_index = require(&table, AxisRole::Time)?;
    let sub_index = require(&table, AxisRole::SubPeriod)?;

    let mut table = table;
    let sub_periods = table.distinct_in_column(sub_index);
    let x = if sub_periods > 1 {
        append_date_column(&mut table, time_index, sub_index);
        table.schema.coords.len() - 1
    } else {
        time_index
    };

    let ribbons = table.schema.ribbon_pairs();
    let facets = facet_columns(&table, x);
    let groups = group_columns(&table);
    let y_range = value_range(&table, y, &ribbons);

    debug!(x, y, facets = facets.len(), groups = groups.len(), "axis roles selected");

    Ok((
        table,
        PlotLayout {
            x,
            y,
            ribbons,
            facets,
            groups,
            y_range,
        },
    ))
}

fn require(table: &WideTable, role: AxisRole) -> Result<usize, LayoutError> {
    table
        .schema
        .coord_with_role(role)
        .ok_or(LayoutError::MissingColumn { role })
}

/// Append a fractional-year date column: year + position / n
///
/// Sub-period positions follow first appearance, which preserves the
/// source axis order (the domain's chronological convention) rather than
/// sorting labels alphabetically.
fn append_date_column(table: &mut WideTable, time_index: usize, sub_index: usize) {
    let sub_periods = table.first_seen_values(sub_index);
    let n = sub_periods.len() as f64;

    for row in &mut table.rows {
        let year = row.coords[time_index].as_f64().unwrap_or(f64::NAN);
        let position = sub_periods
            .iter()
            .position(|s| s == &row.coords[sub_index])
            .expect("every row's sub-period is in the distinct set");
        row.coords.push(CoordValue::Real(year + position as f64 / n));
    }
    table
        .schema
        .coords
        .push(ColumnDescriptor::new("date", AxisRole::Date));
}

fn facet_columns(table: &WideTable, x: usize) -> Vec<usize> {
    let x_is_date = table.schema.coords[x].role == AxisRole::Date;
    let mut facets: Vec<usize> = table
        .schema
        .coords
        .iter()
        .enumerate()
        .filter(|(index, column)| {
            if *index == x {
                return false;
            }
            let candidate = match column.role {
                AxisRole::Quantity | AxisRole::Group | AxisRole::Space => true,
                // A sub-period already encoded in the date axis adds nothing
                AxisRole::SubPeriod => !x_is_date,
                AxisRole::Time | AxisRole::Series | AxisRole::Date => false,
            };
            candidate && table.distinct_in_column(*index) > 1
        })
        .map(|(index, _)| index)
        .collect();

    // Quantity panels lead; remaining facets keep schema order
    facets.sort_by_key(|&index| table.schema.coords[index].role != AxisRole::Quantity);
    facets
}

fn group_columns(table: &WideTable) -> Vec<usize> {
    table
        .schema
        .coord_with_role(AxisRole::Series)
        .filter(|&index| table.distinct_in_column(index) > 1)
        .into_iter()
        .collect()
}

fn value_range(table: &WideTable, y: usize, ribbons: &[(usize, usize)]) -> Option<(f64, f64)> {
    let mut columns = vec![y];
    for &(lo, hi) in ribbons {
        columns.push(lo);
        columns.push(hi);
    }
    let cells: Vec<f64> = table
        .rows
        .iter()
        .flat_map(|row| columns.iter().filter_map(|&c| row.cells[c]))
        .collect();
    let summary = EnsembleSummary::from_values(&cells);
    summary.has_data().then(|| (summary.min, summary.max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{AxisLabels, LabeledArray};
    use crate::config::TabulateConfig;
    use crate::tabulate::tabulate;

    fn annual_table(quants: &[&str]) -> WideTable {
        let mut labels = AxisLabels::annual(quants[0], 2000..=2004, 1);
        labels.quant = quants.iter().map(|q| q.to_string()).collect();
        let array = LabeledArray::filled(labels, 1.0).unwrap();
        tabulate(&array, &TabulateConfig::default())
    }

    fn seasonal_table() -> WideTable {
        let labels =
            AxisLabels::annual("catch", 2000..=2001, 1).with_seasons(&["1", "2", "3", "4"]);
        let array = LabeledArray::filled(labels, 1.0).unwrap();
        tabulate(&array, &TabulateConfig::default())
    }

    #[test]
    fn test_single_season_uses_coarse_time() {
        let (table, layout) = annotate(annual_table(&["catch"])).unwrap();
        assert_eq!(table.schema.coords[layout.x].role, AxisRole::Time);
        assert!(table.schema.coord_with_role(AxisRole::Date).is_none());
    }

    #[test]
    fn test_multiple_seasons_use_date_composite() {
        let (table, layout) = annotate(seasonal_table()).unwrap();
        assert_eq!(table.schema.coords[layout.x].role, AxisRole::Date);

        // year 2000, season "3" sits at 2000.5
        let row = table
            .rows
            .iter()
            .find(|r| {
                r.coords[1] == CoordValue::Int(2000) && r.coords[3] == CoordValue::Text("3".into())
            })
            .unwrap();
        assert_eq!(row.coords[layout.x], CoordValue::Real(2000.5));
        // the encoded sub-period is not proposed again as a facet
        assert!(layout.facets.is_empty());
    }

    #[test]
    fn test_quantity_facet_leads() {
        let mut labels = AxisLabels::annual("catch", 2000..=2004, 1).with_units(&["F", "M"]);
        labels.quant = vec!["catch".to_string(), "ssb".to_string()];
        let array = LabeledArray::filled(labels, 1.0).unwrap();
        let table = tabulate(&array, &TabulateConfig::default());

        let (table, layout) = annotate(table).unwrap();
        assert_eq!(layout.facets.len(), 2);
        assert_eq!(table.schema.coords[layout.facets[0]].role, AxisRole::Quantity);
        assert_eq!(table.schema.coords[layout.facets[1]].role, AxisRole::Group);
    }

    #[test]
    fn test_y_is_central_column_with_range() {
        let (table, layout) = annotate(annual_table(&["catch"])).unwrap();
        assert_eq!(Some(layout.y), table.schema.central_value_index());
        assert_eq!(layout.y_range, Some((1.0, 1.0)));
    }

    #[test]
    fn test_ribbons_from_probability_columns() {
        let labels = AxisLabels::annual("catch", 2000..=2001, 50);
        let array = LabeledArray::filled(labels, 1.0).unwrap();
        let table = tabulate(&array, &TabulateConfig::default());
        let (_, layout) = annotate(table).unwrap();
        assert_eq!(layout.ribbons, vec![(0, 4), (1, 3)]);
        assert_eq!(layout.y, 2);
    }
}
