//! stockplot-core - Tabulation pipeline for stock-assessment ensembles
//!
//! Turns labeled, ensemble-valued arrays of assessment quantities into
//! renderer-ready wide tables with axis-role metadata.
//!
//! # Key Components
//!
//! - **LabeledArray / NamedCollection**: six-axis input arrays
//!   (quantity, year, unit, season, area, iteration) and ordered
//!   collections of them
//! - **TabulateConfig**: probabilities, interpolation family, missing-value
//!   policy, reference points, worm overlay
//! - **tabulate / pivot**: collapse the ensemble axis to order statistics
//!   and reshape long rows into one wide row per coordinate tuple
//! - **align**: merge a collection into one series-tagged table, repairing
//!   duplicate names and broadcasting reference points
//! - **annotate**: recommend x/y/ribbon/facet/group roles structurally,
//!   over column roles rather than column names
//! - **frame**: the one-call pipeline producing a [`PlotFrame`] for an
//!   external renderer
//!
//! # Pipeline
//!
//! ```text
//! LabeledArray(s) -> tabulate -> pivot -> align -> annotate -> PlotFrame
//! ```
//!
//! Everything is a pure function over immutable inputs; nothing here
//! renders, loads files, or keeps state between calls.

pub mod align;
pub mod array;
pub mod axes;
pub mod config;
pub mod error;
pub mod frame;
pub mod pivot;
pub mod table;
pub mod tabulate;

pub use align::{
    align_collection, broadcast_references, canonical_quantity, disambiguate, AlignDiagnostic,
    AlignedCollection, ReferenceLayer, ReferencePoint, ReferenceRow, ReferenceSet,
};
pub use array::{Axis, AxisLabels, LabeledArray, NamedCollection};
pub use axes::{annotate, PlotLayout};
pub use config::{MissingPolicy, TabulateConfig};
pub use error::{ArrayError, LayoutError, StockplotError, StockplotResult};
pub use frame::{frame, PlotFrame, PlotSubject};
pub use pivot::{pivot, repivot};
pub use table::{
    AxisRole, ColumnDescriptor, CoordValue, TableSchema, ValueColumn, WideRow, WideTable,
    CENTRAL_LABEL,
};
pub use tabulate::{
    coord_schema, sample_iters, tabulate, tabulate_long, value_columns, QuantileRow, WormRow,
    WormTable,
};
