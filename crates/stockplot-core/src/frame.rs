//! Pipeline entry point and renderer handoff
//!
//! One function, [`frame`], runs the whole pipeline:
//! tabulate → pivot → align (collections) → axis selection → reference
//! broadcast. The subject is a closed tagged union, so the set of
//! supported inputs is part of the signature rather than an open overload
//! set.
//!
//! The result, [`PlotFrame`], is everything an external renderer needs: a
//! row-oriented table, x/y/ribbon/facet roles, an optional reference-line
//! layer, an optional worm overlay, and the diagnostics gathered along the
//! way. Nothing in this crate draws.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::align::{align_collection, broadcast_references, AlignDiagnostic, ReferenceLayer};
use crate::array::{LabeledArray, NamedCollection};
use crate::axes::{annotate, PlotLayout};
use crate::config::TabulateConfig;
use crate::error::StockplotResult;
use crate::table::WideTable;
use crate::tabulate::{sample_iters, tabulate, WormTable};

/// What is being plotted: one array, or a named collection of them
#[derive(Debug, Clone, Copy)]
pub enum PlotSubject<'a> {
    /// A single labeled array
    Array(&'a LabeledArray),
    /// A named collection; entries become color-grouped series
    Collection(&'a NamedCollection),
}

/// The renderer handoff: tabulated data plus axis-role metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotFrame {
    /// The wide table, one row per coordinate tuple
    pub table: WideTable,
    /// Recommended axis, ribbon, facet, and group roles
    pub layout: PlotLayout,
    /// Reference thresholds broadcast over matching quantities
    pub references: Option<ReferenceLayer>,
    /// Individual ensemble members for overlay, when requested
    pub worms: Option<WormTable>,
    /// Conditions recovered during alignment and broadcasting
    pub diagnostics: Vec<AlignDiagnostic>,
}

/// Run the full tabulation pipeline for one plot call
pub fn frame(subject: PlotSubject<'_>, cfg: &TabulateConfig) -> StockplotResult<PlotFrame> {
    let (table, mut diagnostics, worms) = match subject {
        PlotSubject::Array(array) => {
            let table = tabulate(array, cfg);
            let worms = (cfg.worm_iters > 0 && array.iter_len() > 1)
                .then(|| sample_iters(array, cfg.worm_iters));
            (table, Vec::new(), worms)
        }
        PlotSubject::Collection(collection) => {
            let aligned = align_collection(collection, cfg)?;
            (aligned.table, aligned.diagnostics, None)
        }
    };

    let (table, layout) = annotate(table)?;

    let references = match &cfg.reference_points {
        Some(references) => {
            let (layer, mut ref_diagnostics) = broadcast_references(&table, references);
            diagnostics.append(&mut ref_diagnostics);
            layer
        }
        None => None,
    };

    debug!(
        rows = table.len(),
        references = references.as_ref().map_or(0, |l| l.rows.len()),
        diagnostics = diagnostics.len(),
        "plot frame assembled"
    );

    Ok(PlotFrame {
        table,
        layout,
        references,
        worms,
        diagnostics,
    })
}
