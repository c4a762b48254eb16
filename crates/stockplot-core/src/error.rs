//! Error types for stockplot-core
//!
//! Provides error handling for:
//! - Array construction
//! - Probability-set validation (re-exported from stockplot-stats)
//! - Axis-role selection

use thiserror::Error;

use crate::array::Axis;
use crate::table::AxisRole;
use stockplot_stats::ProbabilityError;

/// Main error type for stockplot operations
#[derive(Error, Debug)]
pub enum StockplotError {
    /// Array construction errors
    #[error("Invalid labeled array: {0}")]
    Array(#[from] ArrayError),

    /// Probability-set validation errors
    #[error("Invalid probability set: {0}")]
    Probability(#[from] ProbabilityError),

    /// Axis-role selection errors
    #[error("Axis selection failed: {0}")]
    Layout(#[from] LayoutError),

    /// A collection with nothing to tabulate
    #[error("Collection is empty")]
    EmptyCollection,
}

/// Errors related to labeled-array construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    /// Label vector length disagrees with the data shape
    #[error("Axis {axis} has {labels} labels but the data extent is {len}")]
    LabelMismatch {
        axis: Axis,
        labels: usize,
        len: usize,
    },

    /// A zero-length axis
    #[error("Axis {axis} is empty")]
    EmptyAxis { axis: Axis },
}

/// Errors related to axis-role selection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A table without value columns has nothing to plot
    #[error("Table has no value columns")]
    NoValueColumns,

    /// A coordinate role expected by the selector is absent
    #[error("Table has no column with role {role}")]
    MissingColumn { role: AxisRole },
}

/// Result type alias for stockplot operations
pub type StockplotResult<T> = Result<T, StockplotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_error_display() {
        let err = ArrayError::LabelMismatch {
            axis: Axis::Year,
            labels: 3,
            len: 5,
        };
        assert!(err.to_string().contains("year"));
        assert!(err.to_string().contains('3'));
        assert!(err.to_string().contains('5'));
    }

    #[test]
    fn test_layout_error_display() {
        let err = LayoutError::MissingColumn {
            role: AxisRole::SubPeriod,
        };
        assert!(err.to_string().contains("sub-period"));
    }

    #[test]
    fn test_probability_error_converts() {
        let err: StockplotError = ProbabilityError::Empty.into();
        assert!(matches!(err, StockplotError::Probability(_)));
    }
}
