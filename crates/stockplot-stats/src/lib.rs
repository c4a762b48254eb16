//! stockplot-stats - Order-statistic primitives for ensemble visualization
//!
//! This crate provides the statistical layer under stockplot's tabulation
//! pipeline:
//!
//! - **Quantile**: the nine classic sample-quantile interpolation families
//! - **ProbabilitySet**: validated, ordered probability vectors with an
//!   unambiguous central element
//! - **EnsembleSummary**: quick numeric description of one set of draws
//!
//! # Design Philosophy
//!
//! Ensembles of simulation draws are collapsed to a small set of order
//! statistics rather than moments because quantile ribbons:
//! - Make no distributional assumption
//! - Are robust to heavy tails and outlier draws
//! - Map directly onto shaded uncertainty bands

pub mod probs;
pub mod quantile;
pub mod summary;

pub use probs::*;
pub use quantile::*;
pub use summary::*;
