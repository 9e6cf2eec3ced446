//! Column profiling for dataset analysis.
//!
//! - [`classifier`] partitions columns into numeric, categorical and
//!   datetime groups
//! - [`statistics`] holds the numeric primitives every later stage uses

pub mod classifier;
pub mod statistics;

pub use classifier::SchemaClassifier;
