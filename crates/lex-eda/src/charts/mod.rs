//! Chart specification generation.

mod generator;
mod spec;

pub use generator::ChartGenerator;
pub use spec::{
    BoxSummary, ChartCatalog, ChartData, ChartKind, ChartLayout, ChartSpec, HistogramBin,
};
