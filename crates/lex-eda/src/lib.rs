//! Automated Exploratory Data Analysis Library
//!
//! Turns a tabular dataset into a complete analysis report, built with Rust and Polars.
//!
//! # Overview
//!
//! Given a [`polars::prelude::DataFrame`], the library produces:
//!
//! - **Schema Classification**: Every column is numeric, categorical or datetime
//! - **Statistical Summary**: Describe-style statistics, top categories and quality metrics
//! - **Correlation Matrix**: Pairwise Pearson correlation between numeric columns
//! - **Chart Specifications**: Pie, bar, histogram, heatmap and box-plot specs for any
//!   plotting frontend
//! - **Insights**: Quality notes, per-column outlier and skew patterns, recommendations
//! - **Loading**: CSV, JSON and spreadsheet files with empty row/column pruning
//!
//! Every unit of work is isolated: a chart or statistic that cannot be computed
//! becomes a marker in the report instead of failing the whole analysis.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_eda::{Analyzer, AnalysisConfig, loader};
//!
//! let df = loader::load_path("sales.csv")?;
//!
//! // Option 1: defaults
//! let report = lex_eda::analyze(&df)?;
//!
//! // Option 2: custom limits and progress reporting
//! let config = AnalysisConfig::builder()
//!     .max_histograms(6)
//!     .preview_rows(10)
//!     .build()?;
//!
//! let report = Analyzer::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .analyze(&df)?;
//!
//! println!("{} rows x {} columns", report.rows(), report.width());
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```
//!
//! # Configuration
//!
//! Use [`AnalysisConfig`] to tune chart caps and insight thresholds:
//!
//! ```rust,ignore
//! use lex_eda::AnalysisConfig;
//!
//! let config = AnalysisConfig::builder()
//!     .max_boxplots(2)                    // At most two box plots
//!     .top_categories(5)                  // Top 5 values per categorical chart
//!     .iqr_multiplier(3.0)                // Only extreme outliers
//!     .completeness_bands(70.0, 90.0)     // Quality note thresholds
//!     .parallel(false)                    // Run components sequentially
//!     .build()?;
//! ```
//!
//! # Reports
//!
//! [`ReportGenerator`] writes the full report as JSON and [`TextReport`]
//! renders the downloadable plain-text report.

pub mod analyzer;
pub mod charts;
pub mod config;
pub mod error;
pub mod insights;
pub mod loader;
pub mod profiler;
pub mod reporting;
pub mod summary;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use analyzer::{
    AnalysisStage, Analyzer, AnalyzerBuilder, ClosureProgressReporter, ProgressReporter,
    ProgressUpdate, analyze,
};
pub use charts::{ChartCatalog, ChartData, ChartGenerator, ChartKind, ChartSpec};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError};
pub use error::{AnalysisError, LoadError, Result};
pub use insights::InsightGenerator;
pub use loader::FileFormat;
pub use profiler::SchemaClassifier;
pub use reporting::{ReportEnvelope, ReportGenerator, TextReport};
pub use summary::StatisticalSummarizer;
pub use types::{
    AnalysisReport, CategoricalStats, ColumnClassification, ColumnKind, ColumnSchema,
    CorrelationMatrix, DatasetSummary, Insights, NumericStats, QualityMetrics,
};
