//! Report output.
//!
//! - [`ReportGenerator::write_report_to_file`] saves the full
//!   [`AnalysisReport`](crate::AnalysisReport) as JSON (`--emit-report`)
//! - [`ReportEnvelope`] is the downloadable summary keyed by file name
//! - [`TextReport`] renders the plain-text analysis report
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_eda::reporting::ReportGenerator;
//! use std::path::PathBuf;
//!
//! let generator = ReportGenerator::new(PathBuf::from("outputs"));
//! generator.write_report_to_file(&report, "sales")?;
//! generator.write_text_report(&report, "sales.csv")?;
//! ```

mod generator;
mod text;

pub use generator::{DataSummary, FileInfo, ReportEnvelope, ReportGenerator};
pub use text::TextReport;
