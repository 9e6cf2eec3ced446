use super::text::TextReport;
use crate::error::Result;
use crate::types::{AnalysisReport, Insights, NumericStats, QualityMetrics};
use chrono::Local;
use indexmap::IndexMap;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Downloadable summary of one analysis, keyed by the uploaded file.
///
/// Borrows from the [`AnalysisReport`] it wraps.
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a> {
    pub file_info: FileInfo<'a>,
    pub data_summary: DataSummary<'a>,
    pub statistical_summary: &'a IndexMap<String, NumericStats>,
    pub insights: &'a Insights,
    pub recommendations: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct FileInfo<'a> {
    pub filename: &'a str,
    pub analysis_date: String,
    pub dataset_shape: (usize, usize),
    pub total_columns: usize,
    pub total_rows: usize,
}

#[derive(Debug, Serialize)]
pub struct DataSummary<'a> {
    pub columns: &'a [String],
    pub data_types: &'a IndexMap<String, String>,
    pub missing_values: &'a IndexMap<String, usize>,
    pub data_quality: &'a QualityMetrics,
}

impl<'a> ReportEnvelope<'a> {
    pub fn new(filename: &'a str, report: &'a AnalysisReport) -> Self {
        Self {
            file_info: FileInfo {
                filename,
                analysis_date: Local::now().to_rfc3339(),
                dataset_shape: report.shape,
                total_columns: report.width(),
                total_rows: report.rows(),
            },
            data_summary: DataSummary {
                columns: &report.columns,
                data_types: &report.dtypes,
                missing_values: &report.missing_values,
                data_quality: &report.data_quality,
            },
            statistical_summary: &report.basic_stats,
            insights: &report.insights,
            recommendations: &report.insights.recommendations,
        }
    }
}

/// Writes analysis artifacts into an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(PathBuf::from("./outputs"))
    }
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Write the full report as pretty JSON to `<base_name>_report.json`.
    pub fn write_report_to_file(
        &self,
        report: &AnalysisReport,
        base_name: &str,
    ) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("{base_name}_report.json"));
        self.write(&path, serde_json::to_string_pretty(report)?.as_bytes())?;
        info!("Report saved: {}", path.display());
        Ok(path)
    }

    /// Write the plain-text analysis report to
    /// `analysis_report_<stem>_<YYYYmmdd_HHMMSS>.txt`.
    pub fn write_text_report(&self, report: &AnalysisReport, filename: &str) -> Result<PathBuf> {
        let now = Local::now();
        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("dataset");
        let path = self.output_dir.join(format!(
            "analysis_report_{}_{}.txt",
            stem,
            now.format("%Y%m%d_%H%M%S")
        ));
        let text = TextReport::new(filename, report).render(now)?;
        self.write(&path, text.as_bytes())?;
        info!("Text report saved: {}", path.display());
        Ok(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        let mut file = File::create(path)?;
        file.write_all(contents)?;
        Ok(())
    }
}
