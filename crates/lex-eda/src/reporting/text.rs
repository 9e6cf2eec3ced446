use super::generator::ReportEnvelope;
use crate::error::{AnalysisError, Result};
use crate::types::{AnalysisReport, NumericStats};
use chrono::{DateTime, Local};
use std::fmt::{self, Write};

/// Plain-text rendering of an analysis: overview, per-column facts,
/// statistics and insight sections, followed by the raw JSON envelope.
pub struct TextReport<'a> {
    filename: &'a str,
    report: &'a AnalysisReport,
}

impl<'a> TextReport<'a> {
    pub fn new(filename: &'a str, report: &'a AnalysisReport) -> Self {
        Self { filename, report }
    }

    pub fn render(&self, generated_at: DateTime<Local>) -> Result<String> {
        let mut out = String::new();
        self.write_body(&mut out, generated_at)
            .map_err(|e| AnalysisError::Internal(format!("text report: {e}")))?;

        let envelope =
            serde_json::to_string_pretty(&ReportEnvelope::new(self.filename, self.report))?;
        out.push_str(&format!("\n\n## Raw Analysis Data (JSON)\n```json\n{envelope}\n```"));

        Ok(out)
    }

    fn write_body(&self, out: &mut String, generated_at: DateTime<Local>) -> fmt::Result {
        let report = self.report;

        writeln!(out, "# Data Analysis Report for {}", self.filename)?;
        writeln!(out, "Generated on: {}\n", generated_at.format("%Y-%m-%d %H:%M:%S"))?;

        writeln!(out, "## Dataset Overview")?;
        writeln!(out, "- File: {}", self.filename)?;
        writeln!(out, "- Shape: {} rows × {} columns", report.rows(), report.width())?;
        writeln!(out, "- Missing Values: {}", report.total_missing)?;
        writeln!(
            out,
            "- Data Quality: {:.2}% complete\n",
            report.data_quality.completeness
        )?;

        writeln!(out, "## Column Information")?;
        for col in &report.columns {
            let dtype = report.dtypes.get(col).map(String::as_str).unwrap_or("unknown");
            let missing = report.missing_values.get(col).copied().unwrap_or(0);
            writeln!(out, "- {col}: {dtype} ({missing} missing values)")?;
        }

        if !report.basic_stats.is_empty() {
            writeln!(out, "\n## Statistical Summary")?;
            for (col, stats) in &report.basic_stats {
                writeln!(out, "\n### {col}")?;
                for (name, value) in stat_rows(stats) {
                    match value {
                        Some(v) => writeln!(out, "- {name}: {v:.4}")?,
                        None => writeln!(out, "- {name}: N/A")?,
                    }
                }
            }
        }

        let insights = &report.insights;
        for (heading, notes) in [
            ("Data Quality Insights", &insights.data_quality),
            ("Data Patterns", &insights.patterns),
            ("Recommendations", &insights.recommendations),
        ] {
            if notes.is_empty() {
                continue;
            }
            writeln!(out, "\n## {heading}")?;
            for note in notes {
                writeln!(out, "- {note}")?;
            }
        }

        Ok(())
    }
}

fn stat_rows(stats: &NumericStats) -> [(&'static str, Option<f64>); 8] {
    [
        ("count", Some(stats.count as f64)),
        ("mean", stats.mean),
        ("std", stats.std),
        ("min", stats.min),
        ("25%", stats.p25),
        ("50%", stats.p50),
        ("75%", stats.p75),
        ("max", stats.max),
    ]
}
