//! Analysis orchestration.
//!
//! The [`Analyzer`] classifies the dataset, computes the correlation matrix
//! once, then runs the statistical summarizer, chart generator and insight
//! generator (on scoped threads unless disabled) and assembles the report.

mod assembler;
mod builder;
pub mod progress;

pub use builder::AnalyzerBuilder;
pub use progress::{
    AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};

use crate::charts::{ChartCatalog, ChartGenerator};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::insights::InsightGenerator;
use crate::profiler::SchemaClassifier;
use crate::summary::{StatisticalSummarizer, correlation_matrix};
use crate::types::{
    AnalysisReport, ColumnClassification, CorrelationMatrix, DatasetSummary, Insights,
};
use assembler::ComponentOutputs;
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Runs the full analysis of one dataset.
///
/// Use [`Analyzer::builder()`] to customize, or the free [`analyze`] function
/// for defaults.
///
/// # Example
///
/// ```rust,ignore
/// use lex_eda::{Analyzer, AnalysisConfig};
///
/// let report = Analyzer::builder()
///     .config(AnalysisConfig::builder().preview_rows(10).build()?)
///     .build()?
///     .analyze(&df)?;
///
/// println!("{} charts", report.visualizations.len());
/// ```
pub struct Analyzer {
    config: AnalysisConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// shared between request handlers by reference
static_assertions::assert_impl_all!(Analyzer: Send, Sync);

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            config: AnalysisConfig::default(),
            progress_reporter: None,
        }
    }
}

impl Analyzer {
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::default()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a dataset.
    ///
    /// The dataset is only read. Fails with [`AnalysisError::EmptyDataset`]
    /// when it has no columns; every other problem degrades into markers
    /// inside the report.
    pub fn analyze(&self, df: &DataFrame) -> Result<AnalysisReport> {
        match self.analyze_internal(df) {
            Ok(report) => {
                self.report_progress(ProgressUpdate::complete("Analysis completed successfully"));
                Ok(report)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Analysis error: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn analyze_internal(&self, df: &DataFrame) -> Result<AnalysisReport> {
        let start_time = Instant::now();
        info!(
            rows = df.height(),
            columns = df.width(),
            "Starting analysis"
        );

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Classifying,
            0.0,
            "Classifying columns...",
        ));
        let classification = SchemaClassifier::classify(df)?;
        info!(
            numeric = classification.numeric().len(),
            categorical = classification.categorical().len(),
            datetime = classification.datetime().len(),
            "Column classification complete"
        );

        // one matrix feeds both the report and the heatmap
        let correlations = correlation_matrix(df, &classification);

        let (summary, charts, insights) = if self.config.parallel {
            self.run_parallel(df, &classification, correlations.as_ref())?
        } else {
            self.run_sequential(df, &classification, correlations.as_ref())
        };

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Assembling,
            0.0,
            "Assembling report...",
        ));
        let report = assembler::assemble(
            df,
            &classification,
            ComponentOutputs {
                summary,
                charts,
                insights,
                correlations,
            },
            self.config.preview_rows,
        );

        info!(
            charts = report.visualizations.len(),
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Analysis complete"
        );
        Ok(report)
    }

    fn summarize(&self, df: &DataFrame, classification: &ColumnClassification) -> DatasetSummary {
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Summarizing,
            0.0,
            "Computing statistics...",
        ));
        StatisticalSummarizer::summarize(df, classification)
    }

    fn charts(
        &self,
        df: &DataFrame,
        classification: &ColumnClassification,
        correlations: Option<&CorrelationMatrix>,
    ) -> ChartCatalog {
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Charting,
            0.0,
            "Generating charts...",
        ));
        ChartGenerator::generate(df, classification, correlations, &self.config)
    }

    fn insights(&self, df: &DataFrame, classification: &ColumnClassification) -> Insights {
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::GeneratingInsights,
            0.0,
            "Generating insights...",
        ));
        InsightGenerator::generate(df, classification, &self.config)
    }

    fn run_sequential(
        &self,
        df: &DataFrame,
        classification: &ColumnClassification,
        correlations: Option<&CorrelationMatrix>,
    ) -> (DatasetSummary, ChartCatalog, Insights) {
        debug!("Running components sequentially");
        (
            self.summarize(df, classification),
            self.charts(df, classification, correlations),
            self.insights(df, classification),
        )
    }

    fn run_parallel(
        &self,
        df: &DataFrame,
        classification: &ColumnClassification,
        correlations: Option<&CorrelationMatrix>,
    ) -> Result<(DatasetSummary, ChartCatalog, Insights)> {
        debug!("Running components on scoped threads");
        std::thread::scope(|scope| {
            let summary = scope.spawn(|| self.summarize(df, classification));
            let charts = scope.spawn(|| self.charts(df, classification, correlations));
            let insights = scope.spawn(|| self.insights(df, classification));

            Ok((
                summary.join().map_err(|_| worker_panicked("summarizer"))?,
                charts.join().map_err(|_| worker_panicked("chart generator"))?,
                insights
                    .join()
                    .map_err(|_| worker_panicked("insight generator"))?,
            ))
        })
    }
}

fn worker_panicked(component: &str) -> AnalysisError {
    AnalysisError::Internal(format!("{component} thread panicked"))
}

/// Analyze a dataset with the default configuration.
pub fn analyze(df: &DataFrame) -> Result<AnalysisReport> {
    Analyzer::default().analyze(df)
}
