//! Progress reporting for an analysis run.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_eda::Analyzer;
//!
//! let report = Analyzer::builder()
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build()?
//!     .analyze(&df)?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    /// Assigning each column to an analysis group
    Classifying,
    /// Descriptive statistics, quality metrics and correlations
    Summarizing,
    /// Building the chart catalogue
    Charting,
    /// Evaluating the insight rules
    GeneratingInsights,
    /// Combining the component outputs into the report
    Assembling,
    /// Analysis completed successfully
    Complete,
    /// Analysis failed with an error
    Failed,
}

impl AnalysisStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Classifying => "Classifying Columns",
            Self::Summarizing => "Summarizing Statistics",
            Self::Charting => "Generating Charts",
            Self::GeneratingInsights => "Generating Insights",
            Self::Assembling => "Assembling Report",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the overall run spent in this stage (0.0 - 1.0).
    ///
    /// The working stages sum to 1.0.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Classifying => 0.10,
            Self::Summarizing => 0.35,
            Self::Charting => 0.30,
            Self::GeneratingInsights => 0.15,
            Self::Assembling => 0.10,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Classifying => 0.0,
            Self::Summarizing => 0.10,
            Self::Charting => 0.45,
            Self::GeneratingInsights => 0.75,
            Self::Assembling => 0.90,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// One progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: AnalysisStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: AnalysisStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: AnalysisStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: AnalysisStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receives progress updates during an analysis.
///
/// When the components run in parallel, updates arrive from worker threads,
/// so implementations must be `Send + Sync`.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
