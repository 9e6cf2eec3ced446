use super::Analyzer;
use super::progress::{ClosureProgressReporter, ProgressReporter, ProgressUpdate};
use crate::config::AnalysisConfig;
use crate::error::Result;
use std::sync::Arc;

/// Builder for [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    config: Option<AnalysisConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(AnalyzerBuilder: Send);

impl AnalyzerBuilder {
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during analysis.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use lex_eda::{Analyzer, ProgressReporter, ProgressUpdate};
    /// use std::sync::Arc;
    ///
    /// struct StderrReporter;
    ///
    /// impl ProgressReporter for StderrReporter {
    ///     fn report(&self, update: ProgressUpdate) {
    ///         eprintln!("{}: {}", update.stage.display_name(), update.message);
    ///     }
    /// }
    ///
    /// let analyzer = Analyzer::builder()
    ///     .progress_reporter(Arc::new(StderrReporter))
    ///     .build()?;
    /// ```
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the analyzer, validating the configuration.
    pub fn build(self) -> Result<Analyzer> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Analyzer {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_defaults() {
        let analyzer = AnalyzerBuilder::default().build().unwrap();
        assert_eq!(analyzer.config(), &AnalysisConfig::default());
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = AnalysisConfig {
            good_completeness: 99.0,
            excellent_completeness: 90.0,
            ..AnalysisConfig::default()
        };
        let err = AnalyzerBuilder::default().config(config).build().err().unwrap();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
