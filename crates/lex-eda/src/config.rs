//! Configuration types for the analysis engine.
//!
//! The defaults reproduce the fixed chart catalogue and insight thresholds;
//! use [`AnalysisConfig::builder()`] to tune them.

use serde::{Deserialize, Serialize};

/// Configuration for one analysis run.
///
/// # Example
///
/// ```rust,ignore
/// use lex_eda::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .preview_rows(10)
///     .parallel(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of leading rows copied into the report preview.
    /// Default: 5
    pub preview_rows: usize,

    /// Maximum number of histogram charts (first N numeric columns).
    /// Default: 4
    pub max_histograms: usize,

    /// Maximum number of box plot charts (first N numeric columns).
    /// Default: 3
    pub max_boxplots: usize,

    /// Maximum number of top-category bar charts (first N categorical columns).
    /// Default: 2
    pub max_categorical_charts: usize,

    /// Number of categories shown per categorical bar chart.
    /// Default: 10
    pub top_categories: usize,

    /// Upper bound on histogram bins.
    /// Default: 30
    pub max_histogram_bins: usize,

    /// Tukey fence multiplier applied to the IQR.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Absolute skewness above which a column is reported as highly skewed.
    /// Default: 1.0
    pub skewness_threshold: f64,

    /// Completeness percentage at or above which quality is "excellent".
    /// Default: 95.0
    pub excellent_completeness: f64,

    /// Completeness percentage at or above which quality is "good".
    /// Default: 80.0
    pub good_completeness: f64,

    /// Row count above which sampling is recommended.
    /// Default: 10_000
    pub large_dataset_rows: usize,

    /// Run the summarizer, chart generator and insight generator on scoped threads.
    /// Default: true
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            max_histograms: 4,
            max_boxplots: 3,
            max_categorical_charts: 2,
            top_categories: 10,
            max_histogram_bins: 30,
            iqr_multiplier: 1.5,
            skewness_threshold: 1.0,
            excellent_completeness: 95.0,
            good_completeness: 80.0,
            large_dataset_rows: 10_000,
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("excellent_completeness", self.excellent_completeness),
            ("good_completeness", self.good_completeness),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigValidationError::InvalidPercentage {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.good_completeness > self.excellent_completeness {
            return Err(ConfigValidationError::InvertedCompletenessBands {
                good: self.good_completeness,
                excellent: self.excellent_completeness,
            });
        }

        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        if !self.skewness_threshold.is_finite() || self.skewness_threshold < 0.0 {
            return Err(ConfigValidationError::InvalidSkewnessThreshold(
                self.skewness_threshold,
            ));
        }

        if self.max_histogram_bins == 0 {
            return Err(ConfigValidationError::ZeroCount("max_histogram_bins".to_string()));
        }

        if self.top_categories == 0 {
            return Err(ConfigValidationError::ZeroCount("top_categories".to_string()));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid percentage for '{field}': {value} (must be between 0 and 100)")]
    InvalidPercentage { field: String, value: f64 },

    #[error("good_completeness ({good}) must not exceed excellent_completeness ({excellent})")]
    InvertedCompletenessBands { good: f64, excellent: f64 },

    #[error("Invalid IQR multiplier: {0} (must be a positive finite number)")]
    InvalidIqrMultiplier(f64),

    #[error("Invalid skewness threshold: {0} (must be a non-negative finite number)")]
    InvalidSkewnessThreshold(f64),

    #[error("'{0}' must be at least 1")]
    ZeroCount(String),
}

impl From<ConfigValidationError> for crate::error::AnalysisError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::AnalysisError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    preview_rows: Option<usize>,
    max_histograms: Option<usize>,
    max_boxplots: Option<usize>,
    max_categorical_charts: Option<usize>,
    top_categories: Option<usize>,
    max_histogram_bins: Option<usize>,
    iqr_multiplier: Option<f64>,
    skewness_threshold: Option<f64>,
    excellent_completeness: Option<f64>,
    good_completeness: Option<f64>,
    large_dataset_rows: Option<usize>,
    parallel: Option<bool>,
}

impl AnalysisConfigBuilder {
    /// Set how many leading rows are copied into the preview.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set the maximum number of histograms.
    pub fn max_histograms(mut self, count: usize) -> Self {
        self.max_histograms = Some(count);
        self
    }

    /// Set the maximum number of box plots.
    pub fn max_boxplots(mut self, count: usize) -> Self {
        self.max_boxplots = Some(count);
        self
    }

    /// Set the maximum number of categorical bar charts.
    pub fn max_categorical_charts(mut self, count: usize) -> Self {
        self.max_categorical_charts = Some(count);
        self
    }

    /// Set the number of categories per bar chart.
    pub fn top_categories(mut self, count: usize) -> Self {
        self.top_categories = Some(count);
        self
    }

    /// Set the histogram bin cap.
    pub fn max_histogram_bins(mut self, bins: usize) -> Self {
        self.max_histogram_bins = Some(bins);
        self
    }

    /// Set the Tukey fence multiplier.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the absolute skewness threshold.
    pub fn skewness_threshold(mut self, threshold: f64) -> Self {
        self.skewness_threshold = Some(threshold);
        self
    }

    /// Set the completeness bands.
    ///
    /// # Arguments
    /// * `good` - lower bound of the "good" band, in percent
    /// * `excellent` - lower bound of the "excellent" band, in percent
    pub fn completeness_bands(mut self, good: f64, excellent: f64) -> Self {
        self.good_completeness = Some(good);
        self.excellent_completeness = Some(excellent);
        self
    }

    /// Set the row count above which sampling is recommended.
    pub fn large_dataset_rows(mut self, rows: usize) -> Self {
        self.large_dataset_rows = Some(rows);
        self
    }

    /// Enable or disable the parallel fan-out.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
            max_histograms: self.max_histograms.unwrap_or(defaults.max_histograms),
            max_boxplots: self.max_boxplots.unwrap_or(defaults.max_boxplots),
            max_categorical_charts: self
                .max_categorical_charts
                .unwrap_or(defaults.max_categorical_charts),
            top_categories: self.top_categories.unwrap_or(defaults.top_categories),
            max_histogram_bins: self
                .max_histogram_bins
                .unwrap_or(defaults.max_histogram_bins),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            skewness_threshold: self
                .skewness_threshold
                .unwrap_or(defaults.skewness_threshold),
            excellent_completeness: self
                .excellent_completeness
                .unwrap_or(defaults.excellent_completeness),
            good_completeness: self.good_completeness.unwrap_or(defaults.good_completeness),
            large_dataset_rows: self
                .large_dataset_rows
                .unwrap_or(defaults.large_dataset_rows),
            parallel: self.parallel.unwrap_or(defaults.parallel),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.max_histograms, 4);
        assert_eq!(config.max_boxplots, 3);
        assert_eq!(config.max_categorical_charts, 2);
        assert_eq!(config.top_categories, 10);
        assert_eq!(config.max_histogram_bins, 30);
        assert_eq!(config.large_dataset_rows, 10_000);
        assert!(config.parallel);
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let config = AnalysisConfig::builder().build().unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AnalysisConfig::builder()
            .preview_rows(10)
            .max_histograms(2)
            .completeness_bands(70.0, 90.0)
            .parallel(false)
            .build()
            .unwrap();

        assert_eq!(config.preview_rows, 10);
        assert_eq!(config.max_histograms, 2);
        assert_eq!(config.good_completeness, 70.0);
        assert_eq!(config.excellent_completeness, 90.0);
        assert!(!config.parallel);
    }

    #[test]
    fn test_validation_inverted_bands() {
        let result = AnalysisConfig::builder()
            .completeness_bands(96.0, 90.0)
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvertedCompletenessBands { .. }
        ));
    }

    #[test]
    fn test_validation_percentage_out_of_range() {
        let result = AnalysisConfig::builder()
            .completeness_bands(80.0, 120.0)
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidPercentage { .. }
        ));
    }

    #[test]
    fn test_validation_bad_multiplier() {
        assert!(AnalysisConfig::builder().iqr_multiplier(0.0).build().is_err());
        assert!(
            AnalysisConfig::builder()
                .iqr_multiplier(f64::NAN)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_validation_zero_bins() {
        let result = AnalysisConfig::builder().max_histogram_bins(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::ZeroCount(field) if field == "max_histogram_bins"
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{ "preview_rows": 3, "parallel": false }"#;
        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.preview_rows, 3);
        assert!(!config.parallel);
        assert_eq!(config.max_histograms, 4);
    }
}
