//! Heuristic insight generation.
//!
//! Rules run in a fixed order and independently of each other: a rule that
//! fails to evaluate is folded into the single `error` note while the notes
//! of the remaining rules are kept.

use crate::config::AnalysisConfig;
use crate::profiler::statistics::{count_outliers, iqr_fences, skewness, sorted_copy};
use crate::types::{ColumnClassification, Insights};
use crate::utils::numeric_values;
use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::{debug, warn};

pub const EXCELLENT_QUALITY: &str = "Excellent data quality - very few missing values";
pub const GOOD_QUALITY: &str = "Good data quality - some missing values to address";
pub const POOR_QUALITY: &str = "Poor data quality - significant missing values detected";

pub const RECOMMEND_CLEANING: &str = "Consider data cleaning for missing values";
pub const RECOMMEND_CORRELATIONS: &str = "Explore correlations between numeric variables";
pub const RECOMMEND_ENCODING: &str = "Consider encoding categorical variables for ML applications";
pub const RECOMMEND_SAMPLING: &str = "Large dataset - consider sampling for initial exploration";

pub struct InsightGenerator;

impl InsightGenerator {
    pub fn generate(
        df: &DataFrame,
        classification: &ColumnClassification,
        config: &AnalysisConfig,
    ) -> Insights {
        let mut insights = Insights::default();

        insights
            .data_quality
            .push(Self::quality_note(classification, config).to_string());

        for name in classification.numeric() {
            match Self::column_patterns(df, name, config) {
                Ok(notes) => insights.patterns.extend(notes),
                Err(e) => {
                    warn!("Pattern rules failed for '{}': {:#}", name, e);
                    insights.record_error(format!("{name}: {e:#}"));
                }
            }
        }

        insights.recommendations = Self::recommendations(classification, config);

        debug!(
            patterns = insights.patterns.len(),
            recommendations = insights.recommendations.len(),
            "Generated insights"
        );
        insights
    }

    /// Exactly one quality note from the completeness bands.
    ///
    /// A dataset without cells has completeness 0 and is rated poor.
    pub fn quality_note(
        classification: &ColumnClassification,
        config: &AnalysisConfig,
    ) -> &'static str {
        let total = classification.total_cells();
        let completeness = if total > 0 {
            (total - classification.total_missing()) as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        if completeness >= config.excellent_completeness {
            EXCELLENT_QUALITY
        } else if completeness >= config.good_completeness {
            GOOD_QUALITY
        } else {
            POOR_QUALITY
        }
    }

    /// Outlier note followed by skewness note for one numeric column.
    fn column_patterns(df: &DataFrame, name: &str, config: &AnalysisConfig) -> Result<Vec<String>> {
        let column = df
            .column(name)
            .with_context(|| format!("column '{name}' not found"))?;
        let values = numeric_values(column.as_materialized_series())?;
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let mut notes = Vec::new();

        if let Some(fences) = iqr_fences(&sorted_copy(&values), config.iqr_multiplier) {
            let outliers = count_outliers(&values, &fences);
            if outliers > 0 {
                let pct = outliers as f64 / values.len() as f64 * 100.0;
                notes.push(format!("{name}: {pct:.1}% outliers detected"));
            }
        }

        if let Some(skew) = skewness(&values)
            && skew.abs() > config.skewness_threshold
        {
            let direction = if skew > 0.0 { "right" } else { "left" };
            notes.push(format!("{name}: Highly skewed distribution ({direction})"));
        }

        Ok(notes)
    }

    fn recommendations(
        classification: &ColumnClassification,
        config: &AnalysisConfig,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        if classification.total_missing() > 0 {
            recommendations.push(RECOMMEND_CLEANING.to_string());
        }
        if classification.numeric().len() >= 2 {
            recommendations.push(RECOMMEND_CORRELATIONS.to_string());
        }
        if !classification.categorical().is_empty() {
            recommendations.push(RECOMMEND_ENCODING.to_string());
        }
        if classification.rows > config.large_dataset_rows {
            recommendations.push(RECOMMEND_SAMPLING.to_string());
        }

        recommendations
    }
}
