//! Statistical summarizer.
//!
//! Produces per-column descriptive statistics, dataset quality metrics and
//! the Pearson correlation matrix. Summarizing never fails: a column whose
//! statistics cannot be computed is logged and recorded as having no data.

mod correlation;

pub use correlation::correlation_matrix;

use crate::profiler::statistics::{mean, quantile_sorted, rank_frequencies, sample_std, sorted_copy};
use crate::types::{
    CategoricalStats, ColumnClassification, DatasetSummary, NumericStats, QualityMetrics,
};
use crate::utils::{finite, numeric_values, string_values};
use anyhow::Result;
use indexmap::IndexMap;
use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, warn};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub struct StatisticalSummarizer;

impl StatisticalSummarizer {
    /// Summarize a classified dataset.
    pub fn summarize(df: &DataFrame, classification: &ColumnClassification) -> DatasetSummary {
        let mut basic_stats = IndexMap::new();
        for name in classification.numeric() {
            let stats = df
                .column(name)
                .map_err(anyhow::Error::from)
                .and_then(|col| Self::numeric_stats(col.as_materialized_series()))
                .unwrap_or_else(|e| {
                    warn!("Numeric statistics failed for '{}': {}", name, e);
                    NumericStats::no_data()
                });
            basic_stats.insert(name.to_string(), stats);
        }

        let mut categorical_stats = IndexMap::new();
        for name in classification.categorical() {
            let stats = match df.column(name) {
                Ok(col) => Self::categorical_stats(col.as_materialized_series()),
                Err(e) => {
                    warn!("Categorical statistics failed for '{}': {}", name, e);
                    CategoricalStats::no_data()
                }
            };
            categorical_stats.insert(name.to_string(), stats);
        }

        let data_quality = Self::quality_metrics(df, classification);
        debug!(
            completeness = data_quality.completeness,
            duplicate_rows = data_quality.duplicate_rows,
            "Computed quality metrics"
        );

        DatasetSummary {
            basic_stats,
            categorical_stats,
            data_quality,
            dtype_counts: classification.dtype_counts(),
        }
    }

    /// Descriptive statistics over the non-missing values of a column.
    pub fn numeric_stats(series: &Series) -> Result<NumericStats> {
        let values = numeric_values(series)?;
        if values.is_empty() {
            return Ok(NumericStats::no_data());
        }

        let sorted = sorted_copy(&values);
        let quantile = |q: f64| quantile_sorted(&sorted, q).and_then(finite);

        Ok(NumericStats {
            count: values.len(),
            mean: mean(&values).and_then(finite),
            std: sample_std(&values).and_then(finite),
            min: sorted.first().copied().and_then(finite),
            p25: quantile(0.25),
            p50: quantile(0.5),
            p75: quantile(0.75),
            max: sorted.last().copied().and_then(finite),
        })
    }

    /// Distinct count and mode of a column; ties go to the first value seen.
    pub fn categorical_stats(series: &Series) -> CategoricalStats {
        let ranked = rank_frequencies(string_values(series));
        match ranked.first() {
            Some((value, frequency)) => CategoricalStats {
                unique_count: ranked.len(),
                most_frequent: value.clone(),
                frequency: *frequency,
            },
            None => CategoricalStats::no_data(),
        }
    }

    pub fn quality_metrics(
        df: &DataFrame,
        classification: &ColumnClassification,
    ) -> QualityMetrics {
        let total_cells = classification.total_cells();
        let total_missing = classification.total_missing();

        let (completeness, missing_percentage) = if total_cells > 0 {
            let missing = total_missing as f64 / total_cells as f64 * 100.0;
            (100.0 - missing, missing)
        } else {
            (0.0, 0.0)
        };

        QualityMetrics {
            completeness,
            missing_percentage,
            duplicate_rows: Self::duplicate_rows(df),
            memory_usage: df.estimated_size() as f64 / BYTES_PER_MB,
        }
    }

    /// Rows whose full value tuple repeats an earlier row.
    pub fn duplicate_rows(df: &DataFrame) -> usize {
        if df.height() < 2 {
            return 0;
        }
        match df.unique::<&str, &str>(None, UniqueKeepStrategy::First, None) {
            Ok(unique) => df.height() - unique.height(),
            Err(e) => {
                debug!("Falling back to row keys for duplicate detection: {}", e);
                Self::duplicate_rows_by_key(df)
            }
        }
    }

    // Some nested types cannot be hashed by polars
    fn duplicate_rows_by_key(df: &DataFrame) -> usize {
        let columns: Vec<&Series> = df
            .get_columns()
            .iter()
            .map(|col| col.as_materialized_series())
            .collect();

        let mut seen = HashSet::with_capacity(df.height());
        let mut duplicates = 0;
        for row in 0..df.height() {
            let key: Vec<String> = columns
                .iter()
                .map(|series| {
                    series
                        .get(row)
                        .map(|value| format!("{value:?}"))
                        .unwrap_or_default()
                })
                .collect();
            if !seen.insert(key) {
                duplicates += 1;
            }
        }
        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::SchemaClassifier;

    fn summarize(df: &DataFrame) -> DatasetSummary {
        let classification = SchemaClassifier::classify(df).unwrap();
        StatisticalSummarizer::summarize(df, &classification)
    }

    #[test]
    fn test_numeric_stats_values() {
        let series = Series::new("v".into(), &[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]);
        let stats = StatisticalSummarizer::numeric_stats(&series).unwrap();

        assert_eq!(stats.count, 6);
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(100.0));
        assert_eq!(stats.p25, Some(2.25));
        assert_eq!(stats.p50, Some(3.5));
        assert_eq!(stats.p75, Some(4.75));
        assert!((stats.mean.unwrap() - 115.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_numeric_stats_ignores_missing() {
        let series = Series::new("v".into(), &[Some(2.0), None, Some(f64::NAN), Some(4.0)]);
        let stats = StatisticalSummarizer::numeric_stats(&series).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, Some(3.0));
    }

    #[test]
    fn test_fully_missing_numeric_is_no_data() {
        let series = Series::new("v".into(), &[None::<f64>, None, None]);
        let stats = StatisticalSummarizer::numeric_stats(&series).unwrap();
        assert_eq!(stats, NumericStats::no_data());
    }

    #[test]
    fn test_single_value_has_no_std() {
        let series = Series::new("v".into(), &[7i64]);
        let stats = StatisticalSummarizer::numeric_stats(&series).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.std, None);
        assert_eq!(stats.p75, Some(7.0));
    }

    #[test]
    fn test_categorical_mode_tie_breaks_first_seen() {
        let series = Series::new("c".into(), &[Some("b"), Some("a"), None, Some("a"), Some("b")]);
        let stats = StatisticalSummarizer::categorical_stats(&series);
        assert_eq!(stats.unique_count, 2);
        assert_eq!(stats.most_frequent, "b");
        assert_eq!(stats.frequency, 2);
    }

    #[test]
    fn test_categorical_no_data_sentinel() {
        let series = Series::new("c".into(), &[None::<&str>, None]);
        let stats = StatisticalSummarizer::categorical_stats(&series);
        assert_eq!(stats, CategoricalStats::no_data());
        assert_eq!(stats.most_frequent, "N/A");
    }

    #[test]
    fn test_quality_metrics_sum_to_hundred() {
        let df = df! {
            "a" => &[Some(1i64), None, Some(3), Some(3)],
            "b" => &[Some("x"), Some("y"), None, None],
        }
        .unwrap();

        let summary = summarize(&df);
        let quality = &summary.data_quality;
        assert!((quality.completeness - 62.5).abs() < 1e-9);
        assert!((quality.completeness + quality.missing_percentage - 100.0).abs() < 1e-9);
        assert!(quality.memory_usage >= 0.0);
    }

    #[test]
    fn test_duplicate_rows() {
        let df = df! {
            "a" => &[1i64, 1, 2, 1],
            "b" => &["x", "x", "y", "x"],
        }
        .unwrap();
        assert_eq!(StatisticalSummarizer::duplicate_rows(&df), 2);
        assert_eq!(StatisticalSummarizer::duplicate_rows_by_key(&df), 2);
    }

    #[test]
    fn test_zero_rows_summary() {
        let df = df! {
            "a" => Vec::<f64>::new(),
            "b" => Vec::<String>::new(),
        }
        .unwrap();

        let summary = summarize(&df);
        assert_eq!(summary.basic_stats["a"], NumericStats::no_data());
        assert_eq!(summary.categorical_stats["b"], CategoricalStats::no_data());
        assert_eq!(summary.data_quality.completeness, 0.0);
        assert_eq!(summary.data_quality.missing_percentage, 0.0);
        assert_eq!(summary.data_quality.duplicate_rows, 0);
    }
}
