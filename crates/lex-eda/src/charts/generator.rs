//! The fixed chart catalogue.
//!
//! Charts are emitted in this order: data type pie, missing values bar,
//! histograms, correlation heatmap, box plots, top-category bars. Each chart
//! is built independently; a failing chart is recorded in the catalogue's
//! error entry and the others are kept.

use super::spec::{BoxSummary, ChartCatalog, ChartSpec, HistogramBin};
use crate::config::AnalysisConfig;
use crate::profiler::statistics::{
    count_outliers, distinct_count, iqr_fences, quantile_sorted, rank_frequencies, sorted_copy,
};
use crate::types::{ColumnClassification, CorrelationMatrix};
use crate::utils::{numeric_values, string_values};
use anyhow::{Context, Result, anyhow};
use polars::prelude::*;
use tracing::{debug, warn};

pub struct ChartGenerator;

impl ChartGenerator {
    /// Build the chart catalogue for a classified dataset.
    ///
    /// `correlations` must be the matrix reported alongside the charts so
    /// the heatmap shows exactly the reported coefficients.
    pub fn generate(
        df: &DataFrame,
        classification: &ColumnClassification,
        correlations: Option<&CorrelationMatrix>,
        config: &AnalysisConfig,
    ) -> ChartCatalog {
        let mut catalog = ChartCatalog::default();

        Self::emit(&mut catalog, "data_types_pie", Self::data_types_pie(classification));
        Self::emit(&mut catalog, "missing_values_bar", Self::missing_values_bar(classification));

        let numeric = classification.numeric();

        let mut index = 1;
        for name in numeric.iter().take(config.max_histograms) {
            let chart = Self::histogram(df, name, config.max_histogram_bins);
            if Self::emit(&mut catalog, &format!("histogram_{index}"), chart) {
                index += 1;
            }
        }

        if let Some(matrix) = correlations {
            Self::emit(&mut catalog, "correlation_heatmap", Self::heatmap(matrix));
        }

        let mut index = 1;
        for name in numeric.iter().take(config.max_boxplots) {
            let chart = Self::box_plot(df, name, config.iqr_multiplier);
            if Self::emit(&mut catalog, &format!("boxplot_{index}"), chart) {
                index += 1;
            }
        }

        let mut index = 1;
        for name in classification
            .categorical()
            .iter()
            .take(config.max_categorical_charts)
        {
            let chart = Self::top_categories(df, name, config.top_categories);
            if Self::emit(&mut catalog, &format!("categorical_{index}"), chart) {
                index += 1;
            }
        }

        debug!(charts = catalog.len(), "Generated chart catalogue");
        catalog
    }

    /// Insert a built chart. Returns whether a chart was emitted.
    fn emit(catalog: &mut ChartCatalog, id: &str, chart: Result<Option<ChartSpec>>) -> bool {
        match chart {
            Ok(Some(spec)) => {
                catalog.insert(id, spec);
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("Chart '{}' failed: {:#}", id, e);
                catalog.record_error(format!("{id}: {e:#}"));
                false
            }
        }
    }

    fn data_types_pie(classification: &ColumnClassification) -> Result<Option<ChartSpec>> {
        if classification.width() == 0 {
            return Ok(None);
        }
        let (labels, values) = classification.dtype_counts().into_iter().unzip();
        Ok(Some(ChartSpec::pie("Data Types Distribution", labels, values)))
    }

    fn missing_values_bar(classification: &ColumnClassification) -> Result<Option<ChartSpec>> {
        let mut missing: Vec<(String, usize)> = classification
            .columns
            .iter()
            .filter(|col| col.missing_count > 0)
            .map(|col| (col.name.clone(), col.missing_count))
            .collect();
        if missing.is_empty() {
            return Ok(None);
        }
        missing.sort_by(|a, b| b.1.cmp(&a.1));

        let (x, y) = missing.into_iter().unzip();
        Ok(Some(
            ChartSpec::bar("Missing Values by Column", x, y)
                .with_x_label("Columns")
                .with_y_label("Missing Count"),
        ))
    }

    fn histogram(df: &DataFrame, name: &str, max_bins: usize) -> Result<Option<ChartSpec>> {
        let values = Self::column_values(df, name)?;
        if values.is_empty() {
            return Ok(None);
        }

        let bin_count = max_bins.min(distinct_count(&values));
        let bins = build_histogram(&sorted_copy(&values), bin_count);

        Ok(Some(
            ChartSpec::histogram(format!("Distribution of {name}"), values, bins)
                .with_x_label(name),
        ))
    }

    fn heatmap(matrix: &CorrelationMatrix) -> Result<Option<ChartSpec>> {
        if matrix.len() < 2 {
            return Ok(None);
        }
        Ok(Some(ChartSpec::heatmap(
            "Correlation Matrix",
            matrix.columns.clone(),
            matrix.values.clone(),
        )))
    }

    fn box_plot(df: &DataFrame, name: &str, multiplier: f64) -> Result<Option<ChartSpec>> {
        let values = Self::column_values(df, name)?;
        if values.is_empty() {
            return Ok(None);
        }

        let sorted = sorted_copy(&values);
        let summary = box_summary(&sorted, multiplier)
            .ok_or_else(|| anyhow!("could not compute quartiles for '{name}'"))?;

        Ok(Some(
            ChartSpec::box_plot(format!("Box Plot - {name} (Outlier Detection)"), values, summary)
                .with_y_label(name),
        ))
    }

    fn top_categories(df: &DataFrame, name: &str, top: usize) -> Result<Option<ChartSpec>> {
        let column = df
            .column(name)
            .with_context(|| format!("column '{name}' not found"))?;
        let ranked = rank_frequencies(string_values(column.as_materialized_series()));
        if ranked.is_empty() {
            return Ok(None);
        }

        let (x, y) = ranked.into_iter().take(top).unzip();
        Ok(Some(
            ChartSpec::bar(format!("Top Categories in {name}"), x, y)
                .with_x_label(name)
                .with_y_label("Count"),
        ))
    }

    fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
        let column = df
            .column(name)
            .with_context(|| format!("column '{name}' not found"))?;
        numeric_values(column.as_materialized_series())
            .with_context(|| format!("column '{name}' is not numeric"))
    }
}

/// Equal-width bins over sorted values.
///
/// A column with a single distinct value yields one bin holding every value.
fn build_histogram(sorted: &[f64], bins: usize) -> Vec<HistogramBin> {
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };

    if bins <= 1 || max == min {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: sorted.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in sorted {
        let index = (((value - min) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            start: min + idx as f64 * width,
            end: if idx + 1 == bins {
                max
            } else {
                min + (idx as f64 + 1.0) * width
            },
            count,
        })
        .collect()
}

fn box_summary(sorted: &[f64], multiplier: f64) -> Option<BoxSummary> {
    let fences = iqr_fences(sorted, multiplier)?;
    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|v| *v >= fences.lower)
        .unwrap_or(fences.q1);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|v| *v <= fences.upper)
        .unwrap_or(fences.q3);

    Some(BoxSummary {
        min: *sorted.first()?,
        q1: fences.q1,
        median: quantile_sorted(sorted, 0.5)?,
        q3: fences.q3,
        max: *sorted.last()?,
        lower_fence: fences.lower,
        upper_fence: fences.upper,
        lower_whisker,
        upper_whisker,
        outlier_count: count_outliers(sorted, &fences),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartData;
    use crate::profiler::SchemaClassifier;
    use crate::summary::correlation_matrix;

    fn catalog_of(df: &DataFrame) -> ChartCatalog {
        let classification = SchemaClassifier::classify(df).unwrap();
        let correlations = correlation_matrix(df, &classification);
        ChartGenerator::generate(
            df,
            &classification,
            correlations.as_ref(),
            &AnalysisConfig::default(),
        )
    }

    #[test]
    fn test_chart_order_and_ids() {
        let df = df! {
            "a" => &[Some(1.0), Some(2.0), None, Some(4.0)],
            "b" => &[4i64, 3, 2, 1],
            "label" => &["x", "y", "x", "z"],
        }
        .unwrap();

        let catalog = catalog_of(&df);
        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(
            ids,
            vec![
                "data_types_pie",
                "missing_values_bar",
                "histogram_1",
                "histogram_2",
                "correlation_heatmap",
                "boxplot_1",
                "boxplot_2",
                "categorical_1",
            ]
        );
        assert!(catalog.error.is_none());
    }

    #[test]
    fn test_indices_skip_empty_columns_only() {
        let df = df! {
            "empty" => &[None::<f64>, None, None],
            "x" => &[1.0, 2.0, 3.0],
            "y" => &[3.0, 1.0, 2.0],
        }
        .unwrap();

        let catalog = catalog_of(&df);
        assert_eq!(
            catalog.ids_with_prefix("histogram_").collect::<Vec<_>>(),
            vec!["histogram_1", "histogram_2"]
        );
        assert_eq!(
            catalog.get("histogram_1").unwrap().title,
            "Distribution of x"
        );
        assert_eq!(catalog.ids_with_prefix("boxplot_").count(), 2);
    }

    #[test]
    fn test_chart_caps() {
        let df = df! {
            "n1" => &[1.0, 2.0],
            "n2" => &[1.0, 3.0],
            "n3" => &[1.0, 4.0],
            "n4" => &[1.0, 5.0],
            "n5" => &[1.0, 6.0],
            "c1" => &["a", "b"],
            "c2" => &["a", "b"],
            "c3" => &["a", "b"],
        }
        .unwrap();

        let catalog = catalog_of(&df);
        assert_eq!(catalog.ids_with_prefix("histogram_").count(), 4);
        assert_eq!(catalog.ids_with_prefix("boxplot_").count(), 3);
        assert_eq!(catalog.ids_with_prefix("categorical_").count(), 2);
    }

    #[test]
    fn test_missing_bar_omitted_when_complete() {
        let df = df! { "x" => &[1i64, 2, 3] }.unwrap();
        let catalog = catalog_of(&df);
        assert!(!catalog.contains("missing_values_bar"));
        assert!(!catalog.contains("correlation_heatmap"));
    }

    #[test]
    fn test_missing_bar_sorted_descending() {
        let df = df! {
            "few" => &[Some(1i64), None, Some(3), Some(4)],
            "many" => &[None::<&str>, None, Some("a"), None],
        }
        .unwrap();

        let catalog = catalog_of(&df);
        match &catalog.get("missing_values_bar").unwrap().data {
            ChartData::Bar { x, y } => {
                assert_eq!(x, &vec!["many".to_string(), "few".to_string()]);
                assert_eq!(y, &vec![3, 1]);
            }
            other => panic!("unexpected chart data: {other:?}"),
        }
    }

    #[test]
    fn test_histogram_bins_capped_by_distinct_values() {
        let df = df! { "x" => &[1.0, 1.0, 2.0, 2.0, 3.0] }.unwrap();
        let catalog = catalog_of(&df);
        match &catalog.get("histogram_1").unwrap().data {
            ChartData::Histogram { bin_count, bins, .. } => {
                assert_eq!(*bin_count, 3);
                assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
            }
            other => panic!("unexpected chart data: {other:?}"),
        }
    }

    #[test]
    fn test_heatmap_matches_correlations() {
        let df = df! {
            "x" => &[1.0, 2.0, 3.0],
            "y" => &[2.0, 4.0, 7.0],
        }
        .unwrap();
        let classification = SchemaClassifier::classify(&df).unwrap();
        let matrix = correlation_matrix(&df, &classification).unwrap();
        let catalog = ChartGenerator::generate(
            &df,
            &classification,
            Some(&matrix),
            &AnalysisConfig::default(),
        );

        match &catalog.get("correlation_heatmap").unwrap().data {
            ChartData::Heatmap { z, x, .. } => {
                assert_eq!(z, &matrix.values);
                assert_eq!(x, &matrix.columns);
            }
            other => panic!("unexpected chart data: {other:?}"),
        }
    }

    #[test]
    fn test_categorical_top_values() {
        let df = df! { "c" => &["a", "b", "b", "c", "b", "a"] }.unwrap();
        let config = AnalysisConfig::builder().top_categories(2).build().unwrap();
        let classification = SchemaClassifier::classify(&df).unwrap();
        let catalog = ChartGenerator::generate(&df, &classification, None, &config);

        let chart = catalog.get("categorical_1").unwrap();
        assert_eq!(chart.title, "Top Categories in c");
        match &chart.data {
            ChartData::Bar { x, y } => {
                assert_eq!(x, &vec!["b".to_string(), "a".to_string()]);
                assert_eq!(y, &vec![3, 2]);
            }
            other => panic!("unexpected chart data: {other:?}"),
        }
    }

    #[test]
    fn test_box_summary_whiskers() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = box_summary(&sorted, 1.5).unwrap();
        assert_eq!(summary.outlier_count, 1);
        assert_eq!(summary.upper_whisker, 5.0);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.median, 3.5);
    }

    #[test]
    fn test_build_histogram_single_value() {
        let bins = build_histogram(&[4.0, 4.0, 4.0], 1);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn test_build_histogram_tiny_range_keeps_bins() {
        let bins = build_histogram(&[1e-20, 2e-20, 3e-20], 3);
        assert_eq!(bins.len(), 3);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert!(bins.iter().all(|b| b.count == 1));
        assert_eq!(bins[0].start, 1e-20);
        assert_eq!(bins[2].end, 3e-20);
    }
}
