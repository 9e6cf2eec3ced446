//! Report assembly: pure aggregation of the component outputs.

use crate::charts::ChartCatalog;
use crate::types::{
    AnalysisReport, ColumnClassification, CorrelationMatrix, DatasetSummary, Insights,
};
use crate::utils::any_value_to_json;
use chrono::Local;
use indexmap::IndexMap;
use polars::prelude::*;
use serde_json::Value;

pub(crate) struct ComponentOutputs {
    pub summary: DatasetSummary,
    pub charts: ChartCatalog,
    pub insights: Insights,
    pub correlations: Option<CorrelationMatrix>,
}

pub(crate) fn assemble(
    df: &DataFrame,
    classification: &ColumnClassification,
    outputs: ComponentOutputs,
    preview_rows: usize,
) -> AnalysisReport {
    let to_owned = |names: Vec<&str>| names.into_iter().map(str::to_string).collect::<Vec<_>>();

    AnalysisReport {
        shape: (df.height(), df.width()),
        columns: classification.columns.iter().map(|c| c.name.clone()).collect(),
        dtypes: classification
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.dtype.clone()))
            .collect(),
        dtype_counts: outputs.summary.dtype_counts,
        missing_values: classification
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.missing_count))
            .collect(),
        total_missing: classification.total_missing(),
        basic_stats: outputs.summary.basic_stats,
        categorical_stats: outputs.summary.categorical_stats,
        head: preview(df, preview_rows),
        data_quality: outputs.summary.data_quality,
        numeric_columns: to_owned(classification.numeric()),
        categorical_columns: to_owned(classification.categorical()),
        datetime_columns: to_owned(classification.datetime()),
        visualizations: outputs.charts,
        correlations: outputs.correlations,
        insights: outputs.insights,
        analysis_timestamp: Local::now().to_rfc3339(),
    }
}

/// First `rows` rows as `{column: value}` records, in row order.
pub(crate) fn preview(df: &DataFrame, rows: usize) -> Vec<IndexMap<String, Value>> {
    let columns = df.get_columns();
    (0..rows.min(df.height()))
        .map(|row| {
            columns
                .iter()
                .map(|col| {
                    let value = col
                        .as_materialized_series()
                        .get(row)
                        .map(|v| any_value_to_json(&v))
                        .unwrap_or(Value::Null);
                    (col.name().to_string(), value)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_rows_in_order() {
        let df = df! {
            "id" => &[1i64, 2, 3],
            "name" => &[Some("a"), None, Some("c")],
        }
        .unwrap();

        let head = preview(&df, 2);
        assert_eq!(head.len(), 2);
        assert_eq!(head[0]["id"], Value::from(1));
        assert_eq!(head[1]["name"], Value::Null);
        assert_eq!(head[0].keys().collect::<Vec<_>>(), vec!["id", "name"]);
    }

    #[test]
    fn test_preview_shorter_than_limit() {
        let df = df! { "x" => &[1.5] }.unwrap();
        assert_eq!(preview(&df, 5).len(), 1);
        assert!(preview(&df, 0).is_empty());
    }
}
