use crate::charts::ChartCatalog;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sentinel reported as the most frequent value of a column with no data.
pub const NO_DATA_SENTINEL: &str = "N/A";

// ============================================================================
// Column classification
// ============================================================================

/// Analysis group a column belongs to. Every column gets exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Datetime,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Datetime => "datetime",
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-column facts produced by the schema classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    /// Declared storage type, e.g. `i64`, `f64`, `str`, `datetime[μs]`.
    pub dtype: String,
    pub kind: ColumnKind,
    /// Nulls, plus NaN in floating-point columns.
    pub missing_count: usize,
}

/// Total classification of a dataset's columns, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClassification {
    pub rows: usize,
    pub columns: Vec<ColumnSchema>,
}

impl ColumnClassification {
    /// Column names of the given kind, in column order.
    pub fn names_of(&self, kind: ColumnKind) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|col| col.kind == kind)
            .map(|col| col.name.as_str())
            .collect()
    }

    pub fn numeric(&self) -> Vec<&str> {
        self.names_of(ColumnKind::Numeric)
    }

    pub fn categorical(&self) -> Vec<&str> {
        self.names_of(ColumnKind::Categorical)
    }

    pub fn datetime(&self) -> Vec<&str> {
        self.names_of(ColumnKind::Datetime)
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.columns
            .iter()
            .find(|col| col.name == name)
            .map(|col| col.kind)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn total_cells(&self) -> usize {
        self.rows.saturating_mul(self.columns.len())
    }

    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|col| col.missing_count).sum()
    }

    /// Number of columns per declared storage type, most common first.
    ///
    /// Types with equal counts keep the order in which they first appear.
    pub fn dtype_counts(&self) -> IndexMap<String, usize> {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for col in &self.columns {
            *counts.entry(col.dtype.clone()).or_insert(0) += 1;
        }
        // stable sort keeps first-appearance order among ties
        counts.sort_by(|_, a, _, b| b.cmp(a));
        counts
    }
}

// ============================================================================
// Summary statistics
// ============================================================================

/// Descriptive statistics of one numeric column.
///
/// Every field except `count` is `None` when the column has no non-missing
/// values; `std` is also `None` for a single value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub p25: Option<f64>,
    #[serde(rename = "50%")]
    pub p50: Option<f64>,
    #[serde(rename = "75%")]
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

impl NumericStats {
    /// The entry recorded for a column without any non-missing value.
    pub fn no_data() -> Self {
        Self {
            count: 0,
            mean: None,
            std: None,
            min: None,
            p25: None,
            p50: None,
            p75: None,
            max: None,
        }
    }

    pub fn has_data(&self) -> bool {
        self.count > 0
    }
}

/// Frequency statistics of one categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalStats {
    pub unique_count: usize,
    pub most_frequent: String,
    pub frequency: usize,
}

impl CategoricalStats {
    pub fn no_data() -> Self {
        Self {
            unique_count: 0,
            most_frequent: NO_DATA_SENTINEL.to_string(),
            frequency: 0,
        }
    }
}

/// Dataset-wide quality metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Percentage of non-missing cells (0 when the dataset has no cells).
    pub completeness: f64,
    /// Percentage of missing cells (0 when the dataset has no cells).
    pub missing_percentage: f64,
    /// Rows whose full value tuple repeats an earlier row.
    pub duplicate_rows: usize,
    /// Estimated in-memory size in megabytes.
    pub memory_usage: f64,
}

/// Output of the statistical summarizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub basic_stats: IndexMap<String, NumericStats>,
    pub categorical_stats: IndexMap<String, CategoricalStats>,
    pub data_quality: QualityMetrics,
    pub dtype_counts: IndexMap<String, usize>,
}

// ============================================================================
// Correlation
// ============================================================================

/// Symmetric Pearson correlation matrix over numeric columns.
///
/// `values[i][j]` is the coefficient between `columns[i]` and `columns[j]`,
/// or `None` when it is not computable (constant column, too few pairs).
/// Serializes as a nested `{column: {column: value}}` object.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.columns.len();
        (0..n).all(|i| (0..n).all(|j| self.values[i][j] == self.values[j][i]))
    }
}

impl Serialize for CorrelationMatrix {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut outer = serializer.serialize_map(Some(self.columns.len()))?;
        for (i, name) in self.columns.iter().enumerate() {
            let row: IndexMap<&str, Option<f64>> = self
                .columns
                .iter()
                .zip(self.values[i].iter())
                .map(|(other, value)| (other.as_str(), *value))
                .collect();
            outer.serialize_entry(name, &row)?;
        }
        outer.end()
    }
}

// ============================================================================
// Insights
// ============================================================================

/// Human-readable notes derived from the statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub data_quality: Vec<String>,
    pub patterns: Vec<String>,
    pub recommendations: Vec<String>,
    /// Set when one or more rules failed to evaluate; other notes are kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Insights {
    /// Record a rule failure, folding it into the single error note.
    pub fn record_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.error = Some(match self.error.take() {
            Some(existing) => format!("{existing}; {message}"),
            None => format!("Error generating insights: {message}"),
        });
    }
}

// ============================================================================
// Report
// ============================================================================

/// The complete analysis of one dataset.
///
/// This is the only artifact the engine returns. It serializes to plain JSON:
/// every statistic is a finite number, `null`, or a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// `(rows, columns)`
    pub shape: (usize, usize),
    pub columns: Vec<String>,
    pub dtypes: IndexMap<String, String>,
    pub dtype_counts: IndexMap<String, usize>,
    pub missing_values: IndexMap<String, usize>,
    pub total_missing: usize,
    pub basic_stats: IndexMap<String, NumericStats>,
    pub categorical_stats: IndexMap<String, CategoricalStats>,
    /// First rows of the dataset as `{column: value}` records.
    pub head: Vec<IndexMap<String, serde_json::Value>>,
    pub data_quality: QualityMetrics,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub datetime_columns: Vec<String>,
    pub visualizations: ChartCatalog,
    /// Present only when the dataset has at least two numeric columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlations: Option<CorrelationMatrix>,
    pub insights: Insights,
    /// RFC 3339 generation time.
    pub analysis_timestamp: String,
}

impl AnalysisReport {
    pub fn rows(&self) -> usize {
        self.shape.0
    }

    pub fn width(&self) -> usize {
        self.shape.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(name: &str, dtype: &str, kind: ColumnKind, missing: usize) -> ColumnSchema {
        ColumnSchema {
            name: name.to_string(),
            dtype: dtype.to_string(),
            kind,
            missing_count: missing,
        }
    }

    #[test]
    fn test_classification_groups_keep_column_order() {
        let classification = ColumnClassification {
            rows: 3,
            columns: vec![
                schema("b", "f64", ColumnKind::Numeric, 0),
                schema("name", "str", ColumnKind::Categorical, 1),
                schema("a", "i64", ColumnKind::Numeric, 2),
            ],
        };

        assert_eq!(classification.numeric(), vec!["b", "a"]);
        assert_eq!(classification.categorical(), vec!["name"]);
        assert!(classification.datetime().is_empty());
        assert_eq!(classification.total_missing(), 3);
        assert_eq!(classification.total_cells(), 9);
        assert_eq!(classification.kind_of("a"), Some(ColumnKind::Numeric));
        assert_eq!(classification.kind_of("zzz"), None);
    }

    #[test]
    fn test_dtype_counts_most_common_first_ties_by_appearance() {
        let classification = ColumnClassification {
            rows: 1,
            columns: vec![
                schema("a", "str", ColumnKind::Categorical, 0),
                schema("b", "i64", ColumnKind::Numeric, 0),
                schema("c", "i64", ColumnKind::Numeric, 0),
                schema("d", "bool", ColumnKind::Categorical, 0),
            ],
        };

        let counts: Vec<(String, usize)> = classification.dtype_counts().into_iter().collect();
        assert_eq!(
            counts,
            vec![
                ("i64".to_string(), 2),
                ("str".to_string(), 1),
                ("bool".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_numeric_no_data_serializes_nulls() {
        let json = serde_json::to_value(NumericStats::no_data()).unwrap();
        assert_eq!(json["count"], 0);
        assert!(json["mean"].is_null());
        assert!(json["25%"].is_null());
    }

    #[test]
    fn test_correlation_matrix_serializes_nested() {
        let matrix = CorrelationMatrix {
            columns: vec!["x".to_string(), "y".to_string()],
            values: vec![vec![Some(1.0), Some(-0.5)], vec![Some(-0.5), Some(1.0)]],
        };
        assert!(matrix.is_symmetric());

        let json = serde_json::to_value(&matrix).unwrap();
        assert_eq!(json["x"]["y"], -0.5);
        assert_eq!(json["y"]["y"], 1.0);
        assert_eq!(matrix.get("y", "x"), Some(-0.5));
    }

    #[test]
    fn test_insights_single_error_note() {
        let mut insights = Insights::default();
        insights.record_error("rule a failed");
        insights.record_error("rule b failed");

        let error = insights.error.unwrap();
        assert!(error.starts_with("Error generating insights"));
        assert!(error.contains("rule a failed"));
        assert!(error.contains("rule b failed"));
    }
}
