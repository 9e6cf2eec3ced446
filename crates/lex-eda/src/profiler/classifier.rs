//! Schema classification: one analysis group per column.

use crate::error::{AnalysisError, Result};
use crate::types::{ColumnClassification, ColumnKind, ColumnSchema};
use crate::utils::{is_datetime_dtype, is_numeric_dtype, missing_count};
use polars::prelude::*;
use tracing::debug;

/// Assigns every column of a dataset to exactly one [`ColumnKind`].
pub struct SchemaClassifier;

impl SchemaClassifier {
    /// Classify all columns by their declared storage type.
    ///
    /// A fully-missing column still gets the kind of its storage type.
    /// Fails only when the dataset has no columns.
    pub fn classify(df: &DataFrame) -> Result<ColumnClassification> {
        if df.width() == 0 {
            return Err(AnalysisError::EmptyDataset);
        }

        let columns = df
            .get_columns()
            .iter()
            .map(|column| {
                let series = column.as_materialized_series();
                let dtype = series.dtype();
                ColumnSchema {
                    name: series.name().to_string(),
                    dtype: dtype.to_string(),
                    kind: Self::kind_of(dtype),
                    missing_count: missing_count(series),
                }
            })
            .collect::<Vec<_>>();

        let classification = ColumnClassification {
            rows: df.height(),
            columns,
        };

        debug!(
            numeric = classification.numeric().len(),
            categorical = classification.categorical().len(),
            datetime = classification.datetime().len(),
            "Classified columns"
        );

        Ok(classification)
    }

    /// Kind for a storage type. Text, boolean, enumerated and any other
    /// non-numeric, non-temporal type is categorical.
    pub fn kind_of(dtype: &DataType) -> ColumnKind {
        if is_numeric_dtype(dtype) {
            ColumnKind::Numeric
        } else if is_datetime_dtype(dtype) {
            ColumnKind::Datetime
        } else {
            ColumnKind::Categorical
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_mixed_frame() {
        let df = df! {
            "id" => &[1i64, 2, 3],
            "price" => &[Some(1.5), None, Some(f64::NAN)],
            "region" => &["n", "s", "n"],
            "active" => &[true, false, true],
        }
        .unwrap();

        let classification = SchemaClassifier::classify(&df).unwrap();

        assert_eq!(classification.rows, 3);
        assert_eq!(classification.numeric(), vec!["id", "price"]);
        assert_eq!(classification.categorical(), vec!["region", "active"]);
        assert!(classification.datetime().is_empty());
        assert_eq!(classification.columns[1].missing_count, 2);
        assert_eq!(classification.total_missing(), 2);
    }

    #[test]
    fn test_classify_datetime_column() {
        let dates = Series::new("day".into(), &[0i32, 1, 2])
            .cast(&DataType::Date)
            .unwrap();
        let df = DataFrame::new(vec![dates.into()]).unwrap();

        let classification = SchemaClassifier::classify(&df).unwrap();
        assert_eq!(classification.datetime(), vec!["day"]);
        assert_eq!(classification.columns[0].dtype, "date");
    }

    #[test]
    fn test_fully_missing_column_keeps_storage_kind() {
        let series = Series::new("empty".into(), &[None::<f64>, None]);
        let df = DataFrame::new(vec![series.into()]).unwrap();

        let classification = SchemaClassifier::classify(&df).unwrap();
        assert_eq!(classification.kind_of("empty"), Some(ColumnKind::Numeric));
        assert_eq!(classification.columns[0].missing_count, 2);
    }

    #[test]
    fn test_wide_integer_and_decimal_are_numeric() {
        let wide = Series::new("balance".into(), &[10i64, 20, 30])
            .cast(&DataType::Int128)
            .unwrap();
        let df = DataFrame::new(vec![wide.into()]).unwrap();

        let classification = SchemaClassifier::classify(&df).unwrap();
        assert_eq!(classification.numeric(), vec!["balance"]);
        assert_eq!(
            SchemaClassifier::kind_of(&DataType::Decimal(Some(10), Some(2))),
            ColumnKind::Numeric
        );
    }

    #[test]
    fn test_zero_columns_is_empty_dataset() {
        let df = DataFrame::empty();
        let err = SchemaClassifier::classify(&df).unwrap_err();
        assert!(err.is_empty_dataset());
    }

    #[test]
    fn test_zero_rows_is_fine() {
        let series = Series::new("x".into(), Vec::<i64>::new());
        let df = DataFrame::new(vec![series.into()]).unwrap();

        let classification = SchemaClassifier::classify(&df).unwrap();
        assert_eq!(classification.rows, 0);
        assert_eq!(classification.total_cells(), 0);
    }
}
