use crate::profiler::statistics::pearson;
use crate::types::{ColumnClassification, CorrelationMatrix};
use crate::utils::numeric_options;
use polars::prelude::*;
use tracing::warn;

/// Pearson correlation matrix over all numeric columns.
///
/// `None` with fewer than two numeric columns. The diagonal is exactly 1.0,
/// or `None` for a column with fewer than two values or zero variance.
pub fn correlation_matrix(
    df: &DataFrame,
    classification: &ColumnClassification,
) -> Option<CorrelationMatrix> {
    let names = classification.numeric();
    if names.len() < 2 {
        return None;
    }

    let columns: Vec<Vec<Option<f64>>> = names
        .iter()
        .map(|name| {
            df.column(name)
                .and_then(|col| numeric_options(col.as_materialized_series()))
                .unwrap_or_else(|e| {
                    warn!("Correlation input unavailable for '{}': {}", name, e);
                    vec![None; df.height()]
                })
        })
        .collect();

    let n = columns.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        values[i][i] = pearson(&columns[i], &columns[i]).map(|_| 1.0);
        for j in (i + 1)..n {
            let r = pearson(&columns[i], &columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Some(CorrelationMatrix {
        columns: names.into_iter().map(str::to_string).collect(),
        values,
    })
}
