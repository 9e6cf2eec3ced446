//! Column construction from loosely typed cells (JSON values, spreadsheet
//! cells).

use chrono::DateTime;
use polars::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
}

impl Cell {
    fn render(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Int(v) => Some(v.to_string()),
            Self::Float(v) => Some(v.to_string()),
            Self::Bool(v) => Some(v.to_string()),
            Self::Text(v) => Some(v.clone()),
            Self::Timestamp(ms) => Some(
                DateTime::from_timestamp_millis(*ms)
                    .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| ms.to_string()),
            ),
        }
    }
}

/// Build a column whose type is the narrowest one that fits every
/// non-null cell: Int64, Float64, Boolean, Datetime(ms), else String.
pub(crate) fn build_column(name: &str, cells: &[Cell]) -> PolarsResult<Column> {
    let present = || cells.iter().filter(|c| !matches!(c, Cell::Null));
    let any_present = present().next().is_some();
    let name: PlSmallStr = name.into();

    let series = if any_present && present().all(|c| matches!(c, Cell::Int(_))) {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                Cell::Int(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(name, values)
    } else if any_present && present().all(|c| matches!(c, Cell::Int(_) | Cell::Float(_))) {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Cell::Int(v) => Some(*v as f64),
                Cell::Float(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(name, values)
    } else if any_present && present().all(|c| matches!(c, Cell::Bool(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Cell::Bool(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(name, values)
    } else if any_present && present().all(|c| matches!(c, Cell::Timestamp(_))) {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                Cell::Timestamp(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(name, values).cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
    } else {
        let values: Vec<Option<String>> = cells.iter().map(Cell::render).collect();
        Series::new(name, values)
    };

    Ok(series.into())
}
