//! Dataset loading from CSV, JSON and Excel files.
//!
//! Every successful load returns a frame with at least one row and one
//! column, trimmed column names and no fully-empty rows or columns.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_eda::loader;
//!
//! let df = loader::load_path("uploads/sales.csv")?;
//! let df = loader::load("uploads/a1b2c3", ".xlsx")?;
//! ```

mod cells;
mod csv;
mod excel;
mod json;

use crate::error::LoadError;
use crate::utils::numeric_options;
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Extensions accepted by [`load`], lower-case and without the dot.
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["csv", "json", "xlsx", "xls", "xlsm", "ods"];

const EMPTY_FILE: &str = "The file appears to be empty or contains no readable data";
const EMPTY_AFTER_PRUNING: &str = "No valid data found after cleaning empty rows/columns";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
    Excel,
}

impl FileFormat {
    /// Resolve an extension such as `.CSV`, `csv` or `xlsx`.
    pub fn from_extension(extension: &str) -> Result<Self, LoadError> {
        let normalized = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "xlsx" | "xls" | "xlsm" | "ods" => Ok(Self::Excel),
            _ => Err(LoadError::UnsupportedFormat(format!(".{normalized}"))),
        }
    }
}

/// Whether a file name carries one of the [`ALLOWED_EXTENSIONS`].
pub fn is_allowed_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Load a dataset, taking the format from `declared_extension` rather than
/// the path (uploads are often stored under generated names).
pub fn load(path: impl AsRef<Path>, declared_extension: &str) -> Result<DataFrame, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::FileNotFound(path.display().to_string()));
    }
    let format = FileFormat::from_extension(declared_extension)?;
    debug!("Loading {} as {:?}", path.display(), format);

    let df = match format {
        FileFormat::Csv => csv::read_csv(&std::fs::read(path)?)?,
        FileFormat::Json => json::read_json(&std::fs::read(path)?)?,
        FileFormat::Excel => excel::read_excel(path)?,
    };

    if df.height() == 0 || df.width() == 0 {
        return Err(LoadError::EmptyData(EMPTY_FILE.to_string()));
    }

    let df = prune_empty(normalize_column_names(df)?)?;
    if df.height() == 0 || df.width() == 0 {
        return Err(LoadError::EmptyData(EMPTY_AFTER_PRUNING.to_string()));
    }

    info!(
        rows = df.height(),
        columns = df.width(),
        "Loaded {}",
        path.display()
    );
    Ok(df)
}

/// Load a dataset, taking the format from the path's extension.
pub fn load_path(path: impl AsRef<Path>) -> Result<DataFrame, LoadError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_string();
    load(path, &extension)
}

/// Trim column names; names that collide afterwards get a `.N` suffix.
fn normalize_column_names(mut df: DataFrame) -> Result<DataFrame, LoadError> {
    let names = unique_names(df.get_column_names().iter().map(|name| name.trim()));
    df.set_column_names(names)?;
    Ok(df)
}

pub(crate) fn unique_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .map(|name| {
            let mut candidate = name.to_string();
            let mut suffix = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{name}.{suffix}");
                suffix += 1;
            }
            candidate
        })
        .collect()
}

/// Drop rows where every value is missing, then columns where every
/// remaining value is missing.
fn prune_empty(df: DataFrame) -> Result<DataFrame, LoadError> {
    let present: Vec<Vec<bool>> = df
        .get_columns()
        .iter()
        .map(|col| present_mask(col.as_materialized_series()))
        .collect::<PolarsResult<_>>()?;

    let keep: Vec<bool> = (0..df.height())
        .map(|row| present.iter().any(|mask| mask[row]))
        .collect();
    let dropped_rows = keep.iter().filter(|k| !**k).count();

    let df = if dropped_rows > 0 {
        df.filter(&BooleanChunked::from_slice("keep".into(), &keep))?
    } else {
        df
    };

    let kept_columns: Vec<Column> = df
        .get_columns()
        .iter()
        .filter(|col| {
            present_mask(col.as_materialized_series())
                .map(|mask| mask.iter().any(|p| *p))
                .unwrap_or(true)
        })
        .cloned()
        .collect();
    let dropped_columns = df.width() - kept_columns.len();

    if dropped_rows > 0 || dropped_columns > 0 {
        debug!(dropped_rows, dropped_columns, "Pruned empty rows and columns");
    }

    if dropped_columns == 0 {
        return Ok(df);
    }
    Ok(DataFrame::new(kept_columns)?)
}

fn present_mask(series: &Series) -> PolarsResult<Vec<bool>> {
    if crate::utils::is_float_dtype(series.dtype()) {
        return Ok(numeric_options(series)?
            .into_iter()
            .map(|v| v.is_some())
            .collect());
    }
    Ok(series
        .is_not_null()
        .into_iter()
        .map(|v| v.unwrap_or(false))
        .collect())
}
