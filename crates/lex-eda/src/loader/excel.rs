//! Spreadsheet datasets (xlsx, xlsm, xls, ods) via calamine.

use super::cells::{Cell, build_column};
use super::unique_names;
use crate::error::LoadError;
use calamine::{Data, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Days between the Excel epoch (1899-12-30) and the Unix epoch.
const EXCEL_UNIX_EPOCH_DAYS: f64 = 25_569.0;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Read the first sheet; its first row is the header.
pub(crate) fn read_excel(path: &Path) -> Result<DataFrame, LoadError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| LoadError::Decode(format!("Unable to read Excel file: {e}")))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => {
            range.map_err(|e| LoadError::Decode(format!("Unable to read first sheet: {e}")))?
        }
        None => return Ok(DataFrame::empty()),
    };

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };

    let headers: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| match to_cell(cell) {
            Cell::Null => format!("Unnamed: {idx}"),
            Cell::Text(s) => s.trim().to_string(),
            other => render_header(&other),
        })
        .collect();
    let headers = unique_names(headers.iter().map(String::as_str));

    let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, cells) in columns.iter_mut().enumerate() {
            cells.push(row.get(idx).map(to_cell).unwrap_or(Cell::Null));
        }
    }
    debug!(
        rows = columns.first().map(Vec::len).unwrap_or(0),
        columns = headers.len(),
        "Read first worksheet"
    );

    let columns = headers
        .iter()
        .zip(columns.iter())
        .map(|(name, cells)| build_column(name, &integral_floats_as_ints(cells)))
        .collect::<PolarsResult<Vec<_>>>()?;
    Ok(DataFrame::new(columns)?)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Null,
        Data::Int(v) => Cell::Int(*v),
        Data::Float(v) => Cell::Float(*v),
        Data::Bool(v) => Cell::Bool(*v),
        Data::String(s) if s.trim().is_empty() => Cell::Null,
        Data::String(s) => Cell::Text(s.clone()),
        Data::DateTime(dt) if dt.is_duration() => Cell::Float(dt.as_f64()),
        Data::DateTime(dt) => Cell::Timestamp(serial_to_unix_ms(dt.as_f64())),
        Data::DateTimeIso(s) => parse_iso(s)
            .map(Cell::Timestamp)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("{e:?}")),
    }
}

fn render_header(cell: &Cell) -> String {
    match cell {
        Cell::Int(v) => v.to_string(),
        Cell::Float(v) => v.to_string(),
        Cell::Bool(v) => v.to_string(),
        Cell::Timestamp(v) => v.to_string(),
        Cell::Text(s) => s.clone(),
        Cell::Null => String::new(),
    }
}

pub(crate) fn serial_to_unix_ms(serial: f64) -> i64 {
    ((serial - EXCEL_UNIX_EPOCH_DAYS) * MS_PER_DAY).round() as i64
}

fn parse_iso(s: &str) -> Option<i64> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Spreadsheets store every number as a float; a column whose numbers are
/// all integral is read as integers.
fn integral_floats_as_ints(cells: &[Cell]) -> Vec<Cell> {
    let integral = cells.iter().all(|c| match c {
        Cell::Float(v) => v.fract() == 0.0 && v.abs() < i64::MAX as f64,
        Cell::Int(_) | Cell::Null => true,
        _ => false,
    });
    if !integral {
        return cells.to_vec();
    }
    cells
        .iter()
        .map(|c| match c {
            Cell::Float(v) => Cell::Int(*v as i64),
            other => other.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_to_unix_ms() {
        assert_eq!(serial_to_unix_ms(25_569.0), 0);
        // 2024-01-01 00:00:00 UTC
        assert_eq!(serial_to_unix_ms(45_292.0), 1_704_067_200_000);
        assert_eq!(serial_to_unix_ms(25_569.5), 43_200_000);
    }

    #[test]
    fn test_cell_mapping() {
        assert_eq!(to_cell(&Data::Empty), Cell::Null);
        assert_eq!(to_cell(&Data::String("  ".into())), Cell::Null);
        assert_eq!(to_cell(&Data::String("north".into())), Cell::Text("north".into()));
        assert_eq!(to_cell(&Data::Bool(true)), Cell::Bool(true));
        assert_eq!(
            to_cell(&Data::DateTimeIso("2024-01-01".into())),
            Cell::Timestamp(1_704_067_200_000)
        );
    }

    #[test]
    fn test_integral_floats_become_ints() {
        let cells = integral_floats_as_ints(&[Cell::Float(1.0), Cell::Null, Cell::Float(3.0)]);
        assert_eq!(cells, vec![Cell::Int(1), Cell::Null, Cell::Int(3)]);

        let cells = integral_floats_as_ints(&[Cell::Float(1.5), Cell::Float(3.0)]);
        assert_eq!(cells, vec![Cell::Float(1.5), Cell::Float(3.0)]);
    }

    #[test]
    fn test_corrupt_workbook_is_decode_error() {
        let dir = std::env::temp_dir().join(format!("lex-eda-excel-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.xlsx");
        std::fs::write(&path, b"this is not a zip archive").unwrap();

        let err = read_excel(&path).unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }
}
