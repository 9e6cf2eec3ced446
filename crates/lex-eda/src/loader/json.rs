//! JSON datasets.
//!
//! Accepted shapes:
//! - an array of record objects: `[{"a": 1}, {"a": 2}]`
//! - an object of equally long arrays: `{"a": [1, 2], "b": ["x", "y"]}`
//! - a single record object: `{"a": 1, "b": "x"}`

use super::cells::{Cell, build_column};
use super::csv::decode_text;
use crate::error::LoadError;
use indexmap::IndexMap;
use polars::prelude::*;
use serde_json::{Map, Value};

pub(crate) fn read_json(bytes: &[u8]) -> Result<DataFrame, LoadError> {
    let text = decode_text(bytes);
    if text.trim().is_empty() {
        return Ok(DataFrame::empty());
    }

    let value: Value = serde_json::from_str(&text)
        .map_err(|e| LoadError::Decode(format!("Invalid JSON format: {e}")))?;

    let columns = match value {
        Value::Array(items) => from_records(items)?,
        Value::Object(map) if !map.is_empty() && map.values().all(Value::is_array) => {
            from_column_arrays(map)?
        }
        Value::Object(map) => from_records(vec![Value::Object(map)])?,
        _ => {
            return Err(LoadError::Decode(
                "JSON structure not supported for analysis".to_string(),
            ));
        }
    };

    let columns = columns
        .iter()
        .map(|(name, cells)| build_column(name, cells))
        .collect::<PolarsResult<Vec<_>>>()?;
    Ok(DataFrame::new(columns)?)
}

fn from_records(items: Vec<Value>) -> Result<IndexMap<String, Vec<Cell>>, LoadError> {
    let mut columns: IndexMap<String, Vec<Cell>> = IndexMap::new();

    for (row, item) in items.into_iter().enumerate() {
        let Value::Object(record) = item else {
            return Err(LoadError::Decode(format!(
                "Expected an object at index {row}, found {}",
                kind_name(&item)
            )));
        };

        for (key, value) in record {
            // keys first seen in a later record are null for earlier rows
            columns
                .entry(key)
                .or_insert_with(|| vec![Cell::Null; row])
                .push(to_cell(value));
        }
        for cells in columns.values_mut() {
            if cells.len() < row + 1 {
                cells.push(Cell::Null);
            }
        }
    }

    Ok(columns)
}

fn from_column_arrays(map: Map<String, Value>) -> Result<IndexMap<String, Vec<Cell>>, LoadError> {
    let mut columns = IndexMap::new();
    let mut expected_len = None;

    for (key, value) in map {
        let Value::Array(items) = value else {
            continue;
        };
        match expected_len {
            None => expected_len = Some(items.len()),
            Some(len) if len != items.len() => {
                return Err(LoadError::Decode(format!(
                    "All arrays must be of the same length (column '{key}' has {}, expected {len})",
                    items.len()
                )));
            }
            Some(_) => {}
        }
        columns.insert(key, items.into_iter().map(to_cell).collect());
    }

    Ok(columns)
}

fn to_cell(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::Bool(b) => Cell::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Cell::Int(i),
            None => n.as_f64().map(Cell::Float).unwrap_or(Cell::Null),
        },
        Value::String(s) => Cell::Text(s),
        nested => Cell::Text(nested.to_string()),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_of_records_with_sparse_keys() {
        let df = read_json(br#"[{"a": 1, "b": "x"}, {"a": 2}, {"a": 3.5, "c": true}]"#).unwrap();
        assert_eq!(df.shape(), (3, 3));
        assert_eq!(df.get_column_names_str(), vec!["a", "b", "c"]);
        assert_eq!(df.column("a").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("b").unwrap().null_count(), 2);
        assert_eq!(df.column("c").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(df.column("c").unwrap().null_count(), 2);
    }

    #[test]
    fn test_object_of_arrays() {
        let df = read_json(br#"{"id": [1, 2, 3], "name": ["a", null, "c"]}"#).unwrap();
        assert_eq!(df.shape(), (3, 2));
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_single_record() {
        let df = read_json(br#"{"id": 7, "tags": ["x", "y"], "name": "solo"}"#).unwrap();
        assert_eq!(df.shape(), (1, 3));
        assert_eq!(df.column("tags").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_ragged_arrays_rejected() {
        let err = read_json(br#"{"a": [1, 2], "b": [1]}"#).unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let err = read_json(b"{not json").unwrap_err();
        assert!(err.to_string().contains("Invalid JSON format"));
    }

    #[test]
    fn test_scalar_root_unsupported() {
        let err = read_json(b"42").unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));

        let err = read_json(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }
}
