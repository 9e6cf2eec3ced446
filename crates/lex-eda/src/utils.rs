//! Shared helpers for reading column values out of a polars `DataFrame`.
//!
//! Every analysis stage funnels value extraction through these functions so
//! that "missing" means the same thing everywhere: nulls, plus NaN in
//! floating-point columns.

use polars::prelude::*;
use serde_json::Value;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer, float or fixed-point decimal).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::Int128
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
            | DataType::Decimal(_, _)
    )
}

#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is a temporal type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time | DataType::Duration(_)
    )
}

// =============================================================================
// Missing Values
// =============================================================================

/// Count missing entries: nulls, plus NaN for float columns.
pub fn missing_count(series: &Series) -> usize {
    let nulls = series.null_count();
    if !is_float_dtype(series.dtype()) {
        return nulls;
    }

    let nans = series
        .cast(&DataType::Float64)
        .ok()
        .and_then(|s| {
            s.f64()
                .ok()
                .map(|ca| ca.into_iter().flatten().filter(|v| v.is_nan()).count())
        })
        .unwrap_or(0);

    nulls + nans
}

// =============================================================================
// Value Extraction
// =============================================================================

/// Per-row numeric view of a column; missing entries are `None`.
pub fn numeric_options(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let casted = series.cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Non-missing numeric values of a column, in row order.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<f64>> {
    Ok(numeric_options(series)?.into_iter().flatten().collect())
}

/// Non-missing values of a column rendered as strings, in row order.
///
/// Types polars cannot cast to `String` (lists, structs) fall back to the
/// `AnyValue` display form.
pub fn string_values(series: &Series) -> Vec<String> {
    if let Ok(casted) = series.cast(&DataType::String)
        && let Ok(ca) = casted.str()
    {
        return ca.into_iter().flatten().map(str::to_string).collect();
    }

    (0..series.len())
        .filter_map(|idx| match series.get(idx) {
            Ok(AnyValue::Null) | Err(_) => None,
            Ok(value) => Some(value.to_string()),
        })
        .collect()
}

/// Replace a non-finite float by `None`.
#[inline]
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

// =============================================================================
// JSON Conversion
// =============================================================================

/// Convert a single cell into a JSON value for the preview rows.
///
/// Non-finite floats become `null`; temporal and nested values use their
/// display form.
pub fn any_value_to_json(value: &AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(*b),
        AnyValue::String(s) => Value::String((*s).to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::Int8(v) => Value::from(*v),
        AnyValue::Int16(v) => Value::from(*v),
        AnyValue::Int32(v) => Value::from(*v),
        AnyValue::Int64(v) => Value::from(*v),
        AnyValue::UInt8(v) => Value::from(*v),
        AnyValue::UInt16(v) => Value::from(*v),
        AnyValue::UInt32(v) => Value::from(*v),
        AnyValue::UInt64(v) => Value::from(*v),
        AnyValue::Float32(v) => float_to_json(f64::from(*v)),
        AnyValue::Float64(v) => float_to_json(*v),
        other => Value::String(other.to_string()),
    }
}

fn float_to_json(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_wide_and_decimal_dtypes_are_numeric() {
        assert!(is_numeric_dtype(&DataType::Int128));
        assert!(is_numeric_dtype(&DataType::Decimal(Some(10), Some(2))));
        assert!(is_numeric_dtype(&DataType::Decimal(None, None)));

        let wide = Series::new("balance".into(), &[1i64, 2, 3])
            .cast(&DataType::Int128)
            .unwrap();
        assert_eq!(numeric_values(&wide).unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_is_datetime_dtype() {
        assert!(is_datetime_dtype(&DataType::Date));
        assert!(is_datetime_dtype(&DataType::Datetime(
            TimeUnit::Milliseconds,
            None
        )));
        assert!(is_datetime_dtype(&DataType::Duration(TimeUnit::Milliseconds)));
        assert!(!is_datetime_dtype(&DataType::String));
    }

    #[test]
    fn test_missing_count_includes_nan() {
        let series = Series::new("x".into(), &[Some(1.0), None, Some(f64::NAN), Some(4.0)]);
        assert_eq!(missing_count(&series), 2);

        let series = Series::new("s".into(), &[Some("a"), None, Some("NaN")]);
        assert_eq!(missing_count(&series), 1);
    }

    #[test]
    fn test_numeric_values_drop_missing() {
        let series = Series::new("x".into(), &[Some(3i64), None, Some(1)]);
        assert_eq!(numeric_values(&series).unwrap(), vec![3.0, 1.0]);

        let series = Series::new("y".into(), &[Some(f64::NAN), Some(2.5)]);
        assert_eq!(numeric_options(&series).unwrap(), vec![None, Some(2.5)]);
    }

    #[test]
    fn test_string_values_of_booleans() {
        let series = Series::new("flag".into(), &[Some(true), None, Some(false)]);
        assert_eq!(string_values(&series), vec!["true", "false"]);
    }

    #[test]
    fn test_any_value_to_json() {
        assert_eq!(any_value_to_json(&AnyValue::Int64(7)), Value::from(7));
        assert_eq!(any_value_to_json(&AnyValue::Null), Value::Null);
        assert_eq!(any_value_to_json(&AnyValue::Float64(f64::NAN)), Value::Null);
        assert_eq!(
            any_value_to_json(&AnyValue::String("north")),
            Value::String("north".to_string())
        );
    }

    #[test]
    fn test_finite() {
        assert_eq!(finite(f64::INFINITY), None);
        assert_eq!(finite(f64::NAN), None);
        assert_eq!(finite(2.5), Some(2.5));
    }
}
