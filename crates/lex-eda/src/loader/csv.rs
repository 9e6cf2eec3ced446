use crate::error::LoadError;
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions};
use polars::prelude::*;
use std::io::Cursor;
use tracing::debug;

/// Parse CSV bytes with a header row.
///
/// Bytes that are not valid UTF-8 are decoded as Latin-1, which maps every
/// byte to a character and therefore always succeeds.
pub(crate) fn read_csv(bytes: &[u8]) -> Result<DataFrame, LoadError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(DataFrame::empty());
    }

    let text = decode_text(bytes);

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()
        .map_err(|e| match e {
            PolarsError::NoData(_) => LoadError::EmptyData(e.to_string()),
            other => LoadError::Decode(other.to_string()),
        })
}

pub(crate) fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.strip_prefix('\u{feff}').unwrap_or(text).to_string(),
        Err(_) => {
            debug!("Input is not valid UTF-8, decoding as Latin-1");
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_typed_columns() {
        let df = read_csv(b"id,price,region\n1,9.5,north\n2,12.0,south\n").unwrap();
        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("price").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("region").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_latin1_fallback() {
        // "café" with é as the single Latin-1 byte 0xE9
        let df = read_csv(b"name,n\ncaf\xe9,1\n").unwrap();
        let names: Vec<Option<&str>> = df
            .column("name")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(names, vec![Some("café")]);
    }

    #[test]
    fn test_bom_is_stripped() {
        let df = read_csv("\u{feff}a,b\n1,2\n".as_bytes()).unwrap();
        assert_eq!(df.get_column_names_str(), vec!["a", "b"]);
    }

    #[test]
    fn test_dates_are_parsed() {
        let df = read_csv(b"day,v\n2024-01-01,1\n2024-01-02,2\n").unwrap();
        assert_eq!(df.column("day").unwrap().dtype(), &DataType::Date);
    }

    #[test]
    fn test_blank_input_is_empty() {
        let df = read_csv(b"  \n").unwrap();
        assert_eq!(df.width(), 0);
    }
}
