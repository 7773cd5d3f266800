//! CSV writing operations.

use polars::{frame::DataFrame, io::SerWriter, prelude::CsvWriter};

use crate::error::{Error, Result};

/// Write a DataFrame to CSV bytes.
pub(crate) fn write_csv_bytes(df: &DataFrame) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    CsvWriter::new(&mut out)
        .finish(&mut df.clone())
        .map_err(|e| Error::format("table", format!("[io::csv::write] failed to write CSV: {e}")))?;
    Ok(out)
}

/// Write a DataFrame to a CSV string.
pub(crate) fn write_csv_string(df: &DataFrame) -> Result<String> {
    String::from_utf8(write_csv_bytes(df)?)
        .map_err(|e| Error::format("table", format!("[io::csv::write] CSV output is not valid UTF-8: {e}")))
}
