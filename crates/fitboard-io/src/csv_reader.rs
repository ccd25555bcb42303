//! CSV reader with automatic column-type inference

use crate::reader::{IoError, IoResult, TableReader};
use crate::table::{ColumnDescriptor, ColumnType, Table, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// CSV file reader
pub struct CsvReader {
    path: String,
    delimiter: u8,
}

impl CsvReader {
    /// Open a CSV file
    pub fn open(path: &str) -> IoResult<Self> {
        Self::open_with_delimiter(path, b',')
    }

    /// Open a delimited file with a custom delimiter
    pub fn open_with_delimiter(path: &str, delimiter: u8) -> IoResult<Self> {
        if !Path::new(path).exists() {
            return Err(IoError::FileNotFound(path.to_string()));
        }

        Ok(Self {
            path: path.to_string(),
            delimiter,
        })
    }
}

impl TableReader for CsvReader {
    fn read_table(&self) -> IoResult<Table> {
        let file = File::open(&self.path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        parse(BufReader::new(file), self.delimiter)
    }

    fn format_name(&self) -> &'static str {
        "CSV"
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }
}

/// Parse an in-memory CSV document (header row required)
pub fn read_table(bytes: &[u8]) -> IoResult<Table> {
    parse(bytes, b',')
}

fn parse<R: Read>(source: R, delimiter: u8) -> IoResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IoError::InvalidFormat(e.to_string()))?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();

    let mut raw: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(0);
            IoError::InvalidFormat(format!("line {}: {}", line, e))
        })?;
        raw.push(record.iter().map(|s| s.trim().to_string()).collect());
    }

    // Infer per column over every record
    let columns: Vec<ColumnDescriptor> = headers
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let dtype = infer_type(raw.iter().map(|row| row[i].as_str()));
            ColumnDescriptor::new(name, dtype)
        })
        .collect();

    let rows = raw
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(columns.iter())
                .map(|(cell, column)| parse_value(cell, column.dtype))
                .collect()
        })
        .collect();

    Table::new(columns, rows)
}

/// Infer column type from its cells; empty cells do not vote
fn infer_type<'a>(values: impl Iterator<Item = &'a str>) -> ColumnType {
    let non_empty: Vec<&str> = values.filter(|s| !s.is_empty()).collect();
    if non_empty.is_empty() {
        return ColumnType::Text;
    }

    if non_empty.iter().all(|s| s.parse::<i64>().is_ok()) {
        return ColumnType::Integer;
    }

    if non_empty.iter().all(|s| s.parse::<f64>().is_ok()) {
        return ColumnType::Number;
    }

    if non_empty
        .iter()
        .all(|s| matches!(s.to_lowercase().as_str(), "true" | "false"))
    {
        return ColumnType::Boolean;
    }

    ColumnType::Text
}

fn parse_value(cell: String, dtype: ColumnType) -> Value {
    if cell.is_empty() {
        return Value::Missing;
    }

    match dtype {
        ColumnType::Integer | ColumnType::Number => cell
            .parse::<f64>()
            .map(Value::Number)
            .unwrap_or(Value::Missing),
        ColumnType::Boolean => Value::Bool(cell.eq_ignore_ascii_case("true")),
        ColumnType::Text => Value::Text(cell),
    }
}
