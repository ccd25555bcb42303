//! Row-oriented table with a uniform, typed column set

use serde::{Deserialize, Serialize};

use crate::reader::{IoError, IoResult};

/// A loaded dataset: insertion-ordered rows over a fixed column set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column descriptors, in file order
    columns: Vec<ColumnDescriptor>,

    /// Rows; every row has exactly one value per column
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table, rejecting rows whose width does not match the columns
    pub fn new(columns: Vec<ColumnDescriptor>, rows: Vec<Vec<Value>>) -> IoResult<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(IoError::InvalidFormat(format!(
                "row {} has {} values, expected {}",
                index,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Column descriptors in order
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow one row as a name → value view
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// Iterate over all rows in insertion order
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// Extract a numeric column as `f64`s; missing cells become NaN
    pub fn numeric_column(&self, name: &str) -> IoResult<Vec<f64>> {
        let index = self
            .column_index(name)
            .ok_or_else(|| IoError::ColumnNotFound(name.to_string()))?;

        if !self.columns[index].dtype.is_numeric() {
            return Err(IoError::InvalidFormat(format!(
                "column '{}' is {:?}, not numeric",
                name, self.columns[index].dtype
            )));
        }

        Ok(self
            .rows
            .iter()
            .map(|row| row[index].as_f64().unwrap_or(f64::NAN))
            .collect())
    }
}

/// A borrowed row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [ColumnDescriptor],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// Look up a cell by column name
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .map(|i| &self.values[i])
    }

    /// Iterate over `(column name, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.columns
            .iter()
            .map(|c| c.name.as_str())
            .zip(self.values.iter())
    }
}

/// Descriptor for a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,

    /// Inferred data type
    pub dtype: ColumnType,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: name.into(),
            dtype,
        }
    }
}

/// Column data type, as decided by inference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Number,
    Boolean,
    Text,
}

impl ColumnType {
    /// Whether values of this type can feed a numeric variable
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Number)
    }
}

/// A single cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Text(String),
    Missing,
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

// Numbers compare bitwise so that a NaN cell equals itself; tables are
// compared to decide whether the active dataset changed.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Missing, Value::Missing) => true,
            _ => false,
        }
    }
}
