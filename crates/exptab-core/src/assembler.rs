//! Typed-column table assembly from resolved exposure records

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::extension::{variable_names, Extension};

/// Storage type of an output column, written as a FITS-style format code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// 64-bit integer column (`J`)
    Integer,
    /// 64-bit floating-point column (`D`)
    Real,
    /// Text column with a fixed byte width (`An`)
    Text(usize),
}

impl Serialize for ColumnType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ColumnType::Integer => serializer.serialize_str("J"),
            ColumnType::Real => serializer.serialize_str("D"),
            ColumnType::Text(width) => serializer.serialize_str(&format!("A{}", width)),
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "J"),
            ColumnType::Real => write!(f, "D"),
            ColumnType::Text(width) => write!(f, "A{}", width),
        }
    }
}

/// Converted values for one column, one entry per record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnData {
    /// Integer values
    Integer(Vec<i64>),
    /// Floating-point values
    Real(Vec<f64>),
    /// Text values
    Text(Vec<String>),
}

impl ColumnData {
    /// Get the number of values
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(values) => values.len(),
            ColumnData::Real(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    /// Check if the column holds no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the value at `row` rendered as a string
    pub fn get(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Integer(values) => values.get(row).map(|v| v.to_string()),
            ColumnData::Real(values) => values.get(row).map(|v| v.to_string()),
            ColumnData::Text(values) => values.get(row).cloned(),
        }
    }
}

/// A single output column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableColumn {
    /// Column name (variable name)
    pub name: String,
    /// Storage type
    pub format: ColumnType,
    /// Converted values
    pub data: ColumnData,
}

/// An assembled table of typed columns, one row per exposure record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputTable {
    /// Columns in output order: fixed fields first, then declared parameters
    pub columns: Vec<TableColumn>,
}

impl OutputTable {
    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Assemble resolved records into an ordered table of typed columns.
///
/// Each column's storage type is inferred from its first value; every
/// other value must convert to that type.
pub fn assemble(extensions: &[Extension], declared: &[String]) -> Result<OutputTable> {
    if extensions.is_empty() {
        return Err(Error::NoInputFiles);
    }

    let mut columns = Vec::new();
    for name in variable_names(declared) {
        let mut values = Vec::with_capacity(extensions.len());
        for ext in extensions {
            values.push(ext.get(&name)?.to_string());
        }

        let format = infer_type(&values);
        let data = convert_values(&name, format, &values)?;
        columns.push(TableColumn { name, format, data });
    }

    Ok(OutputTable { columns })
}

/// Choose a column type from the first value. Text width spans the whole
/// column, never less than 1.
fn infer_type(values: &[String]) -> ColumnType {
    let first = values.first().map(String::as_str).unwrap_or("");

    if first.parse::<i64>().is_ok() {
        ColumnType::Integer
    } else if first.parse::<f64>().is_ok() {
        ColumnType::Real
    } else {
        let width = values.iter().map(|v| v.len()).max().unwrap_or(0);
        ColumnType::Text(width.max(1))
    }
}

/// Convert every value in a column to its inferred type
fn convert_values(name: &str, format: ColumnType, values: &[String]) -> Result<ColumnData> {
    match format {
        ColumnType::Integer => {
            let mut converted = Vec::with_capacity(values.len());
            for value in values {
                let parsed = value.parse::<i64>().map_err(|_| Error::ColumnConvert {
                    column: name.to_string(),
                    value: value.clone(),
                    expected: "integer",
                })?;
                converted.push(parsed);
            }
            Ok(ColumnData::Integer(converted))
        }
        ColumnType::Real => {
            let mut converted = Vec::with_capacity(values.len());
            for value in values {
                let parsed = value.parse::<f64>().map_err(|_| Error::ColumnConvert {
                    column: name.to_string(),
                    value: value.clone(),
                    expected: "real",
                })?;
                converted.push(parsed);
            }
            Ok(ColumnData::Real(converted))
        }
        ColumnType::Text(_) => Ok(ColumnData::Text(values.to_vec())),
    }
}
