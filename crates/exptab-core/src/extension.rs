//! Record types for per-extension exposure metadata

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Fields every extension record carries, with their default values.
///
/// `FIELD` and `IDKEY` default to sentinels understood by the downstream
/// astrometric fitter (`@_NEAREST` picks the closest field center,
/// `@_ROW` numbers objects by table row).
pub const FIXED_FIELDS: [(&str, &str); 12] = [
    ("FILENAME", ""),
    ("EXTENSION", "-1"),
    ("INSTRUMENT", ""),
    ("DEVICE", ""),
    ("FIELD", "@_NEAREST"),
    ("EXPOSURE", ""),
    ("RA", ""),
    ("DEC", ""),
    ("WCSFILE", ""),
    ("XKEY", ""),
    ("YKEY", ""),
    ("IDKEY", "@_ROW"),
];

/// Check whether a name is one of the fixed fields
pub fn is_fixed_field(name: &str) -> bool {
    FIXED_FIELDS.iter().any(|(f, _)| *f == name)
}

/// Full variable list for a run: fixed fields first, then declared
/// parameters. Declared names that repeat or shadow a fixed field are
/// dropped so record and column names stay unique.
pub fn variable_names(declared: &[String]) -> Vec<String> {
    let mut names: Vec<String> = FIXED_FIELDS.iter().map(|(f, _)| f.to_string()).collect();
    for name in declared {
        if !names.iter().any(|n| n == name) {
            names.push(name.clone());
        }
    }
    names
}

/// A single named parameter value, stored as text until the table
/// assembler picks a column type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name (e.g., "FILENAME" or a declared name like "BAND")
    pub name: String,
    /// Raw text value
    pub value: String,
}

impl Param {
    /// Create a new parameter
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One extension of one exposure file, holding the fixed fields plus
/// every declared parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    /// Ordered parameters; names are unique within a record
    pub params: Vec<Param>,
}

impl Extension {
    /// Create a record with all fixed fields at their defaults and every
    /// declared parameter set to the empty string
    pub fn new(declared: &[String]) -> Self {
        let params = variable_names(declared)
            .into_iter()
            .map(|name| {
                let default = FIXED_FIELDS
                    .iter()
                    .find(|(f, _)| *f == name)
                    .map(|(_, d)| *d)
                    .unwrap_or("");
                Param::new(name, default)
            })
            .collect();
        Self { params }
    }

    /// Set a parameter value by name
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        match self.params.iter_mut().find(|p| p.name == key) {
            Some(param) => {
                param.value = value.into();
                Ok(())
            }
            None => Err(Error::UnknownParameter {
                name: key.to_string(),
            }),
        }
    }

    /// Get a parameter value by name
    pub fn get(&self, key: &str) -> Result<&str> {
        self.params
            .iter()
            .find(|p| p.name == key)
            .map(|p| p.value.as_str())
            .ok_or_else(|| Error::UnknownParameter {
                name: key.to_string(),
            })
    }
}
