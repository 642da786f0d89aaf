//! Error types for exptab-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in exptab-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config line matched none of the accepted shapes
    #[error("cannot read config line {line}: '{text}'")]
    ConfigSyntax { line: usize, text: String },

    /// A name was assigned or referenced that is neither a fixed field
    /// nor a declared parameter
    #[error("cannot set '{name}': not in Params list or fixed fields")]
    UnknownParameter { name: String },

    /// Filename could not be decomposed into a name plus extension
    #[error("cannot derive exposure name from file '{0}'")]
    ExposureName(String),

    /// Selector pattern failed to compile
    #[error("invalid selector pattern '{pattern}': {source}")]
    SelectorPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Input file pattern failed to compile
    #[error("invalid file pattern '{pattern}': {source}")]
    FilePattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A collected value could not be coerced to the inferred column type
    #[error("column '{column}': cannot convert '{value}' to {expected}")]
    ColumnConvert {
        column: String,
        value: String,
        expected: &'static str,
    },

    /// No input file matched any pattern
    #[error("no input files matched any AddFiles pattern")]
    NoInputFiles,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing error from the csv crate
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
