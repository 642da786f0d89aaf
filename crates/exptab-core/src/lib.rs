//! exptab-core: Core library for building exposure tables from config files
//!
//! This library provides functionality to:
//! - Parse declarative config files (parameter declarations, file patterns,
//!   global and selector-scoped assignments)
//! - Expand file patterns into exposure records with derived identities
//! - Resolve parameter values per record, with `${name}` substitution
//! - Assemble resolved records into typed columns and write CSV or JSON

pub mod assembler;
pub mod config;
pub mod error;
pub mod extension;
pub mod resolver;
pub mod scanner;
pub mod writer;

pub use assembler::{assemble, ColumnData, ColumnType, OutputTable, TableColumn};
pub use config::{parse_config, parse_config_str, ConfigFile, SelectorGroup};
pub use error::{Error, Result};
pub use extension::{variable_names, Extension, Param, FIXED_FIELDS};
pub use resolver::resolve;
pub use scanner::{build_extensions, expand_file_patterns, exposure_name};
pub use writer::{write_table, DEFAULT_OUTFILE};
