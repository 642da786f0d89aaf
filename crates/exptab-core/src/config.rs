//! Config file parser for exposure-table runs
//!
//! The config language is line-oriented: comments and blank lines are
//! skipped, every other line assigns `key = value` (the equals sign is
//! optional). Reserved keys (`Params`, `AddFiles`, `Outfile`) feed run
//! settings, `pattern[key]` lines collect selector-scoped overrides, and
//! anything else is a global default.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A filename-scoped block of parameter overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorGroup {
    /// Regex matched against each record's FILENAME
    pub pattern: String,
    /// Key/value assignments; one entry per key, later lines replace
    /// earlier values in place
    pub assignments: Vec<(String, String)>,
}

impl SelectorGroup {
    fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            assignments: Vec::new(),
        }
    }
}

/// Parsed configuration for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Declared parameter names from the `Params` line
    pub params: Vec<String>,
    /// Glob patterns accumulated from `AddFiles` lines
    pub file_patterns: Vec<String>,
    /// Output destination from the `Outfile` line
    pub outfile: Option<String>,
    /// Global assignments, applied to every record
    pub globals: Vec<(String, String)>,
    /// Selector groups in order of first appearance
    pub selectors: Vec<SelectorGroup>,
}

impl ConfigFile {
    fn set_global(&mut self, key: &str, value: String) {
        upsert(&mut self.globals, key, value);
    }

    fn set_selector(&mut self, pattern: &str, key: &str, value: String) {
        let idx = match self.selectors.iter().position(|g| g.pattern == pattern) {
            Some(idx) => idx,
            None => {
                self.selectors.push(SelectorGroup::new(pattern));
                self.selectors.len() - 1
            }
        };
        upsert(&mut self.selectors[idx].assignments, key, value);
    }
}

/// Replace an existing key's value in place, or append a new entry
fn upsert(pairs: &mut Vec<(String, String)>, key: &str, value: String) {
    match pairs.iter_mut().find(|(k, _)| k == key) {
        Some((_, v)) => *v = value,
        None => pairs.push((key.to_string(), value)),
    }
}

/// Parse a config file from disk
pub fn parse_config<P: AsRef<Path>>(path: P) -> Result<ConfigFile> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_config_str(&text)
}

/// Parse config text (useful for testing)
pub fn parse_config_str(text: &str) -> Result<ConfigFile> {
    // The equals form is tried first; its greedy key keeps `=` characters
    // that appear before the real separator. The bare form splits at the
    // first whitespace run.
    let equal = Regex::new(r"^(\S*)\s*=\s*(\S.*)$").unwrap();
    let assign = Regex::new(r"^(\S+)\s+(\S.*)$").unwrap();
    let selector = Regex::new(r"^(.*)\[(.*)\]$").unwrap();

    let mut config = ConfigFile::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let caps = equal
            .captures(line)
            .or_else(|| assign.captures(line))
            .ok_or_else(|| Error::ConfigSyntax {
                line: idx + 1,
                text: line.to_string(),
            })?;
        let key = &caps[1];
        let mut value = caps[2].to_string();

        // AddFiles values accumulate, colon-separated, before any quote
        // normalization
        if key == "AddFiles" {
            config
                .file_patterns
                .extend(value.split(':').map(str::to_string));
            continue;
        }

        if value == "''" || value == "\"\"" {
            value.clear();
        }

        match key {
            "Params" => {
                config.params = value
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "Outfile" => {
                config.outfile = Some(value);
            }
            _ => match selector.captures(key) {
                Some(sel) => {
                    let (pattern, subkey) = (sel[1].to_string(), sel[2].to_string());
                    config.set_selector(&pattern, &subkey, value);
                }
                None => config.set_global(key, value),
            },
        }
    }

    Ok(config)
}
