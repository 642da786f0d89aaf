//! Input-file expansion and record seeding
//!
//! Turns the accumulated `AddFiles` patterns into a concrete file list
//! and seeds one extension record per file, including the normalized
//! exposure name shared by all extensions of one observation.

use crate::error::{Error, Result};
use crate::extension::Extension;
use regex::Regex;
use std::path::Path;

/// Expand glob patterns into a list of file paths
///
/// Patterns are expanded in list order; each pattern's matches arrive in
/// the glob crate's alphabetical order, so runs are repeatable. A pattern
/// matching nothing is skipped with a warning rather than failing the
/// run.
pub fn expand_file_patterns(patterns: &[String]) -> Result<Vec<String>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let paths = glob::glob(pattern).map_err(|e| Error::FilePattern {
            pattern: pattern.clone(),
            source: e,
        })?;

        let mut match_count = 0;
        for path in paths.filter_map(|p| p.ok()) {
            files.push(path.to_string_lossy().into_owned());
            match_count += 1;
        }

        if match_count == 0 {
            eprintln!("Warning: no files found match {}", pattern);
        }
    }

    Ok(files)
}

/// Derive the exposure name from a catalog filename
///
/// The base name must decompose into a name plus dotted suffix; the name
/// then loses any `_cat` token and one trailing two-digit chip number.
///
/// Examples:
/// - "foo_cat_07.fits" -> "foo"
/// - "bar_03.ext" -> "bar"
/// - "img_ccd1.fits" -> "img_ccd1" (no two-digit suffix)
pub fn exposure_name(filename: &str) -> Result<String> {
    let base = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let stem = Regex::new(r"(.*)\.\S*\b").unwrap();
    let chip_suffix = Regex::new(r"_\d\d$").unwrap();

    let caps = stem
        .captures(base)
        .ok_or_else(|| Error::ExposureName(filename.to_string()))?;

    let name = caps[1].replace("_cat", "");
    Ok(chip_suffix.replace(&name, "").into_owned())
}

/// Build one extension record per input file
///
/// Every record starts with the fixed fields at their defaults, FILENAME
/// set to the path as matched, EXPOSURE set to the derived exposure name,
/// and every declared parameter empty.
pub fn build_extensions(files: &[String], declared: &[String]) -> Result<Vec<Extension>> {
    let mut extensions = Vec::with_capacity(files.len());

    for file in files {
        let mut ext = Extension::new(declared);
        ext.set("FILENAME", file.as_str())?;
        ext.set("EXPOSURE", exposure_name(file)?)?;
        extensions.push(ext);
    }

    Ok(extensions)
}
