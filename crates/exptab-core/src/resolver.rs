//! Scoped assignment resolution across extension records
//!
//! Assignments arrive from two kinds of source: the global map, which
//! matches every record, and selector groups, which match records whose
//! FILENAME satisfies the group's regex. Sources apply in declared order
//! and later sources overwrite earlier ones for the same key. Within one
//! source, plain values are assigned before values carrying `${name}`
//! references, so a reference can pick up a value set by the same source.

use crate::config::ConfigFile;
use crate::error::{Error, Result};
use crate::extension::{is_fixed_field, Extension};
use regex::Regex;

/// Matches one `${name}` reference inside an assignment value
const REFERENCE: &str = r"\$\{(\w*)\}";

/// Apply every assignment source to the records: globals first, then
/// each selector group in order of first appearance
pub fn resolve(extensions: &mut [Extension], config: &ConfigFile) -> Result<()> {
    apply_source(extensions, None, &config.globals, &config.params)?;

    for group in &config.selectors {
        apply_source(
            extensions,
            Some(&group.pattern),
            &group.assignments,
            &config.params,
        )?;
    }

    Ok(())
}

/// Apply one assignment source to every matching record
fn apply_source(
    extensions: &mut [Extension],
    pattern: Option<&str>,
    assignments: &[(String, String)],
    declared: &[String],
) -> Result<()> {
    let reference = Regex::new(REFERENCE).unwrap();

    // Every key and every ${name} reference must be a declared parameter
    // or fixed field before any record changes
    for (key, value) in assignments {
        for caps in reference.captures_iter(value) {
            let name = &caps[1];
            if !is_known(name, declared) {
                return Err(Error::UnknownParameter {
                    name: name.to_string(),
                });
            }
        }
        if !is_known(key, declared) {
            return Err(Error::UnknownParameter { name: key.clone() });
        }
    }

    let matcher = match pattern {
        Some(p) => Some(Regex::new(p).map_err(|e| Error::SelectorPattern {
            pattern: p.to_string(),
            source: e,
        })?),
        None => None,
    };

    let (direct, deferred): (Vec<&(String, String)>, Vec<&(String, String)>) = assignments
        .iter()
        .partition(|(_, value)| !reference.is_match(value));

    for ext in extensions.iter_mut() {
        if let Some(re) = &matcher {
            if !re.is_match(ext.get("FILENAME")?) {
                continue;
            }
        }

        for (key, value) in direct.iter().copied() {
            ext.set(key, value.as_str())?;
        }

        for (key, value) in deferred.iter().copied() {
            let resolved = substitute(&reference, value, ext)?;
            ext.set(key, resolved)?;
        }
    }

    Ok(())
}

/// Replace each `${name}` found in `value` with the record's current
/// value of `name`. Single pass over the references of the raw value;
/// substituted-in text is not scanned again.
fn substitute(reference: &Regex, value: &str, ext: &Extension) -> Result<String> {
    let mut resolved = value.to_string();

    for caps in reference.captures_iter(value) {
        let name = &caps[1];
        let current = ext.get(name)?.to_string();
        resolved = resolved.replace(&format!("${{{}}}", name), &current);
    }

    Ok(resolved)
}

fn is_known(name: &str, declared: &[String]) -> bool {
    is_fixed_field(name) || declared.iter().any(|d| d == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config_str;

    fn ext_with_file(file: &str, declared: &[String]) -> Extension {
        let mut ext = Extension::new(declared);
        ext.set("FILENAME", file).unwrap();
        ext
    }

    fn declared(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_global_applies_to_every_record() {
        let params = declared(&["BAND"]);
        let mut exts = vec![
            ext_with_file("a_01.fits", &params),
            ext_with_file("b_01.fits", &params),
        ];
        let config = parse_config_str("Params = BAND\nBAND = g\n").unwrap();

        resolve(&mut exts, &config).unwrap();

        assert_eq!(exts[0].get("BAND").unwrap(), "g");
        assert_eq!(exts[1].get("BAND").unwrap(), "g");
    }

    #[test]
    fn test_selector_scopes_to_matching_filenames() {
        let params = declared(&["BAND"]);
        let mut exts = vec![
            ext_with_file("img_ccd01.fits", &params),
            ext_with_file("img_ccd03.fits", &params),
        ];
        let config = parse_config_str("Params = BAND\nBAND = g\nccd03[BAND] = r\n").unwrap();

        resolve(&mut exts, &config).unwrap();

        assert_eq!(exts[0].get("BAND").unwrap(), "g");
        assert_eq!(exts[1].get("BAND").unwrap(), "r");
    }

    #[test]
    fn test_later_group_wins_ties() {
        let params = declared(&["BAND"]);
        let mut exts = vec![ext_with_file("img_ccd03.fits", &params)];
        // Both patterns match; the later group wins even though the
        // earlier pattern is more specific
        let text = "Params = BAND\nimg_ccd03[BAND] = u\nccd[BAND] = z\n";
        let config = parse_config_str(text).unwrap();

        resolve(&mut exts, &config).unwrap();

        assert_eq!(exts[0].get("BAND").unwrap(), "z");
    }

    #[test]
    fn test_selector_overrides_global_fixed_field() {
        let mut exts = vec![
            ext_with_file("north_01.fits", &[]),
            ext_with_file("south_01.fits", &[]),
        ];
        let text = "INSTRUMENT = DECam\nsouth[INSTRUMENT] = Mosaic\n";
        let config = parse_config_str(text).unwrap();

        resolve(&mut exts, &config).unwrap();

        assert_eq!(exts[0].get("INSTRUMENT").unwrap(), "DECam");
        assert_eq!(exts[1].get("INSTRUMENT").unwrap(), "Mosaic");
    }

    #[test]
    fn test_reference_substitution() {
        let params = declared(&["X", "OUT"]);
        let mut exts = vec![ext_with_file("a_01.fits", &params)];
        let config = parse_config_str("Params = X,OUT\nX = abc\nOUT = ${X}_suffix\n").unwrap();

        resolve(&mut exts, &config).unwrap();

        assert_eq!(exts[0].get("OUT").unwrap(), "abc_suffix");
    }

    #[test]
    fn test_reference_sees_direct_value_from_same_source() {
        let params = declared(&["BAND", "WCS"]);
        let mut exts = vec![ext_with_file("a_01.fits", &params)];
        // Deferred line appears before the direct one; direct still lands
        // first
        let text = "Params = BAND,WCS\nWCS = ${BAND}.wcs\nBAND = r\n";
        let config = parse_config_str(text).unwrap();

        resolve(&mut exts, &config).unwrap();

        assert_eq!(exts[0].get("WCS").unwrap(), "r.wcs");
    }

    #[test]
    fn test_reference_to_fixed_field() {
        let params = declared(&["WCS"]);
        let mut exts = vec![ext_with_file("img_cat_05.fits", &params)];
        let config = parse_config_str("Params = WCS\nWCS = ${EXPOSURE}.wcs\n").unwrap();

        exts[0].set("EXPOSURE", "img").unwrap();
        resolve(&mut exts, &config).unwrap();

        assert_eq!(exts[0].get("WCS").unwrap(), "img.wcs");
    }

    #[test]
    fn test_multiple_references_in_one_value() {
        let params = declared(&["TAG"]);
        let mut exts = vec![ext_with_file("a_01.fits", &params)];
        let text = "Params = TAG\nINSTRUMENT = DECam\nDEVICE = N4\nTAG = ${INSTRUMENT}/${DEVICE}\n";
        let config = parse_config_str(text).unwrap();

        resolve(&mut exts, &config).unwrap();

        assert_eq!(exts[0].get("TAG").unwrap(), "DECam/N4");
    }

    #[test]
    fn test_chained_reference_is_not_expanded() {
        let params = declared(&["A", "B", "C"]);
        let mut ext = ext_with_file("a_01.fits", &params);
        ext.set("A", "${B}").unwrap();
        ext.set("B", "real").unwrap();
        let mut exts = vec![ext];

        let config = ConfigFile {
            params,
            globals: vec![("C".to_string(), "${A}_x".to_string())],
            ..Default::default()
        };

        resolve(&mut exts, &config).unwrap();

        // A's stored value still contains a reference; it is copied in
        // verbatim, not resolved to "real_x"
        assert_eq!(exts[0].get("C").unwrap(), "${B}_x");
    }

    #[test]
    fn test_undeclared_key_fails_before_mutation() {
        let params = declared(&["BAND"]);
        let mut exts = vec![ext_with_file("img_ccd03.fits", &params)];
        exts[0].set("BAND", "g").unwrap();

        let config = ConfigFile {
            params,
            selectors: vec![crate::config::SelectorGroup {
                pattern: "ccd03".to_string(),
                assignments: vec![
                    ("BAND".to_string(), "r".to_string()),
                    ("DEPTH".to_string(), "5".to_string()),
                ],
            }],
            ..Default::default()
        };

        let err = resolve(&mut exts, &config).unwrap_err();

        assert!(matches!(err, Error::UnknownParameter { name } if name == "DEPTH"));
        assert_eq!(exts[0].get("BAND").unwrap(), "g");
    }

    #[test]
    fn test_undeclared_reference_fails() {
        let params = declared(&["BAND"]);
        let mut exts = vec![ext_with_file("a_01.fits", &params)];
        let config = parse_config_str("Params = BAND\nBAND = ${MYSTERY}\n").unwrap();

        let err = resolve(&mut exts, &config).unwrap_err();

        assert!(matches!(err, Error::UnknownParameter { name } if name == "MYSTERY"));
    }

    #[test]
    fn test_empty_reference_fails() {
        let params = declared(&["BAND"]);
        let mut exts = vec![ext_with_file("a_01.fits", &params)];
        let config = parse_config_str("Params = BAND\nBAND = ${}\n").unwrap();

        assert!(resolve(&mut exts, &config).is_err());
    }

    #[test]
    fn test_bad_pattern_reported_after_validation() {
        let params = declared(&["BAND"]);
        let mut exts = vec![ext_with_file("a_01.fits", &params)];

        let config = ConfigFile {
            params: params.clone(),
            selectors: vec![crate::config::SelectorGroup {
                pattern: "(".to_string(),
                assignments: vec![("BAND".to_string(), "r".to_string())],
            }],
            ..Default::default()
        };

        let err = resolve(&mut exts, &config).unwrap_err();
        assert!(matches!(err, Error::SelectorPattern { .. }));

        // An unknown key in the same group is reported before the pattern
        // is ever compiled
        let config = ConfigFile {
            params,
            selectors: vec![crate::config::SelectorGroup {
                pattern: "(".to_string(),
                assignments: vec![("DEPTH".to_string(), "5".to_string())],
            }],
            ..Default::default()
        };

        let err = resolve(&mut exts, &config).unwrap_err();
        assert!(matches!(err, Error::UnknownParameter { .. }));
    }

    #[test]
    fn test_substitute_single_pass() {
        let params = declared(&["A", "B"]);
        let mut ext = ext_with_file("a_01.fits", &params);
        ext.set("A", "${B}").unwrap();
        ext.set("B", "real").unwrap();

        let reference = Regex::new(REFERENCE).unwrap();
        let resolved = substitute(&reference, "${A}_x", &ext).unwrap();

        assert_eq!(resolved, "${B}_x");
    }
}
