//! Vendored declaration file (`elm.json` of the installed ui-core tree).

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::error::{Result, SyncError};

/// Resolved `(name, major)` pair ready to be turned into an install command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallDirective {
    /// Package name, e.g. `elm/core`.
    pub name: String,
    /// Leading numeral of the range's lower bound. Not validated.
    pub major: String,
}

impl fmt::Display for InstallDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.major)
    }
}

/// What: Extract the major version from a range such as `"1.0.0 <= v < 2.0.0"`.
///
/// Inputs:
/// - `range`: Version-range expression.
///
/// Output:
/// - Text before the first `.` of the range as written (the whole string if there is no dot).
///
/// Details:
/// - No semantic version parsing and no trimming; malformed ranges yield whatever precedes the dot.
#[must_use]
pub fn major_of(range: &str) -> &str {
    range.split('.').next().unwrap_or_default()
}

/// What: Build install directives from a parsed declaration document.
///
/// Inputs:
/// - `doc`: Parsed `elm.json`.
///
/// Output:
/// - Directives in the declaration's key order.
///
/// # Errors
/// - `Err(detail)` when `dependencies` is not an object of strings.
///
/// Details:
/// - A document without `dependencies` yields no directives.
pub fn directives_from(doc: &Value) -> std::result::Result<Vec<InstallDirective>, String> {
    let Some(deps) = doc.get("dependencies") else {
        return Ok(Vec::new());
    };
    let deps = deps
        .as_object()
        .ok_or_else(|| "\"dependencies\" is not an object".to_string())?;
    deps.iter()
        .map(|(name, range)| {
            let range = range
                .as_str()
                .ok_or_else(|| format!("version range for {name} is not a string"))?;
            Ok(InstallDirective {
                name: name.clone(),
                major: major_of(range).to_string(),
            })
        })
        .collect()
}

/// What: Read the vendored declaration file and derive install directives.
///
/// Inputs:
/// - `path`: Declaration file written by the git installer.
///
/// Output:
/// - Ordered install directives.
///
/// # Errors
/// - `NotFound`, `Io`, or `Parse` when the file cannot be read as JSON.
/// - `Shape` when `dependencies` is malformed.
pub fn read_directives(path: &Path) -> Result<Vec<InstallDirective>> {
    let doc = super::read_json(path)?;
    directives_from(&doc).map_err(|detail| SyncError::Shape {
        path: path.to_path_buf(),
        detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    /// What: Major version is the token before the first dot.
    fn major_of_takes_leading_token() {
        assert_eq!(major_of("1.0.0 <= v < 2.0.0"), "1");
        assert_eq!(major_of("0.5.0 <= v < 1.0.0"), "0");
        assert_eq!(major_of("10.2.1 <= v < 11.0.0"), "10");
        // Whitespace is not stripped; the token is passed through verbatim.
        assert_eq!(major_of(" 1.0.0 <= v < 2.0.0"), " 1");
        assert_eq!(major_of("garbage"), "garbage");
        assert_eq!(major_of(""), "");
    }

    #[test]
    /// What: Directives follow declaration order, not alphabetical order.
    ///
    /// Inputs:
    /// - Declaration with `zeta` listed before `alpha`.
    ///
    /// Output:
    /// - Directives in file order with their majors.
    fn directives_keep_declaration_order() {
        let doc: Value = serde_json::from_str(
            r#"{"dependencies": {"zeta/pkg": "3.1.0 <= v < 4.0.0", "alpha/pkg": "1.0.0 <= v < 2.0.0"}}"#,
        )
        .expect("valid json");
        let dirs = directives_from(&doc).expect("valid declaration");
        assert_eq!(
            dirs,
            vec![
                InstallDirective {
                    name: "zeta/pkg".into(),
                    major: "3".into()
                },
                InstallDirective {
                    name: "alpha/pkg".into(),
                    major: "1".into()
                },
            ]
        );
        assert_eq!(dirs[0].to_string(), "zeta/pkg@3");
    }

    #[test]
    /// What: Missing `dependencies` is empty; wrongly typed entries are rejected.
    fn directives_shape_errors() {
        assert!(directives_from(&json!({})).expect("ok").is_empty());
        assert!(directives_from(&json!({"dependencies": []})).is_err());
        assert!(directives_from(&json!({"dependencies": {"a": 1}})).is_err());
    }

    #[test]
    /// What: A missing declaration file is `NotFound`.
    fn read_directives_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_directives(&dir.path().join("elm.json")).expect_err("missing");
        assert!(matches!(err, SyncError::NotFound { .. }));
    }
}
