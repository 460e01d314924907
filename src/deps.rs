//! Dependency listing from project metadata.
//!
//! Reads the declared third-party dependencies out of `package.json` and owns
//! the framework knowledge that does not live in any metadata file: which
//! packages expose extra sub-export entry points, and which virtual module
//! specifiers the JSX transform injects at build time.
//!
//! ## Sub-exports
//!
//! Some packages ship a second entry point under a nested specifier
//! (`react-dom/client` is the canonical case). These are not discoverable
//! from `package.json`, so they live in [`SUB_EXPORTS`], a data table keyed
//! by package name. Supporting another package's sub-export is a one-line
//! table addition, not a code change.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DepsError {
    #[error("Could not read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Invalid JSON in {0}: {1}")]
    Json(PathBuf, #[source] serde_json::Error),
}

/// Known sub-export entry points, keyed by package name.
///
/// Each listed specifier gets its own library bundle in addition to the
/// package's main entry point.
pub const SUB_EXPORTS: &[(&str, &[&str])] = &[("react-dom", &["react-dom/client"])];

/// The view library whose entry the JSX runtime aliases point at.
pub const PRIMARY_VIEW_LIB: &str = "react";

/// Virtual module injected by the automatic JSX transform.
pub const JSX_RUNTIME: &str = "react/jsx-runtime";

/// Development variant of [`JSX_RUNTIME`].
pub const JSX_DEV_RUNTIME: &str = "react/jsx-dev-runtime";

/// Sub-export externalized in every route build even when its package is not
/// separately declared — route code imports it so routinely that treating it
/// as always-expected is the safer default.
pub const COMMON_SUB_EXPORT: &str = "react-dom/client";

#[derive(Debug, Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
}

/// Read the declared dependency names from a `package.json` file.
///
/// Only the keys of the `dependencies` object matter; version specifiers are
/// ignored (version resolution is the package manager's job). A file without
/// a `dependencies` key yields an empty list. A missing or unparsable file is
/// an error — a project without metadata cannot be built.
///
/// Names are returned sorted, so downstream output is deterministic
/// regardless of the JSON object's key order.
pub fn list_dependencies(package_file: &Path) -> Result<Vec<String>, DepsError> {
    let content = fs::read_to_string(package_file)
        .map_err(|e| DepsError::Io(package_file.to_path_buf(), e))?;
    let parsed: PackageJson =
        serde_json::from_str(&content).map_err(|e| DepsError::Json(package_file.to_path_buf(), e))?;
    Ok(parsed.dependencies.into_keys().collect())
}

/// Known sub-export specifiers for a package. Empty for most packages.
pub fn sub_exports(package: &str) -> &'static [&'static str] {
    SUB_EXPORTS
        .iter()
        .find(|(name, _)| *name == package)
        .map(|(_, subs)| *subs)
        .unwrap_or(&[])
}

/// All export specifiers a package contributes: its own name first, then any
/// known sub-exports. Each becomes an independent library build unit.
pub fn exports_for(package: &str) -> Vec<String> {
    let mut exports = vec![package.to_string()];
    exports.extend(sub_exports(package).iter().map(|s| (*s).to_string()));
    exports
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_package_json(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("package.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn lists_dependency_names_sorted() {
        let tmp = TempDir::new().unwrap();
        let path = write_package_json(
            &tmp,
            r#"{"dependencies": {"react-dom": "^18.0.0", "react": "^18.0.0"}}"#,
        );

        let deps = list_dependencies(&path).unwrap();
        assert_eq!(deps, vec!["react", "react-dom"]);
    }

    #[test]
    fn missing_dependencies_key_is_empty_list() {
        let tmp = TempDir::new().unwrap();
        let path = write_package_json(&tmp, r#"{"name": "app", "version": "1.0.0"}"#);

        assert!(list_dependencies(&path).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = list_dependencies(&tmp.path().join("package.json"));
        assert!(matches!(result, Err(DepsError::Io(_, _))));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_package_json(&tmp, "{not json");
        assert!(matches!(list_dependencies(&path), Err(DepsError::Json(_, _))));
    }

    #[test]
    fn react_dom_has_client_sub_export() {
        assert_eq!(sub_exports("react-dom"), &["react-dom/client"]);
    }

    #[test]
    fn unknown_package_has_no_sub_exports() {
        assert!(sub_exports("left-pad").is_empty());
    }

    #[test]
    fn exports_for_includes_package_and_sub_exports() {
        assert_eq!(
            exports_for("react-dom"),
            vec!["react-dom".to_string(), "react-dom/client".to_string()]
        );
        assert_eq!(exports_for("react"), vec!["react".to_string()]);
    }
}
