//! Import map generation.
//!
//! The browser import map is how externalized specifiers in route and
//! library bundles resolve at load time: every library export maps to its
//! published bundle URL. On top of the verbatim copy of the library
//! artifacts, two fixed aliases are added for the virtual modules the
//! automatic JSX transform injects — `react/jsx-runtime` and
//! `react/jsx-dev-runtime` — both pointing at the `react` bundle itself
//! (the standard pattern; React ships the runtime inside its main entry).
//!
//! If `react` failed to build, the aliases still resolve to the URL its
//! bundle *would* have, computed by [`naming::published_lib_path`] — the
//! same function the library builder uses, so the fallback cannot drift
//! from the real naming convention.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::deps::{JSX_DEV_RUNTIME, JSX_RUNTIME, PRIMARY_VIEW_LIB};
use crate::naming;

#[derive(Error, Debug)]
pub enum ImportMapError {
    #[error("Could not write {0}: {1}")]
    Write(PathBuf, #[source] std::io::Error),
    #[error("Could not serialize import map: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// On-disk shape: a single top-level `imports` object.
#[derive(Serialize)]
struct ImportMapFile<'a> {
    imports: &'a BTreeMap<String, String>,
}

/// Build the flat import map from the library artifacts.
///
/// Pure: copies every artifact entry verbatim, then adds the JSX runtime
/// aliases.
pub fn import_map_entries(
    artifacts: &BTreeMap<String, String>,
    static_prefix: &str,
) -> BTreeMap<String, String> {
    let mut imports = artifacts.clone();

    let react_url = imports
        .get(PRIMARY_VIEW_LIB)
        .cloned()
        .unwrap_or_else(|| naming::published_lib_path(static_prefix, PRIMARY_VIEW_LIB));
    imports.insert(JSX_RUNTIME.to_string(), react_url.clone());
    imports.insert(JSX_DEV_RUNTIME.to_string(), react_url);

    imports
}

/// Generate the import map and write it to `<dist>/importmap.json`.
///
/// Returns the flat mapping for the manifest stage, which embeds the
/// identical object.
pub fn generate(
    artifacts: &BTreeMap<String, String>,
    static_prefix: &str,
    dist: &Path,
) -> Result<BTreeMap<String, String>, ImportMapError> {
    let imports = import_map_entries(artifacts, static_prefix);

    let path = dist.join("importmap.json");
    let json = serde_json::to_string_pretty(&ImportMapFile { imports: &imports })?;
    fs::write(&path, json).map_err(|e| ImportMapError::Write(path, e))?;

    Ok(imports)
}
