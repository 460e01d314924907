//! Manifest generation for the serving backend.
//!
//! The manifest is the single machine-readable descriptor the backend router
//! consumes: one entry per route with its public path, the URL of its client
//! bundle, and its component identifier, plus the same import map that was
//! written standalone. pagepack only writes this file; it is never read back.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::discover::Route;
use crate::naming;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Could not write {0}: {1}")]
    Write(PathBuf, #[source] std::io::Error),
    #[error("Could not serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The document handed to the serving backend.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub routes: Vec<ManifestRoute>,
    /// Identical to the `imports` object of `importmap.json`.
    #[serde(rename = "importMap")]
    pub import_map: BTreeMap<String, String>,
}

/// One route as the backend sees it.
#[derive(Debug, Serialize)]
pub struct ManifestRoute {
    /// Public path: `/` for the root `index` route, `/<name>` otherwise.
    pub path: String,
    /// Public URL of the built bundle.
    #[serde(rename = "clientJS")]
    pub client_js: String,
    /// Component identifier (the logical route name).
    pub component: String,
}

/// Assemble the manifest in route discovery order. Pure; no filesystem
/// checks — whether the referenced bundles exist is the deployer's concern.
pub fn manifest_for(
    routes: &[Route],
    import_map: &BTreeMap<String, String>,
    static_prefix: &str,
) -> Manifest {
    Manifest {
        routes: routes
            .iter()
            .map(|route| ManifestRoute {
                path: naming::route_public_path(&route.name),
                client_js: naming::published_route_path(static_prefix, &route.output_file),
                component: route.name.clone(),
            })
            .collect(),
        import_map: import_map.clone(),
    }
}

/// Write the manifest to `<dist>/manifest.json`.
pub fn generate(
    routes: &[Route],
    import_map: &BTreeMap<String, String>,
    static_prefix: &str,
    dist: &Path,
) -> Result<Manifest, ManifestError> {
    let manifest = manifest_for(routes, import_map, static_prefix);

    let path = dist.join("manifest.json");
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(&path, json).map_err(|e| ManifestError::Write(path, e))?;

    Ok(manifest)
}
