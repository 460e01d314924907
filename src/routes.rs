//! Route bundling: one ESM bundle per discovered page component.
//!
//! Route bundles carry only application code. All top-level dependencies are
//! externalized, plus three specifiers that never appear in `package.json`
//! but are always expected at runtime: the automatic-JSX runtime, its
//! development variant, and the common `react-dom/client` sub-export. The
//! import map resolves all of them in the browser.
//!
//! The JSX transform runs in `automatic` mode, so route files never import
//! the runtime themselves, and every bundle gets a source map — route code is
//! what gets debugged in production.
//!
//! Unlike library builds, a failed route is fatal: the app cannot serve a
//! page whose bundle is missing. All routes are still attempted first, so a
//! single run reports every broken page, then the collected failures abort
//! the pipeline before the import map and manifest are written.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

use crate::config::BuildConfig;
use crate::deps::{COMMON_SUB_EXPORT, JSX_DEV_RUNTIME, JSX_RUNTIME};
use crate::discover::Route;
use crate::engine::{BundleEngine, BundleJob, JsxMode, ModuleFormat};
use crate::output::BuildEvent;

/// A route whose bundle could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteFailure {
    pub name: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum RoutesError {
    #[error("Could not create output directory {0}: {1}")]
    OutputDir(std::path::PathBuf, #[source] std::io::Error),
    #[error("{}", render_failures(failures))]
    Failures { failures: Vec<RouteFailure> },
}

fn render_failures(failures: &[RouteFailure]) -> String {
    let mut out = format!("{} route build(s) failed:", failures.len());
    for failure in failures {
        let _ = write!(out, "\n    {}: {}", failure.name, failure.message);
    }
    out
}

/// Specifiers externalized in every route build: all declared dependencies
/// plus the fixed always-expected set.
pub fn route_externals(dependencies: &[String]) -> Vec<String> {
    let mut externals: Vec<String> = dependencies.to_vec();
    for fixed in [JSX_RUNTIME, JSX_DEV_RUNTIME, COMMON_SUB_EXPORT] {
        if !externals.iter().any(|e| e == fixed) {
            externals.push(fixed.to_string());
        }
    }
    externals
}

/// Bundle every route into `routes_dir` (`dist/routes`).
///
/// Attempts all routes, then fails with the full set of broken ones so a
/// single run surfaces every problem. Bundles written before a failure stay
/// on disk; nothing here is atomic.
pub fn build_routes(
    routes: &[Route],
    dependencies: &[String],
    routes_dir: &Path,
    config: &BuildConfig,
    engine: &dyn BundleEngine,
    events: Option<&Sender<BuildEvent>>,
) -> Result<(), RoutesError> {
    let externals = route_externals(dependencies);
    let mut failures = Vec::new();

    for route in routes {
        let outfile = routes_dir.join(&route.output_file);
        if let Some(parent) = outfile.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RoutesError::OutputDir(parent.to_path_buf(), e))?;
        }

        let job = BundleJob {
            entry: route.input_file.display().to_string(),
            bundle: true,
            format: ModuleFormat::Esm,
            outfile,
            external: externals.clone(),
            minify: false,
            sourcemap: config.bundling.route_sourcemaps,
            jsx: Some(JsxMode::Automatic),
            target: config.bundling.target.clone(),
        };

        match engine.bundle(&job) {
            Ok(()) => {
                if let Some(tx) = events {
                    let _ = tx.send(BuildEvent::RouteBuilt {
                        name: route.name.clone(),
                    });
                }
            }
            Err(err) => {
                let message = err.to_string();
                if let Some(tx) = events {
                    let _ = tx.send(BuildEvent::RouteFailed {
                        name: route.name.clone(),
                        message: message.clone(),
                    });
                }
                failures.push(RouteFailure {
                    name: route.name.clone(),
                    message,
                });
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(RoutesError::Failures { failures })
    }
}
