//! Build orchestration: the linear pipeline tying all stages together.
//!
//! ```text
//! list dependencies → discover routes → build libraries → build routes
//!                   → generate import map → generate manifest
//! ```
//!
//! One early exit: a project with no routes is not an error — the build
//! warns and succeeds without touching `dist/`. Beyond that the flow is
//! strictly linear and single-pass; dependency names and route descriptors
//! flow into bundle artifacts, artifact URLs into the import map, and the
//! import map into the manifest.
//!
//! Error policy (deliberately asymmetric, see the stage modules):
//! - library failures are isolated and reported, the build continues;
//! - route failures are collected, then abort the pipeline before the
//!   import map and manifest are written;
//! - any artifact-write failure is fatal. Files written before a fatal
//!   error stay on disk; a failed build is not atomic.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

use crate::config::BuildConfig;
use crate::deps::{self, DepsError};
use crate::discover::{self, Route};
use crate::engine::BundleEngine;
use crate::importmap::{self, ImportMapError};
use crate::libs::{self, LibraryFailure};
use crate::manifest::{self, ManifestError};
use crate::output::BuildEvent;
use crate::routes::{self, RoutesError};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Deps(#[from] DepsError),
    #[error("Could not create output directory {0}: {1}")]
    OutputDir(PathBuf, #[source] std::io::Error),
    #[error(transparent)]
    Routes(#[from] RoutesError),
    #[error(transparent)]
    ImportMap(#[from] ImportMapError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// What a finished run produced.
#[derive(Debug)]
pub enum BuildOutcome {
    /// No page components found; nothing was built.
    NoRoutes,
    Completed(BuildReport),
}

/// Summary of a completed build, for end-of-run reporting and tests.
#[derive(Debug)]
pub struct BuildReport {
    pub dependencies: Vec<String>,
    pub routes: Vec<Route>,
    /// Export name → published URL for every library that built.
    pub artifacts: BTreeMap<String, String>,
    /// Libraries that failed and were excluded (non-fatal).
    pub library_failures: Vec<LibraryFailure>,
    pub import_map: BTreeMap<String, String>,
}

/// Run the full build for the project at `project`, writing into `dist`.
///
/// Progress is reported on `events` if given; the caller owns printing.
pub fn run(
    project: &Path,
    dist: &Path,
    config: &BuildConfig,
    engine: &dyn BundleEngine,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildOutcome, PipelineError> {
    send(&events, BuildEvent::Stage("Listing dependencies"));
    let dependencies = deps::list_dependencies(&project.join(&config.package_file))?;

    send(&events, BuildEvent::Stage("Discovering routes"));
    let discovery = discover::discover_routes(
        &project.join(&config.routes_dir),
        &config.route_extension,
    );
    for warning in &discovery.warnings {
        send(&events, BuildEvent::Warning(warning.clone()));
    }
    if discovery.routes.is_empty() {
        send(
            &events,
            BuildEvent::Warning(format!(
                "no .{} files found in {} — nothing to build",
                config.route_extension, config.routes_dir
            )),
        );
        return Ok(BuildOutcome::NoRoutes);
    }

    let lib_dir = dist.join("lib");
    let routes_dir = dist.join("routes");
    for dir in [&lib_dir, &routes_dir] {
        std::fs::create_dir_all(dir)
            .map_err(|e| PipelineError::OutputDir(dir.clone(), e))?;
    }

    send(&events, BuildEvent::Stage("Building libraries"));
    let libraries = libs::build_libraries(&dependencies, &lib_dir, config, engine, events.clone());

    send(&events, BuildEvent::Stage("Building routes"));
    routes::build_routes(
        &discovery.routes,
        &dependencies,
        &routes_dir,
        config,
        engine,
        events.as_ref(),
    )?;

    send(&events, BuildEvent::Stage("Writing import map and manifest"));
    let import_map = importmap::generate(&libraries.artifacts, &config.static_prefix, dist)?;
    manifest::generate(&discovery.routes, &import_map, &config.static_prefix, dist)?;

    Ok(BuildOutcome::Completed(BuildReport {
        dependencies,
        routes: discovery.routes,
        artifacts: libraries.artifacts,
        library_failures: libraries.failures,
        import_map,
    }))
}

fn send(events: &Option<Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}
