//! Library bundling: one standalone ESM bundle per dependency export.
//!
//! Each declared dependency becomes at least one bundle; packages with known
//! sub-exports (see [`crate::deps::SUB_EXPORTS`]) get one extra bundle per
//! sub-export. Every build externalizes all *other* top-level dependencies,
//! so each library bundle contains only its own code and shared packages are
//! fetched once — a dependency never externalizes itself, including in its
//! sub-export builds.
//!
//! A failed export is reported and excluded from the result; it never aborts
//! the other builds or the rest of the pipeline. One broken package should
//! not stop the app from shipping the routes that don't use it.
//!
//! Dependencies build in parallel under rayon. Results accumulate into a
//! shared map behind a mutex, so insertion is serialized even though engine
//! calls overlap.

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::mpsc::Sender;

use crate::config::BuildConfig;
use crate::deps;
use crate::engine::{BundleEngine, BundleJob, ModuleFormat};
use crate::naming;
use crate::output::BuildEvent;

/// A library export that failed to bundle and was excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryFailure {
    pub export: String,
    pub message: String,
}

/// Result of the library stage: export name → published URL for every export
/// that built, plus the failures that were excluded.
#[derive(Debug, Default)]
pub struct LibraryOutcome {
    pub artifacts: BTreeMap<String, String>,
    pub failures: Vec<LibraryFailure>,
}

/// Bundle every dependency (and known sub-exports) into `lib_dir`.
///
/// `lib_dir` is the on-disk output directory (`dist/lib`); published URLs use
/// the configured static prefix instead. Progress is reported per export on
/// `events` as workers finish, in no particular order.
pub fn build_libraries(
    dependencies: &[String],
    lib_dir: &Path,
    config: &BuildConfig,
    engine: &dyn BundleEngine,
    events: Option<Sender<BuildEvent>>,
) -> LibraryOutcome {
    let artifacts = Mutex::new(BTreeMap::new());
    let failures = Mutex::new(Vec::new());

    dependencies.par_iter().for_each(|dependency| {
        let events = events.clone();
        send(&events, BuildEvent::LibraryStarted {
            dependency: dependency.clone(),
        });

        // Externalize every other top-level dependency, never ourselves.
        let external: Vec<String> = dependencies
            .iter()
            .filter(|d| *d != dependency)
            .cloned()
            .collect();

        for export in deps::exports_for(dependency) {
            let job = BundleJob {
                entry: export.clone(),
                bundle: true,
                format: ModuleFormat::Esm,
                outfile: lib_dir.join(format!("{}.js", naming::lib_output_name(&export))),
                external: external.clone(),
                minify: config.bundling.minify_libraries,
                sourcemap: false,
                jsx: None,
                target: config.bundling.target.clone(),
            };

            match engine.bundle(&job) {
                Ok(()) => {
                    let url = naming::published_lib_path(&config.static_prefix, &export);
                    artifacts
                        .lock()
                        .expect("artifact map lock poisoned")
                        .insert(export.clone(), url.clone());
                    send(&events, BuildEvent::LibraryBuilt { export, url });
                }
                Err(err) => {
                    let message = err.to_string();
                    failures
                        .lock()
                        .expect("failure list lock poisoned")
                        .push(LibraryFailure {
                            export: export.clone(),
                            message: message.clone(),
                        });
                    send(&events, BuildEvent::LibraryFailed { export, message });
                }
            }
        }
    });

    LibraryOutcome {
        artifacts: artifacts.into_inner().expect("artifact map lock poisoned"),
        failures: failures.into_inner().expect("failure list lock poisoned"),
    }
}

fn send(events: &Option<Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = events {
        // A disconnected printer is not worth failing a build over.
        let _ = tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::MockEngine;
    use tempfile::TempDir;

    fn deps(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    fn run(engine: &MockEngine, dependencies: &[&str]) -> (LibraryOutcome, TempDir) {
        let tmp = TempDir::new().unwrap();
        let outcome = build_libraries(
            &deps(dependencies),
            &tmp.path().join("dist/lib"),
            &BuildConfig::default(),
            engine,
            None,
        );
        (outcome, tmp)
    }

    #[test]
    fn one_artifact_per_plain_dependency() {
        let engine = MockEngine::new();
        let (outcome, _tmp) = run(&engine, &["react", "preact-compat"]);

        assert_eq!(outcome.artifacts.len(), 2);
        assert_eq!(
            outcome.artifacts.get("react"),
            Some(&"/static/lib/react.js".to_string())
        );
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn react_dom_gets_exactly_two_artifacts() {
        let engine = MockEngine::new();
        let (outcome, _tmp) = run(&engine, &["react", "react-dom"]);

        assert_eq!(outcome.artifacts.len(), 3);
        assert_eq!(
            outcome.artifacts.get("react-dom"),
            Some(&"/static/lib/react-dom.js".to_string())
        );
        assert_eq!(
            outcome.artifacts.get("react-dom/client"),
            Some(&"/static/lib/react-dom-client.js".to_string())
        );
    }

    #[test]
    fn never_externalizes_itself() {
        let engine = MockEngine::new();
        let (_outcome, _tmp) = run(&engine, &["react", "react-dom"]);

        for job in engine.recorded_jobs() {
            assert!(
                !job.external.contains(&job.entry),
                "job for '{}' externalizes itself",
                job.entry
            );
        }
        // Sub-export builds must not externalize their own package either.
        let client_job = engine.job_for("react-dom/client");
        assert!(!client_job.external.contains(&"react-dom".to_string()));
        assert!(client_job.external.contains(&"react".to_string()));
    }

    #[test]
    fn externalizes_every_other_dependency() {
        let engine = MockEngine::new();
        let (_outcome, _tmp) = run(&engine, &["a", "b", "c"]);

        let job = engine.job_for("b");
        let mut external = job.external.clone();
        external.sort_unstable();
        assert_eq!(external, vec!["a", "c"]);
    }

    #[test]
    fn library_jobs_are_minified_esm_without_sourcemaps() {
        let engine = MockEngine::new();
        let (_outcome, _tmp) = run(&engine, &["react"]);

        let job = engine.job_for("react");
        assert!(job.bundle);
        assert!(job.minify);
        assert!(!job.sourcemap);
        assert_eq!(job.format, ModuleFormat::Esm);
        assert!(job.jsx.is_none());
    }

    #[test]
    fn outfile_uses_filesystem_safe_identifier() {
        let engine = MockEngine::new();
        let (_outcome, tmp) = run(&engine, &["react-dom"]);

        let job = engine.job_for("react-dom/client");
        assert_eq!(
            job.outfile,
            tmp.path().join("dist/lib/react-dom-client.js")
        );
    }

    #[test]
    fn failure_is_isolated_to_the_failing_export() {
        let engine = MockEngine::failing_on(&["react"]);
        let (outcome, _tmp) = run(&engine, &["react", "react-dom"]);

        assert!(!outcome.artifacts.contains_key("react"));
        assert!(outcome.artifacts.contains_key("react-dom"));
        assert!(outcome.artifacts.contains_key("react-dom/client"));
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].export, "react");
    }

    #[test]
    fn failed_sub_export_keeps_main_export() {
        let engine = MockEngine::failing_on(&["react-dom/client"]);
        let (outcome, _tmp) = run(&engine, &["react-dom"]);

        assert!(outcome.artifacts.contains_key("react-dom"));
        assert!(!outcome.artifacts.contains_key("react-dom/client"));
        assert_eq!(outcome.failures.len(), 1);
    }

    #[test]
    fn reports_progress_events() {
        let engine = MockEngine::failing_on(&["bad-pkg"]);
        let tmp = TempDir::new().unwrap();
        let (tx, rx) = std::sync::mpsc::channel();

        build_libraries(
            &deps(&["react", "bad-pkg"]),
            &tmp.path().join("dist/lib"),
            &BuildConfig::default(),
            &engine,
            Some(tx),
        );

        let events: Vec<BuildEvent> = rx.into_iter().collect();
        assert!(events.iter().any(|e| matches!(
            e,
            BuildEvent::LibraryBuilt { export, .. } if export == "react"
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            BuildEvent::LibraryFailed { export, .. } if export == "bad-pkg"
        )));
    }

    #[test]
    fn empty_dependency_list_yields_empty_outcome() {
        let engine = MockEngine::new();
        let (outcome, _tmp) = run(&engine, &[]);
        assert!(outcome.artifacts.is_empty());
        assert!(outcome.failures.is_empty());
        assert!(engine.recorded_jobs().is_empty());
    }
}
