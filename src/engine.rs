//! Bundling engine trait and job configuration.
//!
//! The [`BundleEngine`] trait is the single seam between pagepack and the
//! tool that actually turns source files into deployable JavaScript. pagepack
//! decides *what* to bundle and *where it goes*; the engine owns module
//! resolution, transformation, and minification. The produced bytes are never
//! inspected.
//!
//! The production implementation is [`EsbuildCli`], which spawns the esbuild
//! binary with one flag per [`BundleJob`] field. Tests use the recording
//! `MockEngine` instead, so the whole pipeline is exercisable without Node
//! on the machine.

use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Could not spawn bundler '{bin}': {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Bundle failed: {0}")]
    BundleFailed(String),
}

/// Output module format. Only browser-native ESM is produced today; the enum
/// exists so the job stays strongly typed rather than stringly typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleFormat {
    Esm,
}

impl ModuleFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleFormat::Esm => "esm",
        }
    }
}

/// JSX transform mode. `Automatic` makes the transform inject its own
/// runtime import, so route files never import the runtime explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsxMode {
    Automatic,
}

impl JsxMode {
    pub fn as_str(self) -> &'static str {
        match self {
            JsxMode::Automatic => "automatic",
        }
    }
}

/// One bundling request. Every engine option pagepack uses is an explicit
/// field here; anything not representable is deliberately not configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleJob {
    /// Entry point: a source file path for routes, a bare package specifier
    /// for libraries.
    pub entry: String,
    /// Inline the full import graph (minus `external`) into one file.
    pub bundle: bool,
    pub format: ModuleFormat,
    /// Where the engine writes the bundle (and `.js.map` when `sourcemap`).
    pub outfile: PathBuf,
    /// Specifiers left unresolved, to be provided at runtime via the import map.
    pub external: Vec<String>,
    pub minify: bool,
    pub sourcemap: bool,
    /// `None` for library builds; routes need the component transform.
    pub jsx: Option<JsxMode>,
    /// Optional syntax target, e.g. `es2020`.
    pub target: Option<String>,
}

/// The external bundling engine collaborator.
///
/// `Sync` because library builds fan out across rayon workers sharing one
/// engine instance.
pub trait BundleEngine: Sync {
    /// Produce a bundle at `job.outfile`, or fail with a human-readable
    /// message. A hang in the engine hangs the build; no timeout is imposed.
    fn bundle(&self, job: &BundleJob) -> Result<(), EngineError>;
}

/// Production engine: shells out to the esbuild binary.
pub struct EsbuildCli {
    bin: String,
}

impl EsbuildCli {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    fn args_for(job: &BundleJob) -> Vec<String> {
        let mut args = vec![job.entry.clone()];
        if job.bundle {
            args.push("--bundle".to_string());
        }
        args.push(format!("--format={}", job.format.as_str()));
        args.push(format!("--outfile={}", job.outfile.display()));
        for external in &job.external {
            args.push(format!("--external:{external}"));
        }
        if job.minify {
            args.push("--minify".to_string());
        }
        if job.sourcemap {
            args.push("--sourcemap".to_string());
        }
        if let Some(jsx) = job.jsx {
            args.push(format!("--jsx={}", jsx.as_str()));
        }
        if let Some(target) = &job.target {
            args.push(format!("--target={target}"));
        }
        args
    }
}

impl BundleEngine for EsbuildCli {
    fn bundle(&self, job: &BundleJob) -> Result<(), EngineError> {
        let output = Command::new(&self.bin)
            .args(Self::args_for(job))
            .output()
            .map_err(|source| EngineError::Spawn {
                bin: self.bin.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr.trim();
            if message.is_empty() {
                Err(EngineError::BundleFailed(format!(
                    "{} exited with {}",
                    self.bin, output.status
                )))
            } else {
                Err(EngineError::BundleFailed(message.to_string()))
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;

    /// Mock engine that records jobs without executing them.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockEngine {
        pub jobs: Mutex<Vec<BundleJob>>,
        /// Entry specifiers that should fail with a scripted message.
        pub failures: Mutex<Vec<(String, String)>>,
    }

    impl MockEngine {
        pub fn new() -> Self {
            Self::default()
        }

        /// Engine that fails every job whose entry matches one of `entries`.
        pub fn failing_on(entries: &[&str]) -> Self {
            Self {
                jobs: Mutex::new(Vec::new()),
                failures: Mutex::new(
                    entries
                        .iter()
                        .map(|e| ((*e).to_string(), format!("could not resolve \"{e}\"")))
                        .collect(),
                ),
            }
        }

        pub fn recorded_jobs(&self) -> Vec<BundleJob> {
            self.jobs.lock().unwrap().clone()
        }

        /// The recorded job with the given entry. Panics if absent.
        pub fn job_for(&self, entry: &str) -> BundleJob {
            self.recorded_jobs()
                .into_iter()
                .find(|j| j.entry == entry)
                .unwrap_or_else(|| {
                    let entries: Vec<String> =
                        self.recorded_jobs().iter().map(|j| j.entry.clone()).collect();
                    panic!("no job recorded for '{entry}'. Recorded: {entries:?}")
                })
        }
    }

    impl BundleEngine for MockEngine {
        fn bundle(&self, job: &BundleJob) -> Result<(), EngineError> {
            self.jobs.lock().unwrap().push(job.clone());

            let failures = self.failures.lock().unwrap();
            if let Some((_, message)) = failures.iter().find(|(entry, _)| *entry == job.entry) {
                return Err(EngineError::BundleFailed(message.clone()));
            }
            Ok(())
        }
    }

    #[test]
    fn esbuild_args_cover_every_field() {
        let job = BundleJob {
            entry: "routes/index.jsx".to_string(),
            bundle: true,
            format: ModuleFormat::Esm,
            outfile: PathBuf::from("dist/routes/index.js"),
            external: vec!["react".to_string(), "react-dom".to_string()],
            minify: false,
            sourcemap: true,
            jsx: Some(JsxMode::Automatic),
            target: Some("es2020".to_string()),
        };

        let args = EsbuildCli::args_for(&job);
        assert_eq!(
            args,
            vec![
                "routes/index.jsx",
                "--bundle",
                "--format=esm",
                "--outfile=dist/routes/index.js",
                "--external:react",
                "--external:react-dom",
                "--sourcemap",
                "--jsx=automatic",
                "--target=es2020",
            ]
        );
    }

    #[test]
    fn esbuild_args_minimal_library_job() {
        let job = BundleJob {
            entry: "react".to_string(),
            bundle: true,
            format: ModuleFormat::Esm,
            outfile: PathBuf::from("dist/lib/react.js"),
            external: vec![],
            minify: true,
            sourcemap: false,
            jsx: None,
            target: None,
        };

        let args = EsbuildCli::args_for(&job);
        assert_eq!(
            args,
            vec![
                "react",
                "--bundle",
                "--format=esm",
                "--outfile=dist/lib/react.js",
                "--minify",
            ]
        );
    }

    #[test]
    fn mock_records_jobs_in_order() {
        let engine = MockEngine::new();
        for entry in ["react", "react-dom"] {
            engine
                .bundle(&BundleJob {
                    entry: entry.to_string(),
                    bundle: true,
                    format: ModuleFormat::Esm,
                    outfile: Path::new("dist/lib").join(format!("{entry}.js")),
                    external: vec![],
                    minify: true,
                    sourcemap: false,
                    jsx: None,
                    target: None,
                })
                .unwrap();
        }

        let jobs = engine.recorded_jobs();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].entry, "react");
        assert_eq!(jobs[1].entry, "react-dom");
    }

    #[test]
    fn mock_fails_scripted_entries() {
        let engine = MockEngine::failing_on(&["left-pad"]);
        let job = BundleJob {
            entry: "left-pad".to_string(),
            bundle: true,
            format: ModuleFormat::Esm,
            outfile: PathBuf::from("dist/lib/left-pad.js"),
            external: vec![],
            minify: true,
            sourcemap: false,
            jsx: None,
            target: None,
        };

        let err = engine.bundle(&job).unwrap_err();
        assert!(matches!(err, EngineError::BundleFailed(_)));
        // The failed attempt is still recorded.
        assert_eq!(engine.recorded_jobs().len(), 1);
    }
}
