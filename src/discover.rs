//! Route discovery: filesystem layout → route descriptors.
//!
//! Walks the routes directory and turns every page-component file into a
//! [`Route`]. The route name is the file's path relative to the routes root
//! with the extension stripped and separators normalized to `/`, so the
//! directory tree *is* the route table:
//!
//! ```text
//! routes/
//! ├── index.jsx        → route "index"      (served at /)
//! ├── about.jsx        → route "about"      (served at /about)
//! └── blog/
//!     └── post.jsx     → route "blog/post"  (served at /blog/post)
//! ```
//!
//! Discovery never fails. A missing routes directory yields an empty route
//! list (the orchestrator turns that into a warning and a successful no-op
//! build). Any other read failure is collected as a warning and that subtree
//! simply contributes no routes — one unreadable directory must not take
//! down the whole build.

use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A discovered page component, ready to be bundled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Logical route name: relative path, separators normalized to `/`,
    /// extension stripped. Unique within a discovery pass.
    pub name: String,
    /// Absolute (or root-relative) path to the source file.
    pub input_file: PathBuf,
    /// Output file name under `dist/routes/`, e.g. `blog/post.js`.
    pub output_file: String,
}

/// Result of a discovery pass: routes in directory order, plus any warnings
/// for subtrees that could not be read.
#[derive(Debug, Default)]
pub struct Discovery {
    pub routes: Vec<Route>,
    pub warnings: Vec<String>,
}

/// Recursively enumerate page-component files under `root`.
///
/// `extension` is the bare component extension from config (`jsx` by
/// default). Ordering is directory-listing order; no guarantee across
/// platforms.
pub fn discover_routes(root: &Path, extension: &str) -> Discovery {
    let mut discovery = Discovery::default();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                // A missing root is the "no routes yet" case, not a problem
                // worth a warning. Everything else gets reported.
                let not_found = err
                    .io_error()
                    .is_some_and(|io| io.kind() == io::ErrorKind::NotFound);
                if !not_found {
                    let path = err
                        .path()
                        .map_or_else(|| root.display().to_string(), |p| p.display().to_string());
                    discovery
                        .warnings
                        .push(format!("Could not read directory {path}: {err}"));
                }
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }

        // Inside the walk every path is prefixed by root.
        let rel = path.strip_prefix(root).expect("walked path outside root");
        let name = rel
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        discovery.routes.push(Route {
            output_file: format!("{name}.js"),
            input_file: path.to_path_buf(),
            name,
        });
    }

    discovery
}
