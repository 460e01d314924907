//! Shared test utilities for the pagepack test suite.
//!
//! Builds throwaway project trees — a `package.json` plus a `routes/`
//! directory of page components — so pipeline tests run against a realistic
//! layout without fixtures on disk.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Create a temp project with the given dependencies and routes.
///
/// `routes` entries are route names (`"index"`, `"blog/post"`); each becomes
/// `routes/<name>.jsx` with a trivial component body. The `routes/` directory
/// exists even when `routes` is empty, mirroring a fresh project.
pub fn project_with(dependencies: &[&str], routes: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();

    let deps_json: Vec<String> = dependencies
        .iter()
        .map(|d| format!("\"{d}\": \"*\""))
        .collect();
    fs::write(
        tmp.path().join("package.json"),
        format!("{{\"dependencies\": {{{}}}}}", deps_json.join(", ")),
    )
    .unwrap();

    let routes_dir = tmp.path().join("routes");
    fs::create_dir_all(&routes_dir).unwrap();
    for route in routes {
        let path = routes_dir.join(format!("{route}.jsx"));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export default () => <div/>;\n").unwrap();
    }

    tmp
}

/// Read and parse a JSON artifact. Panics with the path on any failure.
pub fn read_json(path: &Path) -> serde_json::Value {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("could not read {}: {e}", path.display()));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("invalid JSON in {}: {e}", path.display()))
}
