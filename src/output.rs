//! CLI output formatting for all pipeline stages.
//!
//! Build progress is reported through [`BuildEvent`]s sent over an mpsc
//! channel: stages (and rayon library workers) emit events, and `main` runs a
//! printer thread that formats them as they arrive. Keeping formatting here
//! and out of the pipeline keeps every stage a pure function over its inputs.
//!
//! # Output Format
//!
//! ```text
//! ==> Listing dependencies
//!     react, react-dom
//! ==> Discovering routes
//!     / → routes/index.js
//!     /about → routes/about.js
//! ==> Building libraries
//!     react → /static/lib/react.js
//!     react-dom → /static/lib/react-dom.js
//!     react-dom/client → /static/lib/react-dom-client.js
//! ==> Building routes
//!     index
//!     about
//! ==> Writing import map and manifest
//! ==> Build complete: dist
//! ```
//!
//! Warnings and per-item failures are prefixed so they stand out in a scroll
//! of progress lines. This output is observability, not a contract surface;
//! the machine-readable results are `importmap.json` and `manifest.json`.

use crate::discover::Route;
use crate::naming;
use crate::pipeline::BuildReport;

/// Progress and diagnostics emitted while a build runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// A pipeline stage began.
    Stage(&'static str),
    /// A dependency's library build started (one per package, not per export).
    LibraryStarted { dependency: String },
    /// A library export was bundled and published.
    LibraryBuilt { export: String, url: String },
    /// A library export failed to bundle; the build continues without it.
    LibraryFailed { export: String, message: String },
    /// A route was bundled.
    RouteBuilt { name: String },
    /// A route failed to bundle; reported here, consolidated at stage end.
    RouteFailed { name: String, message: String },
    /// Non-fatal condition worth surfacing (unreadable directory, no routes).
    Warning(String),
}

/// Format a single event as a printable line.
pub fn format_build_event(event: &BuildEvent) -> String {
    match event {
        BuildEvent::Stage(name) => format!("==> {name}"),
        BuildEvent::LibraryStarted { dependency } => format!("    {dependency}..."),
        BuildEvent::LibraryBuilt { export, url } => format!("    {export} → {url}"),
        BuildEvent::LibraryFailed { export, message } => {
            format!("    {export} FAILED: {message}")
        }
        BuildEvent::RouteBuilt { name } => format!("    {name}"),
        BuildEvent::RouteFailed { name, message } => format!("    {name} FAILED: {message}"),
        BuildEvent::Warning(message) => format!("Warning: {message}"),
    }
}

/// Print discovered routes, one line per route with its public path.
pub fn print_routes(routes: &[Route]) {
    if routes.is_empty() {
        println!("No routes");
        return;
    }
    println!("Routes");
    for route in routes {
        println!(
            "    {} → routes/{}",
            naming::route_public_path(&route.name),
            route.output_file
        );
    }
}

/// Print the end-of-build summary: counts plus any isolated library failures.
pub fn print_report(report: &BuildReport) {
    println!(
        "{} route(s), {} librar{} built, {} import map entr{}",
        report.routes.len(),
        report.artifacts.len(),
        if report.artifacts.len() == 1 { "y" } else { "ies" },
        report.import_map.len(),
        if report.import_map.len() == 1 { "y" } else { "ies" },
    );
    if !report.library_failures.is_empty() {
        println!(
            "{} library build(s) failed and were excluded:",
            report.library_failures.len()
        );
        for failure in &report.library_failures {
            println!("    {}: {}", failure.export, failure.message);
        }
    }
}
