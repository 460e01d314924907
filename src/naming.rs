//! Centralized naming for bundle outputs and published URLs.
//!
//! Every path or URL that appears in more than one place — the library
//! builder's output files, the import map's entries and its fallback, the
//! manifest's `clientJS` URLs — is derived here and only here. The import-map
//! fallback in particular must match the library builder's file naming
//! exactly; routing both through [`published_lib_path`] makes drift
//! impossible rather than merely unlikely.
//!
//! ## Conventions
//!
//! - A library export name may contain `/` (sub-exports like
//!   `react-dom/client`). Output identifiers replace `/` with `-` so they are
//!   filesystem- and URL-safe: `react-dom/client` → `react-dom-client.js`.
//! - Route bundles keep their slash-separated names as nested paths under
//!   `routes/`: route `blog/post` → `routes/blog/post.js`.
//! - The route named `index` is served at `/`; every other route `name` at
//!   `/<name>`.

/// Filesystem- and URL-safe output identifier for a library export.
///
/// `react` → `react`, `react-dom/client` → `react-dom-client`.
pub fn lib_output_name(export: &str) -> String {
    export.replace('/', "-")
}

/// Published URL of a library export's bundle, e.g. `/static/lib/react.js`.
///
/// Used by the library builder when recording artifacts *and* by the
/// import-map generator as the fallback for the JSX runtime aliases.
pub fn published_lib_path(static_prefix: &str, export: &str) -> String {
    format!("{static_prefix}/lib/{}.js", lib_output_name(export))
}

/// Published URL of a route's bundle, e.g. `/static/routes/blog/post.js`.
pub fn published_route_path(static_prefix: &str, output_file: &str) -> String {
    format!("{static_prefix}/routes/{output_file}")
}

/// Public path a route is served at: `index` → `/`, `about` → `/about`,
/// `blog/post` → `/blog/post`.
pub fn route_public_path(name: &str) -> String {
    if name == "index" {
        "/".to_string()
    } else {
        format!("/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_export_name_unchanged() {
        assert_eq!(lib_output_name("react"), "react");
    }

    #[test]
    fn sub_export_slash_becomes_dash() {
        assert_eq!(lib_output_name("react-dom/client"), "react-dom-client");
    }

    #[test]
    fn published_lib_path_uses_output_name() {
        assert_eq!(
            published_lib_path("/static", "react-dom/client"),
            "/static/lib/react-dom-client.js"
        );
    }

    #[test]
    fn published_route_path_keeps_nesting() {
        assert_eq!(
            published_route_path("/static", "blog/post.js"),
            "/static/routes/blog/post.js"
        );
    }

    #[test]
    fn index_route_maps_to_root() {
        assert_eq!(route_public_path("index"), "/");
    }

    #[test]
    fn named_route_gets_leading_slash() {
        assert_eq!(route_public_path("about"), "/about");
    }

    #[test]
    fn nested_route_keeps_segments() {
        assert_eq!(route_public_path("blog/post"), "/blog/post");
    }
}
