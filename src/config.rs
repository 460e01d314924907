//! Build configuration module.
//!
//! Handles loading, validating, and merging `pagepack.toml`. Configuration is
//! a single optional file in the project root: stock defaults are overridden
//! by whatever keys the user sets, and unknown keys are rejected so typos
//! fail loudly instead of silently doing nothing.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! routes_dir = "routes"          # Page-component directory
//! package_file = "package.json"  # Project metadata with `dependencies`
//! route_extension = "jsx"        # Page-component file extension (no dot)
//! static_prefix = "/static"      # URL prefix bundles are served under
//!
//! [bundling]
//! esbuild_bin = "esbuild"        # Bundler binary (e.g. node_modules/.bin/esbuild)
//! minify_libraries = true        # Minify library bundles
//! route_sourcemaps = true        # Emit .js.map next to route bundles
//! # target = "es2020"            # Syntax target passed to the bundler (omit for default)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [bundling]
//! esbuild_bin = "node_modules/.bin/esbuild"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `pagepack.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory containing page-component source files.
    pub routes_dir: String,
    /// Project metadata file whose `dependencies` keys are bundled as libraries.
    pub package_file: String,
    /// Page-component file extension, without the leading dot.
    pub route_extension: String,
    /// URL prefix the serving backend mounts built bundles under.
    pub static_prefix: String,
    /// Bundling-engine settings.
    pub bundling: BundlingConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            routes_dir: "routes".to_string(),
            package_file: "package.json".to_string(),
            route_extension: "jsx".to_string(),
            static_prefix: "/static".to_string(),
            bundling: BundlingConfig::default(),
        }
    }
}

/// Settings forwarded to the external bundling engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundlingConfig {
    /// Bundler binary to spawn. Point at `node_modules/.bin/esbuild` for a
    /// project-local install.
    pub esbuild_bin: String,
    /// Minify library bundles (they ship to production; routes keep their
    /// source maps instead).
    pub minify_libraries: bool,
    /// Emit a companion `.js.map` for every route bundle.
    pub route_sourcemaps: bool,
    /// Optional syntax target (e.g. `es2020`) passed through to the engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Default for BundlingConfig {
    fn default() -> Self {
        Self {
            esbuild_bin: "esbuild".to_string(),
            minify_libraries: true,
            route_sourcemaps: true,
            target: None,
        }
    }
}

impl BuildConfig {
    /// Validate semantic constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.routes_dir.is_empty() {
            return Err(ConfigError::Validation(
                "routes_dir must not be empty".to_string(),
            ));
        }
        if self.package_file.is_empty() {
            return Err(ConfigError::Validation(
                "package_file must not be empty".to_string(),
            ));
        }
        if self.route_extension.is_empty() || self.route_extension.starts_with('.') {
            return Err(ConfigError::Validation(format!(
                "route_extension must be a bare extension without a dot, got '{}'",
                self.route_extension
            )));
        }
        if !self.static_prefix.starts_with('/') || self.static_prefix.ends_with('/') {
            return Err(ConfigError::Validation(format!(
                "static_prefix must start with '/' and not end with '/', got '{}'",
                self.static_prefix
            )));
        }
        if self.bundling.esbuild_bin.is_empty() {
            return Err(ConfigError::Validation(
                "bundling.esbuild_bin must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading and merging
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(BuildConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `pagepack.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `pagepack.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("pagepack.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `pagepack.toml` in the project root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the stock defaults.
pub fn load_config(project: &Path) -> Result<BuildConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match load_raw_config(project)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: BuildConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `pagepack.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# pagepack Configuration
# ======================
# All options are optional. Values shown are the defaults; delete anything
# you don't want to override.

# Directory containing page-component source files. Every file with the
# configured extension below becomes a route; its path relative to this
# directory (extension stripped) is the route name. A file named index.jsx
# at the top level is served at "/".
routes_dir = "routes"

# Project metadata file. The keys of its "dependencies" object are bundled
# as standalone libraries and published through the import map.
package_file = "package.json"

# Page-component file extension, without the leading dot.
route_extension = "jsx"

# URL prefix the serving backend mounts built bundles under. Library bundles
# are published at <static_prefix>/lib/<name>.js, route bundles at
# <static_prefix>/routes/<name>.js.
static_prefix = "/static"

[bundling]
# Bundler binary to spawn. For a project-local install use:
# esbuild_bin = "node_modules/.bin/esbuild"
esbuild_bin = "esbuild"

# Library bundles ship to production and are minified by default. Route
# bundles are left readable and get source maps instead.
minify_libraries = true
route_sourcemaps = true

# Syntax target passed through to the bundler, e.g. "es2020". Omit to use
# the bundler's default.
# target = "es2020"
"##
}
