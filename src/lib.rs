//! # pagepack
//!
//! Build orchestrator for multi-page client applications. Your filesystem is
//! the route table: every page component under `routes/` becomes a browser
//! bundle, every declared dependency becomes a shared library bundle, and an
//! import map ties them together so library code is fetched once and reused
//! across pages.
//!
//! # Architecture: One Linear Pipeline
//!
//! ```text
//! package.json ──→ dependencies ──→ dist/lib/*.js        (library bundles)
//! routes/*.jsx ──→ routes       ──→ dist/routes/*.js     (route bundles)
//! library URLs ─────────────────→ dist/importmap.json    (browser import map)
//! routes + map ─────────────────→ dist/manifest.json     (backend descriptor)
//! ```
//!
//! The flow is single-pass with one early exit (no routes → warn and stop
//! successfully). Each stage is a function from plain inputs to plain
//! outputs, so unit tests exercise the whole pipeline with a mock engine and
//! never need Node installed.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`deps`] | Reads declared dependencies from `package.json`; owns the sub-export table and virtual-module names |
//! | [`discover`] | Walks the routes directory and derives logical route names |
//! | [`engine`] | The bundling-engine seam: typed [`engine::BundleJob`], esbuild CLI implementation, recording mock |
//! | [`libs`] | Bundles each dependency export standalone, externalizing all others |
//! | [`routes`] | Bundles each page component, externalizing every dependency |
//! | [`importmap`] | Aggregates library URLs into the browser import map |
//! | [`manifest`] | Combines routes and import map into the backend manifest |
//! | [`pipeline`] | Sequences the stages and owns the error policy |
//! | [`naming`] | Single source of truth for output names, published URLs, and public paths |
//! | [`config`] | Optional `pagepack.toml`: defaults, overlay merging, validation |
//! | [`output`] | Event-based CLI progress formatting |
//!
//! # Design Decisions
//!
//! ## Bundling Is Delegated, Orchestration Is Owned
//!
//! pagepack never parses or transforms JavaScript. The [`engine::BundleEngine`]
//! trait is a narrow seam around an external bundler (esbuild by default):
//! entry point in, file out. What pagepack owns is the partitioning strategy —
//! which code goes in which bundle, what gets externalized where, and how the
//! resulting URLs stay consistent across the import map and manifest.
//!
//! ## Libraries Externalize Each Other, Routes Externalize Everything
//!
//! Every library bundle marks all *other* dependencies as external, so shared
//! packages exist exactly once in `dist/lib/`. Route bundles externalize the
//! full dependency list plus the virtual JSX runtime modules, so they contain
//! nothing but page code. The browser import map is what makes the
//! externalized specifiers resolvable at load time.
//!
//! ## Asymmetric Failure Policy
//!
//! A library that fails to bundle is excluded and reported — pages that don't
//! use it still work, and the import map falls back to the URL the library
//! would have had. A route that fails to bundle is fatal: the backend cannot
//! serve a page with no bundle. All routes are attempted before the failures
//! abort the build, so one run reports every broken page.
//!
//! ## Names Are Derived Once
//!
//! Output identifiers, published URLs, and public paths all come from
//! [`naming`]. The import-map fallback for a missing `react` build calls the
//! same function the library builder uses, so the two can never disagree
//! about where `react.js` lives.

pub mod config;
pub mod deps;
pub mod discover;
pub mod engine;
pub mod importmap;
pub mod libs;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_helpers;
