//! # chansite
//!
//! A one-shot static site generator for a YouTube channel. It pulls the
//! channel's metadata, recent uploads, and playlists from the Data API, joins
//! videos to their playlist memberships, and renders a single self-contained
//! HTML page with client-side search, filtering, pagination, and a modal
//! player.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! chansite runs in three independent stages, each producing a JSON manifest
//! that the next stage consumes:
//!
//! ```text
//! 1. Fetch     API          →  fetched.json    (network → raw structured data)
//! 2. Shape     fetched.json →  site.json       (joins, facets, featured video)
//! 3. Generate  site.json    →  dist/index.html (final page)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Debuggability**: each manifest is human-readable JSON you can inspect.
//! - **API frugality**: re-render the page without re-spending API quota —
//!   only the fetch stage touches the network.
//! - **Testability**: shape and generate are pure functions of their input
//!   manifest, so tests exercise them without a network or a clock.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`fetch`] | Stage 1 — transport seam, paginated fetch loop, resource aggregators |
//! | [`shape`] | Stage 2 — playlist-membership join, year facets, channel projection |
//! | [`generate`] | Stage 3 — renders the page from the shaped manifest using Maud |
//! | [`api`] | Typed models and endpoint URLs for the Data API surface |
//! | [`config`] | `config.toml` loading, merging, validation, theme CSS |
//! | [`types`] | Shaped entities serialized between shape and generate |
//! | [`output`] | CLI output formatting for pipeline results |
//!
//! # Design Decisions
//!
//! ## Sequential Fetching
//!
//! Every request blocks until its response arrives; nothing is issued
//! concurrently. The API hands out one page at a time per resource, and the
//! join step needs every playlist membership before it can run, so
//! parallelism would buy latency on a path that runs once per build while
//! costing the simple "fold pages until done" loop its auditability.
//!
//! ## Fail Loud, Fail Whole
//!
//! Any network failure, non-JSON body, or API-reported error aborts the run
//! with a nonzero exit and no output artifact. A build-time generator has no
//! live users to degrade gracefully for; a partial site is worse than a loud
//! failure. Errors are still tagged by kind (API / network / parse) so tests
//! and logs can tell them apart.
//!
//! ## Explicit Bounds on API Consumption
//!
//! The video listing is capped in both items and pages; playlist expansion
//! is capped in breadth (first N playlists only). Each bound is a separately
//! named config knob, so the policy is auditable and each limit is testable
//! on its own. An API that keeps handing out continuation tokens can never
//! make a run unbounded.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system: malformed markup is a build error, interpolation is
//! auto-escaped, and there is no template directory to ship or get out of
//! sync. The generated page is plain HTML with inline CSS and a small
//! vanilla-JS script — it can be dropped on any static file host.

pub mod api;
pub mod config;
pub mod fetch;
pub mod generate;
pub mod output;
pub mod shape;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
