//! Worker-pool credential aggregation CLI.
//!
//! Wraps the Toolforge CLI (under per-account sudo impersonation) to collect
//! each worker account's login secrets into a single JSON list and store it
//! back as an envvar on the primary tool account.
//!
//! ## Modules
//! - `cli` — Command-line handlers
//! - `core` — Aggregation pipeline, run log, locking, path layout
//! - `models` — Data structures and pool configuration
//! - `util` — External command plumbing (toolforge, sudo, curl)

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod util;
