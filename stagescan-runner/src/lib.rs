//! StageScan runner — deployment config and single-run orchestration.
//!
//! Builds on `stagescan-core` to provide:
//! - TOML run configuration with validation
//! - Cursor resolution (resume / cold start / stale fallback)
//! - The orchestrated run: resolve → fetch → evaluate → report → advance

pub mod config;
pub mod runner;

pub use config::{ConfigError, RunConfig};
pub use runner::{resolve_code, run_once, CursorOutcome, RunError, RunOptions, RunReport};
