//! StageScan core — the pieces of the round-robin signal screener.
//!
//! - Catalog: ordered cyclic list of security codes with an explicit
//!   successor map (the entire scheduling mechanism)
//! - Cursor store: durable, expiring "last processed code" value
//! - Price data: provider seam, blocking HTTP implementation, multi-year
//!   series construction
//! - Signal engine: three-tier moving-average stage analysis and the
//!   purchase pattern detector
//! - Sinks: raw-series storage and the append-only signal sheet

pub mod catalog;
pub mod cursor;
pub mod data;
pub mod engine;
pub mod sink;
