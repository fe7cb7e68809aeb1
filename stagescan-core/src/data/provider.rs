//! Price provider trait and its error type.
//!
//! The provider abstracts over the upstream quote service so the series
//! builder and the runner can be exercised against a mock in tests.

use thiserror::Error;

/// Errors from a price fetch. Any fetch error aborts the whole run — there
/// is no per-year retry.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for code '{code}' year {year} failed: {reason}")]
    Request {
        code: String,
        year: u16,
        reason: String,
    },

    #[error("HTTP {status} for code '{code}' year {year}")]
    Status {
        code: String,
        year: u16,
        status: u16,
    },
}

/// Source of raw yearly price text.
///
/// The returned text is delimited rows for one code and one year; its first
/// two lines are provider banner/header material, not data.
pub trait PriceProvider {
    fn fetch_year(&self, code: &str, year: u16) -> Result<String, FetchError>;
}
