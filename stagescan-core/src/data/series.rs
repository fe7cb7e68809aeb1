//! Price series construction.
//!
//! The upstream service serves one year of daily rows per request, with two
//! banner lines ahead of the data. `build_series` stitches the configured
//! years into a single CSV table — banner lines dropped, every data line
//! prefixed with the security code — and parses it into `PriceRow`s.

use super::provider::{FetchError, PriceProvider};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Header of the concatenated price table.
pub const CSV_HEADER: &str = "code,date,open,high,low,close,volume,close_adj";

/// One trading day for one security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub code: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub close_adj: f64,
}

/// All fetched trading days for one security. Year batches are appended in
/// fetch order; the signal engine sorts by date before evaluating.
pub type PriceSeries = Vec<PriceRow>;

/// Errors from series construction.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to parse price table: {0}")]
    Parse(#[from] csv::Error),

    #[error("failed to render price table: {0}")]
    Render(String),
}

/// Fetch and concatenate the given years for `code`.
///
/// Each year's raw text loses its first two lines; the remaining lines are
/// prefixed with the code and appended under a single header. Any year's
/// fetch failure aborts the whole build.
pub fn build_series(
    provider: &dyn PriceProvider,
    code: &str,
    years: &[u16],
) -> Result<PriceSeries, SeriesError> {
    let mut table = String::from(CSV_HEADER);

    for &year in years {
        let raw = provider.fetch_year(code, year)?;
        debug!(code, year, bytes = raw.len(), "fetched year batch");
        for line in raw.lines().skip(2) {
            if line.trim().is_empty() {
                continue;
            }
            table.push('\n');
            table.push_str(code);
            table.push(',');
            table.push_str(line);
        }
    }

    let mut reader = csv::Reader::from_reader(table.as_bytes());
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        let row: PriceRow = row?;
        rows.push(row);
    }
    Ok(rows)
}

/// Render a series back into the canonical CSV table (header included),
/// the form uploaded to storage.
pub fn to_csv(series: &[PriceRow]) -> Result<String, SeriesError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in series {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| SeriesError::Render(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SeriesError::Render(e.to_string()))
}
