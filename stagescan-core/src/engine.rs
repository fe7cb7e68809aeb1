//! Stage analysis signal engine.
//!
//! Classifies each trading day by the relative ordering of three trailing
//! simple moving averages of the adjusted close (5 / 25 / 75 days, rounded
//! to one decimal):
//!
//! - Downtrend (4): short < middle < long — price below both averages,
//!   averages in bearish order.
//! - Rebound (5): middle <= short < long — the short average has crossed
//!   back above the middle while both remain under the long.
//! - Neutral (0): anything else.
//!
//! A purchase signal fires when the three most recent classifiable days
//! read `[Downtrend, Downtrend, Rebound]`: two confirmed downtrend readings
//! followed immediately by the first rebound reading. Only the latest date
//! is ever reported; earlier matches are intermediate state.

use crate::data::series::{PriceRow, PriceSeries};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Moving-average windows, in trading days.
pub const SHORT_WINDOW: usize = 5;
pub const MIDDLE_WINDOW: usize = 25;
pub const LONG_WINDOW: usize = 75;

/// Stage classification for one trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Neutral,
    Downtrend,
    Rebound,
}

/// The stage sequence that constitutes a purchase signal, oldest first.
const PURCHASE_PATTERN: [Stage; 3] = [Stage::Downtrend, Stage::Downtrend, Stage::Rebound];

/// One fully-averaged trading day. Rows before the long window fills carry
/// undefined averages and never appear here.
#[derive(Debug, Clone, PartialEq)]
pub struct StageRow {
    pub date: NaiveDate,
    pub close_adj: f64,
    pub short: f64,
    pub middle: f64,
    pub long: f64,
    pub stage: Stage,
}

/// Purchase decision for the most recent date of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseSignal {
    pub date: NaiveDate,
    pub code: String,
    pub close_adj: f64,
    pub short: f64,
    pub middle: f64,
    pub long: f64,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("price series is empty")]
    EmptySeries,
}

/// Round to one decimal, half-up.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Trailing simple moving average, rounded to one decimal. `None` until the
/// window is fully populated.
fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut out = vec![None; n];
    if n < window {
        return out;
    }

    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = Some(round1(sum / window as f64));
    for i in window..n {
        sum += values[i] - values[i - window];
        out[i] = Some(round1(sum / window as f64));
    }
    out
}

/// Stage of one day from its rounded averages.
fn classify(short: f64, middle: f64, long: f64) -> Stage {
    let downtrend = short < long && short < middle && middle < long;
    let rebound = short < long && short >= middle && middle < long;
    if downtrend {
        Stage::Downtrend
    } else if rebound {
        Stage::Rebound
    } else {
        Stage::Neutral
    }
}

/// True iff the stage sequence ends in the purchase pattern.
fn ends_in_purchase_pattern(stages: &[Stage]) -> bool {
    stages.len() >= PURCHASE_PATTERN.len()
        && stages[stages.len() - PURCHASE_PATTERN.len()..] == PURCHASE_PATTERN
}

/// Build the stage table for a date-sorted series: one row per day whose
/// short, middle, and long windows are all populated.
pub fn stage_rows(series: &[PriceRow]) -> Vec<StageRow> {
    let closes: Vec<f64> = series.iter().map(|r| r.close_adj).collect();
    let short = rolling_mean(&closes, SHORT_WINDOW);
    let middle = rolling_mean(&closes, MIDDLE_WINDOW);
    let long = rolling_mean(&closes, LONG_WINDOW);

    series
        .iter()
        .enumerate()
        .filter_map(|(i, row)| match (short[i], middle[i], long[i]) {
            (Some(s), Some(m), Some(l)) => Some(StageRow {
                date: row.date,
                close_adj: row.close_adj,
                short: s,
                middle: m,
                long: l,
                stage: classify(s, m, l),
            }),
            _ => None,
        })
        .collect()
}

/// Evaluate a series: `Ok(Some(..))` iff the most recent date completes the
/// purchase pattern.
///
/// Sorts the series by date first (idempotent on sorted input). A series
/// shorter than the long window yields `Ok(None)`; an empty series is an
/// `EmptySeries` error, which callers treat as "no signal" rather than a
/// crash.
pub fn evaluate(mut series: PriceSeries) -> Result<Option<PurchaseSignal>, EngineError> {
    if series.is_empty() {
        return Err(EngineError::EmptySeries);
    }
    series.sort_by_key(|r| r.date);

    let rows = stage_rows(&series);
    let stages: Vec<Stage> = rows.iter().map(|r| r.stage).collect();
    if !ends_in_purchase_pattern(&stages) {
        return Ok(None);
    }

    // Non-empty by the pattern check above.
    let last = &rows[rows.len() - 1];
    let code = series[series.len() - 1].code.clone();
    Ok(Some(PurchaseSignal {
        date: last.date,
        code,
        close_adj: last.close_adj,
        short: last.short,
        middle: last.middle,
        long: last.long,
    }))
}
