//! Single-run orchestration.
//!
//! One invocation processes exactly one security: resolve which code is up
//! next, build its price series, evaluate the purchase signal, push results
//! to the sinks, and advance the cursor. Any failure aborts the remaining
//! steps — no step is retried, and the cursor is only advanced after
//! everything else succeeded, so a crashed run is re-attempted from the
//! same cursor state.

use thiserror::Error;
use tracing::{info, warn};

use stagescan_core::catalog::{Catalog, CatalogError};
use stagescan_core::cursor::{CursorStore, StoreError};
use stagescan_core::data::{build_series, to_csv, PriceProvider, SeriesError};
use stagescan_core::engine::{evaluate, EngineError, PurchaseSignal};
use stagescan_core::sink::{SheetError, SignalSheet, StorageError, StorageSink};

/// How the code for this run was determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorOutcome {
    /// Cursor held a member code; its successor was selected.
    Resumed { previous: String },

    /// Cursor was absent or expired; the cycle restarted from the top.
    ColdStart,

    /// Cursor held a code the current catalog does not contain (catalog
    /// changed under us); the cycle restarted from the top.
    StaleCursor { previous: String },
}

/// Errors from a run. Cursor miss and stale cursor are not errors — they
/// resolve to the fallback path inside [`resolve_code`].
#[derive(Debug, Error)]
pub enum RunError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("cursor store error: {0}")]
    Store(#[from] StoreError),

    #[error("price series error: {0}")]
    Series(#[from] SeriesError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("sheet error: {0}")]
    Sheet(#[from] SheetError),
}

/// Knobs for a single run, extracted from the deployment config.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Years to fetch, newest first.
    pub years: Vec<u16>,

    /// Cursor time-to-live.
    pub cursor_ttl: chrono::Duration,

    /// Upload the raw concatenated series to storage.
    pub upload_raw: bool,
}

/// Summary of a completed run.
#[derive(Debug)]
pub struct RunReport {
    pub code: String,
    pub outcome: CursorOutcome,
    pub rows: usize,
    pub signal: Option<PurchaseSignal>,
    pub uploaded: bool,
}

/// Decide which code this run processes.
///
/// A store read error is fatal and does NOT fall back to the first code —
/// only a genuine miss (absent/expired) or a stale code does.
pub fn resolve_code(
    store: &dyn CursorStore,
    catalog: &Catalog,
) -> Result<(String, CursorOutcome), StoreError> {
    match store.get()? {
        Some(previous) => match catalog.successor_of(&previous) {
            Some(next) => Ok((
                next.to_string(),
                CursorOutcome::Resumed { previous },
            )),
            None => {
                warn!(previous = %previous, "cursor code not in catalog, restarting cycle");
                Ok((
                    catalog.first_code().to_string(),
                    CursorOutcome::StaleCursor { previous },
                ))
            }
        },
        None => {
            info!("cursor miss, starting from the top of the catalog");
            Ok((catalog.first_code().to_string(), CursorOutcome::ColdStart))
        }
    }
}

/// Execute one full invocation.
pub fn run_once(
    catalog: &Catalog,
    store: &dyn CursorStore,
    provider: &dyn PriceProvider,
    storage: &dyn StorageSink,
    sheet: &dyn SignalSheet,
    options: &RunOptions,
) -> Result<RunReport, RunError> {
    let (code, outcome) = resolve_code(store, catalog)?;
    info!(code = %code, outcome = ?outcome, "selected security");

    let series = build_series(provider, &code, &options.years)?;
    let rows = series.len();
    info!(code = %code, rows, "price series built");

    let raw = if options.upload_raw {
        Some(to_csv(&series)?)
    } else {
        None
    };

    let signal = match evaluate(series) {
        Ok(signal) => signal,
        Err(EngineError::EmptySeries) => {
            warn!(code = %code, "empty price series, treating as no signal");
            None
        }
    };

    if let Some(raw) = raw {
        if let Some(existing) = storage.find_by_name_contains(&code)? {
            info!(code = %code, file = %existing.0, "deleting previously stored series");
            storage.delete(&existing)?;
        }
        storage.upload(&format!("{code}.csv"), &raw)?;
        info!(code = %code, "raw series uploaded");
    }

    if let Some(signal) = &signal {
        let meta = catalog.metadata_of(&code)?;
        sheet.append(&[vec![
            signal.date.format("%Y-%m-%d").to_string(),
            signal.code.clone(),
            meta.name.clone(),
            meta.category.clone(),
            signal.close_adj.to_string(),
            format!("{:.1}", signal.short),
            format!("{:.1}", signal.middle),
            format!("{:.1}", signal.long),
        ]])?;
        info!(code = %code, date = %signal.date, "purchase signal appended to sheet");
    }

    store.set(&code, options.cursor_ttl)?;
    info!(code = %code, "cursor advanced");

    Ok(RunReport {
        code,
        outcome,
        rows,
        signal,
        uploaded: options.upload_raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagescan_core::cursor::MemoryCursorStore;

    fn sample_catalog() -> Catalog {
        Catalog::from_csv(
            "code,name,category\nA,Alpha,tech\nB,Beta,auto\nC,Gamma,tech\n",
            &[],
        )
        .unwrap()
    }

    #[test]
    fn miss_selects_first_code() {
        let store = MemoryCursorStore::new();
        let (code, outcome) = resolve_code(&store, &sample_catalog()).unwrap();
        assert_eq!(code, "A");
        assert_eq!(outcome, CursorOutcome::ColdStart);
    }

    #[test]
    fn member_cursor_selects_successor() {
        let store = MemoryCursorStore::with_value("B");
        let (code, outcome) = resolve_code(&store, &sample_catalog()).unwrap();
        assert_eq!(code, "C");
        assert_eq!(
            outcome,
            CursorOutcome::Resumed {
                previous: "B".into()
            }
        );
    }

    #[test]
    fn last_member_wraps_to_first() {
        let store = MemoryCursorStore::with_value("C");
        let (code, outcome) = resolve_code(&store, &sample_catalog()).unwrap();
        assert_eq!(code, "A");
        assert_eq!(
            outcome,
            CursorOutcome::Resumed {
                previous: "C".into()
            }
        );
    }

    #[test]
    fn stale_cursor_falls_back_to_first() {
        let store = MemoryCursorStore::with_value("Z");
        let (code, outcome) = resolve_code(&store, &sample_catalog()).unwrap();
        assert_eq!(code, "A");
        assert_eq!(
            outcome,
            CursorOutcome::StaleCursor {
                previous: "Z".into()
            }
        );
    }

    #[test]
    fn store_read_error_is_fatal_not_a_fallback() {
        let store = MemoryCursorStore::failing_reads();
        assert!(resolve_code(&store, &sample_catalog()).is_err());
    }
}
