//! Cursor store — the single durable value that drives the round-robin.
//!
//! The store holds the last successfully processed code together with an
//! expiry. A missing or expired record reads as a miss (`Ok(None)`), which
//! the runner treats as a cold start. Read and write failures are real
//! errors and are never folded into the miss path.
//!
//! Deployment assumption: at most one invocation in flight at a time. There
//! is no lease or lock here — two concurrent runs racing on the cursor can
//! select the same code.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Errors from the cursor store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cursor read failed: {0}")]
    Read(String),

    #[error("cursor write failed: {0}")]
    Write(String),
}

/// Durable single-value store for the last processed code.
pub trait CursorStore {
    /// The stored code, or `Ok(None)` on a miss (absent or expired).
    fn get(&self) -> Result<Option<String>, StoreError>;

    /// Store `code` with the given time-to-live.
    fn set(&self, code: &str, ttl: Duration) -> Result<(), StoreError>;
}

/// On-disk record: the code plus its expiry instant.
#[derive(Debug, Serialize, Deserialize)]
struct CursorRecord {
    code: String,
    expires_at: DateTime<Utc>,
}

/// File-backed cursor store: one JSON record, written atomically
/// (temp file + rename).
pub struct FileCursorStore {
    path: PathBuf,
}

impl FileCursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CursorStore for FileCursorStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Read(e.to_string())),
        };

        let record: CursorRecord =
            serde_json::from_str(&content).map_err(|e| StoreError::Read(e.to_string()))?;

        if record.expires_at <= Utc::now() {
            return Ok(None);
        }
        Ok(Some(record.code))
    }

    fn set(&self, code: &str, ttl: Duration) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Write(e.to_string()))?;
        }

        let record = CursorRecord {
            code: code.to_string(),
            expires_at: Utc::now() + ttl,
        };
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| StoreError::Write(e.to_string()))?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json).map_err(|e| StoreError::Write(e.to_string()))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp_path);
            StoreError::Write(e.to_string())
        })?;
        Ok(())
    }
}

/// In-memory cursor store for tests and dry runs.
///
/// Can be primed with a value and can simulate read/write failures.
#[derive(Default)]
pub struct MemoryCursorStore {
    value: Mutex<Option<String>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryCursorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(code: &str) -> Self {
        Self {
            value: Mutex::new(Some(code.to_string())),
            ..Self::default()
        }
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// The value currently held, ignoring TTL (the in-memory store never
    /// expires anything).
    pub fn current(&self) -> Option<String> {
        self.value.lock().unwrap().clone()
    }
}

impl CursorStore for MemoryCursorStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Read("simulated read failure".into()));
        }
        Ok(self.value.lock().unwrap().clone())
    }

    fn set(&self, code: &str, _ttl: Duration) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write("simulated write failure".into()));
        }
        *self.value.lock().unwrap() = Some(code.to_string());
        Ok(())
    }
}
