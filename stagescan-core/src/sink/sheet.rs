//! Signal sheet sink.
//!
//! Purchase signals are reported as appended rows; the sheet is never
//! rewritten. Each row is the ordered field list
//! `[date, code, name, category, close_adj, short, middle, long]`,
//! preassembled by the runner.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("sheet append failed: {0}")]
    Append(String),
}

/// Append-only signal report.
pub trait SignalSheet {
    fn append(&self, rows: &[Vec<String>]) -> Result<(), SheetError>;
}

/// CSV file sheet, opened in append mode per call.
pub struct CsvSheet {
    path: PathBuf,
}

impl CsvSheet {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SignalSheet for CsvSheet {
    fn append(&self, rows: &[Vec<String>]) -> Result<(), SheetError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SheetError::Append(e.to_string()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SheetError::Append(e.to_string()))?;

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        for row in rows {
            writer
                .write_record(row)
                .map_err(|e| SheetError::Append(e.to_string()))?;
        }
        writer.flush().map_err(|e| SheetError::Append(e.to_string()))?;
        Ok(())
    }
}
