//! Output sinks: raw-series storage and the signal sheet.

pub mod sheet;
pub mod storage;

pub use sheet::{CsvSheet, SheetError, SignalSheet};
pub use storage::{DirStorage, FileId, StorageError, StorageSink};
