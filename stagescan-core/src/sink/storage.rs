//! Raw-series storage sink.
//!
//! The contract is delete-then-create: callers look up any existing file
//! for a code, delete it, and upload a fresh one. There is no
//! update-in-place and no versioning.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Opaque handle to a stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileId(pub String);

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage lookup failed: {0}")]
    Lookup(String),

    #[error("storage delete failed for '{0}': {1}")]
    Delete(String, String),

    #[error("storage upload failed for '{0}': {1}")]
    Upload(String, String),
}

/// Store of uploaded raw series files, addressed by name substring.
pub trait StorageSink {
    /// Id of the first stored file whose name contains `code`, if any.
    fn find_by_name_contains(&self, code: &str) -> Result<Option<FileId>, StorageError>;

    fn delete(&self, id: &FileId) -> Result<(), StorageError>;

    /// Store `content` under `filename` and return the new file's id.
    fn upload(&self, filename: &str, content: &str) -> Result<FileId, StorageError>;
}

/// Directory-backed storage: one file per upload, the file name doubling as
/// its id.
pub struct DirStorage {
    dir: PathBuf,
}

impl DirStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StorageSink for DirStorage {
    fn find_by_name_contains(&self, code: &str) -> Result<Option<FileId>, StorageError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Lookup(e.to_string())),
        };

        let mut names: Vec<String> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::Lookup(e.to_string()))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.contains(code) {
                names.push(name);
            }
        }
        // Deterministic pick when several match.
        names.sort();
        Ok(names.into_iter().next().map(FileId))
    }

    fn delete(&self, id: &FileId) -> Result<(), StorageError> {
        std::fs::remove_file(self.dir.join(&id.0))
            .map_err(|e| StorageError::Delete(id.0.clone(), e.to_string()))
    }

    fn upload(&self, filename: &str, content: &str) -> Result<FileId, StorageError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| StorageError::Upload(filename.to_string(), e.to_string()))?;
        std::fs::write(self.dir.join(filename), content)
            .map_err(|e| StorageError::Upload(filename.to_string(), e.to_string()))?;
        Ok(FileId(filename.to_string()))
    }
}
