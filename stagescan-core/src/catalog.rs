//! Security catalog — the ordered, cyclic list of codes to sweep.
//!
//! The catalog is loaded from a CSV file (columns `code`, `name`,
//! `category`, in file order) and derives an explicit successor map:
//! each code points to the next code in the list, with the last wrapping
//! to the first. The map is an immutable total function over the filtered
//! set, built once at load time, so repeated invocations walking
//! `successor_of` visit every security exactly once per full cycle.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors from catalog loading and lookups.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog row: {0}")]
    Parse(#[from] csv::Error),

    #[error("catalog is empty after filtering")]
    Empty,

    #[error("duplicate code '{0}' in catalog source")]
    DuplicateCode(String),

    #[error("code '{0}' not present in catalog")]
    UnknownCode(String),
}

/// One row of the catalog source file.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    code: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    category: String,
}

/// Display metadata for a security.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityMeta {
    pub name: String,
    pub category: String,
}

/// Ordered, cyclic catalog of securities.
///
/// Invariants, guaranteed at load: non-empty; every member appears exactly
/// once as a key and exactly once as a value of the successor map (a single
/// closed cycle over the filtered set).
#[derive(Debug, Clone)]
pub struct Catalog {
    codes: Vec<String>,
    successor: HashMap<String, String>,
    metadata: HashMap<String, SecurityMeta>,
}

impl Catalog {
    /// Load a catalog from a CSV file, keeping only rows whose category is
    /// in `categories` (empty slice = keep everything).
    pub fn load(path: &Path, categories: &[String]) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_csv(&content, categories)
    }

    /// Parse a catalog from CSV text.
    pub fn from_csv(content: &str, categories: &[String]) -> Result<Self, CatalogError> {
        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let mut codes: Vec<String> = Vec::new();
        let mut metadata = HashMap::new();

        for row in reader.deserialize() {
            let row: CatalogRow = row?;
            if !categories.is_empty() && !categories.contains(&row.category) {
                continue;
            }
            if metadata.contains_key(&row.code) {
                return Err(CatalogError::DuplicateCode(row.code));
            }
            metadata.insert(
                row.code.clone(),
                SecurityMeta {
                    name: row.name,
                    category: row.category,
                },
            );
            codes.push(row.code);
        }

        if codes.is_empty() {
            return Err(CatalogError::Empty);
        }

        // One linear pass; the last member wraps to the first, closing the cycle.
        let mut successor = HashMap::with_capacity(codes.len());
        for pair in codes.windows(2) {
            successor.insert(pair[0].clone(), pair[1].clone());
        }
        successor.insert(codes[codes.len() - 1].clone(), codes[0].clone());

        Ok(Self {
            codes,
            successor,
            metadata,
        })
    }

    /// The code selected on a cold start (first row of the source).
    pub fn first_code(&self) -> &str {
        &self.codes[0]
    }

    /// Cyclic-next code, or `None` if `code` is not a member — a wrap from
    /// the last member never yields `None`; `None` means the code is gone
    /// from the current catalog.
    pub fn successor_of(&self, code: &str) -> Option<&str> {
        self.successor.get(code).map(|s| s.as_str())
    }

    /// Display metadata for a member code. The code is expected to come
    /// from the same load, so absence is a hard error.
    pub fn metadata_of(&self, code: &str) -> Result<&SecurityMeta, CatalogError> {
        self.metadata
            .get(code)
            .ok_or_else(|| CatalogError::UnknownCode(code.to_string()))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Members in cycle order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }
}
