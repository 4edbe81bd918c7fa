//! Snapshot persistence and change detection
//!
//! The published output file does double duty: human-readable report of the
//! current run and previous-snapshot input for the next one.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::ScanError;

/// Last-known hash for every path recorded by the previous run
#[derive(Debug, Default)]
pub struct Snapshot {
    entries: HashMap<String, String>,
    first_run: bool,
}

impl Snapshot {
    /// Load the previous run's output
    ///
    /// A missing file means this is the first scan ever: empty mapping with
    /// `first_run` set. Lines with fewer than three tab-separated fields are
    /// skipped; duplicate paths keep the last occurrence.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                entries: HashMap::new(),
                first_run: true,
            });
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read previous snapshot: {}", path.display()))?;

        let mut entries = HashMap::new();
        for line in content.lines() {
            let mut fields = line.split('\t');
            let (Some(_timestamp), Some(path), Some(hash)) =
                (fields.next(), fields.next(), fields.next())
            else {
                continue;
            };
            entries.insert(path.to_string(), hash.to_string());
        }

        Ok(Self {
            entries,
            first_run: false,
        })
    }

    /// Whether no prior output file existed when this snapshot was loaded
    pub fn is_first_run(&self) -> bool {
        self.first_run
    }

    /// Number of paths carried over from the previous run
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Classify a freshly hashed file and record its new hash
    ///
    /// Returns true when the file changed since the previous run: either the
    /// path was recorded with a different hash, or the path is new to a run
    /// that had a previous snapshot. On the very first scan everything is
    /// unchanged. Callers must hold the snapshot lock across this call so
    /// the compare-and-record is atomic per key.
    pub fn classify(&mut self, path: &str, hash: &str) -> bool {
        let changed = match self.entries.get(path) {
            Some(previous) => previous != hash,
            None => !self.first_run,
        };
        self.entries.insert(path.to_string(), hash.to_string());
        changed
    }
}

/// Atomically replace the published snapshot with the completed temp file
///
/// If the rename fails (the output may be locked by another process), remove
/// the existing file and retry once. On a second failure the temp file is
/// left untouched and the previous snapshot stays authoritative.
pub fn publish(temp_path: &Path, final_path: &Path) -> Result<(), ScanError> {
    if fs::rename(temp_path, final_path).is_ok() {
        return Ok(());
    }

    let _ = fs::remove_file(final_path);
    fs::rename(temp_path, final_path).map_err(|source| ScanError::Publish {
        final_path: final_path.to_path_buf(),
        temp_path: temp_path.to_path_buf(),
        source,
    })
}
