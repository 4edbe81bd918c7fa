//! Run configuration and platform root selection

use std::path::{Path, PathBuf};

use crate::error::ScanError;

/// Published snapshot file, resolved against the working directory
pub const OUTPUT_FILE: &str = "FIMFILEA.OUT";
/// Scratch file the run writes before publishing
pub const TEMP_FILE: &str = "FIMFILEA.TMP";
/// Exclusion prefix list, one absolute path per line
pub const EXCLUDE_FILE: &str = "exclude.config";

/// Immutable configuration for one scan run
///
/// Shared mutable state (previous snapshot, output writer) lives in
/// `scanner::ScanContext`; this struct only carries what never changes
/// during the run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directory tree to scan
    pub root: PathBuf,
    /// Final snapshot location; also the previous run's snapshot
    pub output_path: PathBuf,
    /// Where records are written before publish
    pub temp_path: PathBuf,
    /// Surface errors and progress on stderr
    pub verbose: bool,
}

impl ScanConfig {
    /// Configuration for a full-host scan using the fixed artifact names
    pub fn for_host(verbose: bool) -> Result<Self, ScanError> {
        Ok(Self {
            root: platform_root()?,
            output_path: PathBuf::from(OUTPUT_FILE),
            temp_path: PathBuf::from(TEMP_FILE),
            verbose,
        })
    }

    /// Configuration rooted at an arbitrary directory
    pub fn rooted_at(root: &Path, output_path: &Path, temp_path: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            output_path: output_path.to_path_buf(),
            temp_path: temp_path.to_path_buf(),
            verbose: false,
        }
    }
}

/// Fixed, platform-determined scan root
///
/// An unrecognized platform is a fatal configuration condition, not a
/// silent empty scan.
pub fn platform_root() -> Result<PathBuf, ScanError> {
    if cfg!(windows) {
        Ok(PathBuf::from("C:\\"))
    } else if cfg!(unix) {
        Ok(PathBuf::from("/"))
    } else {
        Err(ScanError::UnsupportedPlatform(
            std::env::consts::OS.to_string(),
        ))
    }
}
