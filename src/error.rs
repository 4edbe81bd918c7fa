//! Fatal error conditions for a scan run

use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a run without a published snapshot
#[derive(Debug, Error)]
pub enum ScanError {
    /// The host OS has no known scan root
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The completed scan could not replace the previous output file.
    /// The temp file is left in place with the full scan data.
    #[error(
        "failed to publish snapshot to {} (scan data preserved in {})",
        final_path.display(),
        temp_path.display()
    )]
    Publish {
        final_path: PathBuf,
        temp_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
