//! Scan record formatting and the shared output writer

use anyhow::{Context, Result};
use chrono::{DateTime, Local, SecondsFormat};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// One scanned regular file, immutable once written
#[derive(Debug, Clone)]
pub struct ScanRecord {
    /// When the file was hashed
    pub timestamp: DateTime<Local>,
    /// Absolute path of the file
    pub path: PathBuf,
    /// Lowercase hex SHA-256 digest
    pub hash: String,
    /// Hash differs from the previous run (see `Snapshot::classify`)
    pub changed: bool,
}

impl ScanRecord {
    /// Record for a file hashed just now
    pub fn new(path: &Path, hash: String, changed: bool) -> Self {
        Self {
            timestamp: Local::now(),
            path: path.to_path_buf(),
            hash,
            changed,
        }
    }

    /// One tab-separated output line: timestamp, path, hash, TRUE|FALSE
    pub fn format_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\n",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, false),
            self.path.display(),
            self.hash,
            if self.changed { "TRUE" } else { "FALSE" },
        )
    }
}

/// Buffered output stream shared by all workers
///
/// Each record is written as one whole line inside the lock, so lines from
/// concurrent workers are never interleaved mid-record.
pub struct ReportWriter {
    inner: Mutex<BufWriter<File>>,
}

impl ReportWriter {
    /// Create the temp output file the run writes into
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).with_context(|| {
            format!("Failed to create temporary output file: {}", path.display())
        })?;
        Ok(Self {
            inner: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Append one record under the writer lock
    pub fn append(&self, record: &ScanRecord) -> Result<()> {
        let line = record.format_line();
        let mut writer = self.inner.lock();
        writer
            .write_all(line.as_bytes())
            .with_context(|| format!("Failed to write scan record: {}", record.path.display()))
    }

    /// Flush and close the stream; must complete before the temp file is
    /// renamed over the published snapshot
    pub fn finish(self) -> Result<()> {
        let mut writer = self.inner.into_inner();
        writer.flush().context("Failed to flush scan output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_format_line_fields() {
        let record = ScanRecord::new(Path::new("/etc/hosts"), "abc123".to_string(), true);
        let line = record.format_line();

        assert!(line.ends_with('\n'));
        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[1], "/etc/hosts");
        assert_eq!(fields[2], "abc123");
        assert_eq!(fields[3], "TRUE");
        // Timestamp must round-trip as RFC3339.
        assert!(DateTime::parse_from_rfc3339(fields[0]).is_ok());
    }

    #[test]
    fn test_unchanged_record_is_false() {
        let record = ScanRecord::new(Path::new("/etc/hosts"), "abc123".to_string(), false);
        assert!(record.format_line().trim_end().ends_with("FALSE"));
    }

    #[test]
    fn test_writer_appends_whole_lines() {
        let temp_dir = TempDir::new().unwrap();
        let out_path = temp_dir.path().join("FIMFILEA.TMP");

        let writer = ReportWriter::create(&out_path).unwrap();
        writer
            .append(&ScanRecord::new(Path::new("/a"), "h1".to_string(), false))
            .unwrap();
        writer
            .append(&ScanRecord::new(Path::new("/b"), "h2".to_string(), true))
            .unwrap();
        writer.finish().unwrap();

        let content = fs::read_to_string(&out_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("/a\th1\tFALSE"));
        assert!(lines[1].contains("/b\th2\tTRUE"));
    }
}
