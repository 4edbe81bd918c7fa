//! Exclusion prefix filtering
//!
//! Decides whether a path is excluded from the scan. Matching is a plain
//! prefix comparison on normalized paths, not a glob.

use std::fs;
use std::path::Path;

/// Ordered set of path prefixes to exclude, read-only for the run
#[derive(Debug, Clone, Default)]
pub struct ExcludeList {
    prefixes: Vec<String>,
}

impl ExcludeList {
    /// Load prefixes from a line-oriented file
    ///
    /// Blank lines and lines starting with `#` are ignored. A missing or
    /// unreadable file yields an empty list, not an error.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_lines(&content),
            Err(_) => Self::default(),
        }
    }

    /// Parse prefixes from already-read exclusion text
    pub fn from_lines(content: &str) -> Self {
        let prefixes = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(normalize)
            .collect();
        Self { prefixes }
    }

    /// True if the path's normalized form starts with any exclusion prefix
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.prefixes.is_empty() {
            return false;
        }
        let candidate = path.to_string_lossy();
        let candidate = normalize(&candidate);
        self.prefixes
            .iter()
            .any(|prefix| candidate.starts_with(prefix.as_str()))
    }

    /// Loaded prefixes, in file order
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

/// Trim trailing separators so `/opt/` and `/opt` exclude the same paths
fn normalize(raw: &str) -> String {
    let trimmed = raw.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        raw.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_comments_and_blanks_ignored() {
        let list = ExcludeList::from_lines("# comment\n\n/proc\n  \n/sys/\n");
        assert_eq!(list.prefixes(), &["/proc", "/sys"]);
    }

    #[test]
    fn test_prefix_match_covers_subtree() {
        let list = ExcludeList::from_lines("/var/cache\n");
        assert!(list.is_excluded(Path::new("/var/cache")));
        assert!(list.is_excluded(Path::new("/var/cache/apt/archives/x.deb")));
        assert!(!list.is_excluded(Path::new("/var/lib")));
    }

    #[test]
    fn test_match_is_string_prefix_not_component() {
        // Matches the original tool: /tmp/foo also excludes /tmp/foobar.
        let list = ExcludeList::from_lines("/tmp/foo\n");
        assert!(list.is_excluded(Path::new("/tmp/foobar")));
    }

    #[test]
    fn test_trailing_separator_normalized() {
        let list = ExcludeList::from_lines("/opt/\n");
        assert!(list.is_excluded(Path::new("/opt/tool/bin")));
    }

    #[test]
    fn test_missing_file_yields_empty_list() {
        let temp_dir = TempDir::new().unwrap();
        let list = ExcludeList::load(&temp_dir.path().join("exclude.config"));
        assert!(list.prefixes().is_empty());
        assert!(!list.is_excluded(Path::new("/anything")));
    }
}
