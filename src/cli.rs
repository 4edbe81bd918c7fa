//! Command-line surface

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::time::Instant;

use crate::config::{ScanConfig, EXCLUDE_FILE};
use crate::exclude::ExcludeList;
use crate::scanner;

const LONG_ABOUT: &str = "\
fimon walks the whole filesystem, hashes every regular file with SHA-256, \
and compares each hash against the previous scan.\n\n\
Results are recorded in FIMFILEA.OUT: TRUE for files whose hash differs \
from the last scan, FALSE for files that have not changed. The first scan \
records everything as FALSE.\n\n\
Files and directories listed by absolute path in exclude.config are \
skipped, including all subdirectories. Blank lines and lines starting \
with '#' are ignored. Symlinks are never followed.";

#[derive(Parser)]
#[command(name = "fimon")]
#[command(version)]
#[command(about = "File integrity monitor: hash every file and flag changes since the last scan")]
#[command(long_about = LONG_ABOUT)]
pub struct Cli {
    /// Report errors, exclusions, and runtime on stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Run one full scan against the platform root
    ///
    /// Errors are surfaced only in verbose mode; the process exits normally
    /// either way, leaving the previous snapshot authoritative on failure.
    pub fn run(self) -> Result<()> {
        let started = Instant::now();

        let excludes = ExcludeList::load(Path::new(EXCLUDE_FILE));
        if self.verbose {
            for prefix in excludes.prefixes() {
                eprintln!("Excluding path: {prefix}");
            }
        }

        let config = match ScanConfig::for_host(self.verbose) {
            Ok(config) => config,
            Err(err) => {
                if self.verbose {
                    eprintln!("{} {}", "Error:".red(), err);
                }
                return Ok(());
            }
        };

        match scanner::run(&config, &excludes) {
            Ok(summary) => {
                if self.verbose {
                    eprintln!(
                        "{} files recorded ({} changed, {} skipped) in {:.2?}",
                        summary.recorded,
                        summary.changed,
                        summary.skipped,
                        started.elapsed(),
                    );
                }
            }
            Err(err) => {
                if self.verbose {
                    eprintln!("{} {:#}", "Error:".red(), err);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_flag_parses() {
        let cli = Cli::try_parse_from(["fimon", "-v"]).unwrap();
        assert!(cli.verbose);

        let cli = Cli::try_parse_from(["fimon"]).unwrap();
        assert!(!cli.verbose);
    }
}
