//! Concurrent scan engine
//!
//! One traversal thread walks the tree and hands eligible files over a
//! bounded channel to a fixed pool of hash workers. Workers share the
//! previous snapshot and the output writer, each behind its own lock.

use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use crossbeam_channel as channel;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::exclude::ExcludeList;
use crate::hasher;
use crate::report::{ReportWriter, ScanRecord};
use crate::snapshot::{self, Snapshot};

/// Shared state for one run, passed to every worker
///
/// The snapshot and writer locks are independent so hashing throughput is
/// not coupled to disk-write throughput.
struct ScanContext {
    snapshot: Mutex<Snapshot>,
    writer: ReportWriter,
    verbose: bool,
}

/// Outcome of processing one dispatched file
enum FileOutcome {
    Recorded { changed: bool },
    Skipped,
}

/// Aggregate counts for a completed run
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanSummary {
    /// Records written to the output
    pub recorded: usize,
    /// Records flagged as changed
    pub changed: usize,
    /// Files dropped because they could not be opened or read
    pub skipped: usize,
}

impl ScanSummary {
    fn absorb(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Recorded { changed } => {
                self.recorded += 1;
                if changed {
                    self.changed += 1;
                }
            }
            FileOutcome::Skipped => self.skipped += 1,
        }
    }

    fn merge(&mut self, other: ScanSummary) {
        self.recorded += other.recorded;
        self.changed += other.changed;
        self.skipped += other.skipped;
    }
}

/// Run one full scan: walk, hash, classify, write, publish
///
/// Worker count equals the host's processing units. The previous snapshot
/// is loaded before the walk and the published output is replaced only
/// after every dispatched file has been processed and the stream flushed.
pub fn run(config: &ScanConfig, excludes: &ExcludeList) -> Result<ScanSummary> {
    run_with_workers(config, excludes, num_cpus::get())
}

/// Same as [`run`] with an explicit worker count
pub fn run_with_workers(
    config: &ScanConfig,
    excludes: &ExcludeList,
    workers: usize,
) -> Result<ScanSummary> {
    let workers = workers.max(1);
    let previous = Snapshot::load(&config.output_path)?;
    let writer = ReportWriter::create(&config.temp_path)?;

    let ctx = Arc::new(ScanContext {
        snapshot: Mutex::new(previous),
        writer,
        verbose: config.verbose,
    });

    // Bounded handoff: the walk blocks instead of outrunning the workers.
    let (tx, rx) = channel::bounded::<PathBuf>(workers * 2);

    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let rx = rx.clone();
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || {
                let mut tally = ScanSummary::default();
                for path in rx {
                    tally.absorb(process_file(&ctx, &path));
                }
                tally
            })
        })
        .collect();
    drop(rx);

    traverse(&config.root, excludes, config.verbose, &tx);

    // Closing the channel drains the queue; joining the fixed pool is the
    // completion barrier before the output is finalized.
    drop(tx);
    let mut summary = ScanSummary::default();
    for handle in handles {
        match handle.join() {
            Ok(tally) => summary.merge(tally),
            Err(_) => bail!("scan worker panicked"),
        }
    }

    let ctx = Arc::try_unwrap(ctx)
        .map_err(|_| anyhow!("scan context still shared after workers joined"))?;
    ctx.writer.finish()?;
    snapshot::publish(&config.temp_path, &config.output_path)?;

    Ok(summary)
}

/// Depth-first walk dispatching eligible regular files to the worker pool
///
/// Traversal errors skip the offending subtree and the walk continues.
/// Excluded directories are pruned without reading their contents; symlinks
/// and other non-regular entries are ignored.
fn traverse(root: &Path, excludes: &ExcludeList, verbose: bool, tx: &channel::Sender<PathBuf>) {
    let mut walk = WalkDir::new(root).follow_links(false).into_iter();

    loop {
        let entry = match walk.next() {
            Some(Ok(entry)) => entry,
            Some(Err(err)) => {
                // walkdir cannot descend into an unreadable directory, so
                // continuing here skips exactly that subtree.
                if verbose {
                    eprintln!("{} {}", "Warning:".yellow(), err);
                }
                continue;
            }
            None => break,
        };

        if excludes.is_excluded(entry.path()) {
            if entry.file_type().is_dir() {
                walk.skip_current_dir();
            }
            continue;
        }

        if !entry.file_type().is_file() {
            continue;
        }

        if tx.send(entry.path().to_path_buf()).is_err() {
            // All workers are gone; nothing left to dispatch to.
            break;
        }
    }
}

/// Hash one file, classify it against the previous snapshot, write a record
///
/// A file that cannot be read produces no record and does not abort the
/// run. The compare-and-record step runs as one critical section per key.
fn process_file(ctx: &ScanContext, path: &Path) -> FileOutcome {
    let hash = match hasher::hash_file(path) {
        Ok(hash) => hash,
        Err(err) => {
            if ctx.verbose {
                eprintln!("{} {:#}", "Warning:".yellow(), err);
            }
            return FileOutcome::Skipped;
        }
    };

    let key = path.to_string_lossy();
    let changed = ctx.snapshot.lock().classify(&key, &hash);

    let record = ScanRecord::new(path, hash, changed);
    if let Err(err) = ctx.writer.append(&record) {
        if ctx.verbose {
            eprintln!("{} {:#}", "Warning:".yellow(), err);
        }
        return FileOutcome::Skipped;
    }

    FileOutcome::Recorded { changed }
}
