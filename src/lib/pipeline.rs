//! The multi-threaded driver.
//!
//! Worker threads share one [`ProcessedReadStream`] and one [`ReadOutputStream`]. Each worker
//! repeatedly fetches a processed pair and decides, according to the [`OutputPolicy`], which
//! of its mates to write. The stream serializes the fetch and the sink serializes the write;
//! everything in between runs in parallel, so output order across pairs is not preserved.

use std::fmt::{self, Display};
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};

use crate::errors::Result;
use crate::io::ReadOutputStream;
use crate::progress::{DEFAULT_PROGRESS_INTERVAL, ProgressTracker};
use crate::read::{Read, ReadPair};
use crate::report::Report;
use crate::stream::ProcessedReadStream;

/// Minimum mate length written in broken-paired mode when none is configured.
pub const DEFAULT_MIN_SURVIVAL_LENGTH: usize = 64;

/// Which mates of a processed pair are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputPolicy {
    /// Write every non-empty mate, R1 before R2
    #[default]
    Paired,
    /// Write a pair only when both mates are non-empty
    Strict,
    /// Write each mate independently when it has at least `min_length` bases
    BrokenPaired {
        /// Minimum length of a written mate
        min_length: usize,
    },
}

impl OutputPolicy {
    /// Returns true if `read` may be written under this policy.
    fn keeps(self, read: &Read) -> bool {
        match self {
            Self::BrokenPaired { min_length } => !read.is_dropped() && read.size() >= min_length,
            Self::Paired | Self::Strict => !read.is_dropped(),
        }
    }

    /// The policy actually applied for a sink. Sinks that cannot take single reads only ever
    /// receive complete pairs.
    #[must_use]
    pub fn effective(self, sink: &dyn ReadOutputStream) -> Self {
        if self == Self::Paired && !sink.supports_single_reads() { Self::Strict } else { self }
    }
}

impl Display for OutputPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paired => write!(f, "paired"),
            Self::Strict => write!(f, "strict"),
            Self::BrokenPaired { min_length } => write!(f, "broken-paired (min length {min_length})"),
        }
    }
}

/// Settings for [`run`].
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Number of worker threads
    pub threads: usize,
    /// Which mates to write
    pub policy: OutputPolicy,
    /// Number of pairs between progress lines
    pub progress_interval: u64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            threads: 1,
            policy: OutputPolicy::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Totals from a pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Pairs fetched from the stream
    pub pairs_read: u64,
    /// Pairs written with both mates
    pub pairs_written: u64,
    /// Records written, counting both mates of written pairs
    pub reads_written: u64,
    /// Surviving mates not written because their mate was dropped
    pub singletons_discarded: u64,
}

impl PipelineStats {
    fn merge(&mut self, other: &Self) {
        self.pairs_read += other.pairs_read;
        self.pairs_written += other.pairs_written;
        self.reads_written += other.reads_written;
        self.singletons_discarded += other.singletons_discarded;
    }

    /// Adds the totals to a report's metadata.
    pub fn add_to_report(&self, report: &mut Report) {
        report.metadata.insert("pairs_read", self.pairs_read);
        report.metadata.insert("pairs_written", self.pairs_written);
        report.metadata.insert("reads_written", self.reads_written);
        report.metadata.insert("singletons_discarded", self.singletons_discarded);
    }
}

/// Writes the mates of one pair that survive `policy`.
fn emit(
    pair: &ReadPair,
    policy: OutputPolicy,
    sink: &dyn ReadOutputStream,
    stats: &mut PipelineStats,
) -> Result<()> {
    match (policy.keeps(&pair.first), policy.keeps(&pair.second)) {
        (true, true) => {
            sink.write_read_pair(pair)?;
            stats.pairs_written += 1;
            stats.reads_written += 2;
        }
        (false, false) => {}
        (first, _) => {
            if policy == OutputPolicy::Strict || !sink.supports_single_reads() {
                stats.singletons_discarded += 1;
            } else {
                sink.write_read(if first { &pair.first } else { &pair.second })?;
                stats.reads_written += 1;
            }
        }
    }
    Ok(())
}

/// Drains `stream` into `sink` using `options.threads` workers.
///
/// The first error from any worker stops the run and is returned. The sink is flushed
/// before returning successfully.
///
/// # Errors
/// Returns the first read, pairing or write error encountered.
pub fn run(
    stream: &ProcessedReadStream,
    sink: &dyn ReadOutputStream,
    options: &PipelineOptions,
) -> Result<PipelineStats> {
    let policy = options.policy.effective(sink);
    if policy != options.policy {
        info!("Output is split across two files; writing complete pairs only");
    }
    let threads = options.threads.max(1);
    debug!("Running with {threads} worker thread(s), output policy: {policy}");

    let progress =
        ProgressTracker::new("Processed read pairs").with_interval(options.progress_interval);
    let failed = AtomicBool::new(false);

    let results: Vec<Result<PipelineStats>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                scope.spawn(|| {
                    let mut local = PipelineStats::default();
                    let mut pair = ReadPair::default();
                    let outcome = (|| {
                        while !failed.load(Ordering::Relaxed) && stream.parse_read_pair(&mut pair)? {
                            local.pairs_read += 1;
                            emit(&pair, policy, sink, &mut local)?;
                            progress.log_if_needed(1);
                        }
                        Ok(local)
                    })();
                    if outcome.is_err() {
                        failed.store(true, Ordering::Relaxed);
                    }
                    outcome
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    let mut stats = PipelineStats::default();
    for result in results {
        stats.merge(&result?);
    }
    sink.flush()?;
    progress.log_final();
    Ok(stats)
}
