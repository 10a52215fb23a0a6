//! Read length filtering and length distributions.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::read::{Read, ReadPair};
use crate::report::ReportFragment;

use super::{Counter, ReadProcessor};

/// Drops reads shorter than a minimum length.
#[derive(Debug)]
pub struct ReadLenFilter {
    name: String,
    min_length: usize,
    reads_dropped: Counter,
}

impl ReadLenFilter {
    /// Creates a filter dropping reads with fewer than `min_length` bases.
    #[must_use]
    pub fn new(name: impl Into<String>, min_length: usize) -> Self {
        Self { name: name.into(), min_length, reads_dropped: Counter::default() }
    }
}

impl ReadProcessor for ReadLenFilter {
    fn process_read(&self, read: &mut Read) {
        if !read.is_dropped() && read.size() < self.min_length {
            read.drop_bases();
            self.reads_dropped.incr();
        }
    }

    fn report(&self) -> ReportFragment {
        ReportFragment::new("ReadLenFilter", &self.name)
            .parameter("min_length", self.min_length)
            .output("reads_dropped", self.reads_dropped.get())
    }
}

/// Records the distribution of read lengths without modifying reads.
///
/// Single reads and R1 share one table; R2 gets its own.
#[derive(Debug)]
pub struct ReadLenCounter {
    name: String,
    r1_lengths: Mutex<BTreeMap<usize, u64>>,
    r2_lengths: Mutex<BTreeMap<usize, u64>>,
}

impl ReadLenCounter {
    /// Creates an empty counter.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            r1_lengths: Mutex::new(BTreeMap::new()),
            r2_lengths: Mutex::new(BTreeMap::new()),
        }
    }

    fn record(table: &Mutex<BTreeMap<usize, u64>>, read: &Read) {
        *table.lock().entry(read.size()).or_insert(0) += 1;
    }
}

impl ReadProcessor for ReadLenCounter {
    fn process_read(&self, read: &mut Read) {
        Self::record(&self.r1_lengths, read);
    }

    fn process_read_pair(&self, pair: &mut ReadPair) {
        Self::record(&self.r1_lengths, &pair.first);
        Self::record(&self.r2_lengths, &pair.second);
    }

    fn report(&self) -> ReportFragment {
        let r1 = self.r1_lengths.lock().clone();
        let r2 = self.r2_lengths.lock().clone();
        let reads_seen: u64 = r1.values().chain(r2.values()).sum();

        ReportFragment::new("ReadLenCounter", &self.name)
            .output("reads_seen", reads_seen)
            .output("lengths_r1", r1)
            .output("lengths_r2", r2)
    }
}
