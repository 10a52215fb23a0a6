//! Per-position base quality distributions.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::quality::QualityEncoding;
use crate::read::{Read, ReadPair};
use crate::report::ReportFragment;

use super::ReadProcessor;

/// Number of distinct scores tracked per position; higher scores are clamped.
const MAX_SCORE: usize = 94;

/// Score counts for each read position.
#[derive(Debug, Default)]
struct PositionTable {
    reads: u64,
    positions: Vec<[u64; MAX_SCORE]>,
}

impl PositionTable {
    fn add(&mut self, encoding: QualityEncoding, quals: &[u8]) {
        self.reads += 1;
        if self.positions.len() < quals.len() {
            self.positions.resize(quals.len(), [0; MAX_SCORE]);
        }
        for (counts, &q) in self.positions.iter_mut().zip(quals) {
            let score = usize::from(encoding.score(q)).min(MAX_SCORE - 1);
            counts[score] += 1;
        }
    }

    fn histograms(&self) -> Vec<BTreeMap<u8, u64>> {
        self.positions
            .iter()
            .map(|counts| {
                counts
                    .iter()
                    .enumerate()
                    .filter(|(_, n)| **n > 0)
                    .map(|(score, n)| (score as u8, *n))
                    .collect()
            })
            .collect()
    }

    fn means(&self) -> Vec<f64> {
        self.positions
            .iter()
            .map(|counts| {
                let (total, weighted) = counts
                    .iter()
                    .enumerate()
                    .fold((0u64, 0u64), |(t, w), (score, n)| (t + n, w + score as u64 * n));
                if total == 0 { 0.0 } else { weighted as f64 / total as f64 }
            })
            .collect()
    }
}

/// Collects the distribution of quality scores at each read position.
///
/// Never modifies reads and skips dropped ones. Single reads and R1 share one table; R2
/// gets its own.
#[derive(Debug)]
pub struct PerBaseQuality {
    name: String,
    encoding: QualityEncoding,
    r1: Mutex<PositionTable>,
    r2: Mutex<PositionTable>,
}

impl PerBaseQuality {
    /// Creates an empty collector interpreting qualities with `encoding`.
    #[must_use]
    pub fn new(name: impl Into<String>, encoding: QualityEncoding) -> Self {
        Self {
            name: name.into(),
            encoding,
            r1: Mutex::new(PositionTable::default()),
            r2: Mutex::new(PositionTable::default()),
        }
    }
}

impl ReadProcessor for PerBaseQuality {
    fn process_read(&self, read: &mut Read) {
        if !read.is_dropped() {
            self.r1.lock().add(self.encoding, &read.quality);
        }
    }

    fn process_read_pair(&self, pair: &mut ReadPair) {
        if !pair.first.is_dropped() {
            self.r1.lock().add(self.encoding, &pair.first.quality);
        }
        if !pair.second.is_dropped() {
            self.r2.lock().add(self.encoding, &pair.second.quality);
        }
    }

    fn report(&self) -> ReportFragment {
        let r1 = self.r1.lock();
        let r2 = self.r2.lock();
        ReportFragment::new("PerBaseQuality", &self.name)
            .parameter("encoding", self.encoding.name())
            .output("reads_r1", r1.reads)
            .output("reads_r2", r2.reads)
            .output("mean_quality_r1", r1.means())
            .output("mean_quality_r2", r2.means())
            .output("quality_r1", r1.histograms())
            .output("quality_r2", r2.histograms())
    }
}
