//! Sliding-window 3' quality trimming.
//!
//! Windows of `window_size` bases are scanned from the 5' end. At the first window whose
//! mean score falls below the minimum, the read is cut at the first base inside that window
//! scoring below the minimum. A read that ends up shorter than the minimum length is dropped.

use crate::quality::QualityEncoding;
use crate::read::{Read, ReadPair};
use crate::report::ReportFragment;

use super::{Counter, ReadProcessor};

/// Window size used when none is configured.
pub const DEFAULT_WINDOW_SIZE: usize = 4;

/// Trims low-quality 3' tails and drops reads that become too short.
#[derive(Debug)]
pub struct WindowedQualTrim {
    name: String,
    encoding: QualityEncoding,
    min_quality: u8,
    min_length: usize,
    window_size: usize,
    reads_trimmed: Counter,
    reads_dropped: Counter,
    pairs_broken: Counter,
    pairs_dropped: Counter,
}

impl WindowedQualTrim {
    /// Creates a trimmer with the default window size.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        encoding: QualityEncoding,
        min_quality: u8,
        min_length: usize,
    ) -> Self {
        Self {
            name: name.into(),
            encoding,
            min_quality,
            min_length,
            window_size: DEFAULT_WINDOW_SIZE,
            reads_trimmed: Counter::default(),
            reads_dropped: Counter::default(),
            pairs_broken: Counter::default(),
            pairs_dropped: Counter::default(),
        }
    }

    /// Sets the window size. A size of zero is treated as one.
    #[must_use]
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size.max(1);
        self
    }

    /// Returns the number of leading bases to keep for the given quality symbols.
    ///
    /// # Example
    /// ```
    /// use pairqc_lib::processor::WindowedQualTrim;
    /// use pairqc_lib::quality::SANGER;
    ///
    /// let trimmer = WindowedQualTrim::new("QC", SANGER, 30, 1);
    /// assert_eq!(trimmer.trim_point(b"IIIIIIII"), 8);
    /// assert_eq!(trimmer.trim_point(b"IIIIII##"), 6);
    /// ```
    #[must_use]
    pub fn trim_point(&self, quals: &[u8]) -> usize {
        let len = quals.len();
        if len == 0 {
            return 0;
        }

        let window = self.window_size.min(len);
        let threshold = u32::from(self.min_quality) * window as u32;
        let scores = self.encoding.scores(quals);

        let mut sum: u32 = scores[..window].iter().map(|&s| u32::from(s)).sum();
        for start in 0..=(len - window) {
            if start > 0 {
                sum = sum - u32::from(scores[start - 1]) + u32::from(scores[start + window - 1]);
            }
            if sum < threshold {
                return scores[start..start + window]
                    .iter()
                    .position(|&s| s < self.min_quality)
                    .map_or(start + window, |offset| start + offset);
            }
        }

        len
    }

    fn trim(&self, read: &mut Read) {
        if read.is_dropped() {
            return;
        }

        let keep = self.trim_point(&read.quality);
        if keep == 0 || keep < self.min_length {
            read.drop_bases();
            self.reads_dropped.incr();
        } else if keep < read.size() {
            read.truncate(keep);
            self.reads_trimmed.incr();
        }
    }
}

impl ReadProcessor for WindowedQualTrim {
    fn process_read(&self, read: &mut Read) {
        self.trim(read);
    }

    fn process_read_pair(&self, pair: &mut ReadPair) {
        self.trim(&mut pair.first);
        self.trim(&mut pair.second);

        if pair.is_dropped() {
            self.pairs_dropped.incr();
        } else if pair.is_broken() {
            self.pairs_broken.incr();
        }
    }

    fn report(&self) -> ReportFragment {
        ReportFragment::new("WindowedQualTrim", &self.name)
            .parameter("encoding", self.encoding.name())
            .parameter("min_quality", self.min_quality)
            .parameter("min_length", self.min_length)
            .parameter("window_size", self.window_size)
            .output("reads_trimmed", self.reads_trimmed.get())
            .output("reads_dropped", self.reads_dropped.get())
            .output("pairs_broken", self.pairs_broken.get())
            .output("pairs_dropped", self.pairs_dropped.get())
    }
}
