//! Paired-end overlap detection with adaptor read-through trimming or mate merging.
//!
//! R2 is reverse complemented and slid along R1 without gaps. Offsets are expressed in R1
//! coordinates: at offset `k`, base `j` of the reverse-complemented R2 sits over base
//! `j + k` of R1. A negative offset means the insert is shorter than R2 and both mates read
//! through into adaptor sequence. The insert always spans `[0, k + len(R2))` in R1
//! coordinates.

use crate::dna::{is_no_call, reverse_complement_read};
use crate::read::{Read, ReadPair};
use crate::report::ReportFragment;

use super::{Counter, ReadProcessor};

/// Mismatch rate tolerated in an overlap when none is configured.
pub const DEFAULT_MAX_MISMATCH_RATE: f64 = 0.1;

/// The best ungapped placement of the reverse-complemented R2 against R1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    /// Position in R1 of the first base of the reverse-complemented R2
    pub offset: isize,
    /// Number of positions covered by both mates
    pub length: usize,
    /// Positions where both mates agree, no-calls excluded
    pub matches: usize,
    /// Positions where both mates disagree, no-calls excluded
    pub mismatches: usize,
}

impl Overlap {
    /// Length of the insert implied by the overlap.
    #[must_use]
    pub fn insert_length(&self, r2_len: usize) -> usize {
        (self.offset + r2_len as isize).max(0) as usize
    }

    /// Returns true if the mates read past each other into adaptor sequence.
    #[must_use]
    pub fn is_read_through(&self) -> bool {
        self.offset < 0
    }
}

/// Finds the best overlap between R1 and the reverse complement of R2.
///
/// Every offset whose overlap covers at least `min_overlap` positions is scored. An offset
/// is acceptable when it has at least `min_overlap` matches and no more than
/// `floor(length * max_mismatch_rate)` mismatches. The acceptable offset with the most
/// matches wins; ties go to the most negative offset.
///
/// # Example
/// ```
/// use pairqc_lib::processor::adaptor::find_overlap;
///
/// // The second sequence starts three bases into the first
/// let overlap = find_overlap(b"TTTACGTACGA", b"ACGTACGACCC", 6, 0.1).unwrap();
/// assert_eq!(overlap.offset, 3);
/// assert_eq!(overlap.matches, 8);
/// ```
#[must_use]
pub fn find_overlap(
    r1: &[u8],
    rc2: &[u8],
    min_overlap: usize,
    max_mismatch_rate: f64,
) -> Option<Overlap> {
    let min_overlap = min_overlap.max(1);
    if r1.len() < min_overlap || rc2.len() < min_overlap {
        return None;
    }

    let len1 = r1.len() as isize;
    let len2 = rc2.len() as isize;
    let mut best: Option<Overlap> = None;

    for offset in (1 - len2)..len1 {
        let start = offset.max(0);
        let end = len1.min(offset + len2);
        let length = (end - start) as usize;
        if length < min_overlap {
            continue;
        }

        let mut matches = 0;
        let mut mismatches = 0;
        for i in start..end {
            let a = r1[i as usize];
            let b = rc2[(i - offset) as usize];
            if is_no_call(a) || is_no_call(b) {
                continue;
            }
            if a.eq_ignore_ascii_case(&b) {
                matches += 1;
            } else {
                mismatches += 1;
            }
        }

        let max_mismatches = (length as f64 * max_mismatch_rate).floor() as usize;
        if matches < min_overlap || mismatches > max_mismatches {
            continue;
        }
        if best.is_none_or(|b| matches > b.matches) {
            best = Some(Overlap { offset, length, matches, mismatches });
        }
    }

    best
}

/// Builds one read covering the insert from R1 and the reverse-complemented R2.
///
/// Where both mates cover a position, agreeing bases keep the higher quality symbol,
/// disagreeing bases take the higher quality base with ties going to R1, and a no-call
/// defers to the other mate.
fn merge_mates(r1: &Read, rc2: &Read, offset: isize) -> Read {
    let insert_len = (offset + rc2.size() as isize).max(0) as usize;
    let mut merged = Read {
        name: r1.name.clone(),
        sequence: Vec::with_capacity(insert_len),
        quality: Vec::with_capacity(insert_len),
    };

    for pos in 0..insert_len {
        let from_r1 = (pos < r1.size()).then(|| (r1.sequence[pos], r1.quality[pos]));
        let from_r2 = usize::try_from(pos as isize - offset)
            .ok()
            .filter(|&j| j < rc2.size())
            .map(|j| (rc2.sequence[j], rc2.quality[j]));

        let (base, qual) = match (from_r1, from_r2) {
            (Some(a), Some(b)) => merge_base(a, b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => continue,
        };
        merged.sequence.push(base);
        merged.quality.push(qual);
    }

    merged
}

fn merge_base((b1, q1): (u8, u8), (b2, q2): (u8, u8)) -> (u8, u8) {
    match (is_no_call(b1), is_no_call(b2)) {
        (true, false) => (b2, q2),
        (false, true) => (b1, q1),
        _ if b1.eq_ignore_ascii_case(&b2) => (b1, q1.max(q2)),
        _ if q2 > q1 => (b2, q2),
        _ => (b1, q1),
    }
}

/// Detects overlapping mates, trimming adaptor read-through or merging each pair into a
/// single read.
#[derive(Debug)]
pub struct AdaptorTrimPE {
    name: String,
    min_overlap: usize,
    max_mismatch_rate: f64,
    merge_overlapping: bool,
    pairs_trimmed: Counter,
    pairs_merged: Counter,
    pairs_untouched: Counter,
}

impl AdaptorTrimPE {
    /// Creates a stage that merges overlapping mates, tolerating the default mismatch rate.
    #[must_use]
    pub fn new(name: impl Into<String>, min_overlap: usize) -> Self {
        Self {
            name: name.into(),
            min_overlap,
            max_mismatch_rate: DEFAULT_MAX_MISMATCH_RATE,
            merge_overlapping: true,
            pairs_trimmed: Counter::default(),
            pairs_merged: Counter::default(),
            pairs_untouched: Counter::default(),
        }
    }

    /// Sets the fraction of overlapping positions allowed to mismatch.
    #[must_use]
    pub fn with_max_mismatch_rate(mut self, rate: f64) -> Self {
        self.max_mismatch_rate = rate;
        self
    }

    /// Chooses between merging overlapping mates and only trimming read-through.
    #[must_use]
    pub fn with_merge(mut self, merge_overlapping: bool) -> Self {
        self.merge_overlapping = merge_overlapping;
        self
    }
}

impl ReadProcessor for AdaptorTrimPE {
    /// Overlap detection needs both mates; single reads pass through.
    fn process_read(&self, _read: &mut Read) {}

    fn process_read_pair(&self, pair: &mut ReadPair) {
        if pair.first.is_dropped() || pair.second.is_dropped() {
            self.pairs_untouched.incr();
            return;
        }

        let rc2 = reverse_complement_read(&pair.second);
        let Some(overlap) =
            find_overlap(&pair.first.sequence, &rc2.sequence, self.min_overlap, self.max_mismatch_rate)
        else {
            self.pairs_untouched.incr();
            return;
        };

        if self.merge_overlapping {
            pair.first = merge_mates(&pair.first, &rc2, overlap.offset);
            pair.second.drop_bases();
            self.pairs_merged.incr();
        } else if overlap.is_read_through() {
            let insert = overlap.insert_length(pair.second.size());
            pair.first.truncate(insert);
            pair.second.truncate(insert);
            self.pairs_trimmed.incr();
        } else {
            self.pairs_untouched.incr();
        }
    }

    fn report(&self) -> ReportFragment {
        ReportFragment::new("AdaptorTrimPE", &self.name)
            .parameter("min_overlap", self.min_overlap)
            .parameter("max_mismatch_rate", self.max_mismatch_rate)
            .parameter("merge_overlapping", self.merge_overlapping)
            .output("pairs_trimmed", self.pairs_trimmed.get())
            .output("pairs_merged", self.pairs_merged.get())
            .output("pairs_untouched", self.pairs_untouched.get())
    }
}
