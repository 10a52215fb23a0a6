//! Restriction-site read-through trimming for genotyping-by-sequencing libraries.
//!
//! Short GBS fragments are read through into the restriction site ligated at the far end.
//! Each mate is truncated immediately before the leftmost approximate occurrence of the
//! site.

use crate::errors::Result;
use crate::read::{Read, ReadPair};
use crate::report::ReportFragment;
use crate::validation::validate_motif;

use super::{Counter, ReadProcessor};

/// Truncates reads at the first occurrence of a restriction-site motif.
#[derive(Debug)]
pub struct GBSTrimPE {
    name: String,
    motif: Vec<u8>,
    max_mismatches: usize,
    reads_trimmed: Counter,
    pairs_trimmed: Counter,
}

impl GBSTrimPE {
    /// Creates a trimmer for `motif`, tolerating up to `max_mismatches` differences.
    ///
    /// # Errors
    /// Returns an error if the motif is empty or contains anything other than `ACGT`.
    pub fn new(name: impl Into<String>, motif: &str, max_mismatches: usize) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            motif: validate_motif(motif, "motif")?,
            max_mismatches,
            reads_trimmed: Counter::default(),
            pairs_trimmed: Counter::default(),
        })
    }

    /// Returns the leftmost position where the motif occurs with at most `max_mismatches`
    /// differences. A no-call in the read always counts as a difference.
    ///
    /// # Example
    /// ```
    /// use pairqc_lib::processor::GBSTrimPE;
    ///
    /// let trimmer = GBSTrimPE::new("gbs", "CTGCAG", 1).unwrap();
    /// assert_eq!(trimmer.find_motif(b"AAAACTGCAGTT"), Some(4));
    /// assert_eq!(trimmer.find_motif(b"AAAACTGGAGTT"), Some(4));
    /// assert_eq!(trimmer.find_motif(b"AAAAAAAAAAAA"), None);
    /// ```
    #[must_use]
    pub fn find_motif(&self, sequence: &[u8]) -> Option<usize> {
        let m = self.motif.len();
        if sequence.len() < m {
            return None;
        }

        (0..=sequence.len() - m).find(|&pos| {
            let mut mismatches = 0;
            for (base, expected) in sequence[pos..pos + m].iter().zip(&self.motif) {
                if base.to_ascii_uppercase() != *expected {
                    mismatches += 1;
                    if mismatches > self.max_mismatches {
                        return false;
                    }
                }
            }
            true
        })
    }

    fn trim(&self, read: &mut Read) -> bool {
        match self.find_motif(&read.sequence) {
            Some(pos) => {
                read.erase(pos);
                self.reads_trimmed.incr();
                true
            }
            None => false,
        }
    }
}

impl ReadProcessor for GBSTrimPE {
    fn process_read(&self, read: &mut Read) {
        self.trim(read);
    }

    fn process_read_pair(&self, pair: &mut ReadPair) {
        let first = self.trim(&mut pair.first);
        let second = self.trim(&mut pair.second);
        if first || second {
            self.pairs_trimmed.incr();
        }
    }

    fn report(&self) -> ReportFragment {
        ReportFragment::new("GBSTrimPE", &self.name)
            .parameter("motif", String::from_utf8_lossy(&self.motif).into_owned())
            .parameter("max_mismatches", self.max_mismatches)
            .output("reads_trimmed", self.reads_trimmed.get())
            .output("pairs_trimmed", self.pairs_trimmed.get())
    }
}
