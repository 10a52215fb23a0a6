//! A read source with an attached chain of processors.
//!
//! [`ProcessedReadStream`] pulls raw pairs from a pairing-aware source and runs them through
//! every registered processor in registration order. It is shared by reference among worker
//! threads: the source serializes the fetch, the processors run in parallel afterwards.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::errors::Result;
use crate::io::{ReadInputStream, ReadInterleaver, ReadParser};
use crate::processor::{Processor, ReadProcessor};
use crate::read::{Read, ReadPair};
use crate::report::Report;

/// A source of reads with an ordered processor chain.
pub struct ProcessedReadStream {
    source: Box<dyn ReadInputStream>,
    processors: Vec<Processor>,
    at_end: AtomicBool,
}

impl ProcessedReadStream {
    /// Wraps an existing source.
    #[must_use]
    pub fn new(source: Box<dyn ReadInputStream>) -> Self {
        Self { source, processors: Vec::new(), at_end: AtomicBool::new(false) }
    }

    /// Opens a single interleaved FASTQ.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        debug!("Reading interleaved pairs from {}", path.display());
        Ok(Self::new(Box::new(ReadParser::open(path)?)))
    }

    /// Opens an R1 and an R2 FASTQ read in lock-step.
    ///
    /// # Errors
    /// Returns an error if either file cannot be opened.
    pub fn open_paired(r1: &Path, r2: &Path) -> Result<Self> {
        debug!("Reading pairs from {} and {}", r1.display(), r2.display());
        Ok(Self::new(Box::new(ReadInterleaver::open(r1, r2)?)))
    }

    /// Appends a processor to the end of the chain.
    pub fn append_processor(&mut self, processor: impl Into<Processor>) -> &mut Self {
        self.processors.push(processor.into());
        self
    }

    /// The registered processors, in order.
    #[must_use]
    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    /// Returns true once the source has been exhausted.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.at_end.load(Ordering::Acquire)
    }

    /// Fetches the next pair and runs it through every processor.
    ///
    /// Returns `Ok(false)` at end of input, and keeps doing so on every later call.
    /// Processors run even when an earlier stage has dropped one or both mates.
    ///
    /// # Errors
    /// Returns an error if the source fails or the two channels fall out of sync.
    pub fn parse_read_pair(&self, pair: &mut ReadPair) -> Result<bool> {
        if self.at_end() {
            return Ok(false);
        }
        if !self.source.parse_read_pair(pair)? {
            self.at_end.store(true, Ordering::Release);
            return Ok(false);
        }
        for processor in &self.processors {
            processor.process_read_pair(pair);
        }
        Ok(true)
    }

    /// Fetches the next single read and runs it through every processor.
    ///
    /// # Errors
    /// Returns an error if the source fails.
    pub fn parse_read(&self, read: &mut Read) -> Result<bool> {
        if self.at_end() {
            return Ok(false);
        }
        if !self.source.parse_read(read)? {
            self.at_end.store(true, Ordering::Release);
            return Ok(false);
        }
        for processor in &self.processors {
            processor.process_read(read);
        }
        Ok(true)
    }

    /// Collects the stream counts and every processor's report, in registration order.
    #[must_use]
    pub fn report(&self) -> Report {
        let counts = self.source.counts();
        let mut report = Report {
            stages: self.processors.iter().map(ReadProcessor::report).collect(),
            ..Report::default()
        };
        report.metadata.insert("reads_parsed", counts.reads);
        report.metadata.insert("pairs_parsed", counts.pairs);
        report
    }
}
