//! Read processors: the stages of a QC pipeline.
//!
//! A processor is a named, stateful stage that mutates reads in place and accumulates
//! counters for its report. Processors take `&self` so that one instance can be shared by
//! every worker thread; counters are atomics and tables sit behind short-lived locks.
//!
//! Dropping a read means shrinking it to zero length (see [`Read::is_dropped`]). Every
//! processor must accept zero-length reads, since an earlier stage may already have dropped
//! one or both mates.
//!
//! The set of stages is closed, so stages are dispatched through the [`Processor`] enum
//! rather than trait objects.

pub mod adaptor;
pub mod gbs;
pub mod length;
pub mod measure;
pub mod qualtrim;

use std::sync::atomic::{AtomicU64, Ordering};

use enum_dispatch::enum_dispatch;

pub use adaptor::AdaptorTrimPE;
pub use gbs::GBSTrimPE;
pub use length::{ReadLenCounter, ReadLenFilter};
pub use measure::PerBaseQuality;
pub use qualtrim::WindowedQualTrim;

use crate::read::{Read, ReadPair};
use crate::report::ReportFragment;

/// The contract every pipeline stage implements.
#[enum_dispatch]
pub trait ReadProcessor {
    /// Processes a single-ended read.
    fn process_read(&self, read: &mut Read);

    /// Processes both mates of a pair. The default handles each mate independently.
    fn process_read_pair(&self, pair: &mut ReadPair) {
        self.process_read(&mut pair.first);
        self.process_read(&mut pair.second);
    }

    /// Returns the stage's parameters and accumulated counters.
    fn report(&self) -> ReportFragment;
}

/// Any of the available pipeline stages.
#[enum_dispatch(ReadProcessor)]
#[derive(Debug)]
pub enum Processor {
    WindowedQualTrim(WindowedQualTrim),
    AdaptorTrimPE(AdaptorTrimPE),
    GBSTrimPE(GBSTrimPE),
    ReadLenFilter(ReadLenFilter),
    ReadLenCounter(ReadLenCounter),
    PerBaseQuality(PerBaseQuality),
}

/// A relaxed atomic counter for processor statistics.
#[derive(Debug, Default)]
pub(crate) struct Counter(AtomicU64);

impl Counter {
    pub(crate) fn incr(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}
