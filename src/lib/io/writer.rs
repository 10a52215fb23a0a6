//! FASTQ sinks.

use std::io::Write;
use std::path::Path;

use parking_lot::Mutex;

use super::{ReadOutputStream, StreamCounts, open_writer};
use crate::errors::Result;
use crate::read::{Read, ReadPair};

struct WriterState {
    out: Box<dyn Write + Send>,
    counts: StreamCounts,
}

/// Writes reads to a single FASTQ; pairs are written interleaved.
pub struct ReadWriter {
    state: Mutex<WriterState>,
}

impl ReadWriter {
    /// Wraps an already open writer.
    #[must_use]
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { state: Mutex::new(WriterState { out, counts: StreamCounts::default() }) }
    }

    /// Creates a (possibly gzipped) FASTQ, or writes to standard output when no path is given.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create(path: Option<&Path>) -> Result<Self> {
        Ok(Self::new(open_writer(path)?))
    }
}

impl ReadOutputStream for ReadWriter {
    fn write_read(&self, read: &Read) -> Result<()> {
        let mut state = self.state.lock();
        read.write_fastq(&mut state.out)?;
        state.counts.reads += 1;
        Ok(())
    }

    fn write_read_pair(&self, pair: &ReadPair) -> Result<()> {
        let mut state = self.state.lock();
        pair.write_fastq(&mut state.out)?;
        state.counts.reads += 2;
        state.counts.pairs += 1;
        Ok(())
    }

    fn supports_single_reads(&self) -> bool {
        true
    }

    fn flush(&self) -> Result<()> {
        self.state.lock().out.flush()?;
        Ok(())
    }

    fn counts(&self) -> StreamCounts {
        self.state.lock().counts
    }
}

struct DeInterleaverState {
    r1: Box<dyn Write + Send>,
    r2: Box<dyn Write + Send>,
    next_is_r2: bool,
    counts: StreamCounts,
}

/// Writes R1 and R2 to two separate FASTQs.
///
/// Both files sit behind one lock, held across the write of both mates, so the files always
/// hold the same number of records in the same order.
pub struct ReadDeInterleaver {
    state: Mutex<DeInterleaverState>,
}

impl ReadDeInterleaver {
    /// Wraps two already open writers.
    #[must_use]
    pub fn new(r1: Box<dyn Write + Send>, r2: Box<dyn Write + Send>) -> Self {
        Self {
            state: Mutex::new(DeInterleaverState {
                r1,
                r2,
                next_is_r2: false,
                counts: StreamCounts::default(),
            }),
        }
    }

    /// Creates two (possibly gzipped) FASTQs.
    ///
    /// # Errors
    /// Returns an error if either file cannot be created.
    pub fn create(r1: &Path, r2: &Path) -> Result<Self> {
        Ok(Self::new(open_writer(Some(r1))?, open_writer(Some(r2))?))
    }
}

impl ReadOutputStream for ReadDeInterleaver {
    /// Alternates between the two files, starting with R1, mirroring
    /// [`super::ReadInterleaver`].
    fn write_read(&self, read: &Read) -> Result<()> {
        let mut state = self.state.lock();
        let state = &mut *state;
        let out = if state.next_is_r2 { &mut state.r2 } else { &mut state.r1 };
        read.write_fastq(out)?;
        state.next_is_r2 = !state.next_is_r2;
        state.counts.reads += 1;
        Ok(())
    }

    fn write_read_pair(&self, pair: &ReadPair) -> Result<()> {
        let mut state = self.state.lock();
        pair.first.write_fastq(&mut state.r1)?;
        pair.second.write_fastq(&mut state.r2)?;
        state.counts.reads += 2;
        state.counts.pairs += 1;
        Ok(())
    }

    fn supports_single_reads(&self) -> bool {
        false
    }

    fn flush(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.r1.flush()?;
        state.r2.flush()?;
        Ok(())
    }

    fn counts(&self) -> StreamCounts {
        self.state.lock().counts
    }
}
