//! FASTQ sources.

use std::io::BufRead;
use std::path::Path;

use parking_lot::Mutex;
use seq_io::fastq::{Reader as FastqReader, Record};

use super::{BUFFER_SIZE, ReadInputStream, StreamCounts, open_reader};
use crate::errors::{QcError, Result};
use crate::read::{Read, ReadPair, strip_mate_suffix};

type FastqSource = FastqReader<Box<dyn BufRead + Send>>;

/// Copies the next record from `source` into `read`, reusing its buffers.
fn next_record(source: &mut FastqSource, read: &mut Read) -> Result<bool> {
    match source.next() {
        None => Ok(false),
        Some(Err(e)) => Err(e.into()),
        Some(Ok(record)) => {
            read.name.clear();
            read.name.extend_from_slice(record.head());
            read.sequence.clear();
            read.sequence.extend_from_slice(record.seq());
            read.quality.clear();
            read.quality.extend_from_slice(record.qual());
            Ok(true)
        }
    }
}

/// Fails unless both mates carry the same name once mate suffixes are removed.
fn check_mate_names(pair: &ReadPair) -> Result<()> {
    let first = strip_mate_suffix(&pair.first.name);
    let second = strip_mate_suffix(&pair.second.name);
    if first != second {
        return Err(QcError::PairingDesync {
            reason: format!(
                "mate names do not match: '{}' and '{}'",
                String::from_utf8_lossy(&pair.first.name),
                String::from_utf8_lossy(&pair.second.name)
            ),
        });
    }
    Ok(())
}

struct ParserState {
    source: FastqSource,
    counts: StreamCounts,
}

/// Reads pairs from a single interleaved FASTQ: R1, R2, R1, R2, ...
pub struct ReadParser {
    state: Mutex<ParserState>,
}

impl ReadParser {
    /// Wraps an already open byte stream.
    #[must_use]
    pub fn new(reader: Box<dyn BufRead + Send>) -> Self {
        let source = FastqReader::with_capacity(reader, BUFFER_SIZE);
        Self { state: Mutex::new(ParserState { source, counts: StreamCounts::default() }) }
    }

    /// Opens a (possibly gzipped) interleaved FASTQ.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(open_reader(path)?))
    }
}

impl ReadInputStream for ReadParser {
    fn parse_read(&self, read: &mut Read) -> Result<bool> {
        let mut state = self.state.lock();
        let found = next_record(&mut state.source, read)?;
        if found {
            state.counts.reads += 1;
        }
        Ok(found)
    }

    fn parse_read_pair(&self, pair: &mut ReadPair) -> Result<bool> {
        let mut state = self.state.lock();
        if !next_record(&mut state.source, &mut pair.first)? {
            return Ok(false);
        }
        state.counts.reads += 1;

        if !next_record(&mut state.source, &mut pair.second)? {
            return Err(QcError::PairingDesync {
                reason: format!(
                    "interleaved input has an odd number of records; '{}' has no mate",
                    String::from_utf8_lossy(&pair.first.name)
                ),
            });
        }
        state.counts.reads += 1;

        check_mate_names(pair)?;
        state.counts.pairs += 1;
        Ok(true)
    }

    fn counts(&self) -> StreamCounts {
        self.state.lock().counts
    }
}

struct InterleaverState {
    r1: FastqSource,
    r2: FastqSource,
    next_is_r2: bool,
    counts: StreamCounts,
}

/// Reads pairs from two FASTQs consumed in lock-step.
///
/// Both files sit behind one lock, held across the fetch of both mates.
pub struct ReadInterleaver {
    state: Mutex<InterleaverState>,
}

impl ReadInterleaver {
    /// Wraps two already open byte streams.
    #[must_use]
    pub fn new(r1: Box<dyn BufRead + Send>, r2: Box<dyn BufRead + Send>) -> Self {
        Self {
            state: Mutex::new(InterleaverState {
                r1: FastqReader::with_capacity(r1, BUFFER_SIZE),
                r2: FastqReader::with_capacity(r2, BUFFER_SIZE),
                next_is_r2: false,
                counts: StreamCounts::default(),
            }),
        }
    }

    /// Opens a pair of (possibly gzipped) FASTQs.
    ///
    /// # Errors
    /// Returns an error if either file cannot be opened.
    pub fn open(r1: &Path, r2: &Path) -> Result<Self> {
        Ok(Self::new(open_reader(r1)?, open_reader(r2)?))
    }
}

impl ReadInputStream for ReadInterleaver {
    /// Alternates between the two files, starting with R1.
    fn parse_read(&self, read: &mut Read) -> Result<bool> {
        let mut state = self.state.lock();
        let state = &mut *state;
        let source = if state.next_is_r2 { &mut state.r2 } else { &mut state.r1 };
        let found = next_record(source, read)?;
        if found {
            state.counts.reads += 1;
            state.next_is_r2 = !state.next_is_r2;
        }
        Ok(found)
    }

    fn parse_read_pair(&self, pair: &mut ReadPair) -> Result<bool> {
        let mut state = self.state.lock();
        let state = &mut *state;
        let has_r1 = next_record(&mut state.r1, &mut pair.first)?;
        let has_r2 = next_record(&mut state.r2, &mut pair.second)?;

        match (has_r1, has_r2) {
            (false, false) => Ok(false),
            (true, false) => Err(QcError::PairingDesync {
                reason: format!(
                    "R2 input ended before R1; '{}' has no mate",
                    String::from_utf8_lossy(&pair.first.name)
                ),
            }),
            (false, true) => Err(QcError::PairingDesync {
                reason: format!(
                    "R1 input ended before R2; '{}' has no mate",
                    String::from_utf8_lossy(&pair.second.name)
                ),
            }),
            (true, true) => {
                state.counts.reads += 2;
                check_mate_names(pair)?;
                state.counts.pairs += 1;
                Ok(true)
            }
        }
    }

    fn counts(&self) -> StreamCounts {
        self.state.lock().counts
    }
}
