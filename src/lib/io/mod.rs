//! Paired FASTQ input and output.
//!
//! Pairs can arrive as one interleaved file ([`ReadParser`]) or as two files consumed in
//! lock-step ([`ReadInterleaver`]), and leave the same two ways ([`ReadWriter`] and
//! [`ReadDeInterleaver`]). Every stream takes `&self`: the underlying channels live behind a
//! single mutex that is held across both mates of a pair, so concurrent callers can never
//! split a pair or interleave the mates of two different pairs.
//!
//! Files ending in `.gz` or `.bgz` are transparently decompressed on input and compressed on
//! output.

mod reader;
mod writer;

use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use fgoxide::io::Io;

pub use reader::{ReadInterleaver, ReadParser};
pub use writer::{ReadDeInterleaver, ReadWriter};

use crate::errors::{QcError, Result};
use crate::read::{Read, ReadPair};

/// Buffer size for FASTQ readers and writers.
pub const BUFFER_SIZE: usize = 1024 * 1024;

/// Compression level used for gzipped output.
const COMPRESSION_LEVEL: u32 = 5;

/// Records and pairs that have passed through a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamCounts {
    /// Individual records
    pub reads: u64,
    /// Complete pairs
    pub pairs: u64,
}

/// A pairing-aware source of reads.
pub trait ReadInputStream: Send + Sync {
    /// Reads the next single record. Returns `Ok(false)` at end of input.
    fn parse_read(&self, read: &mut Read) -> Result<bool>;

    /// Reads the next pair. Returns `Ok(false)` at end of input.
    ///
    /// # Errors
    /// Returns [`QcError::PairingDesync`] if only one mate is available or the mate names
    /// disagree.
    fn parse_read_pair(&self, pair: &mut ReadPair) -> Result<bool>;

    /// Records and pairs parsed so far.
    fn counts(&self) -> StreamCounts;
}

/// A pairing-aware sink for reads.
pub trait ReadOutputStream: Send + Sync {
    /// Writes a single record.
    fn write_read(&self, read: &Read) -> Result<()>;

    /// Writes both mates of a pair as one unit.
    fn write_read_pair(&self, pair: &ReadPair) -> Result<()>;

    /// Returns true if single records can be written without breaking the pairing of the
    /// output.
    fn supports_single_reads(&self) -> bool;

    /// Flushes all buffered output.
    fn flush(&self) -> Result<()>;

    /// Records and pairs written so far.
    fn counts(&self) -> StreamCounts;
}

/// Opens a (possibly gzipped) file for reading.
///
/// # Errors
/// Returns [`QcError::Open`] if the file cannot be opened.
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    Io::new(COMPRESSION_LEVEL, BUFFER_SIZE)
        .new_reader(path)
        .map_err(|e| QcError::Open { path: path.display().to_string(), reason: e.to_string() })
}

/// Opens a (possibly gzipped) file for writing, or standard output when no path is given.
///
/// # Errors
/// Returns [`QcError::Open`] if the file cannot be created.
pub fn open_writer(path: Option<&Path>) -> Result<Box<dyn Write + Send>> {
    match path {
        Some(path) => {
            let writer = Io::new(COMPRESSION_LEVEL, BUFFER_SIZE).new_writer(path).map_err(|e| {
                QcError::Open { path: path.display().to_string(), reason: e.to_string() }
            })?;
            Ok(Box::new(writer))
        }
        None => Ok(Box::new(BufWriter::with_capacity(BUFFER_SIZE, std::io::stdout()))),
    }
}

/// Collects the quality strings of up to `limit` records from the start of a file.
///
/// # Errors
/// Returns an error if the file cannot be opened or a record is malformed.
pub fn sample_qualities(path: &Path, limit: usize) -> Result<Vec<Vec<u8>>> {
    let source = ReadParser::open(path)?;
    let mut read = Read::default();
    let mut samples = Vec::with_capacity(limit);
    while samples.len() < limit && source.parse_read(&mut read)? {
        samples.push(std::mem::take(&mut read.quality));
    }
    Ok(samples)
}
