//! In-memory representation of sequencing reads and read pairs.
//!
//! A [`Read`] holds a name, its bases and one quality symbol per base. Every mutator keeps
//! the sequence and quality vectors in lock-step. A read whose sequence has been shrunk to
//! zero length is considered *dropped*: processors signal a discard decision this way
//! rather than through an error or a side channel, and every downstream stage must accept
//! zero-length reads.

use std::fmt::{self, Display};
use std::io::Write;

/// A single sequencing record.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Read {
    /// The FASTQ header line without the leading '@'
    pub name: Vec<u8>,
    /// The nucleotide bases
    pub sequence: Vec<u8>,
    /// Encoded quality symbols, one per base
    pub quality: Vec<u8>,
}

impl Read {
    /// Creates a read from anything byte-like.
    ///
    /// # Example
    /// ```
    /// use pairqc_lib::read::Read;
    ///
    /// let read = Read::new("r1", "ACGT", "IIII");
    /// assert_eq!(read.size(), 4);
    /// ```
    #[must_use]
    pub fn new(
        name: impl AsRef<[u8]>,
        sequence: impl AsRef<[u8]>,
        quality: impl AsRef<[u8]>,
    ) -> Self {
        Self {
            name: name.as_ref().to_vec(),
            sequence: sequence.as_ref().to_vec(),
            quality: quality.as_ref().to_vec(),
        }
    }

    /// Number of bases in the read.
    #[must_use]
    pub fn size(&self) -> usize {
        self.sequence.len()
    }

    /// Returns true if the read has been dropped (has no bases left).
    #[must_use]
    pub fn is_dropped(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Empties name, sequence and quality.
    pub fn clear(&mut self) {
        self.name.clear();
        self.sequence.clear();
        self.quality.clear();
    }

    /// Drops the read by removing all bases and qualities while keeping its name.
    pub fn drop_bases(&mut self) {
        self.sequence.clear();
        self.quality.clear();
    }

    /// Keeps the first `len` bases, removing the rest from both sequence and quality.
    pub fn truncate(&mut self, len: usize) {
        self.sequence.truncate(len);
        self.quality.truncate(len);
    }

    /// Removes every base from `pos` to the end of the read.
    pub fn erase(&mut self, pos: usize) {
        self.truncate(pos);
    }

    /// Writes the read as a four-line FASTQ record.
    ///
    /// # Errors
    /// Returns an error if the writer fails.
    pub fn write_fastq<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(b"@")?;
        writer.write_all(&self.name)?;
        writer.write_all(b"\n")?;
        writer.write_all(&self.sequence)?;
        writer.write_all(b"\n+\n")?;
        writer.write_all(&self.quality)?;
        writer.write_all(b"\n")
    }

    /// Renders the read as a FASTQ record.
    #[must_use]
    pub fn to_fastq(&self) -> String {
        format!(
            "@{}\n{}\n+\n{}\n",
            String::from_utf8_lossy(&self.name),
            String::from_utf8_lossy(&self.sequence),
            String::from_utf8_lossy(&self.quality)
        )
    }
}

impl Display for Read {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fastq())
    }
}

/// Two mates sequenced from opposite ends of the same fragment.
///
/// Position matters: `first` is always R1 and `second` is always R2.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct ReadPair {
    /// Read 1
    pub first: Read,
    /// Read 2
    pub second: Read,
}

impl ReadPair {
    /// Creates a pair from two reads.
    #[must_use]
    pub fn new(first: Read, second: Read) -> Self {
        Self { first, second }
    }

    /// Returns true if neither mate has any bases left.
    #[must_use]
    pub fn is_dropped(&self) -> bool {
        self.first.is_dropped() && self.second.is_dropped()
    }

    /// Returns true if exactly one mate has been dropped.
    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.first.is_dropped() != self.second.is_dropped()
    }

    /// Iterates over both mates in R1, R2 order.
    pub fn iter(&self) -> impl Iterator<Item = &Read> {
        [&self.first, &self.second].into_iter()
    }

    /// Writes both mates as consecutive FASTQ records.
    ///
    /// # Errors
    /// Returns an error if the writer fails.
    pub fn write_fastq<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
        self.first.write_fastq(writer)?;
        self.second.write_fastq(writer)
    }
}

impl Display for ReadPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.first, self.second)
    }
}

/// Strips a trailing comment and a `/1`, `/2` (or `_1`, `:1`) mate suffix from a read name
/// so that mates can be compared.
///
/// A `.1` or `.2` suffix is only a mate number when the rest of the name has its own `.`
/// (`SRR1.7.1`); in `SRR1.7` it is the spot number and is kept.
#[must_use]
pub fn strip_mate_suffix(name: &[u8]) -> &[u8] {
    let name = match name.iter().position(|&b| b == b' ' || b == b'\t') {
        Some(pos) => &name[..pos],
        None => name,
    };

    if name.len() >= 2 {
        let last = name[name.len() - 1];
        let sep = name[name.len() - 2];
        let prefix = &name[..name.len() - 2];
        let is_mate_sep = match sep {
            b'/' | b'_' | b':' => true,
            b'.' => prefix.contains(&b'.'),
            _ => false,
        };
        if (last == b'1' || last == b'2') && is_mate_sep {
            return prefix;
        }
    }

    name
}
