//! Custom error types for pairqc operations.
//!
//! Only true faults cross the processor/stream boundary as errors: I/O failures,
//! pairing desynchronization and malformed records. Reads that fall below a quality
//! or length threshold are data (an empty read), never an error.

use thiserror::Error;

/// Result type alias for pairqc operations
pub type Result<T> = std::result::Result<T, QcError>;

/// Error type for pairqc operations
#[derive(Error, Debug)]
pub enum QcError {
    /// A file could not be opened or created
    #[error("Could not open '{path}': {reason}")]
    Open {
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// A physical read or write failed mid-stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The two channels of a paired stream disagree on record count or mate identity
    #[error("Read pairing out of sync: {reason}")]
    PairingDesync {
        /// Explanation of the mismatch
        reason: String,
    },

    /// A record could not be parsed
    #[error("Malformed record: {reason}")]
    MalformedRecord {
        /// Explanation of the problem
        reason: String,
    },

    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },
}

impl QcError {
    /// Returns true for errors caused by the pairing of two channels.
    #[must_use]
    pub fn is_pairing_error(&self) -> bool {
        matches!(self, Self::PairingDesync { .. })
    }
}

impl From<seq_io::fastq::Error> for QcError {
    fn from(error: seq_io::fastq::Error) -> Self {
        match error {
            seq_io::fastq::Error::Io(e) => Self::Io(e),
            other => Self::MalformedRecord { reason: other.to_string() },
        }
    }
}
