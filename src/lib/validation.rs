//! Input validation utilities
//!
//! Common checks for command-line parameters and input paths, run once before any record
//! is read. Failures are reported as [`QcError::InvalidParameter`] or [`QcError::Open`] so
//! that the caller can name the offending option.

use crate::errors::{QcError, Result};
use std::fmt::Display;
use std::path::Path;

/// Validate that a file exists
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description of the file (e.g., "Input FASTQ")
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use pairqc_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/reads.fq.gz", "Input FASTQ");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        return Err(QcError::Open {
            path: path_ref.display().to_string(),
            reason: format!("{description} does not exist"),
        });
    }
    Ok(())
}

/// Validate that every file in a list exists
///
/// # Errors
/// Returns an error for the first file that doesn't exist
pub fn validate_files_exist<P: AsRef<Path>>(files: &[(P, &str)]) -> Result<()> {
    for (path, desc) in files {
        validate_file_exists(path, desc)?;
    }
    Ok(())
}

/// Validate a restriction-site motif and return it upper-cased.
///
/// The motif must be non-empty and consist only of `A`, `C`, `G` and `T`.
///
/// # Errors
/// Returns an error if the motif is empty or contains any other character
///
/// # Example
/// ```
/// use pairqc_lib::validation::validate_motif;
///
/// assert_eq!(validate_motif("ctgcag", "motif").unwrap(), b"CTGCAG".to_vec());
/// assert!(validate_motif("CTGNAG", "motif").is_err());
/// assert!(validate_motif("", "motif").is_err());
/// ```
pub fn validate_motif(motif: &str, name: &str) -> Result<Vec<u8>> {
    if motif.is_empty() {
        return Err(QcError::InvalidParameter {
            parameter: name.to_string(),
            reason: "Motif must not be empty".to_string(),
        });
    }

    let upper = motif.to_ascii_uppercase().into_bytes();
    if let Some(&bad) = upper.iter().find(|b| !matches!(b, b'A' | b'C' | b'G' | b'T')) {
        return Err(QcError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("Motif may only contain A, C, G and T, found '{}'", bad as char),
        });
    }
    Ok(upper)
}

/// Validate that a fraction lies in the range [0.0, 1.0]
///
/// # Errors
/// Returns an error if the value is outside [0.0, 1.0] or not a number
///
/// # Example
/// ```
/// use pairqc_lib::validation::validate_fraction;
///
/// validate_fraction(0.1, "max-mismatch-rate").unwrap();
/// assert!(validate_fraction(1.5, "max-mismatch-rate").is_err());
/// ```
pub fn validate_fraction(value: f64, name: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(QcError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("Must be between 0 and 1, got: {value}"),
        });
    }
    Ok(())
}

/// Validate that a value is at least `min`
///
/// # Errors
/// Returns an error if the value is below `min`
///
/// # Example
/// ```
/// use pairqc_lib::validation::validate_min;
///
/// validate_min(10, 1, "min-overlap").unwrap();
/// assert!(validate_min(0, 1, "min-overlap").is_err());
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn validate_min<T: PartialOrd + Display>(value: T, min: T, name: &str) -> Result<()> {
    if value < min {
        return Err(QcError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("Must be >= {min}, got: {value}"),
        });
    }
    Ok(())
}
