//! DNA sequence utilities.
//!
//! Complement and reverse complement used when lining up the two mates of a pair.

use crate::read::Read;

/// No-call base.
pub const NO_CALL_BASE: u8 = b'N';

/// Returns true if a base is a no-call (N, n or .).
#[inline]
#[must_use]
pub const fn is_no_call(base: u8) -> bool {
    matches!(base, b'N' | b'n' | b'.')
}

/// Complements a single DNA base, normalizing to uppercase.
///
/// Returns the Watson-Crick complement: A<->T, C<->G. No-calls and IUPAC ambiguity codes
/// are returned unchanged.
#[inline]
#[must_use]
pub const fn complement_base(base: u8) -> u8 {
    match base {
        b'A' | b'a' => b'T',
        b'T' | b't' => b'A',
        b'C' | b'c' => b'G',
        b'G' | b'g' => b'C',
        b'n' => NO_CALL_BASE,
        _ => base,
    }
}

/// Reverse complements a DNA sequence.
///
/// # Examples
///
/// ```
/// use pairqc_lib::dna::reverse_complement;
///
/// assert_eq!(reverse_complement(b"ACGT"), b"ACGT".to_vec());
/// assert_eq!(reverse_complement(b"AAAC"), b"GTTT".to_vec());
/// assert_eq!(reverse_complement(b"ACGTN"), b"NACGT".to_vec());
/// ```
#[must_use]
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&base| complement_base(base)).collect()
}

/// Returns the reverse complement of a read: bases reverse complemented, qualities reversed.
#[must_use]
pub fn reverse_complement_read(read: &Read) -> Read {
    Read {
        name: read.name.clone(),
        sequence: reverse_complement(&read.sequence),
        quality: read.quality.iter().rev().copied().collect(),
    }
}
