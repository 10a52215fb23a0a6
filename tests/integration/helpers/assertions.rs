//! Custom assertion helpers for integration tests.

#![allow(dead_code)]

use pairqc_lib::read::Read;

/// Asserts that every record is well formed: sequence and quality lengths agree and the
/// sequence is non-empty.
///
/// # Panics
///
/// Panics on the first malformed record.
pub fn assert_well_formed(reads: &[Read]) {
    for read in reads {
        let name = String::from_utf8_lossy(&read.name);
        assert_eq!(read.sequence.len(), read.quality.len(), "length mismatch for {name}");
        assert!(!read.sequence.is_empty(), "empty record written for {name}");
    }
}

/// Asserts that two FASTQ channels hold the same templates in the same order.
///
/// # Panics
///
/// Panics if the channels differ in length or a template name differs.
pub fn assert_mates_in_sync(r1: &[Read], r2: &[Read]) {
    assert_eq!(r1.len(), r2.len(), "R1 and R2 hold different numbers of records");
    for (first, second) in r1.iter().zip(r2) {
        assert_eq!(
            template_name(first),
            template_name(second),
            "mates out of order: {} vs {}",
            String::from_utf8_lossy(&first.name),
            String::from_utf8_lossy(&second.name)
        );
    }
}

/// The read name with any `/1` or `/2` suffix removed.
pub fn template_name(read: &Read) -> &[u8] {
    pairqc_lib::read::strip_mate_suffix(&read.name)
}

/// Sorts records by name so runs with different thread counts can be compared.
pub fn sorted_by_name(mut reads: Vec<Read>) -> Vec<Read> {
    reads.sort_by(|a, b| a.name.cmp(&b.name));
    reads
}
