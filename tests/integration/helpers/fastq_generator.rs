//! Builders for FASTQ fixtures.

#![allow(dead_code)]

use std::io::{BufRead, Write};
use std::path::Path;

use pairqc_lib::io::{open_reader, open_writer};
use pairqc_lib::read::{Read, ReadPair};

/// A fixed 24 bp insert used across tests.
pub const INSERT: &str = "ACGTTGCAAGGCTTACCGATGCAT";

/// Start of the Illumina TruSeq adaptor.
pub const ADAPTOR: &str = "AGATCGGAAGAGC";

/// Reverse complement of an ASCII DNA string.
pub fn revcomp(seq: &str) -> String {
    seq.bytes()
        .rev()
        .map(|b| match b {
            b'A' => 'T',
            b'C' => 'G',
            b'G' => 'C',
            b'T' => 'A',
            _ => 'N',
        })
        .collect()
}

/// A pair sequenced from `insert` with `read_len` cycles per mate, running into `ADAPTOR`
/// (padded with `A`) when the insert is shorter than the reads.
pub fn read_through_pair(name: &str, insert: &str, read_len: usize, qual: u8) -> ReadPair {
    let fill = |s: String| -> String {
        let mut s = s;
        while s.len() < read_len {
            s.push('A');
        }
        s.truncate(read_len);
        s
    };
    let r1 = fill(format!("{insert}{ADAPTOR}"));
    let r2 = fill(format!("{}{ADAPTOR}", revcomp(insert)));
    let quals = String::from_utf8(vec![qual; read_len]).unwrap();
    ReadPair::new(
        Read::new(format!("{name}/1"), r1, quals.clone()),
        Read::new(format!("{name}/2"), r2, quals),
    )
}

/// A deterministic pseudo-random sequence.
pub fn pseudo_random_sequence(len: usize, seed: u64) -> String {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            b"ACGT"[(state >> 62) as usize] as char
        })
        .collect()
}

/// Writes pairs interleaved into one FASTQ (gzipped when the path ends in `.gz`).
pub fn write_interleaved(path: &Path, pairs: &[ReadPair]) {
    let mut text = String::new();
    for pair in pairs {
        text.push_str(&pair.first.to_fastq());
        text.push_str(&pair.second.to_fastq());
    }
    write_text(path, &text);
}

/// Writes the mates of each pair to separate R1 and R2 FASTQs.
pub fn write_paired(r1: &Path, r2: &Path, pairs: &[ReadPair]) {
    let first: String = pairs.iter().map(|p| p.first.to_fastq()).collect();
    let second: String = pairs.iter().map(|p| p.second.to_fastq()).collect();
    write_text(r1, &first);
    write_text(r2, &second);
}

fn write_text(path: &Path, text: &str) {
    let mut writer = open_writer(Some(path)).expect("Failed to create FASTQ");
    writer.write_all(text.as_bytes()).expect("Failed to write FASTQ");
    writer.flush().expect("Failed to flush FASTQ");
}

/// Reads every record of a (possibly gzipped) FASTQ.
pub fn read_fastq(path: &Path) -> Vec<Read> {
    let reader = open_reader(path).expect("Failed to open FASTQ");
    let lines: Vec<String> = reader.lines().map(|l| l.expect("Failed to read line")).collect();
    lines
        .chunks(4)
        .filter(|chunk| chunk.len() == 4)
        .map(|chunk| Read::new(chunk[0].trim_start_matches('@'), chunk[1].as_str(), chunk[3].as_str()))
        .collect()
}
