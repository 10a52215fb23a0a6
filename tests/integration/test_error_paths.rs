//! Error path integration tests.
//!
//! These tests verify that usage errors, missing files and pairing faults stop the run with
//! a non-zero exit status and a readable message.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pairqc_lib::errors::QcError;
use pairqc_lib::read::{Read, ReadPair};
use pairqc_lib::stream::ProcessedReadStream;
use tempfile::TempDir;

use crate::helpers::{INSERT, read_through_pair, write_interleaved, write_paired};

fn pairqc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pairqc"))
        .args(args)
        .output()
        .expect("Failed to run pairqc")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn pairs(names: &[&str]) -> Vec<ReadPair> {
    names
        .iter()
        .map(|name| {
            ReadPair::new(
                Read::new(format!("{name}/1"), "ACGTACGTAC", "IIIIIIIIII"),
                Read::new(format!("{name}/2"), "GTACGTACGT", "IIIIIIIIII"),
            )
        })
        .collect()
}

fn p(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_missing_input() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.fq");
    let output = pairqc(&["trim", "-i", p(&missing)]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("does not exist"));
}

#[test]
fn test_input_is_required() {
    let output = pairqc(&["gbs"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--input"));
}

#[test]
fn test_conflicting_output_policies() {
    let output = pairqc(&["trim", "-i", "in.fq", "--broken-paired", "--strict-pairs"]);
    assert!(!output.status.success());
}

#[test]
fn test_invalid_motif() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.fq");
    write_interleaved(&input, &pairs(&["a"]));
    let output = pairqc(&["gbs", "-i", p(&input), "--motif", "CTGNAG", "-o", p(&dir.path().join("o.fq"))]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("motif"));
}

#[test]
fn test_unknown_quality_encoding() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.fq");
    write_interleaved(&input, &pairs(&["a"]));
    let output = pairqc(&["trim", "-i", p(&input), "--quality-encoding", "solexa"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("solexa"));
}

#[test]
fn test_unequal_mate_files() {
    let dir = TempDir::new().unwrap();
    let (r1, r2) = (dir.path().join("r1.fq"), dir.path().join("r2.fq"));
    let mut all = pairs(&["a", "b", "c"]);
    write_paired(&r1, &r2, &all);
    // drop the last R2 record
    all.pop();
    let r2_text: String = all.iter().map(|pair| pair.second.to_fastq()).collect();
    fs::write(&r2, r2_text).unwrap();

    let output = pairqc(&["trim", "-i", p(&r1), p(&r2), "-o", p(&dir.path().join("out.fq"))]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("out of sync"));
}

#[test]
fn test_mismatched_mate_names() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.fq");
    let mut bad = pairs(&["a", "b"]);
    bad[1].second.name = b"zzz/2".to_vec();
    write_interleaved(&input, &bad);

    let stream = ProcessedReadStream::open(&input).unwrap();
    let mut pair = ReadPair::default();
    assert!(stream.parse_read_pair(&mut pair).unwrap());
    let err = stream.parse_read_pair(&mut pair).unwrap_err();
    assert!(matches!(err, QcError::PairingDesync { .. }));
}

#[test]
fn test_truncated_record() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.fq");
    fs::write(&input, "@a/1\nACGT\n+\nIIII\n@a/2\nACGT\n+\nII").unwrap();

    let stream = ProcessedReadStream::open(&input).unwrap();
    let mut pair = ReadPair::default();
    let err = stream.parse_read_pair(&mut pair).unwrap_err();
    assert!(matches!(err, QcError::MalformedRecord { .. }));
}

#[test]
fn test_unwritable_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.fq");
    write_interleaved(&input, &pairs(&["a"]));
    let output = pairqc(&["trim", "-i", p(&input), "-o", "/nonexistent/dir/out.fq"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("/nonexistent/dir/out.fq"));
}

#[test]
fn test_merge_rejects_split_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.fq");
    let (out1, out2) = (dir.path().join("out_r1.fq"), dir.path().join("out_r2.fq"));
    let through: Vec<ReadPair> =
        (0..10).map(|i| read_through_pair(&format!("p{i}"), INSERT, 60, b'I')).collect();
    write_interleaved(&input, &through);

    let output = pairqc(&["merge", "-i", p(&input), "-o", p(&out1), p(&out2), "-l", "20"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("two --output files"));
    assert!(!out1.exists());
    assert!(!out2.exists());
}

#[test]
fn test_trim_split_output_requires_no_merge() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.fq");
    let (out1, out2) = (dir.path().join("out_r1.fq"), dir.path().join("out_r2.fq"));
    write_interleaved(&input, &pairs(&["a", "b"]));

    let merging = pairqc(&["trim", "-i", p(&input), "-o", p(&out1), p(&out2)]);
    assert!(!merging.status.success());
    assert!(stderr(&merging).contains("two --output files"));

    let split = pairqc(&["trim", "-i", p(&input), "-o", p(&out1), p(&out2), "--no-merge", "-l", "5"]);
    assert!(split.status.success(), "{}", stderr(&split));
    assert!(out1.exists());
    assert!(out2.exists());
}
