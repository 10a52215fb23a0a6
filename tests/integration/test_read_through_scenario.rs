//! End-to-end scenarios: a short insert read through into adaptor or restriction site
//! sequence, followed by a low quality tail on both mates.

use std::io::{BufRead, Cursor};

use pairqc_lib::io::{ReadParser, ReadWriter};
use pairqc_lib::pipeline::{PipelineOptions, run};
use pairqc_lib::processor::{AdaptorTrimPE, GBSTrimPE, ReadLenCounter, WindowedQualTrim};
use pairqc_lib::quality::SANGER;
use pairqc_lib::read::{Read, ReadPair};
use pairqc_lib::stream::ProcessedReadStream;
use tempfile::TempDir;

use crate::helpers::{INSERT, read_fastq, revcomp, write_paired};

/// Eight bases of adaptor read-through.
const READ_THROUGH: &str = "AGATCGGA";

/// Restriction site followed by two bases of the far adaptor.
const CUT_SITE: &str = "CTGCAGAT";

/// One pair: the insert, then `tail`, then four bases at Q2 on both mates.
fn scenario_pair(tail: &str) -> ReadPair {
    let quals = format!("{}####", "I".repeat(INSERT.len() + tail.len()));
    ReadPair::new(
        Read::new("frag/1", format!("{INSERT}{tail}TTTT"), &quals),
        Read::new("frag/2", format!("{}{tail}CCCC", revcomp(INSERT)), &quals),
    )
}

fn stream_of(pair: &ReadPair) -> ProcessedReadStream {
    let text = format!("{}{}", pair.first.to_fastq(), pair.second.to_fastq());
    let reader: Box<dyn BufRead + Send> = Box::new(Cursor::new(text.into_bytes()));
    ProcessedReadStream::new(Box::new(ReadParser::new(reader)))
}

#[test]
fn test_adaptor_read_through_and_quality_tail() {
    let mut stream = stream_of(&scenario_pair(READ_THROUGH));
    stream
        .append_processor(WindowedQualTrim::new("QC", SANGER, 28, 10))
        .append_processor(AdaptorTrimPE::new("adaptor", 10).with_merge(false))
        .append_processor(ReadLenCounter::new("after"));

    let mut pair = ReadPair::default();
    assert!(stream.parse_read_pair(&mut pair).unwrap());
    assert_eq!(pair.first.sequence, INSERT.as_bytes());
    assert_eq!(pair.second.sequence, revcomp(INSERT).as_bytes());
    assert!(!stream.parse_read_pair(&mut pair).unwrap());

    let report = stream.report();
    let qc = report.stage("QC").unwrap();
    assert_eq!(qc.count("reads_trimmed"), Some(2));
    assert_eq!(qc.count("reads_dropped"), Some(0));
    let adaptor = report.stage("adaptor").unwrap();
    assert_eq!(adaptor.count("pairs_trimmed"), Some(1));
    assert_eq!(adaptor.count("pairs_untouched"), Some(0));
    assert_eq!(report.stage("after").unwrap().count("reads_seen"), Some(2));
}

#[test]
fn test_overlapping_mates_merge_to_insert() {
    let mut stream = stream_of(&scenario_pair(READ_THROUGH));
    stream
        .append_processor(WindowedQualTrim::new("QC", SANGER, 28, 10))
        .append_processor(AdaptorTrimPE::new("adaptor", 10));

    let mut pair = ReadPair::default();
    assert!(stream.parse_read_pair(&mut pair).unwrap());
    assert_eq!(pair.first.sequence, INSERT.as_bytes());
    assert_eq!(pair.first.quality, "I".repeat(INSERT.len()).as_bytes());
    assert!(pair.second.is_dropped());
    assert_eq!(stream.report().stage("adaptor").unwrap().count("pairs_merged"), Some(1));
}

#[test]
fn test_restriction_site_read_through_and_quality_tail() {
    let mut stream = stream_of(&scenario_pair(CUT_SITE));
    stream
        .append_processor(WindowedQualTrim::new("QC", SANGER, 28, 10))
        .append_processor(GBSTrimPE::new("gbs", "CTGCAG", 1).unwrap());

    let mut pair = ReadPair::default();
    assert!(stream.parse_read_pair(&mut pair).unwrap());
    assert_eq!(pair.first.size(), INSERT.len());
    assert_eq!(pair.second.size(), INSERT.len());

    let report = stream.report();
    assert_eq!(report.stage("QC").unwrap().count("reads_trimmed"), Some(2));
    let gbs = report.stage("gbs").unwrap();
    assert_eq!(gbs.count("reads_trimmed"), Some(2));
    assert_eq!(gbs.count("pairs_trimmed"), Some(1));
}

#[test]
fn test_scenario_through_files() {
    let dir = TempDir::new().unwrap();
    let (in1, in2) = (dir.path().join("in_r1.fq.gz"), dir.path().join("in_r2.fq.gz"));
    let out = dir.path().join("out.fq");
    write_paired(&in1, &in2, &[scenario_pair(READ_THROUGH)]);

    let mut stream = ProcessedReadStream::open_paired(&in1, &in2).unwrap();
    stream
        .append_processor(WindowedQualTrim::new("QC", SANGER, 28, 10))
        .append_processor(AdaptorTrimPE::new("adaptor", 10).with_merge(false));
    let sink = ReadWriter::create(Some(&out)).unwrap();
    let stats = run(&stream, &sink, &PipelineOptions::default()).unwrap();
    assert_eq!(stats.pairs_written, 1);

    let written = read_fastq(&out);
    assert_eq!(written.len(), 2);
    assert!(written.iter().all(|r| r.size() == INSERT.len()));
    assert_eq!(written[0].name, b"frag/1");
    assert_eq!(written[1].name, b"frag/2");
}
