//! Concurrency tests for the pipeline driver.
//!
//! K worker threads over M pairs must process every pair exactly once and leave every
//! processor counter equal to a single-threaded run.

use std::collections::HashSet;

use pairqc_lib::io::{ReadDeInterleaver, ReadWriter};
use pairqc_lib::pipeline::{OutputPolicy, PipelineOptions, PipelineStats, run};
use pairqc_lib::processor::{
    AdaptorTrimPE, GBSTrimPE, PerBaseQuality, ReadLenCounter, ReadLenFilter, WindowedQualTrim,
};
use pairqc_lib::quality::SANGER;
use pairqc_lib::read::{Read, ReadPair};
use pairqc_lib::report::Report;
use pairqc_lib::stream::ProcessedReadStream;
use rstest::rstest;
use tempfile::TempDir;

use crate::helpers::{
    assert_mates_in_sync, assert_well_formed, pseudo_random_sequence, read_fastq,
    read_through_pair, revcomp, sorted_by_name, template_name, write_paired,
};

const PAIRS: usize = 3000;

/// A mix of read-through, long-insert, low quality and motif-carrying pairs.
fn mixed_pairs() -> Vec<ReadPair> {
    (0..PAIRS)
        .map(|i| {
            let name = format!("t{i:05}");
            match i % 4 {
                0 => {
                    let insert = pseudo_random_sequence(20 + i % 60, i as u64);
                    read_through_pair(&name, &insert, 100, b'I')
                }
                1 => {
                    let insert = pseudo_random_sequence(300, i as u64);
                    let qual: String = (0..100).map(|j| if j > 70 + i % 30 { '#' } else { 'I' }).collect();
                    ReadPair::new(
                        Read::new(format!("{name}/1"), &insert[..100], &qual),
                        Read::new(format!("{name}/2"), revcomp(&insert[200..]), &qual),
                    )
                }
                2 => {
                    let seq = format!("{}CTGCAG{}", pseudo_random_sequence(40, i as u64), "T".repeat(54));
                    ReadPair::new(
                        Read::new(format!("{name}/1"), &seq, "I".repeat(100)),
                        Read::new(format!("{name}/2"), pseudo_random_sequence(100, !(i as u64)), "5".repeat(100)),
                    )
                }
                _ => ReadPair::new(
                    Read::new(format!("{name}/1"), pseudo_random_sequence(100, i as u64), "#".repeat(100)),
                    Read::new(format!("{name}/2"), pseudo_random_sequence(100, i as u64 + 1), "I".repeat(100)),
                ),
            }
        })
        .collect()
}

fn attach_processors(stream: &mut ProcessedReadStream) {
    stream
        .append_processor(ReadLenCounter::new("before qc"))
        .append_processor(PerBaseQuality::new("quality before", SANGER))
        .append_processor(GBSTrimPE::new("gbs", "CTGCAG", 1).unwrap())
        .append_processor(AdaptorTrimPE::new("adaptor", 10))
        .append_processor(WindowedQualTrim::new("QC", SANGER, 20, 30))
        .append_processor(ReadLenFilter::new("length filter", 35))
        .append_processor(ReadLenCounter::new("after qc"));
}

struct RunResult {
    stats: PipelineStats,
    report: Report,
    written: Vec<Read>,
}

fn run_split(dir: &TempDir, threads: usize, policy: OutputPolicy) -> RunResult {
    let (in1, in2) = (dir.path().join("in_r1.fq.gz"), dir.path().join("in_r2.fq.gz"));
    if !in1.exists() {
        write_paired(&in1, &in2, &mixed_pairs());
    }
    let out = dir.path().join(format!("out_{threads}.fq"));

    let mut stream = ProcessedReadStream::open_paired(&in1, &in2).unwrap();
    attach_processors(&mut stream);
    let sink = ReadWriter::create(Some(&out)).unwrap();
    let options = PipelineOptions { threads, policy, progress_interval: 250 };
    let stats = run(&stream, &sink, &options).unwrap();

    RunResult { stats, report: stream.report(), written: read_fastq(&out) }
}

#[rstest]
#[case::paired(OutputPolicy::Paired)]
#[case::strict(OutputPolicy::Strict)]
#[case::broken_paired(OutputPolicy::BrokenPaired { min_length: 64 })]
fn test_threads_match_single_threaded_run(#[case] policy: OutputPolicy) {
    let dir = TempDir::new().unwrap();
    let single = run_split(&dir, 1, policy);
    assert_eq!(single.stats.pairs_read, PAIRS as u64);
    assert_well_formed(&single.written);

    for threads in [2, 4, 8] {
        let multi = run_split(&dir, threads, policy);
        assert_eq!(multi.stats, single.stats, "stats differ with {threads} threads");
        assert_eq!(multi.report, single.report, "report differs with {threads} threads");
        assert_eq!(sorted_by_name(multi.written), sorted_by_name(single.written.clone()));
    }
}

#[test]
fn test_each_pair_processed_exactly_once() {
    let dir = TempDir::new().unwrap();
    let result = run_split(&dir, 8, OutputPolicy::Paired);

    let before = result.report.stage("before qc").unwrap();
    assert_eq!(before.count("reads_seen"), Some(2 * PAIRS as u64));
    assert_eq!(result.report.metadata.count("pairs_parsed"), Some(PAIRS as u64));

    // a record name is never written twice
    let names: HashSet<&[u8]> = result.written.iter().map(|r| r.name.as_slice()).collect();
    assert_eq!(names.len(), result.written.len());
    assert_eq!(result.stats.reads_written, result.written.len() as u64);
}

#[test]
fn test_split_output_stays_in_sync_under_threads() {
    let dir = TempDir::new().unwrap();
    let (in1, in2) = (dir.path().join("in_r1.fq"), dir.path().join("in_r2.fq"));
    let (out1, out2) = (dir.path().join("out_r1.fq"), dir.path().join("out_r2.fq"));
    write_paired(&in1, &in2, &mixed_pairs());

    let mut stream = ProcessedReadStream::open_paired(&in1, &in2).unwrap();
    attach_processors(&mut stream);
    let sink = ReadDeInterleaver::create(&out1, &out2).unwrap();
    let options = PipelineOptions { threads: 6, ..PipelineOptions::default() };
    let stats = run(&stream, &sink, &options).unwrap();

    let r1 = read_fastq(&out1);
    let r2 = read_fastq(&out2);
    assert_mates_in_sync(&r1, &r2);
    assert_eq!(r1.len() as u64, stats.pairs_written);
    assert!(r1.iter().all(|r| template_name(r).starts_with(b"t")));
}
