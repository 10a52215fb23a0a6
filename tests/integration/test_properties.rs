//! Property-based tests for the trimming kernels.

use pairqc_lib::io::{ReadDeInterleaver, ReadInputStream, ReadInterleaver, ReadOutputStream};
use pairqc_lib::processor::adaptor::find_overlap;
use pairqc_lib::processor::{AdaptorTrimPE, GBSTrimPE, ReadProcessor, WindowedQualTrim};
use pairqc_lib::quality::SANGER;
use pairqc_lib::read::{Read, ReadPair};
use proptest::prelude::*;
use tempfile::TempDir;

use crate::helpers::revcomp;

fn dna(len: impl Into<proptest::sample::SizeRange>) -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(vec!['A', 'C', 'G', 'T']), len)
        .prop_map(|bases| bases.into_iter().collect())
}

fn quals(len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(33u8..=74, len).prop_map(|q| String::from_utf8(q).unwrap())
}

/// A read with matching sequence and quality lengths.
fn read() -> impl Strategy<Value = Read> {
    read_of(0..150)
}

fn read_of(lengths: std::ops::Range<usize>) -> impl Strategy<Value = Read> {
    lengths
        .prop_flat_map(|len| (dna(len), quals(len)))
        .prop_map(|(seq, qual)| Read::new("r", seq, qual))
}

proptest! {
    // The quality trimmer only ever keeps a prefix, and a stricter threshold never keeps more.
    #[test]
    fn proptest_quality_trim_is_monotone(
        original in read(),
        low in 0u8..40,
        bump in 0u8..10,
        window in 1usize..8,
    ) {
        let lenient = WindowedQualTrim::new("lenient", SANGER, low, 0).with_window_size(window);
        let strict = WindowedQualTrim::new("strict", SANGER, low + bump, 0).with_window_size(window);

        let mut a = original.clone();
        lenient.process_read(&mut a);
        let mut b = original.clone();
        strict.process_read(&mut b);

        prop_assert!(a.size() <= original.size());
        prop_assert!(b.size() <= a.size());
        prop_assert_eq!(&original.sequence[..a.size()], a.sequence.as_slice());
        prop_assert_eq!(&original.quality[..a.size()], a.quality.as_slice());
        prop_assert_eq!(a.sequence.len(), a.quality.len());
    }

    // Every full window in the kept prefix passes, and the first removed base fails.
    #[test]
    fn proptest_quality_trim_keeps_passing_windows(
        quals in proptest::collection::vec(33u8..=74, 0..150),
        min_quality in 0u8..42,
        window in 1usize..10,
    ) {
        let trimmer = WindowedQualTrim::new("QC", SANGER, min_quality, 0).with_window_size(window);
        let keep = trimmer.trim_point(&quals);
        prop_assert!(keep <= quals.len());

        let scores = SANGER.scores(&quals);
        let width = window.min(scores.len());
        if width > 0 && keep >= width {
            for kept in scores[..keep].windows(width) {
                let sum: u32 = kept.iter().map(|&s| u32::from(s)).sum();
                prop_assert!(sum >= u32::from(min_quality) * width as u32, "window {kept:?} kept");
            }
        }
        if keep < scores.len() {
            prop_assert!(scores[keep] < min_quality);
        }
    }

    // Reads that trim below the minimum length are dropped, never kept short.
    #[test]
    fn proptest_quality_trim_drop_threshold(original in read(), min_length in 0usize..100) {
        let trimmer = WindowedQualTrim::new("QC", SANGER, 20, min_length);
        let mut trimmed = original.clone();
        trimmer.process_read(&mut trimmed);
        prop_assert!(trimmed.is_dropped() || trimmed.size() >= min_length.max(1));
    }

    // Trimming by a motif twice gives the same result as trimming once.
    #[test]
    fn proptest_motif_trim_is_idempotent(original in read(), mismatches in 0usize..2) {
        let trimmer = GBSTrimPE::new("gbs", "CTGCAG", mismatches).unwrap();
        let mut once = original.clone();
        trimmer.process_read(&mut once);
        let mut twice = once.clone();
        trimmer.process_read(&mut twice);

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(&original.sequence[..once.size()], once.sequence.as_slice());
    }

    // Error-free mates of a short insert are trimmed back to exactly the insert.
    #[test]
    fn proptest_read_through_trims_to_insert(
        insert in dna(20usize..60),
        adaptor in dna(60usize..61),
        read_len in 61usize..100,
    ) {
        let r1 = format!("{insert}{adaptor}");
        let r2 = format!("{}{adaptor}", revcomp(&insert));
        let r1 = &r1[..read_len.min(r1.len())];
        let r2 = &r2[..read_len.min(r2.len())];
        let qual = "I".repeat(r1.len());
        let mut pair = ReadPair::new(Read::new("p/1", r1, &qual), Read::new("p/2", r2, &qual));

        // The true placement has `insert.len()` matches; a chance placement with more is
        // possible but then it must have at least as many matches.
        let rc2 = revcomp(r2);
        let overlap = find_overlap(r1.as_bytes(), rc2.as_bytes(), 15, 0.0).unwrap();
        prop_assert!(overlap.matches >= insert.len());

        let trimmer = AdaptorTrimPE::new("adaptor", 15).with_max_mismatch_rate(0.0).with_merge(false);
        trimmer.process_read_pair(&mut pair);
        if overlap.offset == -((rc2.len() - insert.len()) as isize) {
            prop_assert_eq!(pair.first.sequence.as_slice(), insert.as_bytes());
            prop_assert_eq!(pair.second.sequence, revcomp(&insert).into_bytes());
        }
    }

    // Merging never produces a read longer than the two mates combined, and quality
    // symbols stay aligned with bases.
    #[test]
    fn proptest_merge_invariants(r1 in read(), r2 in read()) {
        let total = r1.size() + r2.size();
        let mut pair = ReadPair::new(r1, r2);
        AdaptorTrimPE::new("merge", 5).process_read_pair(&mut pair);

        prop_assert!(pair.first.size() + pair.second.size() <= total);
        prop_assert_eq!(pair.first.sequence.len(), pair.first.quality.len());
        prop_assert_eq!(pair.second.sequence.len(), pair.second.quality.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // Splitting pairs into two files and reading them back in lock-step is the identity.
    #[test]
    fn proptest_deinterleave_interleave_inverse(
        reads in proptest::collection::vec((read_of(1..150), read_of(1..150)), 0..40),
    ) {
        let dir = TempDir::new().unwrap();
        let (r1, r2) = (dir.path().join("r1.fq"), dir.path().join("r2.fq"));
        let expected: Vec<ReadPair> = reads
            .into_iter()
            .enumerate()
            .map(|(i, (mut first, mut second))| {
                first.name = format!("p{i}/1").into_bytes();
                second.name = format!("p{i}/2").into_bytes();
                ReadPair::new(first, second)
            })
            .collect();

        {
            let writer = ReadDeInterleaver::create(&r1, &r2).unwrap();
            for pair in &expected {
                writer.write_read_pair(pair).unwrap();
            }
            writer.flush().unwrap();
        }

        let reader = ReadInterleaver::open(&r1, &r2).unwrap();
        let mut observed = Vec::new();
        let mut pair = ReadPair::default();
        while reader.parse_read_pair(&mut pair).unwrap() {
            observed.push(pair.clone());
        }
        prop_assert_eq!(observed, expected);
    }
}
