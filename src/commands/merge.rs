//! Merge overlapping mates into single reads.

use anyhow::Result;
use clap::Parser;
use pairqc_lib::processor::adaptor::DEFAULT_MAX_MISMATCH_RATE;
use pairqc_lib::processor::{AdaptorTrimPE, Processor, ReadLenCounter, ReadLenFilter};
use pairqc_lib::validation::{validate_fraction, validate_min};

use crate::commands::command::Command;
use crate::commands::common::{
    InputOptions, OutputOptions, PresetRun, QualityOptions, ThreadingOptions, available_threads,
};

/// Merge overlapping mates and filter short reads, tracking read lengths along the way.
#[derive(Debug, Parser)]
#[command(
    name = "merge",
    about = "\x1b[38;5;72m[TRIMMING]\x1b[0m       \x1b[36mMerge overlapping mates into single reads\x1b[0m",
    long_about = r#"
Merge overlapping read pairs.

Mates that overlap by at least --min-overlap bases are merged into one consensus read
written in place of the pair; non-overlapping pairs pass through unchanged. Reads shorter
than --min-length are then dropped. Read length distributions before merging, after
merging and after filtering are written to the report.

Merged reads are written interleaved with any unmerged pairs, so at most one --output
path is accepted. Uses every available core unless --threads is given.

Example usage:
  pairqc merge -i r1.fq.gz r2.fq.gz -o merged.fq.gz -y report.json
"#
)]
pub struct Merge {
    /// Input options
    #[command(flatten)]
    pub input: InputOptions,

    /// Output options
    #[command(flatten)]
    pub output: OutputOptions,

    /// Threading options
    #[command(flatten)]
    pub threading: ThreadingOptions,

    /// Quality encoding options
    #[command(flatten)]
    pub quality: QualityOptions,

    /// Minimum number of overlapping bases to merge a pair
    #[arg(long = "min-overlap", default_value_t = 5)]
    pub min_overlap: usize,

    /// Maximum fraction of mismatching bases in the overlap
    #[arg(long = "max-mismatch-rate", default_value_t = DEFAULT_MAX_MISMATCH_RATE)]
    pub max_mismatch_rate: f64,

    /// Minimum length of a read after merging
    #[arg(short = 'l', long = "min-length", default_value_t = 50)]
    pub min_length: usize,
}

impl Merge {
    fn processors(&self) -> Vec<Processor> {
        vec![
            ReadLenCounter::new("before qc").into(),
            AdaptorTrimPE::new("trim/merge reads", self.min_overlap)
                .with_max_mismatch_rate(self.max_mismatch_rate)
                .into(),
            ReadLenCounter::new("after adaptor removal").into(),
            ReadLenFilter::new("length filter", self.min_length).into(),
            ReadLenCounter::new("after qc").into(),
        ]
    }
}

impl Command for Merge {
    fn execute(&self, command_line: &str) -> Result<()> {
        self.input.validate()?;
        self.output.validate()?;
        self.output.validate_for_merging()?;
        validate_min(self.min_overlap, 1, "min-overlap")?;
        validate_fraction(self.max_mismatch_rate, "max-mismatch-rate")?;

        // Merging never looks at quality thresholds, the encoding is only reported.
        let encoding = self.quality.resolve(self.input.first())?;
        let run = PresetRun {
            command: "merge",
            command_line,
            input: &self.input,
            output: &self.output,
            threads: self.threading.num_threads(available_threads()),
            encoding,
        };
        run.execute(self.processors())?;
        Ok(())
    }
}
