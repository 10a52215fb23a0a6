//! General-purpose adaptor and quality trimming.

use anyhow::Result;
use clap::Parser;
use pairqc_lib::processor::adaptor::DEFAULT_MAX_MISMATCH_RATE;
use pairqc_lib::processor::qualtrim::DEFAULT_WINDOW_SIZE;
use pairqc_lib::processor::{AdaptorTrimPE, PerBaseQuality, Processor, WindowedQualTrim};
use pairqc_lib::quality::QualityEncoding;
use pairqc_lib::validation::{validate_fraction, validate_min};

use crate::commands::command::Command;
use crate::commands::common::{
    InputOptions, OutputOptions, PresetRun, QualityOptions, ThreadingOptions,
};

/// Remove adaptor read-through by mate overlap, then quality-trim.
#[derive(Debug, Parser)]
#[command(
    name = "trim",
    about = "\x1b[38;5;72m[TRIMMING]\x1b[0m       \x1b[36mTrim or merge overlapping mates and low quality tails\x1b[0m",
    long_about = r#"
Trim adaptor read-through and low quality tails from read pairs.

Mates are aligned against each other without any adaptor sequence. When the insert is
shorter than the reads, both mates are cut back to the insert. Overlapping mates are merged
into one consensus read unless --no-merge is given. The survivors are then trimmed with a
sliding quality window, and mates shorter than the minimum length are dropped.

Writing R1 and R2 to separate output files requires --no-merge.

Per-position quality distributions after trimming (and before, with --qc-before) are
written to the report.

Example usage:
  pairqc trim -i r1.fq.gz r2.fq.gz -o trimmed.fq.gz -y report.json
  pairqc trim -i r1.fq.gz r2.fq.gz -o out_r1.fq.gz out_r2.fq.gz --no-merge --threads 8
"#
)]
pub struct Trim {
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

    /// Minimum number of overlapping bases to accept a mate alignment
    #[arg(long = "min-overlap", default_value_t = 10)]
    pub min_overlap: usize,

    /// Maximum fraction of mismatching bases in the overlap
    #[arg(long = "max-mismatch-rate", default_value_t = DEFAULT_MAX_MISMATCH_RATE)]
    pub max_mismatch_rate: f64,

    /// Trim read-through but never merge overlapping mates
    #[arg(long = "no-merge", default_value_t = false)]
    pub no_merge: bool,

    /// Minimum mean quality of the trimming window
    #[arg(short = 'q', long = "min-quality", default_value_t = 28)]
    pub min_quality: u8,

    /// Minimum length of a mate after trimming
    #[arg(short = 'l', long = "min-length", default_value_t = 64)]
    pub min_length: usize,

    /// Size of the quality trimming window
    #[arg(short = 'w', long = "window-size", default_value_t = DEFAULT_WINDOW_SIZE)]
    pub window_size: usize,

    /// Record per-position qualities before trimming
    #[arg(long = "qc-before", default_value_t = false)]
    pub qc_before: bool,
}

impl Trim {
    fn processors(&self, encoding: QualityEncoding) -> Vec<Processor> {
        let mut processors = Vec::new();
        if self.qc_before {
            processors.push(PerBaseQuality::new("before qc", encoding).into());
        }
        processors.push(
            AdaptorTrimPE::new("trim or merge reads", self.min_overlap)
                .with_max_mismatch_rate(self.max_mismatch_rate)
                .with_merge(!self.no_merge)
                .into(),
        );
        processors.push(
            WindowedQualTrim::new("QC", encoding, self.min_quality, self.min_length)
                .with_window_size(self.window_size)
                .into(),
        );
        processors.push(PerBaseQuality::new("after qc", encoding).into());
        processors
    }
}

impl Command for Trim {
    fn execute(&self, command_line: &str) -> Result<()> {
        self.input.validate()?;
        self.output.validate()?;
        if !self.no_merge {
            self.output.validate_for_merging()?;
        }
        validate_min(self.min_overlap, 1, "min-overlap")?;
        validate_fraction(self.max_mismatch_rate, "max-mismatch-rate")?;
        validate_min(self.window_size, 1, "window-size")?;

        let encoding = self.quality.resolve(self.input.first())?;
        let run = PresetRun {
            command: "trim",
            command_line,
            input: &self.input,
            output: &self.output,
            threads: self.threading.num_threads(1),
            encoding,
        };
        run.execute(self.processors(encoding))?;
        Ok(())
    }
}
