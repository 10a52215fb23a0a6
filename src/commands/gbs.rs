//! Trim genotyping-by-sequencing reads.
//!
//! GBS libraries are cut with a restriction enzyme; when the insert is shorter than the read
//! the read runs into the cut site ligated to the far adaptor. This preset truncates each
//! mate at the first copy of the site's motif and then quality-trims what is left.

use anyhow::Result;
use clap::Parser;
use log::info;
use pairqc_lib::processor::qualtrim::DEFAULT_WINDOW_SIZE;
use pairqc_lib::processor::{GBSTrimPE, PerBaseQuality, Processor, WindowedQualTrim};
use pairqc_lib::quality::QualityEncoding;
use pairqc_lib::validation::validate_min;

use crate::commands::command::Command;
use crate::commands::common::{
    InputOptions, OutputOptions, PresetRun, QualityOptions, ThreadingOptions,
};

/// Recognition site of PstI.
pub const PSTI_MOTIF: &str = "CTGCAG";

/// Trim GBS read-through at the restriction site, then quality-trim.
#[derive(Debug, Parser)]
#[command(
    name = "gbs",
    about = "\x1b[38;5;72m[TRIMMING]\x1b[0m       \x1b[36mTrim GBS read-through and low quality tails\x1b[0m",
    long_about = r#"
Trim genotyping-by-sequencing read pairs.

Each mate is truncated just before the first occurrence of the restriction site motif
(PstI, CTGCAG, by default), allowing a small number of mismatches. The remainder is then
trimmed with a sliding quality window; mates shorter than the minimum length are dropped.

Example usage:
  pairqc gbs -i r1.fq.gz r2.fq.gz -o out_r1.fq.gz out_r2.fq.gz -y report.json
  pairqc gbs -i interleaved.fq.gz --motif TGCA --max-mismatches 0 > trimmed.fq
"#
)]
pub struct Gbs {
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

    /// Restriction site motif to trim at
    #[arg(long = "motif", default_value = PSTI_MOTIF)]
    pub motif: String,

    /// Maximum mismatches allowed when matching the motif
    #[arg(long = "max-mismatches", default_value_t = 1)]
    pub max_mismatches: usize,

    /// Minimum mean quality of the trimming window
    #[arg(short = 'q', long = "min-quality", default_value_t = 28)]
    pub min_quality: u8,

    /// Minimum length of a mate after trimming
    #[arg(short = 'l', long = "min-length", default_value_t = 50)]
    pub min_length: usize,

    /// Size of the quality trimming window
    #[arg(short = 'w', long = "window-size", default_value_t = DEFAULT_WINDOW_SIZE)]
    pub window_size: usize,

    /// Record per-position qualities before trimming
    #[arg(long = "qc-before", default_value_t = false)]
    pub qc_before: bool,
}

impl Gbs {
    /// Builds the processor chain.
    fn processors(&self, encoding: QualityEncoding) -> Result<Vec<Processor>> {
        let mut processors = Vec::new();
        if self.qc_before {
            processors.push(PerBaseQuality::new("before qc", encoding).into());
        }
        processors.push(
            GBSTrimPE::new("trim PstI read-through", &self.motif, self.max_mismatches)?.into(),
        );
        processors.push(
            WindowedQualTrim::new("QC", encoding, self.min_quality, self.min_length)
                .with_window_size(self.window_size)
                .into(),
        );
        Ok(processors)
    }
}

impl Command for Gbs {
    fn execute(&self, command_line: &str) -> Result<()> {
        self.input.validate()?;
        self.output.validate()?;
        validate_min(self.window_size, 1, "window-size")?;

        let encoding = self.quality.resolve(self.input.first())?;
        let processors = self.processors(encoding)?;
        info!("Motif: {} (up to {} mismatches)", self.motif, self.max_mismatches);
        let run = PresetRun {
            command: "gbs",
            command_line,
            input: &self.input,
            output: &self.output,
            threads: self.threading.num_threads(1),
            encoding,
        };
        run.execute(processors)?;
        Ok(())
    }
}
