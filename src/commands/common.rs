//! Common CLI options shared across commands.
//!
//! This module provides shared argument structures that can be composed into
//! command structs using `#[command(flatten)]`, and the run helper every preset shares.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use clap::{Args, ValueEnum};
use log::{info, warn};

use pairqc_lib::io::{ReadDeInterleaver, ReadOutputStream, ReadWriter, sample_qualities};
use pairqc_lib::logging::{OperationTimer, log_report_summary};
use pairqc_lib::pipeline::{DEFAULT_MIN_SURVIVAL_LENGTH, OutputPolicy, PipelineOptions, run};
use pairqc_lib::processor::Processor;
use pairqc_lib::progress::DEFAULT_PROGRESS_INTERVAL;
use pairqc_lib::quality::{DETECTION_SAMPLE_SIZE, ILLUMINA, QualityEncoding, SANGER};
use pairqc_lib::report::Report;
use pairqc_lib::report::writer::{write_report_json, write_report_metrics};
use pairqc_lib::stream::ProcessedReadStream;
use pairqc_lib::validation::validate_files_exist;

use crate::version::VERSION;

/// Paired FASTQ input: one interleaved file or an R1 and an R2 file.
#[derive(Debug, Clone, Args)]
pub struct InputOptions {
    /// Input FASTQ: one interleaved file, or the R1 and R2 files (plain or gzipped)
    #[arg(short = 'i', long = "input", num_args = 1..=2, required = true)]
    pub input: Vec<PathBuf>,
}

impl InputOptions {
    /// Validates the number of inputs and that each exists.
    ///
    /// # Errors
    ///
    /// Returns an error if more than two inputs are given or an input does not exist.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=2).contains(&self.input.len()),
            "--input takes one interleaved FASTQ or two mate FASTQs, got {}",
            self.input.len()
        );
        let described: Vec<_> =
            self.input.iter().zip(["Input R1 FASTQ", "Input R2 FASTQ"]).collect();
        validate_files_exist(&described)?;
        Ok(())
    }

    /// Opens the inputs as a processed read stream with no processors attached.
    ///
    /// # Errors
    ///
    /// Returns an error if any input cannot be opened.
    pub fn open(&self) -> Result<ProcessedReadStream> {
        let stream = match self.input.as_slice() {
            [interleaved] => ProcessedReadStream::open(interleaved)?,
            [r1, r2] => ProcessedReadStream::open_paired(r1, r2)?,
            _ => bail!("--input takes one or two paths"),
        };
        Ok(stream)
    }

    /// The file quality samples are drawn from.
    #[must_use]
    pub fn first(&self) -> &Path {
        &self.input[0]
    }

    /// Input paths joined for logs and the report.
    #[must_use]
    pub fn describe(&self) -> String {
        self.input.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
    }
}

/// Output FASTQs, reports, and the policy deciding which mates are written.
#[derive(Debug, Clone, Args)]
pub struct OutputOptions {
    /// Output FASTQ: none for standard output, one for interleaved output, or R1 and R2 files
    #[arg(short = 'o', long = "output", num_args = 1..=2)]
    pub output: Vec<PathBuf>,

    /// Write the run report as JSON to this file
    #[arg(short = 'y', long = "report")]
    pub report: Option<PathBuf>,

    /// Write the run report as a flat TSV to this file
    #[arg(long = "metrics")]
    pub metrics: Option<PathBuf>,

    /// Write each surviving mate on its own when it is at least --min-survival-length long
    #[arg(short = 'b', long = "broken-paired", default_value_t = false, conflicts_with = "strict_pairs")]
    pub broken_paired: bool,

    /// Minimum mate length written in --broken-paired mode
    #[arg(long = "min-survival-length", default_value_t = DEFAULT_MIN_SURVIVAL_LENGTH)]
    pub min_survival_length: usize,

    /// Only write pairs where both mates survived
    #[arg(long = "strict-pairs", default_value_t = false)]
    pub strict_pairs: bool,

    /// Log progress every N read pairs
    #[arg(long = "progress-interval", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_interval: u64,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            output: Vec::new(),
            report: None,
            metrics: None,
            broken_paired: false,
            min_survival_length: DEFAULT_MIN_SURVIVAL_LENGTH,
            strict_pairs: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl OutputOptions {
    /// Validates the output options.
    ///
    /// # Errors
    ///
    /// Returns an error if more than two outputs are given or the progress interval is zero.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.output.len() <= 2, "--output takes at most two paths");
        ensure!(self.progress_interval > 0, "--progress-interval must be at least 1");
        if self.broken_paired && self.output.len() == 2 {
            warn!("--broken-paired with two output files writes complete pairs only");
        }
        Ok(())
    }

    /// Validates the outputs of a preset that merges mates into single reads.
    ///
    /// A merged pair leaves one read, which cannot be written to R1 and R2 files without
    /// putting them out of step.
    ///
    /// # Errors
    ///
    /// Returns an error if two output files are given.
    pub fn validate_for_merging(&self) -> Result<()> {
        ensure!(
            self.output.len() < 2,
            "Merged mates cannot be written to two --output files; give one output path or none \
             for interleaved output"
        );
        Ok(())
    }

    /// The output policy selected by the flags.
    #[must_use]
    pub fn policy(&self) -> OutputPolicy {
        if self.broken_paired {
            OutputPolicy::BrokenPaired { min_length: self.min_survival_length }
        } else if self.strict_pairs {
            OutputPolicy::Strict
        } else {
            OutputPolicy::Paired
        }
    }

    /// Opens the FASTQ sink: standard output, one interleaved file, or two mate files.
    ///
    /// # Errors
    ///
    /// Returns an error if an output file cannot be created.
    pub fn open(&self) -> Result<Box<dyn ReadOutputStream>> {
        let sink: Box<dyn ReadOutputStream> = match self.output.as_slice() {
            [] => Box::new(ReadWriter::create(None)?),
            [interleaved] => Box::new(ReadWriter::create(Some(interleaved))?),
            [r1, r2] => Box::new(ReadDeInterleaver::create(r1, r2)?),
            _ => bail!("--output takes at most two paths"),
        };
        Ok(sink)
    }

    /// Output paths joined for logs, or `stdout`.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.output.is_empty() {
            "stdout".to_string()
        } else {
            self.output.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
        }
    }

    /// Writes the report files that were requested.
    ///
    /// # Errors
    ///
    /// Returns an error if a report file cannot be written.
    pub fn write_reports(&self, report: &Report) -> Result<()> {
        if let Some(path) = &self.report {
            write_report_json(path, report)?;
            info!("Wrote report to {}", path.display());
        }
        if let Some(path) = &self.metrics {
            write_report_metrics(path, report)?;
            info!("Wrote metrics to {}", path.display());
        }
        Ok(())
    }
}

/// Worker thread options.
#[derive(Debug, Clone, Default, Args)]
pub struct ThreadingOptions {
    /// Number of worker threads
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,
}

impl ThreadingOptions {
    /// Creates options with an explicit thread count.
    #[must_use]
    pub fn new(threads: usize) -> Self {
        Self { threads: Some(threads) }
    }

    /// The thread count, or `default` when none was given. Never less than one.
    #[must_use]
    pub fn num_threads(&self, default: usize) -> usize {
        self.threads.unwrap_or(default).max(1)
    }
}

/// The number of threads the machine offers.
#[must_use]
pub fn available_threads() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZero::get)
}

/// Quality encodings accepted on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum QualityEncodingArg {
    /// Detect the encoding from the first records of the input
    #[default]
    Auto,
    /// Phred+33
    #[value(alias = "phred33")]
    Sanger,
    /// Phred+64
    #[value(alias = "phred64")]
    Illumina,
}

/// Quality encoding selection.
#[derive(Debug, Clone, Default, Args)]
pub struct QualityOptions {
    /// Quality encoding of the input
    #[arg(long = "quality-encoding", value_enum, default_value_t = QualityEncodingArg::Auto)]
    pub quality_encoding: QualityEncodingArg,
}

impl QualityOptions {
    /// Returns the named encoding, or detects it from the first records of `sample_from`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be sampled or its qualities are not printable.
    pub fn resolve(&self, sample_from: &Path) -> Result<QualityEncoding> {
        match self.quality_encoding {
            QualityEncodingArg::Sanger => return Ok(SANGER),
            QualityEncodingArg::Illumina => return Ok(ILLUMINA),
            QualityEncodingArg::Auto => {}
        }
        let samples = sample_qualities(sample_from, DETECTION_SAMPLE_SIZE)
            .with_context(|| format!("Failed to sample qualities from {}", sample_from.display()))?;
        if samples.is_empty() {
            info!("Input is empty, assuming {SANGER} qualities");
            return Ok(SANGER);
        }
        let encoding = QualityEncoding::detect(&samples)?;
        info!("Detected {encoding} qualities from {} records", samples.len());
        Ok(encoding)
    }
}

/// Everything a preset needs to run once its processors are built.
pub struct PresetRun<'a> {
    /// The running command's name
    pub command: &'a str,
    /// The full command line
    pub command_line: &'a str,
    /// Input options
    pub input: &'a InputOptions,
    /// Output options
    pub output: &'a OutputOptions,
    /// Number of worker threads
    pub threads: usize,
    /// Quality encoding in use
    pub encoding: QualityEncoding,
}

impl PresetRun<'_> {
    /// Opens the input, attaches `processors`, drives the pipeline and writes the reports.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be opened or the run fails.
    pub fn execute(&self, processors: Vec<Processor>) -> Result<Report> {
        let mut stream = self.input.open()?;
        for processor in processors {
            stream.append_processor(processor);
        }
        let sink = self.output.open()?;

        info!("Input: {}", self.input.describe());
        info!("Output: {}", self.output.describe());
        info!("Quality encoding: {}", self.encoding);
        info!("Threads: {}", self.threads);

        let options = PipelineOptions {
            threads: self.threads,
            policy: self.output.policy(),
            progress_interval: self.output.progress_interval,
        };
        let timer = OperationTimer::new("Processing read pairs");
        let stats = run(&stream, sink.as_ref(), &options).map_err(|e| {
            let hint = if e.is_pairing_error() { " (are both inputs from the same run?)" } else { "" };
            anyhow::Error::new(e).context(format!("Failed to process {}{hint}", self.input.describe()))
        })?;
        timer.log_completion(stats.pairs_read);

        let mut report = self.metadata();
        let stage_report = stream.report();
        for (key, value) in stage_report.metadata.iter() {
            report.metadata.insert(key, value.clone());
        }
        stats.add_to_report(&mut report);
        report.metadata.insert("output_policy", options.policy.effective(sink.as_ref()).to_string());
        report.stages = stage_report.stages;

        log_report_summary(&report);
        self.output.write_reports(&report)?;
        Ok(report)
    }

    /// The run-level part of the report.
    fn metadata(&self) -> Report {
        let mut report = Report::default();
        report.metadata.insert("program", "pairqc");
        report.metadata.insert("version", VERSION.as_str());
        report.metadata.insert("command", self.command);
        report.metadata.insert("command_line", self.command_line);
        report.metadata.insert("input", self.input.describe());
        report.metadata.insert("output", self.output.describe());
        report.metadata.insert("quality_encoding", self.encoding.name());
        report.metadata.insert("threads", self.threads);
        report
    }
}
