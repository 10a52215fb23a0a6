#![deny(unsafe_code)]
// Clippy lint configuration for CI
// - cast_*: quality arithmetic casts between small integer types and floats
// - missing_*_doc: error and panic sections are not written for every function
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::needless_pass_by_value,
    clippy::items_after_statements,
    clippy::unused_self,
    clippy::match_same_arms,
    clippy::unnecessary_wraps,
    clippy::too_many_lines,
    clippy::redundant_closure_for_method_calls,
    clippy::explicit_iter_loop,
    clippy::map_unwrap_or,
    clippy::uninlined_format_args
)]

//! # pairqc - streaming quality control for paired-end reads
//!
//! The library reads paired FASTQ (two files read in lock-step, or one interleaved file),
//! runs every pair through an ordered chain of processors, and writes the survivors.
//!
//! ## Overview
//!
//! ### Data model
//!
//! - **[`read`]** - a FASTQ record and a mate pair
//! - **[`quality`]** - Phred quality encodings and auto-detection
//! - **[`dna`]** - complements and reverse complements
//!
//! ### Processing
//!
//! - **[`processor`]** - the processors: quality trimming, adaptor trimming and mate merging,
//!   GBS motif trimming, length filtering and length/quality accounting
//! - **[`stream`]** - a read source with an attached processor chain
//! - **[`pipeline`]** - the multi-threaded driver and output policies
//!
//! ### I/O and reporting
//!
//! - **[`io`]** - pairing-aware FASTQ sources and sinks, plain or gzipped
//! - **[`report`]** - the structured run report
//! - **[`validation`]**, **[`progress`]**, **[`logging`]** - shared utilities
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use pairqc_lib::io::ReadWriter;
//! use pairqc_lib::pipeline::{run, PipelineOptions};
//! use pairqc_lib::processor::{AdaptorTrimPE, WindowedQualTrim};
//! use pairqc_lib::quality::SANGER;
//! use pairqc_lib::stream::ProcessedReadStream;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut stream = ProcessedReadStream::open_paired(Path::new("r1.fq.gz"), Path::new("r2.fq.gz"))?;
//! stream
//!     .append_processor(WindowedQualTrim::new("Quality trim", SANGER, 20, 30))
//!     .append_processor(AdaptorTrimPE::new("Adaptor trim", 15).with_merge(false));
//!
//! let sink = ReadWriter::create(Some(Path::new("out.fq.gz")))?;
//! let stats = run(&stream, &sink, &PipelineOptions { threads: 4, ..PipelineOptions::default() })?;
//! println!("wrote {} pairs", stats.pairs_written);
//! # Ok(())
//! # }
//! ```

pub mod dna;
pub mod errors;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod processor;
pub mod progress;
pub mod quality;
pub mod read;
pub mod report;
pub mod stream;
pub mod validation;
