//! CLI command implementations for pairqc.
//!
//! Each subcommand assembles a preset processor chain and hands it to the shared driver in
//! [`common`].
//!
//! # Commands
//! - [`gbs`] - Trim GBS restriction-site read-through, then quality-trim
//! - [`trim`] - Trim or merge overlapping mates, then quality-trim
//! - [`merge`] - Merge overlapping mates and filter short reads

#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::struct_excessive_bools,
    clippy::uninlined_format_args
)]

pub mod command;
pub mod common;
pub mod gbs;
pub mod merge;
pub mod trim;
