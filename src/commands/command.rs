//! Command trait definition for CLI commands.
//!
//! Every subcommand implements [`Command`]; `enum_dispatch` routes the parsed subcommand to
//! its implementation without boxing.

use anyhow::Result;
use enum_dispatch::enum_dispatch;

/// Trait implemented by all pairqc CLI commands.
///
/// The `command_line` parameter holds the full invocation, recorded in the run report.
#[enum_dispatch]
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self, command_line: &str) -> Result<()>;
}
