//! CLI module for the witness test interpreter
//!
//! ## Usage
//!
//! - `witness <file>` - Run one script and print its report
//! - `witness <file> <file>...` - Run each script and print an executive summary
//! - `witness --emit <file>` - Print the rewritten source (debug)
//! - `witness --tree <file>` - Pretty-print the concrete syntax tree (debug)
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::version::WITNESS_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Exit status contract, shown below the option list.
///
/// A script that crashes outside any test counts as an "other exception" and fails the run, even
/// though it adds no failure or exception to the tally.
pub const EXIT_STATUS_HELP: &str = "Exit status: 1 when any test failed or raised, or when a script \
crashed outside a test (reported as an other exception); 0 otherwise.";

/// Run scripts whose bare comparisons are tests and whose print statements are report output
#[derive(Parser, Debug)]
#[command(name = "witness")]
#[command(version = WITNESS_VERSION)]
#[command(about = "A rewriting test interpreter", long_about = None)]
#[command(after_help = EXIT_STATUS_HELP)]
pub struct Cli {
    /// Scripts to test
    #[arg(value_name = "FILE", required_unless_present_any = ["emit_file", "tree_file"])]
    pub files: Vec<PathBuf>,

    /// Print the JSON tally after the report
    #[arg(long)]
    pub json: bool,

    /// Embed passing files' reports in the executive summary too
    #[arg(long = "all")]
    pub embed_passing: bool,

    /// Maximum call depth inside the tested program (default 100; deeper recursion raises
    /// RuntimeError, so raise this for scripts that recurse further)
    #[arg(long = "max-depth", value_name = "N")]
    pub max_call_depth: Option<usize>,

    // Debug/development flags
    /// Print the rewritten source (debug)
    #[arg(long = "emit", value_name = "FILE", conflicts_with_all = ["files", "tree_file"])]
    pub emit_file: Option<PathBuf>,

    /// Pretty-print the concrete syntax tree (debug)
    #[arg(long = "tree", value_name = "FILE", conflicts_with = "files")]
    pub tree_file: Option<PathBuf>,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    if let Some(file) = cli.emit_file {
        return commands::emit_file(&file.to_string_lossy());
    }
    if let Some(file) = cli.tree_file {
        return commands::tree_file(&file.to_string_lossy());
    }

    let options = commands::RunOptions {
        json: cli.json,
        embed_passing: cli.embed_passing,
        max_call_depth: cli.max_call_depth,
    };
    match cli.files.as_slice() {
        [] => Err(CliError::failure("")),
        [file] => commands::test_one(&file.to_string_lossy(), &options),
        files => {
            let paths: Vec<String> = files.iter().map(|f| f.to_string_lossy().to_string()).collect();
            commands::test_all(&paths, &options)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_single_file() {
        let cli = Cli::try_parse_from(["witness", "t.py"]).unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("t.py")]);
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_parse_many_files_with_flags() {
        let cli = Cli::try_parse_from(["witness", "--json", "--all", "a.py", "b.py"]).unwrap();
        assert_eq!(cli.files.len(), 2);
        assert!(cli.json);
        assert!(cli.embed_passing);
    }

    #[test]
    fn test_cli_parse_debug_flags() {
        let cli = Cli::try_parse_from(["witness", "--emit", "t.py"]).unwrap();
        assert!(cli.emit_file.is_some());

        let cli = Cli::try_parse_from(["witness", "--tree", "t.py"]).unwrap();
        assert!(cli.tree_file.is_some());
    }

    #[test]
    fn test_cli_requires_a_file() {
        assert!(Cli::try_parse_from(["witness"]).is_err());
        assert!(Cli::try_parse_from(["witness", "--emit", "a.py", "b.py"]).is_err());
    }

    #[test]
    fn test_cli_help_documents_exit_status_and_depth_default() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("Exit status:"), "{help}");
        assert!(help.contains("crashed"), "{help}");
        assert!(help.contains("--max-depth"));
        assert!(help.contains("default 100"), "{help}");
    }

    #[test]
    fn test_cli_max_depth() {
        let cli = Cli::try_parse_from(["witness", "--max-depth", "50", "t.py"]).unwrap();
        assert_eq!(cli.max_call_depth, Some(50));
    }
}
