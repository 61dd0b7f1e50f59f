//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;

use witness_syntax::codec;

use crate::interpolator::{InterpolateError, Interpolator};
use crate::observer::{ExecutiveSummary, FileReport, ObserverConfig, Tally, render, test_source};
use crate::runtime::SandboxConfig;

use super::{CliError, CliResult, ExitCode};

/// Maximum source file size (10 MB). Scripts are interpreted in memory, twice on a crash.
const MAX_SOURCE_SIZE: u64 = 10 * 1024 * 1024;

/// Options shared by single- and multi-file runs.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub json: bool,
    pub embed_passing: bool,
    pub max_call_depth: Option<usize>,
}

impl RunOptions {
    fn observer_config(&self, file_path: &str) -> ObserverConfig {
        let mut sandbox = SandboxConfig::default();
        if let Some(depth) = self.max_call_depth {
            sandbox = sandbox.with_max_call_depth(depth);
        }
        ObserverConfig::default()
            .with_filename(file_path)
            .with_embed_passing(self.embed_passing)
            .with_sandbox(sandbox)
    }
}

/// Read source file contents.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE`
pub fn read_source(file_path: &str) -> CliResult<String> {
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path, e)))
}

/// Render an interpolation failure with source context where there is some.
fn describe(file_path: &str, err: InterpolateError) -> String {
    match err {
        InterpolateError::Syntax(syntax) => format!("{:?}", miette::Report::new(syntax.with_name(file_path))),
        other => format!("{:?}", miette::Report::new(other)),
    }
}

fn exit_code_for(tally: &Tally) -> ExitCode {
    if tally.has_problems() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_json(tally: &Tally) -> CliResult<()> {
    let json =
        serde_json::to_string_pretty(tally).map_err(|e| CliError::failure(format!("Error encoding tally: {}", e)))?;
    println!("{json}");
    Ok(())
}

fn run_file(file_path: &str, options: &RunOptions) -> CliResult<FileReport> {
    let source = read_source(file_path)?;
    test_source(&source, options.observer_config(file_path))
        .map_err(|err| CliError::failure(describe(file_path, err)))
}

/// Test one script and print its report.
pub fn test_one(file_path: &str, options: &RunOptions) -> CliResult<ExitCode> {
    let file = run_file(file_path, options)?;
    print!("{}", file.report);
    if options.json {
        print_json(&file.tally)?;
    }
    Ok(exit_code_for(&file.tally))
}

/// Test every script and print one executive summary.
///
/// A script that cannot be read or parsed counts as one other error; the rest still run.
pub fn test_all(file_paths: &[String], options: &RunOptions) -> CliResult<ExitCode> {
    let mut executive = ExecutiveSummary::new();
    for file_path in file_paths {
        let file = run_file(file_path, options).unwrap_or_else(|err| {
            tracing::warn!(file = %file_path, "script could not be tested");
            let tally = Tally {
                other_exceptions: 1,
                ..Tally::default()
            };
            FileReport {
                filename: file_path.clone(),
                report: render(file_path, &tally, 0.0, &format!("{}\n", err.message)),
                tally,
                elapsed_secs: 0.0,
                embed: true,
            }
        });
        executive.add(&file);
    }
    print!("{}", executive.render());
    if options.json {
        print_json(&executive.tally())?;
    }
    Ok(exit_code_for(&executive.tally()))
}

/// Print the rewritten source of a script.
pub fn emit_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let rewritten = Interpolator::default()
        .interpolate(&source)
        .map_err(|err| CliError::failure(describe(file_path, err)))?;
    println!("{rewritten}");
    Ok(ExitCode::SUCCESS)
}

/// Pretty-print the concrete syntax tree of a script.
pub fn tree_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let tree = codec::parse(&source, true)
        .map_err(|err| CliError::failure(describe(file_path, InterpolateError::Syntax(err))))?;
    print!("{}", codec::pretty_print(&tree));
    Ok(ExitCode::SUCCESS)
}
