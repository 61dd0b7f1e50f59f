//! Driver tests: exit codes of the file-level commands.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use witness::cli::commands::{self, RunOptions};
use witness::cli::{Cli, ExitCode};

fn script(name: &str, source: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("witness_cli_tests_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn passing_script_exits_zero() {
    let path = script("pass.py", "x = 2\nx * 2 == 4\n");
    let code = commands::test_one(&path.to_string_lossy(), &RunOptions::default()).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
}

#[test]
fn failing_script_exits_one() {
    let path = script("fail.py", "1 == 2\n");
    let code = commands::test_one(&path.to_string_lossy(), &RunOptions::default()).unwrap();
    assert_eq!(code, ExitCode::FAILURE);
}

#[test]
fn syntax_error_is_reported_with_the_file_name() {
    let path = script("broken.py", "x = = 1\n");
    let err = commands::test_one(&path.to_string_lossy(), &RunOptions::default()).unwrap_err();
    assert!(err.message.contains("broken.py"), "{}", err.message);
    assert_eq!(err.exit_code, ExitCode::FAILURE);
}

#[test]
fn several_scripts_keep_going_past_a_broken_one() {
    let good = script("many_good.py", "1 == 1\n");
    let broken = script("many_broken.py", "def (:\n");
    let paths = vec![good.to_string_lossy().to_string(), broken.to_string_lossy().to_string()];
    let code = commands::test_all(&paths, &RunOptions::default()).unwrap();
    assert_eq!(code, ExitCode::FAILURE);
}

#[test]
fn emit_and_tree_accept_a_script() {
    let path = script("debug.py", "print 1\n");
    assert_eq!(commands::emit_file(&path.to_string_lossy()).unwrap(), ExitCode::SUCCESS);
    assert_eq!(commands::tree_file(&path.to_string_lossy()).unwrap(), ExitCode::SUCCESS);
}

#[test]
fn json_flag_parses_alongside_files() {
    let cli = Cli::try_parse_from(["witness", "--json", "a.py"]).unwrap();
    assert!(cli.json);
    assert_eq!(cli.files, vec![PathBuf::from("a.py")]);
}
