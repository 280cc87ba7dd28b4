use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn cargo_bin() -> Command { Command::cargo_bin("bf").unwrap() }

fn small_valid_bf() -> &'static str { "+++." }

fn read_to_tempfile(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn test_read_positional_code_success() {
    cargo_bin()
        .arg("read").arg(small_valid_bf())
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not())
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_read_positional_parts_are_concatenated() {
    // 8 * 8 = 64 is '@'
    cargo_bin()
        .arg("read").arg("++++++++[>++++++++").arg("<-]>.")
        .assert()
        .success()
        .stdout("@\n");
}

#[test]
fn test_read_file_success() {
    let tf = read_to_tempfile(small_valid_bf());
    cargo_bin()
        .arg("read").arg("--file").arg(tf.path())
        .assert()
        .success()
        .stdout("\u{3}\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_read_lone_bf_path_is_loaded_as_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("hello.bf");
    std::fs::write(&path, "Print an at sign:\n++++++++[>++++++++<-]>.\n").unwrap();
    cargo_bin()
        .arg("read").arg(&path)
        .assert()
        .success()
        .stdout("@\n");
}

#[test]
fn test_read_file_and_code_conflict() {
    let tf = read_to_tempfile(small_valid_bf());
    cargo_bin()
        .arg("read").arg("--file").arg(tf.path()).arg("+")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot use positional code together with --file"));
}

#[test]
fn test_read_without_code_is_usage_error() {
    cargo_bin()
        .arg("read")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_read_help_exits_zero() {
    cargo_bin()
        .arg("read").arg("--help")
        .assert()
        .code(0)
        .stderr(predicate::str::contains("--tape-size"));
}

#[test]
fn test_no_subcommand_is_usage_error() {
    cargo_bin()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_read_debug_prints_table() {
    cargo_bin()
        .arg("read").arg("--debug").arg("+.+")
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not())
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_same_program_same_output_across_runs() {
    let program = "++++++++[>++++++++<-]>+.,.";
    let first = cargo_bin().arg("read").arg(program).write_stdin("z").assert().success();
    let second = cargo_bin().arg("read").arg(program).write_stdin("z").assert().success();
    let out1 = first.get_output().stdout.clone();
    let out2 = second.get_output().stdout.clone();
    assert_eq!(out1, b"Az\n");
    assert_eq!(out1, out2);
}
