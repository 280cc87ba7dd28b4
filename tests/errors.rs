use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

fn cargo_bin() -> Command { Command::cargo_bin("bf").unwrap() }

#[test]
fn test_unclosed_loop_error() {
    cargo_bin()
    .timeout(Duration::from_secs(2)).arg("read").arg("[")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Parse error: unclosed loop").and(predicate::str::contains("at instruction 0")));
}

#[test]
fn test_mismatched_brace_error_at_position_zero() {
    cargo_bin()
    .timeout(Duration::from_secs(2)).arg("read").arg("]")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Parse error: mismatched brace").and(predicate::str::contains("at instruction 0")));
}

#[test]
fn test_validation_happens_before_execution() {
    // The '.' would print byte 1 if anything ran before the stray ']'.
    cargo_bin()
    .timeout(Duration::from_secs(2)).arg("read").arg("+.]")
    .assert()
    .code(1)
    .stdout(predicate::str::contains("\u{1}").not());
}

#[test]
fn test_position_ignores_comments() {
    cargo_bin()
    .timeout(Duration::from_secs(2)).arg("read").arg("one + two ]")
    .assert()
    .failure()
    .stderr(predicate::str::contains("at instruction 1").and(predicate::str::contains("          ^")));
}

#[test]
fn test_cell_overflow_does_not_wrap() {
    cargo_bin()
    .timeout(Duration::from_secs(2)).arg("read").arg("+".repeat(256))
    .assert()
    .code(1)
    .stderr(predicate::str::contains("cell overflow").and(predicate::str::contains("at instruction 255")));
}

#[test]
fn test_cell_underflow_does_not_wrap() {
    cargo_bin()
    .timeout(Duration::from_secs(2)).arg("read").arg("-")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("cell underflow"));
}

#[test]
fn test_pointer_underflow() {
    cargo_bin()
    .timeout(Duration::from_secs(2)).arg("read").arg("<")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("pointer underflow"));
}

#[test]
fn test_pointer_overflow_respects_tape_size() {
    cargo_bin()
    .timeout(Duration::from_secs(2)).args(["read", "--tape-size", "3", ">>>"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("pointer overflow (ptr=2").and(predicate::str::contains("at instruction 2")));
}

#[test]
fn test_zero_tape_size_is_usage_error() {
    cargo_bin()
    .timeout(Duration::from_secs(2)).args(["read", "--tape-size", "0", "+"])
    .assert()
    .code(2)
    .stderr(predicate::str::contains("--tape-size"));
}

#[test]
fn test_missing_file_error() {
    cargo_bin()
    .timeout(Duration::from_secs(2)).args(["read", "--file", "definitely/not/here.bf"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("failed to read code file"));
}
