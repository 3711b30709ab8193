mod common;

use common::{cargo_bin, program_file, program_file_with_suffix};
use predicates::prelude::*;

#[test]
fn unbalanced_brackets_fail_before_running() {
    let tf = program_file("+.[[");
    cargo_bin()
        .arg(tf.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Parse error: unmatched bracket '['"));
}

#[test]
fn stray_close_bracket_points_at_position() {
    let tf = program_file("++]");
    cargo_bin()
        .arg(tf.path())
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("unmatched bracket ']'")
                .and(predicate::str::contains("at instruction 2"))
                .and(predicate::str::contains("  ^")),
        );
}

#[test]
fn wrong_extension_is_rejected() {
    let tf = program_file_with_suffix("+.", ".bf");
    cargo_bin()
        .arg(tf.path())
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("improper filename"));
}

#[test]
fn unreadable_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin()
        .arg(dir.path().join("missing.b"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not read file"));
}

#[test]
fn missing_argument_prints_usage() {
    cargo_bin()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn extra_argument_is_a_usage_error() {
    let tf = program_file("+");
    cargo_bin()
        .arg(tf.path())
        .arg("other.b")
        .assert()
        .code(2);
}

#[test]
fn help_flag_exits_zero() {
    cargo_bin()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Usage:").and(predicate::str::contains("<FILE.b>")));
}
