mod common;

use common::{cargo_bin, program_file};
use predicates::prelude::*;
use std::process::Stdio;
use std::thread;
use std::time::{Duration, Instant};

fn infinite_bf() -> &'static str {
    "+[]" // increments to 1, then [] loops forever
}

#[test]
fn step_limit_flag_aborts_infinite_loop() {
    let tf = program_file(infinite_bf());
    cargo_bin()
        .arg("--max-steps")
        .arg("50")
        .arg(tf.path())
        .timeout(Duration::from_secs(5))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("step limit exceeded (50)"))
        .stdout(predicate::str::contains("Execution aborted").not());
}

#[test]
fn step_limit_from_env() {
    let tf = program_file(infinite_bf());
    cargo_bin()
        .env("BFRUN_MAX_STEPS", "50")
        .arg(tf.path())
        .timeout(Duration::from_secs(5))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("step limit exceeded (50)"));
}

#[test]
fn timeout_flag_aborts_infinite_loop() {
    let tf = program_file(infinite_bf());
    cargo_bin()
        .arg("--timeout")
        .arg("100")
        .arg(tf.path())
        .timeout(Duration::from_secs(5))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Execution aborted").and(predicate::str::contains("timeout")));
}

#[test]
fn flag_overrides_env() {
    let tf = program_file(infinite_bf());
    cargo_bin()
        .env("BFRUN_MAX_STEPS", "5000")
        .arg("--max-steps")
        .arg("7")
        .arg(tf.path())
        .timeout(Duration::from_secs(5))
        .assert()
        .stderr(predicate::str::contains("step limit exceeded (7)"));
}

#[test]
fn finishing_under_the_limit_succeeds() {
    let tf = program_file("+++[-]");
    cargo_bin()
        .arg("--max-steps")
        .arg("1000")
        .arg("--timeout")
        .arg("2000")
        .arg(tf.path())
        .assert()
        .success()
        .stdout("\n");
}

#[test]
fn timeout_while_waiting_for_input_exits() {
    let tf = program_file("+.,.");
    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("bfrun"))
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("bfrun-tests-no-config"))
        .arg("--timeout")
        .arg("200")
        .arg(tf.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn bfrun");

    // Hold stdin open so `,` blocks until the timeout fires.
    let _stdin = child.stdin.take();

    let deadline = Instant::now() + Duration::from_secs(5);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            panic!("bfrun still running 5s after a 200ms timeout");
        }
        thread::sleep(Duration::from_millis(20));
    };

    assert_eq!(status.code(), Some(1));
    let output = child.wait_with_output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("wall-clock timeout exceeded (200 ms)"), "stderr: {stderr}");
}
