#![allow(dead_code)]

use assert_cmd::Command;
use std::io::Write;

pub fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bfrun").expect("bfrun binary");
    // Keep a user's ~/.config/bfrun.toml out of the picture
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("bfrun-tests-no-config"))
        .env_remove("BFRUN_TIMEOUT_MS")
        .env_remove("BFRUN_MAX_STEPS")
        .env_remove("BFRUN_OUTPUT_MODE")
        .env_remove("BFRUN_LOG");
    cmd
}

pub fn program_file(content: &str) -> tempfile::NamedTempFile {
    program_file_with_suffix(content, ".b")
}

pub fn program_file_with_suffix(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

pub fn hello_world() -> &'static str {
    "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>."
}

pub fn program_file_from_bytes(content: &[u8]) -> tempfile::NamedTempFile {
    let mut tf = tempfile::Builder::new()
        .suffix(".b")
        .tempfile()
        .expect("tempfile");
    tf.write_all(content).unwrap();
    tf
}
