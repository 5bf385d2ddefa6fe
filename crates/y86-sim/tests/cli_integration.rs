//! Integration tests for the y86-sim CLI.

use y86_core as _;

use std::fs;
use std::process::Command;

use serde_json::Value;

const BINARY: &str = env!("CARGO_BIN_EXE_y86-sim");

fn run_trace(image: &str, extra_args: &[&str]) -> Value {
    let temp_dir = tempfile::tempdir().expect("tempdir created");
    let image_path = temp_dir.path().join("program.yo");
    fs::write(&image_path, image).expect("image written");

    let output = Command::new(BINARY)
        .arg(&image_path)
        .args(extra_args)
        .output()
        .expect("failed to run y86-sim");
    assert!(output.status.success(), "y86-sim exited nonzero");

    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn halt_program_produces_one_snapshot() {
    let trace = run_trace("0x0: 00\n", &[]);
    let steps = trace.as_array().expect("trace is an array");

    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0]["STAT"], Value::from(2));
    assert_eq!(steps[0]["PC"], Value::from(0));
}

#[test]
fn trace_records_every_step_until_halt() {
    let image = "0x0: 30 f0 05 00 00 00 00 00 00 00\n0xa: 00\n";
    let trace = run_trace(image, &["--compact"]);
    let steps = trace.as_array().expect("trace is an array");

    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["STAT"], Value::from(1));
    assert_eq!(steps[0]["REG"]["rax"], Value::from(5));
    assert_eq!(steps[1]["STAT"], Value::from(2));
    assert_eq!(steps[1]["PC"], Value::from(10));
}

#[test]
fn step_limit_truncates_runaway_programs() {
    // jmp 0x0 spins forever.
    let image = "0x0: 70 00 00 00 00 00 00 00 00\n";
    let trace = run_trace(image, &["--limit", "5"]);
    let steps = trace.as_array().expect("trace is an array");

    assert_eq!(steps.len(), 5);
    assert!(steps.iter().all(|step| step["STAT"] == Value::from(1)));
}

#[test]
fn bounded_mode_faults_out_of_range_accesses() {
    // mrmovq 0x100(%rax), %rbx under a tight bound.
    let image = "0x0: 50 30 00 01 00 00 00 00 00 00\n";
    let trace = run_trace(image, &["--bounded", "--slack", "7"]);
    let steps = trace.as_array().expect("trace is an array");

    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0]["STAT"], Value::from(3));
    assert_eq!(steps[0]["PC"], Value::from(0));
}

#[test]
fn reads_the_image_from_stdin_when_no_path_is_given() {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = Command::new(BINARY)
        .arg("--compact")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn y86-sim");
    child
        .stdin
        .as_mut()
        .expect("stdin is piped")
        .write_all(b"0x0: 00\n")
        .expect("image written to stdin");

    let output = child.wait_with_output().expect("y86-sim ran");
    assert!(output.status.success());

    let trace: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(trace.as_array().expect("trace is an array").len(), 1);
}

#[test]
fn bad_arguments_exit_with_usage_error() {
    let output = Command::new(BINARY)
        .arg("--frobnicate")
        .output()
        .expect("failed to run y86-sim");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage:"));
}

#[test]
fn missing_image_file_exits_with_io_error() {
    let output = Command::new(BINARY)
        .arg("does-not-exist.yo")
        .output()
        .expect("failed to run y86-sim");

    assert_eq!(output.status.code(), Some(2));
}
