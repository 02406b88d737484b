// CLI integration tests for decode, pointer selection, and error reporting.
use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_jsonwalk");
    let mut command = Command::new(exe);
    command.env_remove("JSONWALK_LOG");
    command
}

fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = cmd()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait")
}

fn parse_json(value: &[u8]) -> Value {
    serde_json::from_slice(value).expect("valid json")
}

fn error_json(output: &Output) -> Value {
    let text = String::from_utf8_lossy(&output.stderr);
    let line = text
        .lines()
        .find(|line| line.starts_with("{\"error\""))
        .expect("error line");
    serde_json::from_str(line).expect("valid json")
}

#[test]
fn file_is_decoded_and_pretty_printed() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("doc.json");
    std::fs::write(&path, r#"{"b":[1,true,null],"a":"x"}"#).expect("write");

    let output = cmd()
        .args([path.to_str().unwrap(), "--color", "never"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let expected = serde_json::to_string_pretty(&serde_json::json!({
        "a": "x",
        "b": [1, true, null]
    }))
    .expect("pretty");
    assert_eq!(stdout.trim_end(), expected);
}

#[test]
fn whole_numbers_print_as_integers() {
    let pretty = run_with_stdin(&["--color", "never"], r#"{"age":80,"ratio":0.5}"#);
    assert!(pretty.status.success());
    let stdout = String::from_utf8(pretty.stdout).expect("utf8");
    assert_eq!(stdout.trim_end(), "{\n  \"age\": 80,\n  \"ratio\": 0.5\n}");

    let compact = run_with_stdin(&["--compact"], r#"{"age":80}"#);
    assert!(compact.status.success());
    assert_eq!(String::from_utf8_lossy(&compact.stdout).trim_end(), r#"{"age":80}"#);
}

#[test]
fn pointers_select_values() {
    let output = run_with_stdin(
        &["-p", "/included/0/name", "-p", "/extra", "--compact"],
        r#"{"included":[{"name":"Björn"}],"extra":[]}"#,
    );
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["\"Björn\"", "[]"]);
}

#[test]
fn missing_pointer_is_not_found() {
    let output = run_with_stdin(&["-p", "/nope"], "{}");
    assert_eq!(output.status.code(), Some(3));
    let err = error_json(&output);
    assert_eq!(err["error"]["kind"], "NotFound");
    assert!(err["error"]["hint"].as_str().is_some());
}

#[test]
fn malformed_input_reports_kind_and_offset() {
    let output = run_with_stdin(&[], "[1,2,]");
    assert_eq!(output.status.code(), Some(7));
    assert!(output.stdout.is_empty());
    let err = error_json(&output);
    assert_eq!(err["error"]["kind"], "MissingMember");
    assert_eq!(err["error"]["offset"], 5);
}

#[test]
fn tolerant_empty_input_prints_nothing() {
    let output = run_with_stdin(&["--tolerant"], "  \n");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let strict = run_with_stdin(&[], "  \n");
    assert_eq!(strict.status.code(), Some(7));
    assert_eq!(error_json(&strict)["error"]["kind"], "IllegalValue");
}

#[test]
fn all_mode_streams_every_value() {
    let output = run_with_stdin(&["--all", "--compact"], "{\"n\":1}\n{\"n\":2}\n[]\n");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8");
    let values: Vec<Value> = text.lines().map(|line| parse_json(line.as_bytes())).collect();
    assert_eq!(values.len(), 3);
    assert_eq!(values[0]["n"], 1);
    assert_eq!(values[1]["n"], 2);
    assert_eq!(values[2], serde_json::json!([]));
}

#[test]
fn trailing_content_is_ignored_with_warning() {
    let output = run_with_stdin(&["--compact"], "[1] [2]");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim_end(), "[1]");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ignoring content after the first value"));
}

#[test]
fn missing_file_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("absent.json");
    let output = cmd().arg(path.to_str().unwrap()).output().expect("run");
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(error_json(&output)["error"]["kind"], "NotFound");
}

#[test]
fn usage_exit_code() {
    let output = cmd().arg("--no-such-flag").output().expect("run");
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(error_json(&output)["error"]["kind"], "Usage");
}
