//! Drives the `jsonmap` binary end to end.
#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;

const INPUT: &str = r#"{"z":"<a>","a":{"y":"&","b":[1,2]}}"#;
const ESCAPED: &str = r#"{"z":"\u003ca\u003e","a":{"y":"\u0026","b":[1,2]}}"#;

fn jsonmap() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jsonmap"))
}

#[test]
fn stdin_to_stdout_escapes_by_default() {
    jsonmap()
        .write_stdin(INPUT)
        .assert()
        .success()
        .stdout(format!("{}\n", ESCAPED));
}

#[test]
fn no_escape_html_writes_characters_literally() {
    jsonmap()
        .arg("--no-escape-html")
        .write_stdin(INPUT)
        .assert()
        .success()
        .stdout(format!("{}\n", INPUT));
}

#[test]
fn reads_file_and_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.json");
    let output = dir.path().join("out.json");
    std::fs::write(&input, "  {\"b\": 1,\n \"a\": 2}\n").unwrap();

    jsonmap()
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--no-escape-html")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(
        "{\"b\":1,\"a\":2}\n",
        std::fs::read_to_string(&output).unwrap()
    );
}

#[test]
fn malformed_input_fails_with_context() {
    jsonmap()
        .write_stdin(r#"{"a":1,"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("input is not a JSON object"));
}

#[test]
fn missing_input_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    jsonmap()
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
