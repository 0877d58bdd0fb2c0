//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn phonik() -> Command {
    Command::cargo_bin("phonik").expect("binary builds")
}

#[test]
fn phonemizes_argument_text() {
    phonik()
        .arg("the cat")
        .assert()
        .success()
        .stdout(predicate::str::contains("kˈæt"));
}

#[test]
fn reads_stdin_when_no_argument() {
    phonik()
        .write_stdin("hello world")
        .assert()
        .success()
        .stdout(predicate::str::contains("wˈɜɹld"));
}

#[test]
fn reads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "the dog").unwrap();

    phonik()
        .arg("--file")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("dˈɔɡ"));
}

#[test]
fn json_format_includes_tokens() {
    let output = phonik()
        .args(["--format", "json", "the cat"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(parsed["phonemes"].as_str().unwrap().contains("kˈæt"));
    let tokens = parsed["tokens"].as_array().unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1]["text"], "cat");
}

#[test]
fn british_flag_switches_locale() {
    phonik()
        .args(["--british", "not"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nˈɒt"));
}

#[test]
fn override_syntax_forces_phonemes() {
    phonik()
        .arg("[Misaki](/misˈɑki/)")
        .assert()
        .success()
        .stdout(predicate::str::contains("misˈɑki"));
}
