#![allow(clippy::unwrap_used)]
//! CLI smoke tests to verify basic command functionality.
//!
//! Every invocation gets its own config directory and an endpoint nothing
//! listens on, so no test touches a real Ollama server or user settings.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const UNREACHABLE: &str = "http://127.0.0.1:1";

#[allow(deprecated)]
fn ltr(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ltr").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("LTR_ENDPOINT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_displays_usage() {
    let home = TempDir::new().unwrap();
    ltr(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("English and Japanese"))
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--to"))
        .stdout(predicate::str::contains("--model"));
}

#[test]
fn test_version_displays_version() {
    let home = TempDir::new().unwrap();
    ltr(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_languages_list() {
    let home = TempDir::new().unwrap();
    ltr(&home)
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("en"))
        .stdout(predicate::str::contains("ja"))
        .stdout(predicate::str::contains("Japanese"));
}

#[test]
fn test_invalid_language_code() {
    let home = TempDir::new().unwrap();
    ltr(&home)
        .args(["--to", "invalid_lang_xyz"])
        .write_stdin("hello")
        .assert()
        .code(exitcode::USAGE)
        .stderr(predicate::str::contains("Invalid language code"));
}

#[test]
fn test_missing_language_pair() {
    let home = TempDir::new().unwrap();
    ltr(&home)
        .args(["--endpoint", UNREACHABLE])
        .write_stdin("hello")
        .assert()
        .code(exitcode::USAGE)
        .stderr(predicate::str::contains("Missing language pair"));
}

#[test]
fn test_empty_input_rejected() {
    let home = TempDir::new().unwrap();
    ltr(&home)
        .args(["--to", "ja", "--endpoint", UNREACHABLE])
        .write_stdin("  \n")
        .assert()
        .code(exitcode::USAGE)
        .stderr(predicate::str::contains("Input is empty"));
}

#[test]
fn test_translate_backend_unreachable() {
    let home = TempDir::new().unwrap();
    ltr(&home)
        .args(["--to", "ja", "--endpoint", UNREACHABLE])
        .write_stdin("hello")
        .assert()
        .code(exitcode::UNAVAILABLE)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_translate_json_envelope_on_failure() {
    let home = TempDir::new().unwrap();
    ltr(&home)
        .args(["--json", "--from", "en", "--endpoint", UNREACHABLE])
        .write_stdin("hello")
        .assert()
        .code(exitcode::UNAVAILABLE)
        .stdout(predicate::str::contains(r#""ok": false"#))
        .stdout(predicate::str::contains("backend_unavailable"));
}

#[test]
fn test_status_reports_disconnected() {
    let home = TempDir::new().unwrap();
    ltr(&home)
        .args(["status", "--endpoint", UNREACHABLE])
        .assert()
        .success()
        .stdout(predicate::str::contains("disconnected"))
        .stdout(predicate::str::contains(UNREACHABLE));
}

#[test]
fn test_models_help() {
    let home = TempDir::new().unwrap();
    ltr(&home)
        .args(["models", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("remove"))
        .stdout(predicate::str::contains("default"))
        .stdout(predicate::str::contains("refresh"));
}

#[test]
fn test_models_add_and_list_without_backend() {
    let home = TempDir::new().unwrap();
    ltr(&home)
        .args(["models", "add", "llama3", "--endpoint", UNREACHABLE])
        .assert()
        .success()
        .stdout(predicate::str::contains("added"));

    ltr(&home)
        .args(["--json", "models", "list", "--endpoint", UNREACHABLE])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""defaultModel": "llama3""#));

    assert!(home.path().join("ltr").join("settings.toml").exists());
}

#[test]
fn test_models_default_unknown_fails() {
    let home = TempDir::new().unwrap();
    ltr(&home)
        .args(["models", "default", "nope", "--endpoint", UNREACHABLE])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}
