//! Command-line behavior of the `beyan` binary.

use std::fs;

use assert_cmd::Command;
use beyan_core::declaration::builtin_rules;
use beyan_core::models::declaration::DocumentExtractionResult;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from any user configuration file.
fn beyan(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("beyan").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path());
    cmd
}

#[test]
fn test_rules_lists_every_label() {
    let home = TempDir::new().unwrap();
    let mut assert = beyan(&home).arg("rules").assert().success();

    for rule in builtin_rules() {
        assert = assert.stdout(predicate::str::contains(rule.label));
    }
}

#[test]
fn test_batch_over_corrupt_pdf_reports_error_row() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bozuk.pdf"), b"this is not a pdf").unwrap();
    fs::write(dir.path().join("notlar.txt"), b"ignored").unwrap();

    let summary = dir.path().join("summary.csv");
    let pattern = dir.path().join("*");

    beyan(&home)
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .arg("--output")
        .arg(&summary)
        .assert()
        .success()
        .stderr(predicate::str::contains("Found 1 files"))
        .stderr(predicate::str::contains("bozuk.pdf"));

    let csv = fs::read_to_string(&summary).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("Sıra,Dosya Adı,Dönem"));
    let row = lines.next().unwrap();
    assert!(row.starts_with("1,bozuk.pdf,HATA"));
    assert!(lines.next().is_none());
}

#[test]
fn test_batch_state_skips_known_documents() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.pdf"), b"garbage").unwrap();

    let state = dir.path().join("state.json");
    let pattern = dir.path().join("*.pdf");
    let run = || {
        beyan(&home)
            .arg("batch")
            .arg(pattern.to_str().unwrap())
            .args(["--format", "text", "--state"])
            .arg(&state)
            .assert()
            .success()
    };

    run().stderr(predicate::str::contains("Found 1 files"));
    assert!(state.exists());

    run()
        .stderr(predicate::str::contains("Skipping 1 files already in the state"))
        .stderr(predicate::str::contains("Found 0 files"))
        .stdout(predicate::str::contains("KDV Verileri"))
        .stdout(predicate::str::contains("Found").not());
}

#[test]
fn test_batch_json_on_stdout_is_parseable() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bozuk.pdf"), b"this is not a pdf").unwrap();
    let pattern = dir.path().join("*.pdf");

    let output = beyan(&home)
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let results: Vec<DocumentExtractionResult> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].identifier, "bozuk.pdf");
    assert_eq!(results[0].period, "HATA");
    assert!(results[0].is_error());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Found 1 files"));
}

#[test]
fn test_batch_without_matches_fails() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let pattern = dir.path().join("*.pdf");

    beyan(&home)
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching PDF files"));
}

#[test]
fn test_process_corrupt_pdf_prints_error_result() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("x.pdf");
    fs::write(&input, b"%PDF-broken").unwrap();

    beyan(&home)
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"period\": \"HATA\""))
        .stderr(predicate::str::contains("Dosya okunamadı veya bozuk."));
}

#[test]
fn test_config_set_and_get_round_trip() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.json");

    beyan(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "period.lookahead_lines", "5"])
        .assert()
        .success();

    beyan(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "period.lookahead_lines"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5\n"));
}
