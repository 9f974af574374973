use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ingrid() -> Command {
    let mut cmd: Command = cargo_bin_cmd!("ingrid").into();
    cmd.env("RUST_LOG", "off");
    cmd
}

/// Write a label file into a fresh tempdir. The tempdir guard must be kept alive.
fn label_file(content: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("label.txt");
    fs::write(&path, content).unwrap();
    (tmp, path)
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

// --- Binary startup ---

#[test]
fn binary_runs() {
    ingrid()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ingrid"));
}

// --- Rate ---

#[test]
fn rate_boundaries() {
    for (count, label) in [(0, "green"), (4, "green"), (5, "amber"), (9, "amber"), (10, "red")] {
        let value = json_output(ingrid().args(["rate", &count.to_string()]));
        assert_eq!(value["rating"], label, "count {count}");
        assert_eq!(value["ingredient_count"], count);
    }
}

#[test]
fn rate_rejects_negative() {
    ingrid().args(["rate", "--", "-1"]).assert().failure();
}

// --- Text ---

#[test]
fn text_from_file() {
    let (_tmp, path) = label_file("Ingredients: Water, Oil (Palm, Sunflower), Salt\n");

    let value = json_output(ingrid().args(["text", &path_arg(&path)]));

    assert_eq!(
        value["product"]["ingredients"],
        serde_json::json!(["water", "oil", "salt", "palm", "sunflower"])
    );
    assert_eq!(value["product"]["ingredient_count"], 5);
    assert_eq!(value["product"]["rating"], "amber");
    assert_eq!(value["product"]["scan_type"], "text");
}

#[test]
fn text_from_stdin() {
    let value = json_output(
        ingrid()
            .args(["text", "-"])
            .write_stdin("Ingredients: Water, Sugar, Salt"),
    );

    assert_eq!(
        value["product"]["ingredients"],
        serde_json::json!(["water", "sugar", "salt"])
    );
    assert_eq!(value["product"]["rating"], "green");
}

#[test]
fn text_empty_input() {
    let value = json_output(ingrid().arg("text").write_stdin(""));

    assert_eq!(value["product"]["ingredients"], serde_json::json!([]));
    assert_eq!(value["product"]["rating"], "green");
}

#[test]
fn text_missing_file_fails() {
    ingrid()
        .args(["text", "/nonexistent/label.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading"));
}

#[test]
fn compact_output_is_single_line() {
    ingrid()
        .args(["--compact", "rate", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""rating":"green""#))
        .stdout(predicate::str::contains("\n").count(1));
}

// --- Certifications ---

#[test]
fn certs_order_and_dedup() {
    let (_tmp, path) = label_file("100% Organic, Non-GMO Verified, bio");

    let value = json_output(ingrid().args(["certs", &path_arg(&path)]));

    assert_eq!(value, serde_json::json!(["Organic", "Non-GMO"]));
}

#[test]
fn certs_none() {
    let value = json_output(ingrid().arg("certs").write_stdin("water, salt"));
    assert_eq!(value, serde_json::json!([]));
}
