//! CLI integration tests for implreg.
//!
//! These tests drive the binary over real fragment trees in temp dirs.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the implreg binary command.
fn implreg() -> Command {
    let mut cmd = Command::cargo_bin("implreg").unwrap();
    // Keep the user's global config out of the tests.
    cmd.env("HOME", env!("CARGO_TARGET_TMPDIR"));
    cmd
}

/// Create a temporary directory for test fixtures.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

fn write_table(dir: &Path, name: &str, json: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, json).unwrap();
    path
}

// ============================================================================
// implreg render
// ============================================================================

#[test]
fn test_render_to_stdout() {
    let tmp = temp_dir();
    let table = write_table(tmp.path(), "t.json", r#"{"libB":[["y"],["z"]],"libA":[["x"]]}"#);

    implreg()
        .arg("render")
        .arg(&table)
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("(function() {"))
        .stdout(predicate::str::contains(r#"[["libA",[["x"]]],["libB",[["y"],["z"]]]]"#))
        .stdout(predicate::str::contains("//{\"start\":57,"));
}

#[test]
fn test_render_to_trait_location() {
    let tmp = temp_dir();
    let table = write_table(tmp.path(), "t.json", r#"{"libA":[["x"]]}"#);

    implreg()
        .args(["render", "--trait", "core::convert::From", "--doc-root", "doc"])
        .arg(&table)
        .current_dir(tmp.path())
        .assert()
        .success();

    let written = tmp.path().join("doc/trait.impl/core/convert/trait.From.js");
    let contents = fs::read_to_string(written).unwrap();
    assert!(contents.contains("window.register_implementors(implementors);"));
}

#[test]
fn test_render_respects_project_config() {
    let tmp = temp_dir();
    fs::create_dir_all(tmp.path().join(".implreg")).unwrap();
    fs::write(
        tmp.path().join(".implreg/config.toml"),
        "[render]\nemit_offsets = false\n",
    )
    .unwrap();
    let table = write_table(tmp.path(), "t.json", r#"{"libA":[["x"]]}"#);

    implreg()
        .arg("render")
        .arg(&table)
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("//{").not());
}

#[test]
fn test_render_malformed_table_reports_diagnostic() {
    let tmp = temp_dir();
    let table = write_table(tmp.path(), "t.json", r#"{"libA":"x"}"#);

    implreg()
        .arg("render")
        .arg(&table)
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not load implementor fragment"))
        .stderr(predicate::str::contains("t.json"));
}

#[test]
fn test_render_rejects_bad_trait_path() {
    let tmp = temp_dir();
    let table = write_table(tmp.path(), "t.json", r#"{"libA":[["x"]]}"#);

    implreg()
        .args(["render", "--trait", "From"])
        .arg(&table)
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid trait path"));
}

#[test]
fn test_render_doc_root_requires_trait() {
    let tmp = temp_dir();
    let table = write_table(tmp.path(), "t.json", r#"{"libA":[["x"]]}"#);

    implreg()
        .args(["render", "--doc-root", "doc"])
        .arg(&table)
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--trait"));
}

// ============================================================================
// implreg merge / inspect
// ============================================================================

#[test]
fn test_merge_then_inspect() {
    let tmp = temp_dir();
    let target = tmp.path().join("trait.From.js");
    let a = write_table(tmp.path(), "a.json", r#"{"moeqi_core":[["impl From<Error> for MoeqiError"]]}"#);
    let b = write_table(tmp.path(), "b.json", r#"{"moeqi_wasm":[["impl From<Decoded> for JsValue"]]}"#);

    implreg()
        .arg("merge")
        .arg(&target)
        .arg(&a)
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Created"));

    implreg()
        .arg("merge")
        .arg(&target)
        .arg(&b)
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Updated"));

    implreg()
        .args(["inspect", "--check"])
        .arg(&target)
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("moeqi_core (1 implementor(s))"))
        .stdout(predicate::str::contains("moeqi_wasm (1 implementor(s))"))
        .stdout(predicate::str::contains("trailer consistent"));
}

#[test]
fn test_inspect_check_fails_on_stale_trailer() {
    let tmp = temp_dir();
    let target = tmp.path().join("trait.From.js");
    fs::write(
        &target,
        "(function () {\n    var implementors = Object.fromEntries([[\"libA\", [[\"x\"]]]]);\n})()\n//{\"start\":57,\"fragment_lengths\":[447]}",
    )
    .unwrap();

    implreg()
        .args(["inspect", "--check"])
        .arg(&target)
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("trailer stale"))
        .stderr(predicate::str::contains("missing or stale"));
}

#[test]
fn test_inspect_json() {
    let tmp = temp_dir();
    let table = write_table(tmp.path(), "t.json", r#"{"libA":[["x"]]}"#);
    let target = tmp.path().join("trait.X.js");

    implreg()
        .arg("merge")
        .arg(&target)
        .arg(&table)
        .current_dir(tmp.path())
        .assert()
        .success();

    let output = implreg()
        .args(["inspect", "--json"])
        .arg(&target)
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["total_entries"], 1);
    assert_eq!(reports[0]["trailer"]["status"], "consistent");
}

// ============================================================================
// implreg replay / scan
// ============================================================================

#[test]
fn test_replay_reports_index() {
    let tmp = temp_dir();
    let one = tmp.path().join("one.js");
    let two = tmp.path().join("two.js");
    let a = write_table(tmp.path(), "a.json", r#"{"libA":[["a"]]}"#);
    let b = write_table(tmp.path(), "b.json", r#"{"libB":[["b"]],"libA":[["a"],["a2"]]}"#);

    for (target, input) in [(&one, &a), (&two, &b)] {
        implreg()
            .arg("merge")
            .arg(target)
            .arg(input)
            .current_dir(tmp.path())
            .assert()
            .success();
    }

    implreg()
        .args(["replay", "--install-after", "1"])
        .arg(&one)
        .arg(&two)
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 fragment(s) loaded, 1 buffered before install"))
        .stdout(predicate::str::contains("    a2"));

    let output = implreg()
        .args(["replay", "--json", "--local", "libB"])
        .arg(&one)
        .arg(&two)
        .current_dir(tmp.path())
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["buffered"], 2);
    assert_eq!(report["index"], serde_json::json!([["libA", [["a"], ["a2"]]]]));
}

#[test]
fn test_scan_lists_fragments() {
    let tmp = temp_dir();
    let table = write_table(tmp.path(), "t.json", r#"{"libA":[["x"]]}"#);

    implreg()
        .args(["render", "--trait", "core::convert::From", "--doc-root", "doc"])
        .arg(&table)
        .current_dir(tmp.path())
        .assert()
        .success();

    implreg()
        .args(["scan", "doc"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("core::convert::From"));
}

#[test]
fn test_scan_warns_when_empty() {
    let tmp = temp_dir();
    fs::create_dir_all(tmp.path().join("doc/trait.impl")).unwrap();

    implreg()
        .args(["--no-color", "scan", "doc"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: no implementor fragments found"))
        .stderr(predicate::str::contains("\x1b[").not());
}

#[test]
fn test_inspect_accepts_final_newline() {
    let tmp = temp_dir();
    let table = write_table(tmp.path(), "t.json", r#"{"libA":[["x"]]}"#);
    let target = tmp.path().join("trait.X.js");

    implreg()
        .arg("merge")
        .arg(&target)
        .arg(&table)
        .current_dir(tmp.path())
        .assert()
        .success();

    let mut contents = fs::read_to_string(&target).unwrap();
    contents.push('\n');
    fs::write(&target, contents).unwrap();

    implreg()
        .args(["inspect", "--check"])
        .arg(&target)
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("trailer consistent"));
}

#[test]
fn test_completions() {
    implreg()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("implreg"));
}
