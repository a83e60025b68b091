//! Integration tests for the tagfilter CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const MODEL: &str = r#"
name = "TestModel"

[[fields]]
name = "Aaa"
tags = { manage = "field0", pg = "pg-field0,pk" }

[[fields]]
name = "Bbb"
tags = { manage = "field1", pg = "pg-field1" }

[[fields]]
name = "Ccc"
tags = { manage = "field2", pg = "pg-field2" }

[[fields]]
name = "Ddd"
tags = { manage = "field3", pg = "pg-field3" }
"#;

const FILTER: &str = r#"{
    "type": "and",
    "items": [
        {"fieldname": "field0", "operator": "eq", "value": "hi"},
        {"fieldname": "field1", "operator": "lt", "value": 10},
        {"type": "or", "items": [
            {"fieldname": "field2", "operator": "eq", "value": "yo"},
            {"fieldname": "field3", "operator": "eq", "value": "test"}
        ]}
    ]
}"#;

/// Get the tagfilter binary
#[allow(deprecated)]
fn tagfilter_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tagfilter").unwrap();
    cmd.env_remove("TAGFILTER_CONFIG");
    cmd
}

/// A temp dir holding `model.toml` and `filter.json`.
fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("model.toml"), MODEL).unwrap();
    fs::write(dir.path().join("filter.json"), FILTER).unwrap();
    dir
}

#[test]
fn test_help_command() {
    tagfilter_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: tagfilter <COMMAND>"))
        .stdout(predicate::str::contains("compile"))
        .stdout(predicate::str::contains("fields"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_version_command() {
    tagfilter_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Version"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
        .stdout(predicate::str::contains("contains"));
}

#[test]
fn test_compile_file() {
    let dir = workspace();
    tagfilter_cmd()
        .current_dir(dir.path())
        .args(["compile", "--model", "model.toml", "--filter", "filter.json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "(pg-field0=? and pg-field1<? and (pg-field2=? or pg-field3=?))\n",
        ))
        .stdout(predicate::str::contains("1: \"hi\""))
        .stdout(predicate::str::contains("2: 10"))
        .stdout(predicate::str::contains("4: \"test\""));
}

#[test]
fn test_compile_stdin_json() {
    let dir = workspace();
    let output = tagfilter_cmd()
        .current_dir(dir.path())
        .args(["compile", "--model", "model.toml", "--format", "json"])
        .write_stdin(FILTER)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value["sql"],
        "(pg-field0=? and pg-field1<? and (pg-field2=? or pg-field3=?))"
    );
    assert_eq!(value["params"], serde_json::json!(["hi", 10, "yo", "test"]));
}

#[test]
fn test_compile_swapped_tags() {
    let dir = workspace();
    tagfilter_cmd()
        .current_dir(dir.path())
        .args([
            "compile", "--model", "model.toml", "--source", "pg", "--storage", "manage",
        ])
        .write_stdin(r#"{"fieldname": "pg-field1", "operator": "gte", "value": 3}"#)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("field1>=?\n"));
}

#[test]
fn test_compile_capitalized_keys() {
    let dir = workspace();
    tagfilter_cmd()
        .current_dir(dir.path())
        .args(["compile", "--model", "model.toml"])
        .write_stdin(
            r#"{"Type": "or", "Items": [
                {"Fieldname": "field2", "Operator": "eq", "Value": "yo"},
                {"Fieldname": "field3", "Operator": "neq"}
            ]}"#,
        )
        .assert()
        .success()
        .stdout(predicate::str::starts_with("(pg-field2=? or pg-field3<>?)\n"))
        .stdout(predicate::str::contains("2: null"));
}

#[test]
fn test_compile_unknown_field_fails() {
    let dir = workspace();
    tagfilter_cmd()
        .current_dir(dir.path())
        .args(["compile", "--model", "model.toml"])
        .write_stdin(r#"{"fieldname": "field9", "operator": "eq", "value": 1}"#)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("F1005"))
        .stderr(predicate::str::contains("field9"));
}

#[test]
fn test_compile_unrecognized_node_suggests_keys() {
    let dir = workspace();
    tagfilter_cmd()
        .current_dir(dir.path())
        .args(["compile", "--model", "model.toml"])
        .write_stdin(r#"{"type": "and", "items": [{"field": "field0"}]}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("F1002"))
        .stderr(predicate::str::contains("items[0]"))
        .stderr(predicate::str::contains("`fieldname`"));
}

#[test]
fn test_compile_empty_connective() {
    let dir = workspace();
    tagfilter_cmd()
        .current_dir(dir.path())
        .args(["compile", "--model", "model.toml"])
        .write_stdin(r#"{"type": "or", "items": []}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("F1004"));

    tagfilter_cmd()
        .current_dir(dir.path())
        .args(["compile", "--model", "model.toml", "--allow-empty"])
        .write_stdin(r#"{"type": "or", "items": []}"#)
        .assert()
        .success()
        .stdout("()\n");
}

#[test]
fn test_compile_uses_local_config() {
    let dir = workspace();
    fs::write(
        dir.path().join("tagfilter.toml"),
        "[keys]\nfield = \"name\"\noperator = \"op\"\n\n[output]\nformat = \"json\"\n",
    )
    .unwrap();

    tagfilter_cmd()
        .current_dir(dir.path())
        .args(["compile", "--model", "model.toml"])
        .write_stdin(r#"{"name": "field2", "op": "contains", "value": "%x%"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sql\": \"pg-field2like?\""));
}

#[test]
fn test_compile_missing_model() {
    let dir = TempDir::new().unwrap();
    tagfilter_cmd()
        .current_dir(dir.path())
        .args(["compile", "--model", "missing.toml"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Model error"));
}

#[test]
fn test_fields_command() {
    let dir = workspace();
    tagfilter_cmd()
        .current_dir(dir.path())
        .args(["fields", "--model", "model.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TestModel"))
        .stdout(predicate::str::contains("field0 → pg-field0"))
        .stdout(predicate::str::contains("field3 → pg-field3"));
}

#[test]
fn test_init_creates_config() {
    let dir = TempDir::new().unwrap();

    tagfilter_cmd()
        .args(["init", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    let content = fs::read_to_string(dir.path().join("tagfilter.toml")).unwrap();
    assert!(content.contains("[tags]"));
    assert!(content.contains("source = \"manage\""));
    assert!(content.contains("storage = \"pg\""));

    tagfilter_cmd()
        .args(["init", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    tagfilter_cmd()
        .args(["init", dir.path().to_str().unwrap(), "--force"])
        .assert()
        .success();
}
