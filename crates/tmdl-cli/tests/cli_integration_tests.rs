// Dweve TMDL - Tabular Model Definition Language
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::NamedTempFile;
use tmdl_test::fixtures;

fn tmdl_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tmdl").expect("Failed to find tmdl binary");
    cmd.env_remove("TMDL_MAX_FILE_SIZE").env_remove("RUST_LOG");
    cmd
}

fn create_temp_file(content: &str, suffix: &str) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    fs::write(file.path(), content).expect("Failed to write temp file");
    file
}

const DUPLICATE_TABLES: &str =
    r#"{"name": "M", "compatibilityLevel": 1550, "model": {"tables": [{"name": "A"}, {"name": "A"}]}}"#;

// ===== Help and Version =====

#[test]
fn test_help_output() {
    tmdl_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tabular Model Definition Language"))
        .stdout(predicate::str::contains("to-json"));
}

#[test]
fn test_version_output() {
    tmdl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tmdl"));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    tmdl_cmd().assert().failure();
}

// ===== Validate =====

#[test]
fn test_validate_tmdl_source() {
    let file = create_temp_file(fixtures::sales_table(), ".tmdl");
    tmdl_cmd()
        .arg("validate")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("tolerant path"))
        .stdout(predicate::str::contains("1 record(s)"));
}

#[test]
fn test_validate_strict_json_takes_fast_path() {
    let file = create_temp_file(fixtures::STRICT_JSON, ".json");
    tmdl_cmd()
        .arg("validate")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("fast path, 3 record(s), 0 unrecognized"));
}

#[test]
fn test_validate_syntax_error_exits_one() {
    let file = create_temp_file("name: \"Sales\n", ".tmdl");
    tmdl_cmd()
        .arg("validate")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("SyntaxError at line 1"))
        .stderr(predicate::str::contains("context:"));
}

#[test]
fn test_validate_missing_file_exits_one() {
    tmdl_cmd()
        .args(["validate", "does-not-exist.tmdl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("IOError"))
        .stderr(predicate::str::contains("does-not-exist.tmdl"));
}

#[test]
fn test_max_file_size_from_env() {
    let file = create_temp_file(fixtures::STRICT_JSON, ".json");
    tmdl_cmd()
        .env("TMDL_MAX_FILE_SIZE", "16")
        .arg("validate")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("exceeds maximum 16 bytes"));
}

#[test]
fn test_invalid_max_file_size_env() {
    let file = create_temp_file(fixtures::STRICT_JSON, ".json");
    tmdl_cmd()
        .env("TMDL_MAX_FILE_SIZE", "big")
        .arg("validate")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("TMDL_MAX_FILE_SIZE"));
}

#[test]
fn test_rust_log_writes_to_stderr() {
    let file = create_temp_file(fixtures::STRICT_JSON, ".json");
    tmdl_cmd()
        .env("RUST_LOG", "debug")
        .arg("validate")
        .arg(file.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed"))
        .stdout(predicate::str::contains("parsed").not());
}

// ===== Lint =====

#[test]
fn test_lint_clean_model() {
    let file = create_temp_file(fixtures::complete_model(), ".tmdl");
    tmdl_cmd()
        .arg("lint")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("no issues found"));
}

#[test]
fn test_lint_warnings_pass_by_default() {
    let file = create_temp_file(fixtures::sales_table(), ".tmdl");
    tmdl_cmd()
        .arg("lint")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 issue(s) found"))
        .stdout(predicate::str::contains("model has no name"));
}

#[test]
fn test_lint_warn_error_exits_two() {
    let file = create_temp_file(fixtures::sales_table(), ".tmdl");
    tmdl_cmd()
        .args(["lint", "-W"])
        .arg(file.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("0 error(s) and 2 warning(s)"));
}

#[test]
fn test_lint_errors_exit_two() {
    let file = create_temp_file(DUPLICATE_TABLES, ".json");
    tmdl_cmd()
        .arg("lint")
        .arg(file.path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("duplicate table name 'A'"));
}

#[test]
fn test_lint_disable_rule() {
    let file = create_temp_file(fixtures::sales_table(), ".tmdl");
    tmdl_cmd()
        .args(["lint", "-W", "--disable", "top-level-keys"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("no issues found"));
}

#[test]
fn test_lint_json_format() {
    let file = create_temp_file(fixtures::empty(), ".tmdl");
    let output = tmdl_cmd()
        .args(["lint", "--format", "json"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let issues = json["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 3);
    assert_eq!(issues[0]["rule"], "top-level-keys");
    assert_eq!(issues[0]["severity"], "warning");
    assert_eq!(issues[0]["path"], serde_json::json!(["name"]));
}

// ===== To-JSON =====

#[test]
fn test_to_json_stdout() {
    let file = create_temp_file("name: M\ncompatibilityLevel: 1575\n", ".tmdl");
    tmdl_cmd()
        .arg("to-json")
        .arg(file.path())
        .assert()
        .success()
        .stdout(r#"{"name":"M","compatibilityLevel":1575}"#.to_string() + "\n");
}

#[test]
fn test_to_json_pretty_to_file() {
    let file = create_temp_file(fixtures::STRICT_JSON, ".json");
    let out = NamedTempFile::new().unwrap();
    tmdl_cmd()
        .args(["to-json", "--pretty", "-o"])
        .arg(out.path())
        .arg(file.path())
        .assert()
        .success();

    let written = fs::read_to_string(out.path()).unwrap();
    assert!(written.starts_with("{\n  \"name\": \"Sales\""));
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(json["model"]["tables"].as_array().unwrap().len(), 2);
}

#[test]
fn test_to_json_keeps_unrecognized() {
    let file = create_temp_file("name: M\nextraFlag: true\n", ".tmdl");
    tmdl_cmd()
        .arg("to-json")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""unrecognized":{"extraFlag":[true]}"#));
}

// ===== Inspect =====

#[test]
fn test_inspect_summary() {
    let file = create_temp_file(fixtures::STRICT_JSON, ".json");
    tmdl_cmd()
        .arg("inspect")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Parse path: fast"))
        .stdout(predicate::str::contains("Level:      1575"))
        .stdout(predicate::str::contains("tables:"));
}

#[test]
fn test_inspect_verbose_lists_records() {
    let file = create_temp_file(fixtures::STRICT_JSON, ".json");
    tmdl_cmd()
        .args(["inspect", "--verbose"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Product"))
        .stdout(predicate::str::contains("r1"));
}

// ===== Format =====

const SIMPLE_JSON: &str = r#"{"name": "M", "model": {"tables": [{"name": "Sales"}]}}"#;

#[test]
fn test_format_to_stdout() {
    let file = create_temp_file(SIMPLE_JSON, ".json");
    tmdl_cmd()
        .arg("format")
        .arg(file.path())
        .assert()
        .success()
        .stdout("name: M\nmodel:\n\ttable Sales\n");
}

#[test]
fn test_format_with_space_indent() {
    let file = create_temp_file(SIMPLE_JSON, ".json");
    tmdl_cmd()
        .args(["format", "--indent", "4"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("name: M\nmodel:\n    table Sales\n");
}

#[test]
fn test_format_rejects_zero_indent() {
    let file = create_temp_file(SIMPLE_JSON, ".json");
    tmdl_cmd()
        .args(["format", "--indent", "0"])
        .arg(file.path())
        .assert()
        .failure();
}

#[test]
fn test_format_check() {
    let canonical = create_temp_file("name: M\nmodel:\n\ttable Sales\n", ".tmdl");
    tmdl_cmd()
        .args(["format", "--check"])
        .arg(canonical.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("is canonical"));

    let json = create_temp_file(SIMPLE_JSON, ".json");
    tmdl_cmd()
        .args(["format", "--check"])
        .arg(json.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not in canonical form"));
}

#[test]
fn test_format_output_round_trips() {
    let file = create_temp_file(fixtures::complete_model(), ".tmdl");
    let out = tempfile::Builder::new().suffix(".tmdl").tempfile().unwrap();
    tmdl_cmd()
        .args(["format", "-o"])
        .arg(out.path())
        .arg(file.path())
        .assert()
        .success();

    tmdl_cmd()
        .args(["format", "--check"])
        .arg(out.path())
        .assert()
        .success();
}
