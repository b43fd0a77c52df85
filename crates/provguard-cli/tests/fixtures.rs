//! End-to-end CLI integration tests using test fixtures.
//!
//! Each fixture in `tests/fixtures/` contains:
//! - `org.json` and `repo.json` policy documents
//! - `expected.json` listing evaluation cases (inputs, expected status, exit code),
//!   and `load_error` when the pair must be rejected by the loader
//!
//! Every case is run through `provguard eval` and checked for:
//! 1. Exit code (0 = pass/audit, 2 = fail, 3 = invalid, 1 = load error)
//! 2. The report's outcome status, diagnostic phase and field
//! 3. The report validating against the generated report schema

use assert_cmd::Command;
use predicates::prelude::*;
use provguard_types::ProvguardReport;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to get a Command for the provguard binary.
#[allow(deprecated)]
fn provguard_cmd() -> Command {
    Command::cargo_bin("provguard").expect("provguard binary not found - run `cargo build` first")
}

/// Get the path to the test fixtures directory
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("provguard-cli crate should have a parent directory")
        .parent()
        .expect("crates directory should have a parent (repo root)")
        .join("tests")
        .join("fixtures")
}

fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).expect("read json file");
    serde_json::from_str(&text).expect("parse json file")
}

fn report_validator() -> jsonschema::Validator {
    let schema = serde_json::to_value(schemars::schema_for!(ProvguardReport)).expect("schema");
    jsonschema::validator_for(&schema).expect("compile report schema")
}

/// Run `provguard eval` for one case and return the exit code and JSON report.
fn run_case(fixture: &Path, case: &Value) -> (i32, Value) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.json");

    let mut cmd = provguard_cmd();
    cmd.arg("eval")
        .arg("--org")
        .arg(fixture.join("org.json"))
        .arg("--repo")
        .arg(fixture.join("repo.json"))
        .arg("--source-uri")
        .arg(case["source_uri"].as_str().expect("source_uri"))
        .arg("--image-uri")
        .arg(case["image_uri"].as_str().expect("image_uri"))
        .arg("--builder-id")
        .arg(case["builder_id"].as_str().expect("builder_id"))
        .arg("--report-out")
        .arg(&report_path)
        .env_remove("PROVGUARD_LOG");
    if case["no_modes"].as_bool().unwrap_or(false) {
        cmd.arg("--no-modes");
    }

    let output = cmd.output().expect("Failed to run command");
    let exit_code = output.status.code().unwrap_or(-1);
    (exit_code, read_json(&report_path))
}

fn check_fixture(name: &str) {
    let fixture = fixtures_dir().join(name);
    let expected = read_json(&fixture.join("expected.json"));
    let validator = report_validator();
    let cases = expected["cases"].as_array().expect("cases array");
    assert!(!cases.is_empty(), "fixture '{name}' has no cases");

    for (i, case) in cases.iter().enumerate() {
        let (exit_code, report) = run_case(&fixture, case);
        let label = format!("fixture '{name}' case {i}");

        assert_eq!(
            exit_code,
            case["exit_code"].as_i64().expect("exit_code") as i32,
            "{label}: exit code\n{report:#}"
        );

        let errors: Vec<String> = validator.iter_errors(&report).map(|e| e.to_string()).collect();
        assert!(errors.is_empty(), "{label}: report schema errors {errors:?}");

        if let Some(rule) = expected["load_error"].as_str() {
            assert!(report.get("outcome").is_none(), "{label}: unexpected outcome");
            let error = report["error"].as_str().expect("error recorded");
            assert!(error.contains(rule), "{label}: {error}");
            continue;
        }

        let outcome = &report["outcome"];
        assert_eq!(outcome["status"], case["status"], "{label}: status\n{report:#}");
        match case.get("field") {
            Some(field) => {
                assert_eq!(&outcome["diagnostic"]["field"], field, "{label}: field");
                if let Some(phase) = case.get("phase") {
                    assert_eq!(&outcome["diagnostic"]["phase"], phase, "{label}: phase");
                }
            }
            None => assert!(outcome.get("diagnostic").is_none(), "{label}: diagnostic"),
        }
    }
}

// ============================================================================
// Fixture tests
// ============================================================================

#[test]
fn fixture_pass() {
    check_fixture("pass");
}

#[test]
fn fixture_image_mismatch() {
    check_fixture("image_mismatch");
}

#[test]
fn fixture_empty_defaults_sources() {
    check_fixture("empty_defaults_sources");
}

#[test]
fn fixture_ownership_blocks_repo() {
    check_fixture("ownership_blocks_repo");
}

#[test]
fn fixture_project_exception() {
    check_fixture("project_exception");
}

#[test]
fn fixture_audit_mode() {
    check_fixture("audit_mode");
}

#[test]
fn fixture_repo_loosens_mode() {
    check_fixture("repo_loosens_mode");
}

#[test]
fn fixture_repo_restricts_images() {
    check_fixture("repo_restricts_images");
}

// ============================================================================
// CLI behavior tests
// ============================================================================

#[test]
fn eval_prints_outcome_line_on_stdout() {
    let fixture = fixtures_dir().join("image_mismatch");
    provguard_cmd()
        .arg("eval")
        .arg("--org")
        .arg(fixture.join("org.json"))
        .arg("--repo")
        .arg(fixture.join("repo.json"))
        .args([
            "--source-uri",
            "git+https://github.com/acme/widgets",
            "--image-uri",
            "evil.com/widgets:v1",
            "--builder-id",
            "anything",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::starts_with("FAIL: org policy: image uri mismatch"))
        .stdout(predicate::str::contains("evil.com/widgets:v1"));
}

#[test]
fn eval_report_out_creates_parent_dirs() {
    let fixture = fixtures_dir().join("pass");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("subdir").join("report.json");

    provguard_cmd()
        .arg("eval")
        .arg("--org")
        .arg(fixture.join("org.json"))
        .arg("--repo")
        .arg(fixture.join("repo.json"))
        .args([
            "--source-uri",
            "git+https://github.com/acme/widgets",
            "--image-uri",
            "registry.acme.com/widgets:v1",
            "--builder-id",
            "anything",
        ])
        .arg("--report-out")
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::diff("PASS\n"));

    let report = read_json(&report_path);
    assert_eq!(report["schema"], "provguard.report.v1");
    assert_eq!(report["policies"].as_array().map(Vec::len), Some(2));
    let sha = report["policies"][0]["sha256"].as_str().expect("sha256");
    assert_eq!(sha.len(), 64);
}

#[test]
fn eval_wildcard_input_is_invalid() {
    let fixture = fixtures_dir().join("pass");
    provguard_cmd()
        .arg("eval")
        .arg("--org")
        .arg(fixture.join("org.json"))
        .arg("--repo")
        .arg(fixture.join("repo.json"))
        .args([
            "--source-uri",
            "git+https://github.com/acme/*",
            "--image-uri",
            "registry.acme.com/widgets:v1",
            "--builder-id",
            "anything",
        ])
        .assert()
        .code(3)
        .stdout(predicate::str::starts_with("INVALID: input:"));
}

#[test]
fn eval_missing_policy_file_exits_1() {
    let fixture = fixtures_dir().join("pass");
    provguard_cmd()
        .arg("eval")
        .arg("--org")
        .arg(fixture.join("does-not-exist.json"))
        .arg("--repo")
        .arg(fixture.join("repo.json"))
        .args([
            "--source-uri",
            "git+https://github.com/acme/widgets",
            "--image-uri",
            "registry.acme.com/widgets:v1",
            "--builder-id",
            "anything",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("read organization policy"))
        .stderr(predicate::str::contains("does-not-exist.json"));
}

#[test]
fn policy_paths_fall_back_to_environment() {
    let fixture = fixtures_dir().join("pass");
    provguard_cmd()
        .env("PROVGUARD_ORG_POLICY", fixture.join("org.json"))
        .env("PROVGUARD_REPO_POLICY", fixture.join("repo.json"))
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
}

#[test]
fn validate_reports_load_error() {
    let fixture = fixtures_dir().join("empty_defaults_sources");
    provguard_cmd()
        .arg("validate")
        .arg("--org")
        .arg(fixture.join("org.json"))
        .arg("--repo")
        .arg(fixture.join("repo.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("OK").not())
        .stderr(predicate::str::contains("defaults_sources_non_empty"));
}

#[test]
fn verbose_logs_go_to_stderr() {
    let fixture = fixtures_dir().join("image_mismatch");
    provguard_cmd()
        .arg("--verbose")
        .arg("eval")
        .arg("--org")
        .arg(fixture.join("org.json"))
        .arg("--repo")
        .arg(fixture.join("repo.json"))
        .args([
            "--source-uri",
            "git+https://github.com/acme/widgets",
            "--image-uri",
            "evil.com/widgets:v1",
            "--builder-id",
            "anything",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("owns source"))
        .stdout(predicate::str::contains("owns source").not());
}
