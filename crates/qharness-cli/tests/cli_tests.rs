//! End-to-end tests of the `qharness` binary.

use std::process::Command;

fn qharness() -> Command {
    Command::new(env!("CARGO_BIN_EXE_qharness"))
}

#[test]
fn test_version() {
    let out = qharness().arg("version").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_scenarios_lists_default_matrix() {
    let out = qharness().arg("scenarios").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("sat/test_grover_tiny/basic/off/qasm_simulator"));
    assert!(stdout.contains("hhl/identity/negative/[-1,0]"));
}

#[test]
fn test_sat_builtin_passes() {
    let out = qharness()
        .args(["sat", "--builtin", "test_grover_tiny", "--iterations", "1"])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Top measurement:  01"));
}

#[test]
fn test_sat_rejects_unknown_mct_mode() {
    let out = qharness()
        .args(["sat", "--builtin", "test_grover_tiny", "--incremental", "--mct-mode", "fancy"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("fancy"));
}

#[test]
fn test_linear_identity_passes() {
    let out = qharness()
        .args(["linear", "--matrix", "[[1,0],[0,1]]", "--vector", "[1,10]"])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("PASS"));
}

#[test]
fn test_linear_rejects_bad_json() {
    let out = qharness()
        .args(["linear", "--matrix", "[[1,0],[0,1]", "--vector", "[1,1]"])
        .output()
        .unwrap();
    assert!(!out.status.success());
}

#[test]
fn test_suite_exports_report() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("report.json");
    let out = qharness()
        .args(["suite", "--filter", "hhl/identity/lookup", "--export"])
        .arg(&report)
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["summary"]["total"], 4);
    assert_eq!(json["summary"]["passed"], 4);
    assert_eq!(json["schema_version"], "0.1.0");
}

#[test]
fn test_suite_with_empty_filter_fails() {
    let out = qharness()
        .args(["suite", "--filter", "no-such-case"])
        .output()
        .unwrap();
    assert!(!out.status.success());
}

#[test]
fn test_suite_runs_a_scenario_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("tiny.cnf"),
        "c This instance has solution: 1 -2 0\np cnf 2 3\n1 2 0\n1 -2 0\n-1 -2 0\n",
    )
    .unwrap();
    let scenarios = dir.path().join("cases.yaml");
    std::fs::write(
        &scenarios,
        r#"- name: sat/file
  problem:
    sat:
      file: tiny.cnf
  algorithm:
    iterations:
      fixed: 1
    mct_mode: noancilla
- name: hhl/identity
  problem:
    linear:
      matrix: [[1, 0], [0, 1]]
      vector: [1, 10]
  reciprocal:
    mode: long_division
    scale: 1.0
"#,
    )
    .unwrap();
    let report = dir.path().join("report.json");

    let out = qharness()
        .arg("suite")
        .arg("--scenarios")
        .arg(&scenarios)
        .arg("--export")
        .arg(&report)
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["summary"]["total"], 2);
    assert_eq!(json["summary"]["passed"], 2);
}
