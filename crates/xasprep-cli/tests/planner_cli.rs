use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_xasprep(args: &[&str]) -> Output {
    let binary_path = env!("CARGO_BIN_EXE_xasprep");
    Command::new(binary_path)
        .args(args)
        .env_remove("XASPREP_LOG")
        .output()
        .expect("xasprep should start")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dir should be created");
    }
    fs::write(path, content).expect("file should be written");
}

#[test]
fn mix_command_prints_mass_split() {
    let output = run_xasprep(&[
        "mix",
        "--sample-edge-step",
        "120",
        "--diluent-edge-step",
        "10",
        "--total-mass-mg",
        "150",
        "--area-cm2",
        "1.0",
        "--target-edge-step",
        "2.0",
    ]);

    assert!(
        output.status.success(),
        "mix should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Sample mass: 4.545 mg"), "stdout: {stdout}");
    assert!(stdout.contains("Diluent mass: 145.455 mg"), "stdout: {stdout}");
    assert!(stdout.contains("Areal density: 0.150 g/cm^2"), "stdout: {stdout}");
}

#[test]
fn mix_command_json_reports_null_when_infeasible() {
    let output = run_xasprep(&[
        "--json",
        "mix",
        "--sample-edge-step",
        "10",
        "--diluent-edge-step",
        "10",
        "--total-mass-mg",
        "150",
        "--area-cm2",
        "1.0",
        "--target-edge-step",
        "1.0",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output), Value::Null);
}

#[test]
fn mix_command_requires_exactly_one_area_source() {
    let output = run_xasprep(&[
        "mix",
        "--sample-edge-step",
        "120",
        "--diluent-edge-step",
        "10",
        "--total-mass-mg",
        "150",
        "--target-edge-step",
        "2.0",
    ]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[INPUT.CLI_USAGE]"), "stderr: {stderr}");
}

#[test]
fn suggest_command_uses_pellet_diameter_and_config_target() {
    let temp = TempDir::new().expect("tempdir should be created");
    let config_path = temp.path().join("planner.json");
    write_file(&config_path, r#"{ "targetAbsorption": 2.5 }"#);

    let output = run_xasprep(&[
        "--json",
        "--config",
        config_path.to_str().expect("utf-8 path"),
        "suggest",
        "--sample-edge-step",
        "100",
        "--diluent-edge-step",
        "0",
        "--total-mass-mg",
        "100",
        "--diameter-mm",
        "13",
        "--sample-mu-above",
        "120",
        "--diluent-mu-above",
        "1",
    ]);

    assert!(
        output.status.success(),
        "suggest should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let parsed = stdout_json(&output);
    let absorption = parsed["absorption"].as_f64().expect("absorption field");
    assert!((absorption - 2.5).abs() < 1e-4);
    let sample = parsed["mix"]["sampleMassMg"].as_f64().expect("sample mass");
    let diluent = parsed["mix"]["diluentMassMg"].as_f64().expect("diluent mass");
    assert!((sample + diluent - 100.0).abs() < 1e-6);
}

#[test]
fn suggest_command_exits_one_when_target_is_unreachable() {
    let output = run_xasprep(&[
        "suggest",
        "--sample-edge-step",
        "50",
        "--diluent-edge-step",
        "0",
        "--total-mass-mg",
        "1000",
        "--area-cm2",
        "0.1",
        "--sample-mu-above",
        "8",
        "--diluent-mu-above",
        "6",
        "--target-absorption",
        "4",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("No edge-step"));
}

#[test]
fn classify_command_prints_summary() {
    let output = run_xasprep(&["classify", "--mu-t", "4.0", "--r-percent", "90"]);

    assert!(output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stdout)
            .contains("Transmission not suitable / Fluorescence suitable")
    );
}

#[test]
fn gas_add_command_appends_and_rebalances() {
    let output = run_xasprep(&[
        "--json", "gas", "add", "--gas", "N2=0.7", "--gas", "He=0.3", "--name", "Ar",
        "--fraction", "0.1",
    ]);

    assert!(
        output.status.success(),
        "gas add should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let parsed = stdout_json(&output);
    let gases = parsed.as_array().expect("mixture should be an array");
    assert_eq!(gases.len(), 3);
    assert_eq!(gases[2]["name"], "Ar");
    let sum: f64 = gases
        .iter()
        .map(|gas| gas["fraction"].as_f64().expect("fraction"))
        .sum();
    assert!((sum - 1.0).abs() < 1e-6);
}

#[test]
fn gas_update_command_rescales_others() {
    let output = run_xasprep(&[
        "gas", "update", "--gas", "N2=0.6", "--gas", "He=0.4", "--index", "0", "--fraction",
        "0.2",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("N2  0.200"), "stdout: {stdout}");
    assert!(stdout.contains("He  0.800"), "stdout: {stdout}");
}

#[test]
fn gas_remove_command_rejects_bad_index() {
    let output = run_xasprep(&[
        "gas", "remove", "--gas", "N2=0.5", "--gas", "He=0.5", "--index", "5",
    ]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[INPUT.GAS_INDEX]"), "stderr: {stderr}");
}

#[test]
fn gas_command_rejects_unbalanced_input() {
    let output = run_xasprep(&[
        "gas", "remove", "--gas", "N2=0.5", "--gas", "He=0.2", "--index", "0",
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[INPUT.GAS_SUM]"));
}

#[test]
fn range_command_reports_point_count_and_limits() {
    let ok = run_xasprep(&[
        "--json", "range", "--start", "8900", "--end", "9100", "--step", "0.5",
    ]);
    assert!(ok.status.success());
    let parsed = stdout_json(&ok);
    assert_eq!(parsed["pointCount"], 401);
    assert_eq!(parsed["maxPoints"], 5000);

    let dense = run_xasprep(&[
        "range", "--start", "0", "--end", "1000", "--step", "0.1", "--max-points", "500",
    ]);
    assert_eq!(dense.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&dense.stderr);
    assert!(stderr.contains("Too many points (10001)"), "stderr: {stderr}");

    let reversed = run_xasprep(&["range", "--start", "10", "--end", "5", "--step", "1"]);
    assert!(String::from_utf8_lossy(&reversed.stderr).contains("End must be greater than start"));
}

#[test]
fn unreadable_config_is_an_io_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let missing = temp.path().join("missing.json");

    let output = run_xasprep(&[
        "--config",
        missing.to_str().expect("utf-8 path"),
        "classify",
        "--mu-t",
        "1",
        "--r-percent",
        "95",
    ]);

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[IO.CONFIG]"));
}
