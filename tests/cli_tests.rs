use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn cli() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("ssz-static-gen").unwrap()
}

fn read_json(path: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn count_case_dirs(suite_dir: &Path) -> usize {
    std::fs::read_dir(suite_dir)
        .map(|entries| entries.filter_map(|e| e.ok()).count())
        .unwrap_or(0)
}

#[test]
fn test_generate_writes_layout() {
    let temp_dir = TempDir::new().unwrap();
    let report_path = temp_dir.path().join("report.json");

    cli()
        .args(["generate", "--fork", "phase0", "--preset", "minimal", "--count", "2"])
        .arg("--output")
        .arg(temp_dir.path().join("out"))
        .arg("--report")
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated"));

    let handler = temp_dir.path().join("out/minimal/phase0/ssz_static/Checkpoint");
    for fixed in ["ssz_zero", "ssz_max", "ssz_nil", "ssz_one"] {
        assert_eq!(count_case_dirs(&handler.join(fixed)), 1, "{}", fixed);
    }
    for changing in ["ssz_random", "ssz_lengthy", "ssz_random_chaos"] {
        assert_eq!(count_case_dirs(&handler.join(changing)), 2, "{}", changing);
    }
    // mainnet rows are filtered out
    assert!(!temp_dir.path().join("out/mainnet").exists());

    let case = handler.join("ssz_max/case_0");
    assert_eq!(
        std::fs::read(case.join("serialized.ssz")).unwrap(),
        vec![0xffu8; 40]
    );
    let value = read_json(&case.join("value.json"));
    assert_eq!(value["epoch"], serde_json::json!(u64::MAX));
    assert_eq!(value["root"], format!("0x{}", "ff".repeat(32)));
    let roots = read_json(&case.join("roots.json"));
    assert!(roots["root"].as_str().unwrap().starts_with("0x"));

    let report = read_json(&report_path);
    assert_eq!(report["providers"].as_array().unwrap().len(), 7);
    // altair is filtered by fork, mainnet by preset
    assert_eq!(report["skipped_providers"].as_array().unwrap().len(), 9);
}

#[test]
fn test_generate_is_deterministic_and_skips_existing() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let args = ["generate", "--fork", "altair", "--preset", "minimal", "--count", "1"];

    for dir in [&first, &second] {
        cli().args(args).arg("-o").arg(dir.path()).assert().success();
    }
    let relative = "minimal/altair/ssz_static/SyncAggregate/ssz_random_chaos/case_0/serialized.ssz";
    assert_eq!(
        std::fs::read(first.path().join(relative)).unwrap(),
        std::fs::read(second.path().join(relative)).unwrap()
    );

    let output = cli()
        .args(args)
        .arg("-o")
        .arg(first.path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let providers = report["providers"].as_array().unwrap();
    assert!(providers.iter().all(|p| p["cases_written"] == 0));
    assert!(providers.iter().all(|p| p["cases_skipped"].as_u64().unwrap() > 0));
}

#[test]
fn test_generate_rejects_unknown_fork() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .args(["generate", "--fork", "bellatrix"])
        .arg("-o")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("bellatrix"));
}

#[test]
fn test_list_types_json() {
    let output = cli()
        .args(["list-types", "--fork", "altair", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"SyncCommittee"));
    assert!(names.contains(&"BeaconState"));
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn test_case_command() {
    let output = cli()
        .args(["case", "--type", "Checkpoint", "--mode", "zero", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let case: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(case["suite"], "ssz_zero");
    assert_eq!(case["serialized"], format!("0x{}", "00".repeat(40)));
    assert_eq!(case["value"]["epoch"], 0);
}

#[test]
fn test_case_command_unknown_type() {
    cli()
        .args(["case", "--type", "SyncCommittee", "--fork", "phase0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not in the phase0 catalog"));
}
