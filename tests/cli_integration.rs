//! CLI integration tests.

#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn write_file(dir: &std::path::Path, name: &str, contents: &str) {
    let mut file = std::fs::File::create(dir.join(name)).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
}

#[test]
fn test_no_args_prints_help() {
    Command::cargo_bin("attenua")
        .unwrap()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_config_path_prints_toml_path() {
    Command::cargo_bin("attenua")
        .unwrap()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_species_lists_proxy_resolutions() {
    Command::cargo_bin("attenua")
        .unwrap()
        .arg("species")
        .assert()
        .success()
        .stdout(predicate::str::contains("OVEN"))
        .stdout(predicate::str::contains("WAVI (proxy: REVI)"))
        .stdout(predicate::str::contains("PHVI (shares WAVI's thresholds)"));
}

#[test]
fn test_rejects_out_of_range_distance() {
    Command::cargo_bin("attenua")
        .unwrap()
        .args(["--distances", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 30 and 500"));
}

#[test]
fn test_missing_companion_inputs_fail() {
    Command::cargo_bin("attenua")
        .unwrap()
        .args(["--detections", "detections.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--amplitude-table"));
}

#[test]
fn test_full_run_writes_matrix() {
    let dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write_file(
        dir.path(),
        "detections.csv",
        "Site,Visit,Species,Mean amplitude (dBFS),Years since harvest,Recorder\n\
         C-012,2019-06-14T05:12:00,OVEN,-28.0,8,SM2\n\
         C-012,2019-06-15T05:03:00,TEWA,-31.5,8,SM2\n",
    );
    write_file(
        dir.path(),
        "amplitude.csv",
        "Distance (m),Species,Habitat,Recorder,Predicted amplitude (dBFS),Lower bound (dBFS),Upper bound (dBFS)\n\
         100.2,OVEN,open,SM2,-30.0,-33.0,-27.0\n",
    );
    write_file(dir.path(), "site_visits.csv", "Site,Visits\nC-012,14\n");

    Command::cargo_bin("attenua")
        .unwrap()
        .args([
            "--detections",
            dir.path().join("detections.csv").to_str().unwrap(),
            "--amplitude-table",
            dir.path().join("amplitude.csv").to_str().unwrap(),
            "--site-visits",
            dir.path().join("site_visits.csv").to_str().unwrap(),
            "--output-dir",
            out.path().to_str().unwrap(),
            "--distances",
            "100",
            "--no-progress",
        ])
        .assert()
        .success();

    assert!(out.path().join("abundance_100m.csv").exists());
    assert!(out.path().join("truncation_summary.json").exists());
}
