// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{TimeZone, Utc};
use fac_core::{scan_directory, Coverage, Grade, Spacecraft, TimeRange};
use std::path::Path;

fn request(output: &Path) -> ProcessRequest {
    ProcessRequest {
        spacecraft: Spacecraft::A,
        grade: Grade::Fast,
        range: TimeRange::new(
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
        )
        .unwrap(),
        output: output.to_path_buf(),
    }
}

#[test]
fn interpolate_leaves_unknown_variables() {
    let vars = HashMap::from([("grade", "FAST".to_string())]);
    assert_eq!(interpolate("{grade}-{other}", &vars), "FAST-{other}");
}

#[test]
fn build_args_fills_placeholders() {
    let processor = CommandProcessor::new(
        "swarmpal-fac",
        vec![
            "--spacecraft=Swarm-{spacecraft}".to_string(),
            "--grade".to_string(),
            "{grade}".to_string(),
            "{start}".to_string(),
            "{end}".to_string(),
            "{output}".to_string(),
        ],
    );

    let args = processor.build_args(&request(Path::new("/out/a.cdf")));
    assert_eq!(
        args,
        vec![
            "--spacecraft=Swarm-A",
            "--grade",
            "FAST",
            "2024-01-02T00:00:00Z",
            "2024-01-03T00:00:00Z",
            "/out/a.cdf.part",
        ]
    );
}

#[tokio::test]
async fn successful_command_must_write_artifact() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("Sat_A").join("artifact.cdf");

    let processor = CommandProcessor::new("touch", vec!["{output}".to_string()]);
    let path = processor.run(&request(&output)).await.unwrap();

    assert_eq!(path, output);
    assert!(output.exists());
    assert!(!staging_path(&output).exists());
}

#[test]
fn staging_path_appends_suffix() {
    assert_eq!(
        staging_path(Path::new("/out/Sat_A/x.cdf")),
        Path::new("/out/Sat_A/x.cdf.part")
    );
}

#[tokio::test]
async fn failed_run_leaves_no_progress_behind() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path().join("Sat_A");
    let output = dir.join("SW_FAST_FACATMS_2F_20240102T000000_20240102T235959_XXXX.cdf");
    let processor = CommandProcessor::new(
        "sh",
        vec![
            "-c".to_string(),
            "echo partial > \"$0\"; exit 1".to_string(),
            "{output}".to_string(),
        ],
    );

    let err = processor.run(&request(&output)).await.unwrap_err();

    assert!(matches!(err, ProcessError::Exited { code: Some(1), .. }));
    assert!(!output.exists());
    assert!(!staging_path(&output).exists());
    assert_eq!(
        scan_directory(&dir, Spacecraft::A, Grade::Fast).unwrap(),
        Coverage::NoPriorArtifact
    );
}

#[tokio::test]
async fn stale_staged_output_is_not_published() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("artifact.cdf");
    std::fs::write(staging_path(&output), b"stale").unwrap();

    let processor = CommandProcessor::new("true", Vec::new());
    let err = processor.run(&request(&output)).await.unwrap_err();

    assert!(matches!(err, ProcessError::MissingArtifact(_)));
    assert!(!output.exists());
    assert!(!staging_path(&output).exists());
}

#[tokio::test]
async fn command_without_artifact_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("artifact.cdf");

    let processor = CommandProcessor::new("true", Vec::new());
    let err = processor.run(&request(&output)).await.unwrap_err();

    assert!(matches!(err, ProcessError::MissingArtifact(_)));
}

#[tokio::test]
async fn failing_command_reports_exit_code() {
    let temp = tempfile::tempdir().unwrap();
    let processor = CommandProcessor::new(
        "sh",
        vec!["-c".to_string(), "echo boom >&2; exit 3".to_string()],
    );

    let err = processor
        .run(&request(&temp.path().join("a.cdf")))
        .await
        .unwrap_err();

    match err {
        ProcessError::Exited { code, stderr } => {
            assert_eq!(code, Some(3));
            assert_eq!(stderr, "boom");
        }
        other => panic!("expected Exited, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_program_is_a_spawn_error() {
    let temp = tempfile::tempdir().unwrap();
    let processor = CommandProcessor::new("definitely-not-a-real-program-fac", Vec::new());
    let err = processor
        .run(&request(&temp.path().join("a.cdf")))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::Spawn { .. }));
}
