// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::spacecraft::{Grade, Spacecraft};
use chrono::TimeZone;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

#[test]
fn empty_listing_has_no_prior_artifact() {
    assert_eq!(
        latest_covered(Vec::<String>::new(), Spacecraft::A, Grade::Fast),
        Coverage::NoPriorArtifact
    );
}

#[test]
fn latest_end_wins_regardless_of_order() {
    let names = [
        "SW_FAST_FACATMS_2F_20240102T000000_20240102T235959_XXXX.cdf",
        "SW_FAST_FACATMS_2F_20240101T000000_20240101T235959_XXXX.cdf",
        "SW_FAST_FACATMS_2F_20240103T000000_20240103T115959_XXXX.cdf",
    ];
    assert_eq!(
        latest_covered(names, Spacecraft::A, Grade::Fast),
        Coverage::Covered(at(2024, 1, 3, 12, 0, 0))
    );
}

#[test]
fn unrelated_names_are_ignored() {
    let names = [
        "README.md",
        "SW_FAST_FACATMS_2F_20240101T000000_20240101T235959_ABCD.cdf",
        "SW_FAST_FACATMS_2F_20240105T000000_20240105T235959_ABCD.cdf.part",
        ".DS_Store",
    ];
    assert_eq!(
        latest_covered(names, Spacecraft::A, Grade::Fast),
        Coverage::Covered(at(2024, 1, 2, 0, 0, 0))
    );
}

#[test]
fn only_unrelated_names_has_no_prior_artifact() {
    assert_eq!(
        latest_covered(["a.txt", "b.cdf"], Spacecraft::A, Grade::Fast),
        Coverage::NoPriorArtifact
    );
}

#[test]
fn other_streams_do_not_count_as_progress() {
    let names = [
        "SW_FAST_FACATMS_2F_20240101T000000_20240101T235959_XXXX.cdf",
        "SW_OPER_FACATMS_2F_20240101T000000_20240110T235959_0101.cdf",
        "SW_FAST_FACBTMS_2F_20240101T000000_20240120T235959_XXXX.cdf",
    ];
    assert_eq!(
        latest_covered(names, Spacecraft::A, Grade::Fast),
        Coverage::Covered(at(2024, 1, 2, 0, 0, 0))
    );
    assert_eq!(
        latest_covered(names, Spacecraft::A, Grade::Oper),
        Coverage::Covered(at(2024, 1, 11, 0, 0, 0))
    );
    assert_eq!(
        latest_covered(names, Spacecraft::C, Grade::Fast),
        Coverage::NoPriorArtifact
    );
}

#[test]
fn or_fallback_substitutes_only_when_nothing_written() {
    let fallback = at(2023, 12, 29, 0, 0, 0);
    let covered = at(2024, 1, 2, 0, 0, 0);
    assert_eq!(Coverage::NoPriorArtifact.or_fallback(fallback), fallback);
    assert_eq!(Coverage::Covered(covered).or_fallback(fallback), covered);
}

#[test]
fn scan_creates_missing_directory() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path().join("outputs").join("Sat_A");

    let coverage = scan_directory(&dir, Spacecraft::A, Grade::Fast).unwrap();

    assert_eq!(coverage, Coverage::NoPriorArtifact);
    assert!(dir.is_dir());
}

#[test]
fn scan_reads_artifacts_from_disk() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(
        temp.path()
            .join("SW_FAST_FACATMS_2F_20240101T000000_20240101T235959_ABCD.cdf"),
        b"",
    )
    .unwrap();
    std::fs::write(temp.path().join("processor.log"), b"noise").unwrap();
    std::fs::create_dir(temp.path().join("subdir")).unwrap();

    assert_eq!(
        scan_directory(temp.path(), Spacecraft::A, Grade::Fast).unwrap(),
        Coverage::Covered(at(2024, 1, 2, 0, 0, 0))
    );
}

#[test]
fn scan_is_idempotent() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(
        temp.path()
            .join("SW_FAST_FACBTMS_2F_20240101T000000_20240101T235959_XXXX.cdf"),
        b"",
    )
    .unwrap();

    let first = scan_directory(temp.path(), Spacecraft::B, Grade::Fast).unwrap();
    let second = scan_directory(temp.path(), Spacecraft::B, Grade::Fast).unwrap();
    assert_eq!(first, second);
}

#[test]
fn scan_fails_when_path_is_a_file() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("not-a-dir");
    std::fs::write(&file, b"").unwrap();

    assert!(matches!(
        scan_directory(&file, Spacecraft::A, Grade::Fast),
        Err(RecoveryError::Io { .. })
    ));
}
