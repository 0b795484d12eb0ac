// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

#[test]
fn new_rejects_inverted_range() {
    let err = TimeRange::new(at(2024, 1, 2, 0, 0, 0), at(2024, 1, 1, 0, 0, 0)).unwrap_err();
    assert!(matches!(err, TimeRangeError::Inverted { .. }));
}

#[test]
fn empty_range_is_allowed() {
    let t = at(2024, 1, 1, 0, 0, 0);
    let range = TimeRange::new(t, t).unwrap();
    assert!(range.is_empty());
    assert_eq!(range.duration(), TimeDelta::zero());
}

#[test]
fn closed_end_is_one_second_before_end() {
    let range = TimeRange::new(at(2024, 1, 1, 0, 0, 0), at(2024, 1, 2, 0, 0, 0)).unwrap();
    assert_eq!(range.closed_end(), at(2024, 1, 1, 23, 59, 59));
}

#[test]
fn from_closed_restores_half_open_end() {
    let range = TimeRange::from_closed(at(2024, 1, 1, 0, 0, 0), at(2024, 1, 1, 23, 59, 59)).unwrap();
    assert_eq!(range.end(), at(2024, 1, 2, 0, 0, 0));
}

#[test]
fn consecutive_ranges_are_adjacent() {
    let first = TimeRange::new(at(2024, 1, 1, 0, 0, 0), at(2024, 1, 2, 0, 0, 0)).unwrap();
    let second = TimeRange::new(at(2024, 1, 2, 0, 0, 0), at(2024, 1, 3, 0, 0, 0)).unwrap();
    assert!(first.is_adjacent_to(&second));
    assert!(!second.is_adjacent_to(&first));
}

#[test]
fn stamps_round_trip() {
    let t = at(2024, 3, 9, 7, 5, 1);
    assert_eq!(format_stamp(t), "20240309T070501");
    assert_eq!(parse_stamp("20240309T070501"), Some(t));
    assert_eq!(parse_stamp("20241339T070501"), None);
}

#[test]
fn truncate_drops_subseconds() {
    let t = at(2024, 1, 1, 0, 0, 0) + TimeDelta::milliseconds(999);
    assert_eq!(truncate_to_second(t), at(2024, 1, 1, 0, 0, 0));
}

#[test]
fn display_is_half_open() {
    let range = TimeRange::new(at(2024, 1, 1, 0, 0, 0), at(2024, 1, 2, 0, 0, 0)).unwrap();
    assert_eq!(range.to_string(), "[2024-01-01T00:00:00, 2024-01-02T00:00:00)");
}
