// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Half-open time ranges at one-second granularity

use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeDelta, Utc};
use std::fmt;
use thiserror::Error;

/// Timestamp layout used in artifact names
pub const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// One second, the granularity of artifact names
pub const ONE_SECOND: TimeDelta = TimeDelta::seconds(1);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeRangeError {
    #[error("range start {start} is after end {end}")]
    Inverted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// A half-open interval `[start, end)`
///
/// Ranges are stored half-open so consecutive ranges share a boundary
/// instant without overlapping. Artifact names carry the closed form
/// `[start, end - 1s]`; see [`TimeRange::closed_end`] and
/// [`TimeRange::from_closed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeRangeError> {
        if start > end {
            return Err(TimeRangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a range from a closed `[start, closed_end]` pair
    pub fn from_closed(
        start: DateTime<Utc>,
        closed_end: DateTime<Utc>,
    ) -> Result<Self, TimeRangeError> {
        Self::new(start, closed_end + ONE_SECOND)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Last whole second covered by the range
    pub fn closed_end(&self) -> DateTime<Utc> {
        self.end - ONE_SECOND
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// True when `next` starts exactly where this range ends
    pub fn is_adjacent_to(&self, next: &TimeRange) -> bool {
        self.end == next.start
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start.format("%Y-%m-%dT%H:%M:%S"),
            self.end.format("%Y-%m-%dT%H:%M:%S")
        )
    }
}

/// Drop any sub-second component
pub fn truncate_to_second(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(0)
}

/// Format an instant as `YYYYMMDDThhmmss`
pub fn format_stamp(instant: DateTime<Utc>) -> String {
    instant.format(STAMP_FORMAT).to_string()
}

/// Parse a `YYYYMMDDThhmmss` stamp as UTC
pub fn parse_stamp(stamp: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[path = "range_tests.rs"]
mod tests;
