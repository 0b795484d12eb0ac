// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker cycle state machine

use crate::range::TimeRange;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Phase of a worker's scheduling cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    /// Waiting for the next timer
    Idle,
    /// Querying availability and recovering local progress
    Checking,
    /// Remote data has not advanced
    NoNewData,
    /// Running the processing pipeline for a new range
    Processing,
    /// Mirroring the new artifact
    Uploading,
    /// Stopped on an unrecovered error
    Failed,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CyclePhase::Idle => "idle",
            CyclePhase::Checking => "checking",
            CyclePhase::NoNewData => "no_new_data",
            CyclePhase::Processing => "processing",
            CyclePhase::Uploading => "uploading",
            CyclePhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// What a cycle should do after checking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Remote availability equals local progress
    NoNewData,
    /// Remote availability is behind local progress
    Behind { latest_available: DateTime<Utc> },
    /// Process the newly available span
    Process(TimeRange),
}

/// Decide what to do given remote availability and the first unprocessed instant
pub fn decide(latest_available: DateTime<Utc>, last_evaluated_end: DateTime<Utc>) -> Decision {
    match TimeRange::new(last_evaluated_end, latest_available) {
        Ok(range) if range.is_empty() => Decision::NoNewData,
        Ok(range) => Decision::Process(range),
        Err(_) => Decision::Behind { latest_available },
    }
}

/// In-memory state of one spacecraft worker
///
/// Nothing here is persisted: progress is re-read from the output
/// directory on every cycle.
#[derive(Debug, Clone)]
pub struct WorkerState {
    pub phase: CyclePhase,
    /// Hint for the next cycle; the directory scan is authoritative
    pub last_evaluated_end: Option<DateTime<Utc>>,
    /// Start instant used while the output directory holds no artifacts
    pub fallback_start: DateTime<Utc>,
    pub wait_interval: Duration,
    /// Artifacts written locally whose mirror upload failed
    pub pending_uploads: Vec<PathBuf>,
}

impl WorkerState {
    pub fn new(fallback_start: DateTime<Utc>, wait_interval: Duration) -> Self {
        Self {
            phase: CyclePhase::Idle,
            last_evaluated_end: None,
            fallback_start,
            wait_interval,
            pending_uploads: Vec::new(),
        }
    }

    /// Move to `next`, returning the previous phase
    pub fn transition(&mut self, next: CyclePhase) -> CyclePhase {
        let previous = self.phase;
        tracing::debug!(from = %previous, to = %next, "phase transition");
        self.phase = next;
        previous
    }

    /// Record the end of a successfully processed range
    ///
    /// Never moves backwards, so the hint is monotonic across cycles.
    pub fn advance_to(&mut self, end: DateTime<Utc>) {
        self.last_evaluated_end = Some(match self.last_evaluated_end {
            Some(current) if current > end => current,
            _ => end,
        });
    }

    /// Queue an artifact for a later upload attempt
    pub fn defer_upload(&mut self, artifact: PathBuf) {
        if !self.pending_uploads.contains(&artifact) {
            self.pending_uploads.push(artifact);
        }
    }

    /// Take the queued uploads, leaving the queue empty
    pub fn take_pending_uploads(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.pending_uploads)
    }
}

#[cfg(test)]
#[path = "cycle_tests.rs"]
mod tests;
