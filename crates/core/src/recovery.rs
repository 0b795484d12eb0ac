// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recover processing progress from previously written artifact names
//!
//! The output directory is the only durable record of what has been
//! processed. [`latest_covered`] is the pure part of the scan and works on
//! any listing of names; [`scan_directory`] feeds it from the filesystem.
//! Only artifacts of the worker's own spacecraft and grade count as progress.

use crate::artifact::ArtifactName;
use crate::spacecraft::{Grade, Spacecraft};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How far previously written artifacts reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// First instant not yet covered by any artifact
    Covered(DateTime<Utc>),
    /// No decodable artifact exists yet
    NoPriorArtifact,
}

impl Coverage {
    /// First uncovered instant, or `fallback` when nothing has been written
    pub fn or_fallback(self, fallback: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Coverage::Covered(until) => until,
            Coverage::NoPriorArtifact => fallback,
        }
    }
}

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("failed to read output directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Latest instant covered by `spacecraft`/`grade` artifacts in a listing
///
/// Names that do not decode as artifacts, or that belong to another
/// spacecraft or grade, are skipped.
pub fn latest_covered<I, S>(names: I, spacecraft: Spacecraft, grade: Grade) -> Coverage
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| {
            let Some(artifact) = ArtifactName::decode(name.as_ref()) else {
                tracing::trace!(name = name.as_ref(), "ignoring non-artifact entry");
                return None;
            };
            if artifact.spacecraft != spacecraft || artifact.grade != grade {
                tracing::debug!(name = name.as_ref(), "ignoring artifact of another stream");
                return None;
            }
            Some(artifact)
        })
        .map(|artifact| artifact.range.end())
        .max()
        .map_or(Coverage::NoPriorArtifact, Coverage::Covered)
}

/// Scan `dir` (creating it when missing) and report how far
/// `spacecraft`/`grade` artifacts reach
pub fn scan_directory(
    dir: &Path,
    spacecraft: Spacecraft,
    grade: Grade,
) -> Result<Coverage, RecoveryError> {
    let io_err = |source| RecoveryError::Io {
        path: dir.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(io_err)?;

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        // Non-UTF-8 names can never be artifacts
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }

    Ok(latest_covered(&names, spacecraft, grade))
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
