// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Artifact filename codec
//!
//! Artifacts are named
//! `SW_{GRADE}_FAC{SAT}TMS_2F_{START}_{END}_{VARIANT}.cdf` where the two
//! stamps form a closed interval at one-second resolution. The name is the
//! only record of what has been processed, so encoding and decoding must
//! agree exactly.

use crate::range::{format_stamp, parse_stamp, TimeRange};
use crate::spacecraft::{Grade, Spacecraft};
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Variant token written by this system
pub const DEFAULT_VARIANT: &str = "XXXX";

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^SW_(FAST|OPER)_FAC(A|B|C)TMS_2F_(\d{8}T\d{6})_(\d{8}T\d{6})_(.{4})\.(?:cdf|CDF)$",
    )
    .expect("constant regex pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("cannot name an empty range starting at {0}")]
    EmptyRange(String),
}

/// Identity of one output artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactName {
    pub spacecraft: Spacecraft,
    pub grade: Grade,
    pub range: TimeRange,
    variant: String,
}

impl ArtifactName {
    pub fn new(spacecraft: Spacecraft, grade: Grade, range: TimeRange) -> Result<Self, NameError> {
        if range.is_empty() {
            return Err(NameError::EmptyRange(format_stamp(range.start())));
        }
        Ok(Self {
            spacecraft,
            grade,
            range,
            variant: DEFAULT_VARIANT.to_string(),
        })
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Encode as a file name, converting the range to its closed form
    pub fn encode(&self) -> String {
        format!(
            "SW_{}_FAC{}TMS_2F_{}_{}_{}.cdf",
            self.grade,
            self.spacecraft,
            format_stamp(self.range.start()),
            format_stamp(self.range.closed_end()),
            self.variant
        )
    }

    /// Decode a file name; `None` for anything that is not an artifact name
    pub fn decode(name: &str) -> Option<Self> {
        let caps = NAME_PATTERN.captures(name)?;
        let grade = caps[1].parse().ok()?;
        let spacecraft = caps[2].parse().ok()?;
        let start = parse_stamp(&caps[3])?;
        let closed_end = parse_stamp(&caps[4])?;
        let range = TimeRange::from_closed(start, closed_end).ok()?;

        Some(Self {
            spacecraft,
            grade,
            range,
            variant: caps[5].to_string(),
        })
    }

    /// Full path of this artifact inside `dir`
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.encode())
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;
