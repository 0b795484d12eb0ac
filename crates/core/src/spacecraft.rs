// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spacecraft and processing grade identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the three constellation spacecraft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Spacecraft {
    A,
    B,
    C,
}

impl Spacecraft {
    pub const ALL: [Spacecraft; 3] = [Spacecraft::A, Spacecraft::B, Spacecraft::C];

    /// Single-letter identifier used in file and directory names
    pub fn letter(self) -> char {
        match self {
            Spacecraft::A => 'A',
            Spacecraft::B => 'B',
            Spacecraft::C => 'C',
        }
    }

    /// Low-resolution magnetic field collection whose availability drives processing
    pub fn mag_collection(self, grade: Grade) -> String {
        format!("SW_{}_MAG{}_LR_1B", grade, self.letter())
    }

    /// Per-spacecraft subdirectory name (`Sat_A`, ...)
    pub fn subdir(self) -> String {
        format!("Sat_{}", self.letter())
    }
}

impl fmt::Display for Spacecraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown spacecraft: {0:?} (expected A, B or C)")]
pub struct ParseSpacecraftError(pub String);

impl FromStr for Spacecraft {
    type Err = ParseSpacecraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Accept the mission style "Swarm-A" as well as a bare letter
        let letter = trimmed
            .strip_prefix("Swarm-")
            .or_else(|| trimmed.strip_prefix("swarm-"))
            .unwrap_or(trimmed);

        match letter {
            "A" | "a" => Ok(Spacecraft::A),
            "B" | "b" => Ok(Spacecraft::B),
            "C" | "c" => Ok(Spacecraft::C),
            _ => Err(ParseSpacecraftError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Spacecraft {
    type Error = ParseSpacecraftError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Spacecraft> for String {
    fn from(value: Spacecraft) -> Self {
        value.to_string()
    }
}

/// Processing latency class of a data product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Grade {
    /// Near-real-time products
    #[default]
    Fast,
    /// Operational, validated products
    Oper,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Fast => "FAST",
            Grade::Oper => "OPER",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown grade: {0:?} (expected FAST or OPER)")]
pub struct ParseGradeError(pub String);

impl FromStr for Grade {
    type Err = ParseGradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FAST" => Ok(Grade::Fast),
            "OPER" => Ok(Grade::Oper),
            _ => Err(ParseGradeError(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "spacecraft_tests.rs"]
mod tests;
