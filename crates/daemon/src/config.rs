// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Settings loaded from an optional TOML file, then overridden by flags

use fac_adapters::DEFAULT_HAPI_URL;
use fac_core::{Grade, Spacecraft};
use fac_engine::{FailurePolicy, DEFAULT_BACKFILL, DEFAULT_WAIT_INTERVAL};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
pub const DEFAULT_REMOTE_DIR: &str = "FAC/TMS";
pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_PROCESSOR: &str = "fac-process";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("no spacecraft configured")]
    NoSpacecraft,
    #[error("wait interval must be greater than zero")]
    ZeroWaitInterval,
    #[error("processor program must not be empty")]
    NoProcessor,
}

/// What a worker does after a failed cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnFailure {
    #[default]
    Skip,
    Terminate,
}

impl From<OnFailure> for FailurePolicy {
    fn from(value: OnFailure) -> Self {
        match value {
            OnFailure::Skip => FailurePolicy::SkipCycle,
            OnFailure::Terminate => FailurePolicy::Terminate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeSettings {
    /// HAPI base URL
    pub url: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_HAPI_URL.to_string(),
        }
    }
}

/// External program that produces one artifact per range
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorSettings {
    pub program: String,
    /// Argument template; see `CommandProcessor` for placeholders
    pub args: Vec<String>,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        let args = [
            "--spacecraft",
            "{spacecraft}",
            "--grade",
            "{grade}",
            "--start",
            "{start}",
            "--end",
            "{end}",
            "--output",
            "{output}",
        ];
        Self {
            program: DEFAULT_PROCESSOR.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub output_dir: PathBuf,
    /// Remote mirror directory; absent disables mirroring
    pub remote_dir: Option<String>,
    pub spacecraft: Vec<Spacecraft>,
    pub grade: Grade,
    #[serde(with = "humantime_serde")]
    pub wait_interval: Duration,
    #[serde(with = "humantime_serde")]
    pub backfill: Duration,
    /// File holding FTP_SERVER, FTP_USERNAME and FTP_PASSWORD
    pub env_file: PathBuf,
    /// Directory for per-spacecraft log files
    pub log_dir: Option<PathBuf>,
    pub on_failure: OnFailure,
    pub probe: ProbeSettings,
    pub processor: ProcessorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            remote_dir: Some(DEFAULT_REMOTE_DIR.to_string()),
            spacecraft: Spacecraft::ALL.to_vec(),
            grade: Grade::default(),
            wait_interval: DEFAULT_WAIT_INTERVAL,
            backfill: DEFAULT_BACKFILL,
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            log_dir: None,
            on_failure: OnFailure::default(),
            probe: ProbeSettings::default(),
            processor: ProcessorSettings::default(),
        }
    }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub remote_dir: Option<String>,
    pub no_mirror: bool,
    pub spacecraft: Option<Vec<Spacecraft>>,
    pub env_file: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub wait_interval: Option<Duration>,
}

impl Settings {
    /// Load settings from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if let Some(dir) = overrides.remote_dir {
            self.remote_dir = Some(dir);
        }
        if overrides.no_mirror {
            self.remote_dir = None;
        }
        if let Some(spacecraft) = overrides.spacecraft {
            self.spacecraft = spacecraft;
        }
        if let Some(file) = overrides.env_file {
            self.env_file = file;
        }
        if let Some(dir) = overrides.log_dir {
            self.log_dir = Some(dir);
        }
        if let Some(wait) = overrides.wait_interval {
            self.wait_interval = wait;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spacecraft.is_empty() {
            return Err(ConfigError::NoSpacecraft);
        }
        if self.wait_interval.is_zero() {
            return Err(ConfigError::ZeroWaitInterval);
        }
        if self.processor.program.trim().is_empty() {
            return Err(ConfigError::NoProcessor);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
