// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console and per-spacecraft log setup

use fac_core::Spacecraft;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to install global subscriber: {0}")]
    Install(String),
}

/// `RUST_LOG` if set, otherwise `info`
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global console subscriber
pub fn setup_console() -> Result<(), LoggingError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}

pub fn log_file_name(spacecraft: Spacecraft) -> String {
    format!("fac-{}.log", spacecraft.letter())
}

/// Subscriber for one worker thread: console plus its own log file
///
/// The guard must outlive the worker or buffered lines are lost.
pub fn worker_dispatch(
    log_dir: &Path,
    spacecraft: Spacecraft,
) -> Result<(tracing::Dispatch, WorkerGuard), LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDir {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file_name(spacecraft));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking));

    Ok((tracing::Dispatch::new(subscriber), guard))
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
