// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Processing pipeline adapters

mod command;

pub use command::{interpolate, CommandProcessor};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeProcessor;

use async_trait::async_trait;
use fac_core::{Grade, Spacecraft, TimeRange};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the processing pipeline
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("cannot process empty range {0}")]
    EmptyRange(TimeRange),
    #[error("failed to start {program}: {message}")]
    Spawn { program: String, message: String },
    #[error("processor exited with {code:?}: {stderr}")]
    Exited { code: Option<i32>, stderr: String },
    #[error("processor reported success but wrote no artifact at {0}")]
    MissingArtifact(PathBuf),
    #[error("failed to prepare output directory {path}: {message}")]
    OutputDir { path: PathBuf, message: String },
    #[error("failed to move {staged} into place: {message}")]
    Publish { staged: PathBuf, message: String },
}

/// One unit of processing work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    pub spacecraft: Spacecraft,
    pub grade: Grade,
    pub range: TimeRange,
    /// Where the artifact must be written
    pub output: PathBuf,
}

/// Adapter for the external processing pipeline
#[async_trait]
pub trait ProcessingTrigger: Clone + Send + Sync + 'static {
    /// Produce exactly one artifact covering `request.range`, returning its path
    async fn run(&self, request: &ProcessRequest) -> Result<PathBuf, ProcessError>;
}
