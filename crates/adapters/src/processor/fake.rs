// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake processing adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ProcessError, ProcessRequest, ProcessingTrigger};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Fake processor that writes an empty artifact for every request
#[derive(Clone, Default)]
pub struct FakeProcessor {
    calls: Arc<Mutex<Vec<ProcessRequest>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl FakeProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every subsequent run with `stderr`, or succeed again with `None`
    pub fn set_failure(&self, stderr: Option<&str>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = stderr.map(str::to_string);
    }

    /// Get all recorded requests
    pub fn calls(&self) -> Vec<ProcessRequest> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ProcessingTrigger for FakeProcessor {
    async fn run(&self, request: &ProcessRequest) -> Result<PathBuf, ProcessError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        let failure = self
            .failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(stderr) = failure {
            return Err(ProcessError::Exited {
                code: Some(1),
                stderr,
            });
        }

        if let Some(parent) = request.output.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ProcessError::OutputDir {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        std::fs::write(&request.output, b"").map_err(|_| {
            ProcessError::MissingArtifact(request.output.clone())
        })?;

        Ok(request.output.clone())
    }
}
