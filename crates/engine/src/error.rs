// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the scheduling engine

use fac_adapters::{ProbeError, ProcessError};
use fac_core::{NameError, RecoveryError, Spacecraft};
use thiserror::Error;

/// Errors that end a single worker cycle
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("availability probe failed: {0}")]
    Probe(#[from] ProbeError),
    #[error("state recovery failed: {0}")]
    Recovery(#[from] RecoveryError),
    #[error("cannot name artifact: {0}")]
    Name(#[from] NameError),
    #[error("processing failed: {0}")]
    Process(#[from] ProcessError),
}

/// Errors starting the supervisor
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("duplicate worker for spacecraft {0}")]
    DuplicateSpacecraft(Spacecraft),
    #[error("failed to spawn worker thread for spacecraft {spacecraft}: {source}")]
    Spawn {
        spacecraft: Spacecraft,
        #[source]
        source: std::io::Error,
    },
}
