// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! FAC scheduling engine: per-spacecraft workers and their supervisor

mod error;
mod supervisor;
mod worker;

pub use error::{CycleError, SupervisorError};
pub use supervisor::{Supervisor, WorkerExit, WorkerSpec};
pub use worker::{
    CycleOutcome, FailurePolicy, Worker, WorkerConfig, WorkerDeps, DEFAULT_BACKFILL,
    DEFAULT_WAIT_INTERVAL,
};
