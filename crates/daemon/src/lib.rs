// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Settings, logging and worker wiring shared by `facd` and `fac`

pub mod config;
pub mod lifecycle;
pub mod logging;

pub use config::{ConfigError, OnFailure, Overrides, Settings};
pub use lifecycle::{
    build_worker, start, worker_config, DaemonWorker, Layout, LifecycleError, Running,
};
pub use logging::{log_file_name, setup_console, worker_dispatch, LoggingError};
