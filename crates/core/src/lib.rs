// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fac-core: Core library for the FAC incremental processor
//!
//! This crate provides:
//! - The spacecraft / grade / time range data model
//! - The artifact filename codec
//! - State recovery from previously written artifacts
//! - The pure cycle decision and worker phase model
//! - A wall clock abstraction for testable time handling

pub mod artifact;
pub mod clock;
pub mod cycle;
pub mod range;
pub mod recovery;
pub mod spacecraft;

pub use artifact::{ArtifactName, NameError, DEFAULT_VARIANT};
pub use clock::{Clock, FakeClock, SystemClock};
pub use cycle::{decide, CyclePhase, Decision, WorkerState};
pub use range::{format_stamp, truncate_to_second, TimeRange, TimeRangeError};
pub use recovery::{latest_covered, scan_directory, Coverage, RecoveryError};
pub use spacecraft::{Grade, ParseGradeError, ParseSpacecraftError, Spacecraft};
