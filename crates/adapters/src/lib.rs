// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the external services a worker talks to

mod blocking;
pub mod mirror;
pub mod probe;
pub mod processor;
pub mod traced;

pub use mirror::{
    CredentialSource, Credentials, EnvFileCredentials, FtpTransport, Mirror, MirrorSession,
    MirrorTransport, MirrorUploader, UploadError,
};
pub use probe::{AvailabilityProbe, HapiProbe, ProbeError, DEFAULT_HAPI_URL};
pub use processor::{CommandProcessor, ProcessError, ProcessRequest, ProcessingTrigger};
pub use traced::{TracedProbe, TracedProcessor};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use mirror::{
    FakeMirror, FakeSessionEvent, FakeTransport, MirrorCall, StaticCredentials, TransportFailure,
};
#[cfg(any(test, feature = "test-support"))]
pub use probe::FakeProbe;
#[cfg(any(test, feature = "test-support"))]
pub use processor::FakeProcessor;
