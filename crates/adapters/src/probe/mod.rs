// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote data availability adapters

mod hapi;

pub use hapi::{HapiProbe, DEFAULT_HAPI_URL};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeProbe;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors from availability queries
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("availability request for {collection} failed: {message}")]
    Request { collection: String, message: String },
    #[error("invalid availability response for {collection}: {message}")]
    InvalidResponse { collection: String, message: String },
    #[error("availability task failed: {0}")]
    Join(String),
}

/// Adapter for the remote service that publishes data collections
#[async_trait]
pub trait AvailabilityProbe: Clone + Send + Sync + 'static {
    /// Latest instant for which `collection` has data, at whole-second resolution
    async fn latest_available(&self, collection: &str) -> Result<DateTime<Utc>, ProbeError>;
}
