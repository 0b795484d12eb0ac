// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::probe::{AvailabilityProbe, ProbeError};
use crate::processor::{ProcessError, ProcessRequest, ProcessingTrigger};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::Instrument;

/// Wrapper that adds tracing to any AvailabilityProbe
#[derive(Clone)]
pub struct TracedProbe<P> {
    inner: P,
}

impl<P> TracedProbe<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: AvailabilityProbe> AvailabilityProbe for TracedProbe<P> {
    async fn latest_available(&self, collection: &str) -> Result<DateTime<Utc>, ProbeError> {
        let span = tracing::info_span!("probe.latest_available", collection);

        async {
            tracing::info!("checking product availability");

            let start = std::time::Instant::now();
            let result = self.inner.latest_available(collection).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(latest) => tracing::info!(
                    latest = %latest,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "latest availability"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "availability check failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any ProcessingTrigger
#[derive(Clone)]
pub struct TracedProcessor<X> {
    inner: X,
}

impl<X> TracedProcessor<X> {
    pub fn new(inner: X) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<X: ProcessingTrigger> ProcessingTrigger for TracedProcessor<X> {
    async fn run(&self, request: &ProcessRequest) -> Result<PathBuf, ProcessError> {
        let span = tracing::info_span!(
            "processor.run",
            spacecraft = %request.spacecraft,
            grade = %request.grade,
            range = %request.range,
        );

        async {
            // Precondition: the pipeline is only defined for non-empty ranges
            if request.range.is_empty() {
                tracing::error!("refusing to process an empty range");
                return Err(ProcessError::EmptyRange(request.range));
            }

            tracing::info!(output = %request.output.display(), "evaluating");

            let start = std::time::Instant::now();
            let result = self.inner.run(request).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(path) => tracing::info!(
                    path = %path.display(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "artifact written"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "processing failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
