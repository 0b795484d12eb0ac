// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake availability probe for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{AvailabilityProbe, ProbeError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Fake probe with scripted answers
///
/// Queued responses are consumed first; after that the sticky latest
/// value (if any) is returned on every call.
#[derive(Clone, Default)]
pub struct FakeProbe {
    queued: Arc<Mutex<VecDeque<Result<DateTime<Utc>, String>>>>,
    latest: Arc<Mutex<Option<DateTime<Utc>>>>,
    stalled: Arc<AtomicBool>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe that always answers `latest`
    pub fn answering(latest: DateTime<Utc>) -> Self {
        let probe = Self::new();
        probe.set_latest(latest);
        probe
    }

    /// Set the answer returned once the queue is empty
    pub fn set_latest(&self, latest: DateTime<Utc>) {
        *self.latest.lock().unwrap_or_else(|e| e.into_inner()) = Some(latest);
    }

    /// Queue a one-off answer
    pub fn push_response(&self, latest: DateTime<Utc>) {
        self.queued
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(latest));
    }

    /// Queue a one-off failure
    pub fn push_failure(&self, message: &str) {
        self.queued
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(message.to_string()));
    }

    /// Make every subsequent call hang forever
    pub fn stall(&self) {
        self.stalled.store(true, Ordering::SeqCst);
    }

    /// Collections queried so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl AvailabilityProbe for FakeProbe {
    async fn latest_available(&self, collection: &str) -> Result<DateTime<Utc>, ProbeError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(collection.to_string());

        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }

        let queued = self
            .queued
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        let answer = match queued {
            Some(answer) => answer,
            None => (*self.latest.lock().unwrap_or_else(|e| e.into_inner()))
                .ok_or_else(|| "no availability configured".to_string()),
        };

        answer.map_err(|message| ProbeError::Request {
            collection: collection.to_string(),
            message,
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
