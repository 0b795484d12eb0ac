// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HAPI catalogue availability adapter

use super::{AvailabilityProbe, ProbeError};
use crate::blocking::spawn_blocking_in_context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use fac_core::truncate_to_second;
use serde::Deserialize;

/// Public HAPI endpoint of the data service
pub const DEFAULT_HAPI_URL: &str = "https://vires.services/hapi";

/// Subset of a HAPI `info` response
#[derive(Debug, Deserialize)]
struct DatasetInfo {
    #[serde(rename = "stopDate")]
    stop_date: String,
}

/// Queries `{base_url}/info?dataset=...` and reads the dataset's `stopDate`
#[derive(Clone)]
pub struct HapiProbe {
    base_url: String,
}

impl HapiProbe {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn info_url(&self) -> String {
        format!("{}/info", self.base_url)
    }

    fn fetch(&self, collection: &str) -> Result<DateTime<Utc>, ProbeError> {
        let request_err = |message: String| ProbeError::Request {
            collection: collection.to_string(),
            message,
        };

        let mut response = ureq::get(&self.info_url())
            .query("dataset", collection)
            .call()
            .map_err(|e| request_err(e.to_string()))?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| request_err(format!("failed to read response: {}", e)))?;

        parse_stop_date(collection, &body)
    }
}

impl Default for HapiProbe {
    fn default() -> Self {
        Self::new(DEFAULT_HAPI_URL)
    }
}

#[async_trait]
impl AvailabilityProbe for HapiProbe {
    async fn latest_available(&self, collection: &str) -> Result<DateTime<Utc>, ProbeError> {
        let probe = self.clone();
        let collection = collection.to_string();
        // ureq is blocking; keep it off the worker's event loop
        spawn_blocking_in_context(move || probe.fetch(&collection))
            .await
            .map_err(|e| ProbeError::Join(e.to_string()))?
    }
}

/// Extract `stopDate` from a HAPI info document
pub(crate) fn parse_stop_date(collection: &str, body: &str) -> Result<DateTime<Utc>, ProbeError> {
    let invalid = |message: String| ProbeError::InvalidResponse {
        collection: collection.to_string(),
        message,
    };

    let info: DatasetInfo = serde_json::from_str(body).map_err(|e| invalid(e.to_string()))?;
    let stop = parse_hapi_time(&info.stop_date)
        .ok_or_else(|| invalid(format!("unparseable stopDate {:?}", info.stop_date)))?;

    Ok(truncate_to_second(stop))
}

/// HAPI times are ISO 8601 in UTC, usually with a trailing `Z`
fn parse_hapi_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    let trimmed = value.trim_end_matches('Z');
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%jT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[path = "hapi_tests.rs"]
mod tests;
