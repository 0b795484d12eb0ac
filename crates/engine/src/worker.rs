// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-spacecraft scheduler worker
//!
//! Each cycle checks remote availability against the progress recorded by
//! artifact names on disk, processes any newly available span, mirrors the
//! result, and then sleeps for the wait interval. The next cycle is only
//! armed after the current one has fully completed.

use crate::error::CycleError;
use chrono::{DateTime, TimeDelta, Utc};
use fac_adapters::{AvailabilityProbe, Mirror, ProcessRequest, ProcessingTrigger};
use fac_core::{
    decide, scan_directory, truncate_to_second, ArtifactName, Clock, Coverage, CyclePhase,
    Decision, Grade, Spacecraft, TimeRange, WorkerState,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Instrument;

/// Delay between the end of one cycle and the start of the next
pub const DEFAULT_WAIT_INTERVAL: Duration = Duration::from_secs(900);

/// How far before today's midnight an empty output directory starts
pub const DEFAULT_BACKFILL: Duration = Duration::from_secs(3 * 24 * 60 * 60);

/// What to do when a cycle fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the failure and try again after the wait interval
    #[default]
    SkipCycle,
    /// Stop this worker; other workers are unaffected
    Terminate,
}

/// Static configuration of one worker
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub spacecraft: Spacecraft,
    pub grade: Grade,
    /// Directory owned by this worker; its artifact names are the progress record
    pub output_dir: PathBuf,
    /// Remote mirror directory; `None` disables mirroring
    pub remote_dir: Option<String>,
    pub wait_interval: Duration,
    pub backfill: Duration,
    pub failure_policy: FailurePolicy,
}

impl WorkerConfig {
    pub fn new(spacecraft: Spacecraft, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            spacecraft,
            grade: Grade::Fast,
            output_dir: output_dir.into(),
            remote_dir: None,
            wait_interval: DEFAULT_WAIT_INTERVAL,
            backfill: DEFAULT_BACKFILL,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_remote_dir(mut self, remote_dir: impl Into<String>) -> Self {
        self.remote_dir = Some(remote_dir.into());
        self
    }

    pub fn with_wait_interval(mut self, wait_interval: Duration) -> Self {
        self.wait_interval = wait_interval;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Collection whose availability drives this worker
    pub fn collection(&self) -> String {
        self.spacecraft.mag_collection(self.grade)
    }
}

/// Adapters a worker depends on
pub struct WorkerDeps<P, X, M, C> {
    pub probe: P,
    pub processor: X,
    pub mirror: M,
    pub clock: C,
}

/// Result of one completed cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Remote availability has not moved past local progress
    NoNewData { latest_available: DateTime<Utc> },
    /// Remote availability is older than local progress
    Behind {
        latest_available: DateTime<Utc>,
        last_evaluated_end: DateTime<Utc>,
    },
    /// A new artifact was written
    Processed {
        range: TimeRange,
        artifact: PathBuf,
        mirrored: bool,
    },
}

/// Scheduler loop for a single spacecraft
pub struct Worker<P, X, M, C> {
    config: WorkerConfig,
    probe: P,
    processor: X,
    mirror: M,
    state: WorkerState,
    clock: C,
}

impl<P, X, M, C> Worker<P, X, M, C>
where
    P: AvailabilityProbe,
    X: ProcessingTrigger,
    M: Mirror,
    C: Clock,
{
    pub fn new(config: WorkerConfig, deps: WorkerDeps<P, X, M, C>) -> Self {
        let today = deps.clock.start_of_today();
        let fallback_start = TimeDelta::from_std(config.backfill)
            .ok()
            .and_then(|backfill| today.checked_sub_signed(backfill))
            .unwrap_or(today);

        Self {
            state: WorkerState::new(fallback_start, config.wait_interval),
            config,
            probe: deps.probe,
            processor: deps.processor,
            mirror: deps.mirror,
            clock: deps.clock,
        }
    }

    pub fn state(&self) -> &WorkerState {
        &self.state
    }

    pub fn spacecraft(&self) -> Spacecraft {
        self.config.spacecraft
    }

    /// Run cycles forever, sleeping `wait_interval` after each one
    ///
    /// Returns only when a cycle fails under [`FailurePolicy::Terminate`].
    pub async fn run(mut self) -> Result<(), CycleError> {
        let span = tracing::info_span!("worker", spacecraft = %self.config.spacecraft);

        async move {
            tracing::info!(
                output_dir = %self.config.output_dir.display(),
                remote_dir = self.config.remote_dir.as_deref().unwrap_or("-"),
                fallback_start = %self.state.fallback_start,
                "beginning processor"
            );

            loop {
                let wait_secs = self.state.wait_interval.as_secs();
                match self.run_cycle().await {
                    Ok(CycleOutcome::Processed { artifact, .. }) => tracing::info!(
                        path = %artifact.display(),
                        "new data saved, waiting to check again ({}s)",
                        wait_secs
                    ),
                    Ok(_) => tracing::info!(
                        "no new data available, waiting to check again ({}s)",
                        wait_secs
                    ),
                    Err(e) => {
                        tracing::error!(
                            collection = %self.config.collection(),
                            output_dir = %self.config.output_dir.display(),
                            last_evaluated_end = ?self.state.last_evaluated_end,
                            error = %e,
                            "cycle failed"
                        );
                        if self.config.failure_policy == FailurePolicy::Terminate {
                            self.state.transition(CyclePhase::Failed);
                            return Err(e);
                        }
                        tracing::info!("skipping to next check in {}s", wait_secs);
                    }
                }

                if let Some(next) = TimeDelta::from_std(self.state.wait_interval)
                    .ok()
                    .and_then(|wait| self.clock.now().checked_add_signed(wait))
                {
                    tracing::debug!(next_check = %next, "sleeping");
                }
                tokio::time::sleep(self.state.wait_interval).await;
            }
        }
        .instrument(span)
        .await
    }

    /// Perform exactly one cycle and return to idle
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, CycleError> {
        let result = self.cycle().await;
        self.state.transition(CyclePhase::Idle);
        result
    }

    async fn cycle(&mut self) -> Result<CycleOutcome, CycleError> {
        self.retry_pending_uploads().await;

        self.state.transition(CyclePhase::Checking);
        let collection = self.config.collection();
        let latest_available =
            truncate_to_second(self.probe.latest_available(&collection).await?);

        let coverage = scan_directory(
            &self.config.output_dir,
            self.config.spacecraft,
            self.config.grade,
        )?;
        if coverage == Coverage::NoPriorArtifact {
            tracing::info!(
                fallback_start = %self.state.fallback_start,
                "no previous artifacts, starting from fallback"
            );
        }
        let last_evaluated_end = coverage.or_fallback(self.state.fallback_start);
        if let Some(hint) = self.state.last_evaluated_end {
            if hint != last_evaluated_end {
                tracing::warn!(
                    hint = %hint,
                    recovered = %last_evaluated_end,
                    "recovered progress differs from previous cycle"
                );
            }
        }
        self.state.last_evaluated_end = Some(last_evaluated_end);
        tracing::info!(
            collection = %collection,
            latest_available = %latest_available,
            last_evaluated_end = %last_evaluated_end,
            "checked availability"
        );

        match decide(latest_available, last_evaluated_end) {
            Decision::NoNewData => {
                self.state.transition(CyclePhase::NoNewData);
                Ok(CycleOutcome::NoNewData { latest_available })
            }
            Decision::Behind { latest_available } => {
                self.state.transition(CyclePhase::NoNewData);
                tracing::warn!(
                    collection = %collection,
                    latest_available = %latest_available,
                    last_evaluated_end = %last_evaluated_end,
                    "remote availability is behind local artifacts"
                );
                Ok(CycleOutcome::Behind {
                    latest_available,
                    last_evaluated_end,
                })
            }
            Decision::Process(range) => self.process(range).await,
        }
    }

    async fn process(&mut self, range: TimeRange) -> Result<CycleOutcome, CycleError> {
        self.state.transition(CyclePhase::Processing);

        let name = ArtifactName::new(self.config.spacecraft, self.config.grade, range)?;
        let request = ProcessRequest {
            spacecraft: self.config.spacecraft,
            grade: self.config.grade,
            range,
            output: name.path_in(&self.config.output_dir),
        };
        tracing::info!(
            range = %range,
            output = %request.output.display(),
            "evaluating for time period"
        );

        let artifact = self.processor.run(&request).await?;
        self.state.advance_to(range.end());

        let mirrored = self.mirror_artifact(&artifact).await;
        Ok(CycleOutcome::Processed {
            range,
            artifact,
            mirrored,
        })
    }

    /// Upload a fresh artifact; failures leave it queued for the next cycle
    async fn mirror_artifact(&mut self, artifact: &Path) -> bool {
        let Some(remote_dir) = self.config.remote_dir.clone() else {
            return false;
        };

        self.state.transition(CyclePhase::Uploading);
        match self.mirror.upload(artifact, &remote_dir).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    path = %artifact.display(),
                    remote_dir = %remote_dir,
                    error = %e,
                    "artifact kept locally, upload will be retried next cycle"
                );
                self.state.defer_upload(artifact.to_path_buf());
                false
            }
        }
    }

    async fn retry_pending_uploads(&mut self) {
        let pending = self.state.take_pending_uploads();
        let Some(remote_dir) = self.config.remote_dir.clone() else {
            return;
        };

        for artifact in pending {
            if !artifact.exists() {
                tracing::warn!(
                    path = %artifact.display(),
                    "pending artifact no longer exists, dropping"
                );
                continue;
            }

            match self.mirror.upload(&artifact, &remote_dir).await {
                Ok(()) => tracing::info!(
                    path = %artifact.display(),
                    remote_dir = %remote_dir,
                    "deferred upload succeeded"
                ),
                Err(e) => {
                    tracing::warn!(
                        path = %artifact.display(),
                        remote_dir = %remote_dir,
                        error = %e,
                        "deferred upload failed again"
                    );
                    self.state.defer_upload(artifact);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
