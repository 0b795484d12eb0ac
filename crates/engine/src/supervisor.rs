// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor running one isolated worker per spacecraft
//!
//! Every worker gets its own OS thread with a single-threaded tokio
//! runtime, so a stalled or panicking worker cannot delay the others.
//! An optional [`tracing::Dispatch`] scopes each worker's logs to its
//! own subscriber.

use crate::error::{CycleError, SupervisorError};
use crate::worker::Worker;
use fac_adapters::{AvailabilityProbe, Mirror, ProcessingTrigger};
use fac_core::{Clock, Spacecraft};
use std::collections::HashSet;
use std::thread::JoinHandle;

/// A worker plus the log dispatcher it should run under
pub struct WorkerSpec<P, X, M, C> {
    pub worker: Worker<P, X, M, C>,
    /// Per-worker subscriber; `None` inherits the global default
    pub dispatch: Option<tracing::Dispatch>,
}

impl<P, X, M, C> WorkerSpec<P, X, M, C> {
    pub fn new(worker: Worker<P, X, M, C>) -> Self {
        Self {
            worker,
            dispatch: None,
        }
    }

    pub fn with_dispatch(mut self, dispatch: tracing::Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }
}

/// How a worker thread ended
#[derive(Debug)]
pub enum WorkerExit {
    /// The loop returned without error
    Finished,
    /// A cycle failed under the terminate policy
    Failed(CycleError),
    /// The worker thread panicked
    Panicked(String),
    /// The worker's runtime could not be built
    RuntimeUnavailable(String),
}

impl WorkerExit {
    pub fn is_failure(&self) -> bool {
        !matches!(self, WorkerExit::Finished)
    }
}

/// Owns the worker threads
pub struct Supervisor {
    handles: Vec<(Spacecraft, JoinHandle<WorkerExit>)>,
}

impl Supervisor {
    /// Spawn one thread per worker
    ///
    /// Rejects duplicate spacecraft before spawning anything, since two
    /// workers would race on the same output directory.
    pub fn start<P, X, M, C>(
        specs: Vec<WorkerSpec<P, X, M, C>>,
    ) -> Result<Self, SupervisorError>
    where
        P: AvailabilityProbe,
        X: ProcessingTrigger,
        M: Mirror,
        C: Clock,
    {
        let mut seen = HashSet::new();
        for spec in &specs {
            let spacecraft = spec.worker.spacecraft();
            if !seen.insert(spacecraft) {
                return Err(SupervisorError::DuplicateSpacecraft(spacecraft));
            }
        }

        let mut handles = Vec::with_capacity(specs.len());
        for spec in specs {
            let spacecraft = spec.worker.spacecraft();
            let handle = std::thread::Builder::new()
                .name(format!("fac-worker-{}", spacecraft.letter()))
                .spawn(move || run_isolated(spec))
                .map_err(|source| SupervisorError::Spawn { spacecraft, source })?;
            tracing::info!(%spacecraft, "worker started");
            handles.push((spacecraft, handle));
        }

        Ok(Self { handles })
    }

    /// Block until every worker thread has ended
    pub fn join(self) -> Vec<(Spacecraft, WorkerExit)> {
        self.handles
            .into_iter()
            .map(|(spacecraft, handle)| {
                let exit = handle
                    .join()
                    .unwrap_or_else(|payload| WorkerExit::Panicked(panic_message(&payload)));
                match &exit {
                    WorkerExit::Finished => tracing::info!(%spacecraft, "worker finished"),
                    other => tracing::error!(%spacecraft, exit = ?other, "worker stopped"),
                }
                (spacecraft, exit)
            })
            .collect()
    }
}

fn run_isolated<P, X, M, C>(spec: WorkerSpec<P, X, M, C>) -> WorkerExit
where
    P: AvailabilityProbe,
    X: ProcessingTrigger,
    M: Mirror,
    C: Clock,
{
    let WorkerSpec { worker, dispatch } = spec;
    let body = move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!(error = %e, "failed to build worker runtime");
                return WorkerExit::RuntimeUnavailable(e.to_string());
            }
        };

        match runtime.block_on(worker.run()) {
            Ok(()) => WorkerExit::Finished,
            Err(e) => WorkerExit::Failed(e),
        }
    };

    match dispatch {
        Some(dispatch) => tracing::dispatcher::with_default(&dispatch, body),
        None => body(),
    }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
