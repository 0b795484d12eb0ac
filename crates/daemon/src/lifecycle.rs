// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wiring settings into concrete workers and starting them

use crate::config::{ConfigError, Settings};
use crate::logging::{self, LoggingError};
use fac_adapters::{
    CommandProcessor, EnvFileCredentials, FtpTransport, HapiProbe, MirrorUploader, TracedProbe,
    TracedProcessor,
};
use fac_core::{Spacecraft, SystemClock};
use fac_engine::{Supervisor, SupervisorError, Worker, WorkerConfig, WorkerDeps, WorkerSpec};
use thiserror::Error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

/// Worker with concrete adapter types (wrapped with tracing)
pub type DaemonWorker = Worker<
    TracedProbe<HapiProbe>,
    TracedProcessor<CommandProcessor>,
    MirrorUploader<FtpTransport, EnvFileCredentials>,
    SystemClock,
>;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Supervisor(#[from] SupervisorError),
}

/// How the configured directories map onto a spacecraft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `{dir}/Sat_{X}`, used when several spacecraft share the roots
    PerSpacecraft,
    /// Use the directories exactly as configured
    Flat,
}

pub fn worker_config(settings: &Settings, spacecraft: Spacecraft, layout: Layout) -> WorkerConfig {
    let (output_dir, remote_dir) = match layout {
        Layout::PerSpacecraft => (
            settings.output_dir.join(spacecraft.subdir()),
            settings
                .remote_dir
                .as_ref()
                .map(|dir| format!("{}/{}", dir.trim_end_matches('/'), spacecraft.subdir())),
        ),
        Layout::Flat => (settings.output_dir.clone(), settings.remote_dir.clone()),
    };

    let mut config = WorkerConfig::new(spacecraft, output_dir)
        .with_wait_interval(settings.wait_interval)
        .with_failure_policy(settings.on_failure.into());
    config.grade = settings.grade;
    config.backfill = settings.backfill;
    config.remote_dir = remote_dir;
    config
}

pub fn build_worker(settings: &Settings, spacecraft: Spacecraft, layout: Layout) -> DaemonWorker {
    let probe = TracedProbe::new(HapiProbe::new(settings.probe.url.clone()));
    let processor = TracedProcessor::new(CommandProcessor::new(
        settings.processor.program.clone(),
        settings.processor.args.clone(),
    ));
    let mirror = MirrorUploader::new(
        FtpTransport::new(),
        EnvFileCredentials::new(settings.env_file.clone()),
    );

    Worker::new(
        worker_config(settings, spacecraft, layout),
        WorkerDeps {
            probe,
            processor,
            mirror,
            clock: SystemClock,
        },
    )
}

/// Running supervisor plus the log guards that must outlive it
pub struct Running {
    pub supervisor: Supervisor,
    pub guards: Vec<WorkerGuard>,
}

/// Validate settings and start one worker per configured spacecraft
pub fn start(settings: &Settings, layout: Layout) -> Result<Running, LifecycleError> {
    settings.validate()?;

    let mut guards = Vec::new();
    let mut specs = Vec::with_capacity(settings.spacecraft.len());
    for &spacecraft in &settings.spacecraft {
        let mut spec = WorkerSpec::new(build_worker(settings, spacecraft, layout));
        if let Some(log_dir) = settings.log_dir.as_deref() {
            let (dispatch, guard) = logging::worker_dispatch(log_dir, spacecraft)?;
            spec = spec.with_dispatch(dispatch);
            guards.push(guard);
        }
        specs.push(spec);
    }

    log_startup(settings);
    let supervisor = Supervisor::start(specs)?;
    Ok(Running { supervisor, guards })
}

fn log_startup(settings: &Settings) {
    let spacecraft: Vec<String> = settings.spacecraft.iter().map(|s| s.to_string()).collect();
    info!(
        spacecraft = %spacecraft.join(","),
        grade = %settings.grade,
        output_dir = %settings.output_dir.display(),
        remote_dir = settings.remote_dir.as_deref().unwrap_or("-"),
        wait_interval = %humantime::format_duration(settings.wait_interval),
        log_dir = ?settings.log_dir,
        "starting FAC workers"
    );
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
