// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! fac - run the FAC scheduler for a single spacecraft

use anyhow::{Context, Result};
use clap::Parser;
use fac_core::Spacecraft;
use fac_daemon::{build_worker, logging, Layout, Overrides, Settings};
use fac_engine::CycleOutcome;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "fac",
    version,
    about = "Incrementally produce FAC artifacts for one spacecraft"
)]
struct Cli {
    /// Spacecraft letter (A, B or C)
    spacecraft: Spacecraft,

    /// Directory holding this spacecraft's artifacts
    output_dir: PathBuf,

    /// Remote mirror directory for new artifacts
    remote_dir: String,

    /// TOML settings file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Env file with FTP_SERVER, FTP_USERNAME and FTP_PASSWORD
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Also write logs to fac-<spacecraft>.log in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Time between checks, e.g. 15m or 1h
    #[arg(long, value_parser = humantime::parse_duration)]
    wait: Option<Duration>,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?.apply(Overrides {
        output_dir: Some(cli.output_dir),
        remote_dir: Some(cli.remote_dir),
        no_mirror: false,
        spacecraft: Some(vec![cli.spacecraft]),
        env_file: cli.env_file,
        log_dir: cli.log_dir,
        wait_interval: cli.wait,
    });
    settings.validate()?;

    // Held until exit so buffered file output is flushed
    let _guard = match settings.log_dir.as_deref() {
        Some(dir) => {
            let (dispatch, guard) = logging::worker_dispatch(dir, cli.spacecraft)?;
            tracing::dispatcher::set_global_default(dispatch)
                .context("failed to install log subscriber")?;
            Some(guard)
        }
        None => {
            logging::setup_console()?;
            None
        }
    };

    let mut worker = build_worker(&settings, cli.spacecraft, Layout::Flat);

    if cli.once {
        let outcome = worker.run_cycle().await?;
        match outcome {
            CycleOutcome::Processed { artifact, .. } => {
                info!(path = %artifact.display(), "new data saved")
            }
            CycleOutcome::NoNewData { .. } | CycleOutcome::Behind { .. } => {
                info!("no new data available")
            }
        }
        return Ok(());
    }

    tokio::select! {
        result = worker.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Received SIGINT, shutting down..."),
    }
    Ok(())
}
