// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! FAC supervisor daemon (facd)
//!
//! Runs one independent worker per spacecraft until a signal arrives.

use std::path::PathBuf;

use clap::Parser;
use fac_core::Spacecraft;
use fac_daemon::{lifecycle, logging, Layout, Overrides, Running, Settings};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "facd",
    version,
    about = "Field-aligned current processor for all spacecraft"
)]
struct Args {
    /// Output directory; each spacecraft writes to a Sat_X subdirectory
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Remote mirror directory; each spacecraft uploads to a Sat_X subdirectory
    #[arg(short = 'r', long)]
    remote_dir: Option<String>,

    /// TOML settings file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Spacecraft to run, e.g. A,B,C
    #[arg(long, value_delimiter = ',')]
    spacecraft: Option<Vec<Spacecraft>>,

    /// Env file with FTP_SERVER, FTP_USERNAME and FTP_PASSWORD
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Directory for per-spacecraft log files
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Keep artifacts local only
    #[arg(long)]
    no_mirror: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref())?.apply(Overrides {
        output_dir: args.output_dir,
        remote_dir: args.remote_dir,
        no_mirror: args.no_mirror,
        spacecraft: args.spacecraft,
        env_file: args.env_file,
        log_dir: args.log_dir,
        wait_interval: None,
    });

    logging::setup_console()?;
    info!("Starting facd (pid: {})", std::process::id());

    let Running { supervisor, guards } = match lifecycle::start(&settings, Layout::PerSpacecraft) {
        Ok(running) => running,
        Err(e) => {
            error!("Failed to start workers: {}", e);
            return Err(e.into());
        }
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    // Joining blocks, so it runs off the signal loop
    let mut joined = tokio::task::spawn_blocking(move || supervisor.join());

    let result: Result<(), Box<dyn std::error::Error>> = tokio::select! {
        exits = &mut joined => {
            let exits = exits?;
            let failed: Vec<String> = exits
                .iter()
                .filter(|(_, exit)| exit.is_failure())
                .map(|(spacecraft, exit)| format!("{spacecraft}: {exit:?}"))
                .collect();
            if failed.is_empty() {
                info!("All workers finished");
                Ok(())
            } else {
                error!("Workers stopped: {}", failed.join("; "));
                Err(format!("{} worker(s) failed", failed.len()).into())
            }
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down...");
            Ok(())
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down...");
            Ok(())
        }
    };

    info!("facd stopped");
    drop(guards);
    // Worker threads never return on their own; leave without waiting on them
    std::process::exit(match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    })
}
