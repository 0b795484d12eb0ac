// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config::{OnFailure, Overrides};
use fac_core::Grade;
use fac_engine::FailurePolicy;
use std::path::PathBuf;
use std::time::Duration;

fn settings() -> Settings {
    Settings {
        output_dir: PathBuf::from("/data/outputs"),
        remote_dir: Some("FAC/TMS/".to_string()),
        grade: Grade::Oper,
        wait_interval: Duration::from_secs(120),
        backfill: Duration::from_secs(86400),
        on_failure: OnFailure::Terminate,
        ..Settings::default()
    }
}

#[test]
fn per_spacecraft_layout_uses_sat_subdirectories() {
    let config = worker_config(&settings(), Spacecraft::B, Layout::PerSpacecraft);

    assert_eq!(config.output_dir, PathBuf::from("/data/outputs/Sat_B"));
    assert_eq!(config.remote_dir.as_deref(), Some("FAC/TMS/Sat_B"));
    assert_eq!(config.grade, Grade::Oper);
    assert_eq!(config.wait_interval, Duration::from_secs(120));
    assert_eq!(config.backfill, Duration::from_secs(86400));
    assert_eq!(config.failure_policy, FailurePolicy::Terminate);
}

#[test]
fn flat_layout_keeps_directories_as_given() {
    let config = worker_config(&settings(), Spacecraft::A, Layout::Flat);

    assert_eq!(config.output_dir, PathBuf::from("/data/outputs"));
    assert_eq!(config.remote_dir.as_deref(), Some("FAC/TMS/"));
}

#[test]
fn disabled_mirror_has_no_remote_dir() {
    let settings = settings().apply(Overrides {
        no_mirror: true,
        ..Overrides::default()
    });

    let config = worker_config(&settings, Spacecraft::C, Layout::PerSpacecraft);

    assert_eq!(config.remote_dir, None);
}

#[test]
fn built_worker_polls_the_configured_collection() {
    let worker = build_worker(&settings(), Spacecraft::C, Layout::PerSpacecraft);

    assert_eq!(worker.spacecraft(), Spacecraft::C);
    assert_eq!(
        worker_config(&settings(), Spacecraft::C, Layout::PerSpacecraft).collection(),
        "SW_OPER_MAGC_LR_1B"
    );
}

#[test]
fn start_rejects_invalid_settings_before_spawning() {
    let settings = Settings {
        spacecraft: Vec::new(),
        ..Settings::default()
    };

    let err = start(&settings, Layout::PerSpacecraft).err().unwrap();

    assert!(matches!(err, LifecycleError::Config(ConfigError::NoSpacecraft)));
}

#[test]
fn start_rejects_duplicate_spacecraft() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        output_dir: dir.path().to_path_buf(),
        spacecraft: vec![Spacecraft::A, Spacecraft::A],
        ..Settings::default()
    };

    let err = start(&settings, Layout::PerSpacecraft).err().unwrap();

    assert!(matches!(err, LifecycleError::Supervisor(_)));
}
