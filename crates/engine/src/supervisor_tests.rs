// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::worker::{FailurePolicy, WorkerConfig, WorkerDeps};
use chrono::{TimeZone, Utc};
use fac_adapters::{
    FakeMirror, FakeProbe, FakeProcessor, FakeTransport, MirrorUploader, StaticCredentials,
    TransportFailure,
};
use fac_core::FakeClock;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

type TestSpec = WorkerSpec<FakeProbe, FakeProcessor, FakeMirror, FakeClock>;

#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.logs.lock().unwrap()).to_string()
    }

    fn dispatch(&self) -> tracing::Dispatch {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(self.clone())
            .with_ansi(false)
            .without_time()
            .finish();
        tracing::Dispatch::new(subscriber)
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn spec(
    dir: &TempDir,
    spacecraft: Spacecraft,
    probe: FakeProbe,
    processor: FakeProcessor,
    policy: FailurePolicy,
) -> TestSpec {
    let config = WorkerConfig::new(spacecraft, dir.path().join(spacecraft.subdir()))
        .with_wait_interval(Duration::from_millis(10))
        .with_failure_policy(policy);
    let clock = FakeClock::at(Utc.with_ymd_and_hms(2024, 1, 5, 13, 0, 0).unwrap());
    WorkerSpec::new(Worker::new(
        config,
        WorkerDeps {
            probe,
            processor,
            mirror: FakeMirror::new(),
            clock,
        },
    ))
}

fn wait_until(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    done()
}

#[test]
fn duplicate_spacecraft_is_rejected() {
    let dir = TempDir::new().unwrap();
    let specs = vec![
        spec(&dir, Spacecraft::A, FakeProbe::new(), FakeProcessor::new(), FailurePolicy::Terminate),
        spec(&dir, Spacecraft::A, FakeProbe::new(), FakeProcessor::new(), FailurePolicy::Terminate),
    ];

    let err = Supervisor::start(specs).err().unwrap();

    assert!(matches!(err, SupervisorError::DuplicateSpacecraft(Spacecraft::A)));
}

#[test]
fn terminated_workers_report_their_failure() {
    let dir = TempDir::new().unwrap();
    let specs = vec![
        spec(&dir, Spacecraft::A, FakeProbe::new(), FakeProcessor::new(), FailurePolicy::Terminate),
        spec(&dir, Spacecraft::B, FakeProbe::new(), FakeProcessor::new(), FailurePolicy::Terminate),
    ];

    let exits = Supervisor::start(specs).unwrap().join();

    assert_eq!(exits.len(), 2);
    assert_eq!(exits[0].0, Spacecraft::A);
    assert_eq!(exits[1].0, Spacecraft::B);
    for (_, exit) in &exits {
        assert!(matches!(exit, WorkerExit::Failed(CycleError::Probe(_))));
        assert!(exit.is_failure());
    }
}

#[test]
fn stalled_worker_does_not_block_others() {
    let dir = TempDir::new().unwrap();
    let stalled = FakeProbe::new();
    stalled.stall();
    let healthy = FakeProbe::answering(Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap());
    let stalled_processor = FakeProcessor::new();
    let healthy_processor = FakeProcessor::new();

    let specs = vec![
        spec(&dir, Spacecraft::A, stalled.clone(), stalled_processor.clone(), FailurePolicy::SkipCycle),
        spec(&dir, Spacecraft::B, healthy.clone(), healthy_processor.clone(), FailurePolicy::SkipCycle),
    ];
    // Threads are detached when the supervisor is dropped
    let _supervisor = Supervisor::start(specs).unwrap();

    assert!(wait_until(Duration::from_secs(5), || healthy.calls().len() >= 3));
    assert_eq!(healthy_processor.calls().len(), 1);
    assert_eq!(stalled.calls().len(), 1);
    assert!(stalled_processor.calls().is_empty());
    assert!(dir
        .path()
        .join("Sat_B/SW_FAST_FACBTMS_2F_20240102T000000_20240102T235959_XXXX.cdf")
        .exists());
}

#[test]
fn worker_logs_go_to_their_own_dispatch() {
    let dir = TempDir::new().unwrap();
    let logs_a = CapturedLogs::default();
    let logs_b = CapturedLogs::default();

    let specs = vec![
        spec(&dir, Spacecraft::A, FakeProbe::new(), FakeProcessor::new(), FailurePolicy::Terminate)
            .with_dispatch(logs_a.dispatch()),
        spec(&dir, Spacecraft::B, FakeProbe::new(), FakeProcessor::new(), FailurePolicy::Terminate)
            .with_dispatch(logs_b.dispatch()),
    ];
    Supervisor::start(specs).unwrap().join();

    let a = logs_a.contents();
    let b = logs_b.contents();
    assert!(a.contains("spacecraft=A"), "{a}");
    assert!(a.contains("cycle failed"), "{a}");
    assert!(!a.contains("spacecraft=B"), "{a}");
    assert!(b.contains("spacecraft=B"), "{b}");
    assert!(!b.contains("spacecraft=A"), "{b}");
}

#[test]
fn blocking_upload_logs_reach_the_worker_dispatch() {
    let dir = TempDir::new().unwrap();
    let logs = CapturedLogs::default();
    let probe = FakeProbe::new();
    probe.push_response(Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap());
    let transport = FakeTransport::new();
    transport.set_failure(Some(TransportFailure::Close));

    let config = WorkerConfig::new(Spacecraft::C, dir.path().join("Sat_C"))
        .with_remote_dir("FAC/TMS/Sat_C")
        .with_wait_interval(Duration::from_millis(10))
        .with_failure_policy(FailurePolicy::Terminate);
    let worker = Worker::new(
        config,
        WorkerDeps {
            probe,
            processor: FakeProcessor::new(),
            mirror: MirrorUploader::new(
                transport.clone(),
                StaticCredentials::new("ftp.example.org", "swarm", "s3cret"),
            ),
            clock: FakeClock::at(Utc.with_ymd_and_hms(2024, 1, 5, 13, 0, 0).unwrap()),
        },
    );

    // The second check has no answer queued, which ends the worker
    let exits = Supervisor::start(vec![WorkerSpec::new(worker).with_dispatch(logs.dispatch())])
        .unwrap()
        .join();

    assert!(matches!(exits[0].1, WorkerExit::Failed(CycleError::Probe(_))));
    assert_eq!(transport.stored().len(), 1);
    let contents = logs.contents();
    assert!(
        contents.contains("mirror session did not close cleanly"),
        "{contents}"
    );
    assert!(contents.contains("artifact mirrored"), "{contents}");
}

#[test]
fn panic_payloads_are_described() {
    let text: Box<dyn std::any::Any + Send> = Box::new("boom");
    let owned: Box<dyn std::any::Any + Send> = Box::new("bang".to_string());
    let other: Box<dyn std::any::Any + Send> = Box::new(7_u8);

    assert_eq!(panic_message(&text), "boom");
    assert_eq!(panic_message(&owned), "bang");
    assert_eq!(panic_message(&other), "unknown panic");
}
