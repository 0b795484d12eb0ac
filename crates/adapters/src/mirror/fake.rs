// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake mirror adapters for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::uploader::{MirrorSession, MirrorTransport};
use super::{CredentialSource, Credentials, Mirror, UploadError};
use async_trait::async_trait;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Credentials fixed at construction
#[derive(Clone, Debug)]
pub struct StaticCredentials(pub Credentials);

impl StaticCredentials {
    pub fn new(server: &str, username: &str, password: &str) -> Self {
        Self(Credentials {
            server: server.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

impl CredentialSource for StaticCredentials {
    fn load(&self) -> Result<Credentials, UploadError> {
        Ok(self.0.clone())
    }
}

/// Step at which a fake session fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Connect,
    Login,
    ChangeDir,
    Store,
    /// Panic while storing, to exercise unwinding
    PanicOnStore,
    /// Store succeeds but the goodbye is rejected
    Close,
}

/// Recorded session event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeSessionEvent {
    Connect { server: String },
    Login { username: String },
    ChangeDir { dir: String },
    Store { name: String, bytes: u64 },
    Close,
}

#[derive(Default)]
struct TransportState {
    opened: usize,
    closed: usize,
    events: Vec<FakeSessionEvent>,
    stored: Vec<(String, String, Vec<u8>)>,
    failure: Option<TransportFailure>,
}

/// Fake transport that tracks how many sessions are open
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Arc<Mutex<TransportState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail at `step` on every subsequent session, or never with `None`
    pub fn set_failure(&self, step: Option<TransportFailure>) {
        self.lock().failure = step;
    }

    /// Sessions connected but not yet closed
    pub fn open_sessions(&self) -> usize {
        let state = self.lock();
        state.opened - state.closed
    }

    pub fn sessions_opened(&self) -> usize {
        self.lock().opened
    }

    pub fn events(&self) -> Vec<FakeSessionEvent> {
        self.lock().events.clone()
    }

    /// Stored files as `(remote_dir, name, contents)`
    pub fn stored(&self) -> Vec<(String, String, Vec<u8>)> {
        self.lock().stored.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TransportState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl MirrorTransport for FakeTransport {
    type Session = FakeSession;

    fn connect(&self, server: &str) -> Result<FakeSession, UploadError> {
        let mut state = self.lock();
        state.events.push(FakeSessionEvent::Connect {
            server: server.to_string(),
        });
        if state.failure == Some(TransportFailure::Connect) {
            return Err(UploadError::Connect {
                server: server.to_string(),
                message: "connection refused".to_string(),
            });
        }
        state.opened += 1;
        Ok(FakeSession {
            transport: self.clone(),
            cwd: String::from("/"),
            closed: false,
        })
    }
}

/// Session handed out by [`FakeTransport`]
pub struct FakeSession {
    transport: FakeTransport,
    cwd: String,
    closed: bool,
}

impl FakeSession {
    fn fails_at(&self, step: TransportFailure) -> bool {
        self.transport.lock().failure == Some(step)
    }
}

impl MirrorSession for FakeSession {
    fn login(&mut self, username: &str, _password: &str) -> Result<(), UploadError> {
        self.transport.lock().events.push(FakeSessionEvent::Login {
            username: username.to_string(),
        });
        if self.fails_at(TransportFailure::Login) {
            return Err(UploadError::Auth {
                username: username.to_string(),
                message: "530 Login incorrect".to_string(),
            });
        }
        Ok(())
    }

    fn change_dir(&mut self, dir: &str) -> Result<(), UploadError> {
        self.transport.lock().events.push(FakeSessionEvent::ChangeDir {
            dir: dir.to_string(),
        });
        if self.fails_at(TransportFailure::ChangeDir) {
            return Err(UploadError::ChangeDir {
                dir: dir.to_string(),
                message: "550 No such directory".to_string(),
            });
        }
        self.cwd = dir.to_string();
        Ok(())
    }

    #[allow(clippy::panic)]
    fn store(&mut self, name: &str, reader: &mut dyn Read) -> Result<u64, UploadError> {
        if self.fails_at(TransportFailure::PanicOnStore) {
            panic!("fake transport panicked while storing {name}");
        }
        if self.fails_at(TransportFailure::Store) {
            return Err(UploadError::Store {
                name: name.to_string(),
                message: "552 Quota exceeded".to_string(),
            });
        }

        let mut contents = Vec::new();
        reader
            .read_to_end(&mut contents)
            .map_err(|e| UploadError::Store {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        let bytes = contents.len() as u64;

        let mut state = self.transport.lock();
        state.events.push(FakeSessionEvent::Store {
            name: name.to_string(),
            bytes,
        });
        state.stored.push((self.cwd.clone(), name.to_string(), contents));
        Ok(bytes)
    }

    fn close(&mut self) -> Result<(), UploadError> {
        if !self.closed {
            self.closed = true;
            let mut state = self.transport.lock();
            state.closed += 1;
            state.events.push(FakeSessionEvent::Close);
        }
        if self.fails_at(TransportFailure::Close) {
            return Err(UploadError::Close("421 Service not available".to_string()));
        }
        Ok(())
    }
}

/// Recorded mirror upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorCall {
    pub local: PathBuf,
    pub remote_dir: String,
}

/// Fake mirror that records uploads without any transport
#[derive(Clone, Default)]
pub struct FakeMirror {
    calls: Arc<Mutex<Vec<MirrorCall>>>,
    failing: Arc<Mutex<bool>>,
}

impl FakeMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap_or_else(|e| e.into_inner()) = failing;
    }

    /// Get all recorded uploads, including failed attempts
    pub fn calls(&self) -> Vec<MirrorCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Mirror for FakeMirror {
    async fn upload(&self, local: &Path, remote_dir: &str) -> Result<(), UploadError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(MirrorCall {
                local: local.to_path_buf(),
                remote_dir: remote_dir.to_string(),
            });

        if *self.failing.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(UploadError::Connect {
                server: "fake".to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}
