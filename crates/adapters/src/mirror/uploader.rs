// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session-scoped mirror uploads
//!
//! A mirror session is opened per upload and closed on every exit path:
//! success, a failed protocol step, or an unwinding panic. [`ScopedSession`]
//! owns that guarantee.

use super::{CredentialSource, Credentials, Mirror, UploadError};
use crate::blocking::spawn_blocking_in_context;
use async_trait::async_trait;
use std::fs::File;
use std::io::Read;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use tracing::Instrument;

/// An open file-transfer session
pub trait MirrorSession: Send {
    fn login(&mut self, username: &str, password: &str) -> Result<(), UploadError>;
    fn change_dir(&mut self, dir: &str) -> Result<(), UploadError>;
    /// Store `reader` as `name` in the current directory, returning bytes written
    fn store(&mut self, name: &str, reader: &mut dyn Read) -> Result<u64, UploadError>;
    fn close(&mut self) -> Result<(), UploadError>;
}

/// Opens mirror sessions
pub trait MirrorTransport: Clone + Send + Sync + 'static {
    type Session: MirrorSession;

    fn connect(&self, server: &str) -> Result<Self::Session, UploadError>;
}

/// Closes the wrapped session when dropped unless [`ScopedSession::finish`] ran
pub struct ScopedSession<S: MirrorSession> {
    session: S,
    closed: bool,
}

impl<S: MirrorSession> ScopedSession<S> {
    pub fn new(session: S) -> Self {
        Self {
            session,
            closed: false,
        }
    }

    /// Close the session, reporting any error from the close itself
    pub fn finish(mut self) -> Result<(), UploadError> {
        self.closed = true;
        self.session.close()
    }
}

impl<S: MirrorSession> Deref for ScopedSession<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: MirrorSession> DerefMut for ScopedSession<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: MirrorSession> Drop for ScopedSession<S> {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(e) = self.session.close() {
                tracing::warn!(error = %e, "failed to close mirror session");
            }
        }
    }
}

/// Uploads artifacts through `T` using credentials from `C`
#[derive(Clone)]
pub struct MirrorUploader<T, C> {
    transport: T,
    credentials: C,
}

impl<T, C> MirrorUploader<T, C>
where
    T: MirrorTransport,
    C: CredentialSource,
{
    pub fn new(transport: T, credentials: C) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Blocking upload; returns the number of bytes stored
    pub fn upload_blocking(&self, local: &Path, remote_dir: &str) -> Result<u64, UploadError> {
        let name = local
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| UploadError::InvalidPath(local.to_path_buf()))?;

        let credentials = self.credentials.load()?;
        let mut file = File::open(local).map_err(|source| UploadError::Io {
            path: local.to_path_buf(),
            source,
        })?;

        let mut session = ScopedSession::new(self.transport.connect(&credentials.server)?);
        let stored = transfer(&mut *session, &credentials, remote_dir, name, &mut file);
        let closed = session.finish();

        let bytes = stored?;
        if let Err(e) = closed {
            // The file is stored; a failed goodbye does not undo that
            tracing::warn!(error = %e, "mirror session did not close cleanly");
        }
        Ok(bytes)
    }
}

fn transfer<S: MirrorSession + ?Sized>(
    session: &mut S,
    credentials: &Credentials,
    remote_dir: &str,
    name: &str,
    file: &mut File,
) -> Result<u64, UploadError> {
    session.login(&credentials.username, &credentials.password)?;
    session.change_dir(remote_dir)?;
    session.store(name, file)
}

#[async_trait]
impl<T, C> Mirror for MirrorUploader<T, C>
where
    T: MirrorTransport,
    C: CredentialSource,
{
    async fn upload(&self, local: &Path, remote_dir: &str) -> Result<(), UploadError> {
        let span = tracing::info_span!(
            "mirror.upload",
            path = %local.display(),
            remote_dir
        );

        let uploader = self.clone();
        let local_path = local.to_path_buf();
        let remote = remote_dir.to_string();

        async move {
            tracing::info!("uploading");
            let start = std::time::Instant::now();
            let result = spawn_blocking_in_context(move || {
                uploader.upload_blocking(&local_path, &remote)
            })
            .await
            .map_err(|e| UploadError::Join(e.to_string()))
            .and_then(|r| r);
            let elapsed = start.elapsed();

            match &result {
                Ok(bytes) => tracing::info!(
                    bytes,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "artifact mirrored"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "mirror upload failed"
                ),
            }

            result.map(|_| ())
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "uploader_tests.rs"]
mod tests;
