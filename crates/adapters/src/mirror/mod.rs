// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote mirror adapters

mod credentials;
mod ftp;
mod uploader;

pub use credentials::{
    CredentialSource, Credentials, EnvFileCredentials, FTP_PASSWORD, FTP_SERVER, FTP_USERNAME,
};
pub use ftp::{FtpSession, FtpTransport};
pub use uploader::{MirrorSession, MirrorTransport, MirrorUploader, ScopedSession};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{
    FakeMirror, FakeSession, FakeSessionEvent, FakeTransport, MirrorCall, StaticCredentials,
    TransportFailure,
};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from mirror uploads
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("mirror credentials unavailable: {0}")]
    Credentials(String),
    #[error("artifact path has no usable file name: {0}")]
    InvalidPath(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to connect to {server}: {message}")]
    Connect { server: String, message: String },
    #[error("login rejected for {username}: {message}")]
    Auth { username: String, message: String },
    #[error("cannot change to remote directory {dir}: {message}")]
    ChangeDir { dir: String, message: String },
    #[error("failed to store {name}: {message}")]
    Store { name: String, message: String },
    #[error("failed to close session: {0}")]
    Close(String),
    #[error("upload task failed: {0}")]
    Join(String),
}

/// Adapter that copies a local artifact to a remote archive
#[async_trait]
pub trait Mirror: Clone + Send + Sync + 'static {
    /// Store `local` in `remote_dir` under its base name
    async fn upload(&self, local: &Path, remote_dir: &str) -> Result<(), UploadError>;
}
