// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mirror credentials loaded from an env file

use super::UploadError;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

pub const FTP_SERVER: &str = "FTP_SERVER";
pub const FTP_USERNAME: &str = "FTP_USERNAME";
pub const FTP_PASSWORD: &str = "FTP_PASSWORD";

/// Server address and login for the mirror
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub server: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Source of mirror credentials
///
/// Called once per upload attempt, so rotated credentials are picked up
/// without a restart.
pub trait CredentialSource: Clone + Send + Sync + 'static {
    fn load(&self) -> Result<Credentials, UploadError>;
}

/// Reads `FTP_SERVER`, `FTP_USERNAME` and `FTP_PASSWORD` from an env file
///
/// Keys missing from the file (or a missing file) fall back to the process
/// environment.
#[derive(Clone, Debug)]
pub struct EnvFileCredentials {
    path: PathBuf,
}

impl EnvFileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_file(&self) -> Result<HashMap<String, String>, UploadError> {
        let path = &self.path;
        if !path.exists() {
            return Ok(HashMap::new());
        }

        let iter = dotenvy::from_path_iter(path).map_err(|e| {
            UploadError::Credentials(format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut values = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e| {
                UploadError::Credentials(format!("failed to parse {}: {}", path.display(), e))
            })?;
            values.insert(key, value);
        }
        Ok(values)
    }
}

impl CredentialSource for EnvFileCredentials {
    fn load(&self) -> Result<Credentials, UploadError> {
        let mut file = self.read_file()?;
        let mut take = |key: &str| {
            file.remove(key)
                .or_else(|| std::env::var(key).ok())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| UploadError::Credentials(format!("{} is not set", key)))
        };

        Ok(Credentials {
            server: take(FTP_SERVER)?,
            username: take(FTP_USERNAME)?,
            password: take(FTP_PASSWORD)?,
        })
    }
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
