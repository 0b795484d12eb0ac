// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! FTP mirror transport

use super::uploader::{MirrorSession, MirrorTransport};
use super::UploadError;
use std::io::Read;
use suppaftp::types::FileType;
use suppaftp::FtpStream;

const DEFAULT_FTP_PORT: u16 = 21;

/// Plain FTP transport
#[derive(Clone, Debug, Default)]
pub struct FtpTransport;

impl FtpTransport {
    pub fn new() -> Self {
        Self
    }
}

/// Append the default FTP port when `server` has none
pub fn server_address(server: &str) -> String {
    let server = server.trim();
    let has_port = server
        .rsplit_once(':')
        .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
    if has_port {
        server.to_string()
    } else {
        format!("{}:{}", server, DEFAULT_FTP_PORT)
    }
}

impl MirrorTransport for FtpTransport {
    type Session = FtpSession;

    fn connect(&self, server: &str) -> Result<FtpSession, UploadError> {
        let address = server_address(server);
        let stream = FtpStream::connect(address.as_str()).map_err(|e| UploadError::Connect {
            server: address.clone(),
            message: e.to_string(),
        })?;
        Ok(FtpSession {
            stream,
            open: true,
        })
    }
}

/// One FTP control connection
pub struct FtpSession {
    stream: FtpStream,
    open: bool,
}

impl MirrorSession for FtpSession {
    fn login(&mut self, username: &str, password: &str) -> Result<(), UploadError> {
        self.stream
            .login(username, password)
            .map_err(|e| UploadError::Auth {
                username: username.to_string(),
                message: e.to_string(),
            })?;
        self.stream
            .transfer_type(FileType::Binary)
            .map_err(|e| UploadError::Auth {
                username: username.to_string(),
                message: format!("binary mode refused: {}", e),
            })
    }

    fn change_dir(&mut self, dir: &str) -> Result<(), UploadError> {
        self.stream.cwd(dir).map_err(|e| UploadError::ChangeDir {
            dir: dir.to_string(),
            message: e.to_string(),
        })
    }

    fn store(&mut self, name: &str, mut reader: &mut dyn Read) -> Result<u64, UploadError> {
        self.stream
            .put_file(name, &mut reader)
            .map_err(|e| UploadError::Store {
                name: name.to_string(),
                message: e.to_string(),
            })
    }

    fn close(&mut self) -> Result<(), UploadError> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.stream
            .quit()
            .map_err(|e| UploadError::Close(e.to_string()))
    }
}

#[cfg(test)]
#[path = "ftp_tests.rs"]
mod tests;
