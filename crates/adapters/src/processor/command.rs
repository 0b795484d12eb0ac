// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External command processing adapter

use super::{ProcessError, ProcessRequest, ProcessingTrigger};
use async_trait::async_trait;
use chrono::SecondsFormat;
use regex::Regex;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::process::Command;

// Regex pattern for {variable_name} - this is a constant valid pattern
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// Interpolate `{name}` placeholders with values from the vars map
///
/// Unknown variables are left as-is.
pub fn interpolate(template: &str, vars: &HashMap<&str, String>) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            vars.get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .to_string()
}

/// Where the program writes before the artifact is published
///
/// The suffix keeps the file from decoding as an artifact, so an
/// interrupted or failed run never counts as progress.
pub fn staging_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    output.with_file_name(name)
}

async fn discard(staged: &Path) {
    match tokio::fs::remove_file(staged).await {
        Ok(()) => tracing::debug!(path = %staged.display(), "removed staged output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %staged.display(),
            error = %e,
            "failed to remove staged output"
        ),
    }
}

/// Runs an external program once per request
///
/// Arguments may reference `{spacecraft}`, `{grade}`, `{start}`, `{end}`
/// and `{output}`. Times are RFC 3339 in UTC; `end` is exclusive.
/// `{output}` is a staging path that is renamed to the artifact name only
/// after the program exits zero.
#[derive(Clone, Debug)]
pub struct CommandProcessor {
    program: String,
    args: Vec<String>,
}

impl CommandProcessor {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Arguments for `request` with placeholders filled in
    pub fn build_args(&self, request: &ProcessRequest) -> Vec<String> {
        let vars = HashMap::from([
            ("spacecraft", request.spacecraft.to_string()),
            ("grade", request.grade.to_string()),
            (
                "start",
                request
                    .range
                    .start()
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            (
                "end",
                request.range.end().to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            ("output", staging_path(&request.output).display().to_string()),
        ]);

        self.args.iter().map(|arg| interpolate(arg, &vars)).collect()
    }
}

#[async_trait]
impl ProcessingTrigger for CommandProcessor {
    async fn run(&self, request: &ProcessRequest) -> Result<PathBuf, ProcessError> {
        if let Some(parent) = request.output.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ProcessError::OutputDir {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
        }

        let staged = staging_path(&request.output);
        // Leftovers from an interrupted run must not be published
        discard(&staged).await;

        let result = self.produce(request, &staged).await;
        if result.is_err() {
            discard(&staged).await;
        }
        result
    }
}

impl CommandProcessor {
    async fn produce(
        &self,
        request: &ProcessRequest,
        staged: &Path,
    ) -> Result<PathBuf, ProcessError> {
        let args = self.build_args(request);
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|e| ProcessError::Spawn {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProcessError::Exited {
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        if !tokio::fs::try_exists(staged).await.unwrap_or(false) {
            return Err(ProcessError::MissingArtifact(staged.to_path_buf()));
        }

        tokio::fs::rename(staged, &request.output)
            .await
            .map_err(|e| ProcessError::Publish {
                staged: staged.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(request.output.clone())
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
