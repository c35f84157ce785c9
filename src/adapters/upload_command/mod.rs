//! Upload adapter backed by an external uploader program
//!
//! The uploader receives the [`UploadRequest`] as one line of JSON on stdin
//! and prints the identifier of the published video as its last non-empty
//! line on stdout. Authentication and transport are the uploader's business.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// Uploader invoked as a child process
pub struct CommandUploadAdapter {
    program: String,
    args: Vec<String>,
}

impl CommandUploadAdapter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn failure(&self, message: impl std::fmt::Display) -> DomainError {
        DomainError::Upload {
            message: format!("{}: {}", self.program, message),
        }
    }
}

#[async_trait]
impl UploadPort for CommandUploadAdapter {
    async fn upload(&self, request: &UploadRequest) -> Result<String, DomainError> {
        let mut body = serde_json::to_vec(request).map_err(|e| self.failure(e))?;
        body.push(b'\n');

        debug!(program = %self.program, file = %request.file_path.display(), "Spawning uploader");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failure(format!("failed to start: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&body)
                .await
                .map_err(|e| self.failure(format!("failed to send request: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.failure(e))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(format!("exited with {}: {}", output.status, stderr.trim())));
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .map(str::to_string)
            .ok_or_else(|| self.failure("printed no identifier"))
    }
}
