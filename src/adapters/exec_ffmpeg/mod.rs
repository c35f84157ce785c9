//! FFmpeg execution adapter
//!
//! Runs the external ffmpeg binary with a synthesized argument vector and
//! captures its output for diagnostics.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// Default transcoder program name
pub const DEFAULT_TRANSCODER: &str = "ffmpeg";

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    program: String,
}

impl FFmpegAdapter {
    /// Create new adapter running `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FFmpegAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSCODER)
    }
}

#[async_trait]
impl TranscodePort for FFmpegAdapter {
    async fn transcode(&self, args: &[String]) -> Result<TranscodeOutput, DomainError> {
        debug!(program = %self.program, ?args, "Spawning transcoder");
        let start = Instant::now();
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| DomainError::TranscoderUnavailable {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(TranscodeOutput {
            status: output.status.code(),
            output: combined,
            elapsed: start.elapsed(),
        })
    }
}
