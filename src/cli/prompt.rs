//! Operator prompts on stdin

use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

use crate::domain::errors::DomainError;
use crate::domain::model::{TrimRange, VideoRecord};
use crate::ports::ConfirmPort;

/// Line reader shared by the menu and the upload confirmation
pub struct StdinPrompt {
    reader: Mutex<BufReader<Stdin>>,
}

impl StdinPrompt {
    pub fn new() -> Self {
        Self {
            reader: Mutex::new(BufReader::new(tokio::io::stdin())),
        }
    }

    /// Print `prompt` and read one line; `None` at end of input
    pub async fn read_line(&self, prompt: &str) -> Result<Option<String>, DomainError> {
        print!("{}", prompt);
        std::io::stdout().flush().map_err(prompt_error)?;

        let mut line = String::new();
        let read = self
            .reader
            .lock()
            .await
            .read_line(&mut line)
            .await
            .map_err(prompt_error)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub async fn read_id(&self, prompt: &str) -> Result<u64, DomainError> {
        parse_id(&self.required_line(prompt).await?)
    }

    pub async fn read_range(&self, prompt: &str) -> Result<TrimRange, DomainError> {
        TrimRange::parse(&self.required_line(prompt).await?)
    }

    async fn required_line(&self, prompt: &str) -> Result<String, DomainError> {
        self.read_line(prompt).await?.ok_or_else(|| DomainError::Prompt {
            message: "end of input".to_string(),
        })
    }
}

impl Default for StdinPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfirmPort for StdinPrompt {
    async fn confirm_upload(&self, record: &VideoRecord) -> Result<u64, DomainError> {
        println!("Upload {} ({})", record.id, record.source_file_name);
        self.read_id("type video id to confirm: ").await
    }
}

/// Parse an id typed by the operator
pub fn parse_id(input: &str) -> Result<u64, DomainError> {
    input.trim().parse().map_err(|_| DomainError::Prompt {
        message: format!("not a video id: {:?}", input.trim()),
    })
}

fn prompt_error(err: std::io::Error) -> DomainError {
    DomainError::Prompt {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(" 1000\n").unwrap(), 1000);
        assert!(matches!(parse_id("abc"), Err(DomainError::Prompt { .. })));
        assert!(parse_id("").is_err());
    }
}
