// Ports - Interface definitions (contracts)

use crate::domain::errors::*;
use crate::domain::model::*;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Result of opening the repository file
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Existing file parsed
    Loaded(RepositoryState),
    /// File was absent; a template was written at this path
    Bootstrapped(PathBuf),
}

/// Port for durable repository storage
#[async_trait]
pub trait RepositoryPort: Send + Sync {
    /// Load the repository, bootstrapping a template on first run
    async fn load(&self) -> Result<LoadOutcome, DomainError>;

    /// Replace the stored repository with `state`, keeping a backup
    async fn save(&self, state: &RepositoryState) -> Result<(), DomainError>;

    /// Location of the repository file
    fn location(&self) -> &Path;
}

/// Captured result of a transcoder run
#[derive(Debug, Clone)]
pub struct TranscodeOutput {
    pub status: Option<i32>,
    /// stdout followed by stderr
    pub output: String,
    pub elapsed: Duration,
}

impl TranscodeOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Port for the external transcoder
#[async_trait]
pub trait TranscodePort: Send + Sync {
    /// Run the transcoder to completion with `args`
    async fn transcode(&self, args: &[String]) -> Result<TranscodeOutput, DomainError>;
}

/// What the upload collaborator needs to publish one clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub title: String,
    pub description: String,
    pub category_code: String,
    pub tags: Vec<String>,
    pub public: bool,
    pub file_path: PathBuf,
    pub credential_path: PathBuf,
}

/// Port for the external upload service
#[async_trait]
pub trait UploadPort: Send + Sync {
    /// Publish and return the identifier of the published content
    async fn upload(&self, request: &UploadRequest) -> Result<String, DomainError>;
}

/// A regular file found in the source directory
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub name: String,
    pub modified: DateTime<Utc>,
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Regular files directly inside `dir`, sorted by name
    async fn list_files(&self, dir: &Path) -> Result<Vec<SourceFile>, DomainError>;

    /// Check if file exists
    async fn file_exists(&self, path: &Path) -> Result<bool, DomainError>;

    /// Create directory (including parent directories)
    async fn create_directory(&self, dir: &Path) -> Result<(), DomainError>;

    /// Copy file
    async fn copy_file(&self, from: &Path, to: &Path) -> Result<(), DomainError>;

    /// Delete file
    async fn delete_file(&self, path: &Path) -> Result<(), DomainError>;
}

/// Port for operator confirmations
#[async_trait]
pub trait ConfirmPort: Send + Sync {
    /// Ask the operator to type the id of `record` before it is published
    async fn confirm_upload(&self, record: &VideoRecord) -> Result<u64, DomainError>;
}
