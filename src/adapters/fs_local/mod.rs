// Local filesystem adapter - File system operations on the host

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::ports::*;

/// Local filesystem adapter
#[derive(Debug, Default)]
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

fn list_files_blocking(dir: &Path) -> Result<Vec<SourceFile>, DomainError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| DomainError::filesystem(dir, e))?;
        if !entry.file_type().is_file() {
            tracing::debug!(path = %entry.path().display(), "Ignoring non-file entry");
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            tracing::warn!(path = %entry.path().display(), "Ignoring file with non UTF-8 name");
            continue;
        };
        let metadata = entry
            .metadata()
            .map_err(|e| DomainError::filesystem(entry.path(), e))?;
        let modified: DateTime<Utc> = metadata
            .modified()
            .map_err(|e| DomainError::filesystem(entry.path(), e))?
            .into();
        files.push(SourceFile {
            name: name.to_string(),
            modified,
        });
    }
    Ok(files)
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn list_files(&self, dir: &Path) -> Result<Vec<SourceFile>, DomainError> {
        let dir: PathBuf = dir.to_path_buf();
        let path = dir.clone();
        tokio::task::spawn_blocking(move || list_files_blocking(&dir))
            .await
            .map_err(|e| DomainError::filesystem(path, e))?
    }

    async fn file_exists(&self, path: &Path) -> Result<bool, DomainError> {
        match tokio::fs::metadata(path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::filesystem(path, e)),
        }
    }

    async fn create_directory(&self, dir: &Path) -> Result<(), DomainError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| DomainError::filesystem(dir, e))
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> Result<(), DomainError> {
        tokio::fs::copy(from, to)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::filesystem(from, format!("copy to {} failed: {}", to.display(), e)))
    }

    async fn delete_file(&self, path: &Path) -> Result<(), DomainError> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| DomainError::filesystem(path, e))
    }
}
