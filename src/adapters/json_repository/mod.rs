//! JSON repository adapter
//!
//! Stores the whole [`RepositoryState`] as one pretty-printed JSON document.
//! Every save first copies the current file to `<file>.backup`, then writes
//! the new body to a temporary file in the same directory and renames it over
//! the target, so a crash leaves either the old or the new version on disk.

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::utils::path::with_suffix;

/// Suffix of the copy kept next to the repository file
pub const BACKUP_SUFFIX: &str = ".backup";

/// JSON-file repository adapter
pub struct JsonRepositoryAdapter {
    path: PathBuf,
}

impl JsonRepositoryAdapter {
    /// Create new adapter for the repository file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where the previous version is kept
    pub fn backup_path(&self) -> PathBuf {
        with_suffix(&self.path, BACKUP_SUFFIX)
    }

    fn read_error(&self, err: impl std::fmt::Display) -> DomainError {
        DomainError::RepositoryRead {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl RepositoryPort for JsonRepositoryAdapter {
    async fn load(&self) -> Result<LoadOutcome, DomainError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let state: RepositoryState =
                    serde_json::from_slice(&bytes).map_err(|e| self.read_error(e))?;
                debug!(
                    path = %self.path.display(),
                    videos = state.videos.len(),
                    next_id = state.next_id,
                    "Repository loaded"
                );
                Ok(LoadOutcome::Loaded(state))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "Fresh start detected, writing repository template");
                self.save(&RepositoryState::template()).await?;
                Ok(LoadOutcome::Bootstrapped(self.path.clone()))
            }
            Err(e) => Err(self.read_error(e)),
        }
    }

    async fn save(&self, state: &RepositoryState) -> Result<(), DomainError> {
        let path = self.path.clone();
        let backup = self.backup_path();
        let state = state.clone();
        tokio::task::spawn_blocking(move || write_with_backup(&path, &backup, &state))
            .await
            .map_err(|e| DomainError::Persistence {
                path: self.path.clone(),
                backup: None,
                message: format!("save task failed: {}", e),
            })?
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

fn write_with_backup(
    path: &Path,
    backup_path: &Path,
    state: &RepositoryState,
) -> Result<(), DomainError> {
    let backup = if path.exists() {
        match std::fs::copy(path, backup_path) {
            Ok(_) => Some(backup_path.to_path_buf()),
            Err(e) => {
                warn!(path = %backup_path.display(), error = %e, "Failed to back up repository file");
                None
            }
        }
    } else {
        None
    };

    let fail = |message: String| DomainError::Persistence {
        path: path.to_path_buf(),
        backup: backup.clone(),
        message,
    };

    let mut body = serde_json::to_vec_pretty(state).map_err(|e| fail(e.to_string()))?;
    body.push(b'\n');

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| fail(format!("creating {}: {}", dir.display(), e)))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| fail(format!("creating temp file: {}", e)))?;
    temp.write_all(&body)
        .map_err(|e| fail(format!("writing temp file: {}", e)))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| fail(format!("syncing temp file: {}", e)))?;
    temp.persist(path)
        .map_err(|e| fail(format!("replacing repository file: {}", e.error)))?;

    debug!(path = %path.display(), videos = state.videos.len(), "Repository saved");
    Ok(())
}
