// Repository store - In-memory state kept in step with the repository file

use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Loaded repository plus the port it is persisted through.
///
/// Every mutation is applied to a copy, saved, and only then made visible,
/// so the in-memory state never runs ahead of the file on disk.
pub struct RepositoryStore {
    state: RepositoryState,
    port: Arc<dyn RepositoryPort>,
}

impl RepositoryStore {
    /// Load the repository; a fresh or unfilled file is reported as `ConfigMissing`
    pub async fn open(port: Arc<dyn RepositoryPort>) -> Result<Self, DomainError> {
        match port.load().await? {
            LoadOutcome::Bootstrapped(path) => Err(DomainError::ConfigMissing { path }),
            LoadOutcome::Loaded(state) if state.has_placeholders() => {
                Err(DomainError::ConfigMissing {
                    path: port.location().to_path_buf(),
                })
            }
            LoadOutcome::Loaded(state) => Ok(Self { state, port }),
        }
    }

    pub fn state(&self) -> &RepositoryState {
        &self.state
    }

    pub fn records(&self) -> &[VideoRecord] {
        &self.state.videos
    }

    pub fn location(&self) -> &Path {
        self.port.location()
    }

    pub fn find(&self, id: u64) -> Result<&VideoRecord, DomainError> {
        self.state
            .find(id)
            .ok_or(DomainError::RecordNotFound { id })
    }

    /// Reserve the next id, append the record and persist both
    pub async fn append_new(
        &mut self,
        source_file_name: &str,
        source_created_at: DateTime<Utc>,
        extension: &str,
        category_id: &str,
    ) -> Result<VideoRecord, DomainError> {
        let record = VideoRecord {
            id: self.state.next_id,
            source_file_name: source_file_name.to_string(),
            source_created_at,
            extension: extension.to_string(),
            category_id: category_id.to_string(),
            created_at: Utc::now(),
            edited_at: None,
            uploaded_at: None,
            url: None,
            range: None,
        };
        let appended = record.clone();
        self.commit(move |state| {
            state.next_id += 1;
            state.videos.push(appended);
            Ok(())
        })
        .await?;
        Ok(record)
    }

    pub async fn mark_edited(&mut self, id: u64) -> Result<(), DomainError> {
        self.update(id, |record| record.edited_at = Some(Utc::now()))
            .await
    }

    pub async fn mark_uploaded(&mut self, id: u64, url: String) -> Result<(), DomainError> {
        self.update(id, move |record| {
            record.uploaded_at = Some(Utc::now());
            record.url = Some(url);
        })
        .await
    }

    pub async fn set_range(&mut self, id: u64, range: TrimRange) -> Result<(), DomainError> {
        self.update(id, move |record| record.range = Some(range))
            .await
    }

    /// Drop the record; its files are the caller's concern
    pub async fn remove(&mut self, id: u64) -> Result<VideoRecord, DomainError> {
        let record = self.find(id)?.clone();
        self.commit(|state| {
            state.videos.retain(|v| v.id != id);
            Ok(())
        })
        .await?;
        Ok(record)
    }

    async fn update<F>(&mut self, id: u64, apply: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut VideoRecord),
    {
        self.commit(|state| {
            let record = state
                .find_mut(id)
                .ok_or(DomainError::RecordNotFound { id })?;
            apply(record);
            Ok(())
        })
        .await
    }

    async fn commit<F>(&mut self, mutate: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut RepositoryState) -> Result<(), DomainError>,
    {
        let mut next = self.state.clone();
        mutate(&mut next)?;
        if let Err(e) = self.port.save(&next).await {
            warn!(error = %e, "Repository save failed, keeping last persisted state");
            return Err(e);
        }
        debug!(videos = next.videos.len(), next_id = next.next_id, "Repository state committed");
        self.state = next;
        Ok(())
    }
}
