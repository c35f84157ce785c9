// Edit interactor - Runs the category transform over staged originals

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::app::store::RepositoryStore;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::domain::transform::{synthesize, TransformInput};
use crate::error::{Operation, OperationResult, WithOperation};
use crate::ports::*;
use crate::utils::format_duration;

/// A finished edit
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    pub id: u64,
    pub output: PathBuf,
    pub elapsed: Duration,
}

/// Interactor for the edit use case
pub struct EditInteractor {
    fs_port: Arc<dyn FsPort>,
    transcode_port: Arc<dyn TranscodePort>,
    categories: Arc<CategoryRegistry>,
    formats: Arc<FormatRegistry>,
}

impl EditInteractor {
    pub fn new(
        fs_port: Arc<dyn FsPort>,
        transcode_port: Arc<dyn TranscodePort>,
        categories: Arc<CategoryRegistry>,
        formats: Arc<FormatRegistry>,
    ) -> Self {
        Self {
            fs_port,
            transcode_port,
            categories,
            formats,
        }
    }

    /// Edit one record; re-editing an edited record is allowed
    pub async fn execute(&self, store: &mut RepositoryStore, id: u64) -> OperationResult<EditOutcome> {
        self.edit(store, id).await.during(Operation::Edit)
    }

    /// Edit the unedited record with the lowest id, if any
    pub async fn edit_oldest_unedited(
        &self,
        store: &mut RepositoryStore,
    ) -> OperationResult<Option<EditOutcome>> {
        let oldest = store
            .records()
            .iter()
            .filter(|v| !v.is_edited())
            .map(|v| v.id)
            .min();
        match oldest {
            Some(id) => self.execute(store, id).await.map(Some),
            None => Ok(None),
        }
    }

    /// Edit every record not edited yet, stopping at the first failure
    pub async fn edit_all_unedited(
        &self,
        store: &mut RepositoryStore,
    ) -> OperationResult<Vec<EditOutcome>> {
        let ids = select_ids(store, |v| !v.is_edited());
        self.edit_many(store, ids).await
    }

    /// Edit (or re-edit) every record not uploaded yet
    pub async fn edit_all_unuploaded(
        &self,
        store: &mut RepositoryStore,
    ) -> OperationResult<Vec<EditOutcome>> {
        let ids = select_ids(store, |v| !v.is_uploaded());
        self.edit_many(store, ids).await
    }

    /// Store a per-record range override, then edit with it
    pub async fn set_range_and_edit(
        &self,
        store: &mut RepositoryStore,
        id: u64,
        range: TrimRange,
    ) -> OperationResult<EditOutcome> {
        store.set_range(id, range).await.during(Operation::SetRange)?;
        info!(id, range = %range, "Range override stored");
        self.execute(store, id).await
    }

    /// Most recently edited record, the usual target of a range adjustment
    pub fn latest_edited(store: &RepositoryStore) -> Option<u64> {
        store
            .records()
            .iter()
            .filter_map(|v| v.edited_at.map(|at| (at, v.id)))
            .max()
            .map(|(_, id)| id)
    }

    async fn edit_many(
        &self,
        store: &mut RepositoryStore,
        ids: Vec<u64>,
    ) -> OperationResult<Vec<EditOutcome>> {
        let mut outcomes = Vec::with_capacity(ids.len());
        for id in ids {
            outcomes.push(self.execute(store, id).await?);
        }
        Ok(outcomes)
    }

    async fn edit(&self, store: &mut RepositoryStore, id: u64) -> Result<EditOutcome, DomainError> {
        let state = store.state();
        let record = store.find(id)?;
        let category = self.categories.by_id(&record.category_id)?;
        let format = self
            .formats
            .by_extension(&record.extension)
            .ok_or_else(|| DomainError::UnknownFormat {
                file_name: record.source_file_name.clone(),
            })?;

        let input = state.staged_path(record);
        if !self.fs_port.file_exists(&input).await? {
            return Err(DomainError::StagedOriginalMissing { id, path: input });
        }
        let output = state.edited_path(record);

        let args = synthesize(&TransformInput {
            category,
            format,
            record,
            range_override: record.range,
            input,
            output: output.clone(),
        })?;

        info!(id, "Editing video");
        let result = self.transcode_port.transcode(&args).await?;
        if !result.success() {
            error!(id, status = ?result.status, "Transcoder failed");
            return Err(DomainError::Transcode {
                status: result.status,
                output: result.output,
            });
        }

        store.mark_edited(id).await?;
        info!(id, elapsed = %format_duration(result.elapsed), "Edit finished");
        Ok(EditOutcome {
            id,
            output,
            elapsed: result.elapsed,
        })
    }
}

fn select_ids(store: &RepositoryStore, wanted: impl Fn(&VideoRecord) -> bool) -> Vec<u64> {
    store
        .records()
        .iter()
        .filter(|v| wanted(v))
        .map(|v| v.id)
        .collect()
}
