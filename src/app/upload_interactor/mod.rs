// Upload interactor - Publishes edited clips after operator confirmation

use std::sync::Arc;
use tracing::info;

use crate::app::store::RepositoryStore;
use crate::domain::errors::*;
use crate::domain::model::VideoRecord;
use crate::domain::rules::*;
use crate::domain::template;
use crate::error::{Operation, OperationResult, WithOperation};
use crate::ports::*;

/// A published clip
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub id: u64,
    pub url: String,
}

/// Interactor for the upload use case
pub struct UploadInteractor {
    upload_port: Arc<dyn UploadPort>,
    confirm_port: Arc<dyn ConfirmPort>,
    categories: Arc<CategoryRegistry>,
}

impl UploadInteractor {
    pub fn new(
        upload_port: Arc<dyn UploadPort>,
        confirm_port: Arc<dyn ConfirmPort>,
        categories: Arc<CategoryRegistry>,
    ) -> Self {
        Self {
            upload_port,
            confirm_port,
            categories,
        }
    }

    /// Ask for the id of `id` and publish it when the answer matches
    pub async fn execute(&self, store: &mut RepositoryStore, id: u64) -> OperationResult<UploadOutcome> {
        self.confirm_and_upload(store, id)
            .await
            .during(Operation::Upload)
    }

    /// Publish `id`, given the id the operator typed to confirm
    pub async fn upload_confirmed(
        &self,
        store: &mut RepositoryStore,
        id: u64,
        confirmation: u64,
    ) -> OperationResult<UploadOutcome> {
        self.upload(store, id, confirmation)
            .await
            .during(Operation::Upload)
    }

    /// Every edited record not uploaded yet, each confirmed on its own
    pub async fn upload_pending(
        &self,
        store: &mut RepositoryStore,
    ) -> OperationResult<Vec<UploadOutcome>> {
        let ids: Vec<u64> = store
            .records()
            .iter()
            .filter(|v| v.is_edited() && !v.is_uploaded())
            .map(|v| v.id)
            .collect();

        let mut outcomes = Vec::with_capacity(ids.len());
        for id in ids {
            outcomes.push(self.execute(store, id).await?);
        }
        Ok(outcomes)
    }

    async fn confirm_and_upload(
        &self,
        store: &mut RepositoryStore,
        id: u64,
    ) -> Result<UploadOutcome, DomainError> {
        let record = store.find(id)?;
        ensure_publishable(record)?;
        let confirmation = self.confirm_port.confirm_upload(record).await?;
        self.upload(store, id, confirmation).await
    }

    async fn upload(
        &self,
        store: &mut RepositoryStore,
        id: u64,
        confirmation: u64,
    ) -> Result<UploadOutcome, DomainError> {
        if confirmation != id {
            return Err(DomainError::UploadConfirmationMismatch {
                expected: id,
                supplied: confirmation,
            });
        }

        let state = store.state();
        let record = store.find(id)?;
        ensure_publishable(record)?;
        let category = self.categories.by_id(&record.category_id)?;
        let upload = &category.upload;

        let request = UploadRequest {
            title: template::render(&upload.title_template, record)?,
            description: template::render(&upload.description_template, record)?,
            category_code: upload.category_code.clone(),
            tags: upload.tags.clone(),
            public: upload.public,
            file_path: state.edited_path(record),
            credential_path: state.credential_file.clone(),
        };

        info!(id, title = %request.title, "Uploading video");
        let url = self.upload_port.upload(&request).await?;
        store.mark_uploaded(id, url.clone()).await?;
        info!(id, url = %url, "Upload finished");
        Ok(UploadOutcome { id, url })
    }
}

/// Only edited records that were never published can be uploaded
fn ensure_publishable(record: &VideoRecord) -> Result<(), DomainError> {
    if !record.is_edited() {
        return Err(DomainError::NotEdited { id: record.id });
    }
    if record.is_uploaded() {
        return Err(DomainError::AlreadyUploaded { id: record.id });
    }
    Ok(())
}
