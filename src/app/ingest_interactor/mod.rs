// Ingest interactor - Registers new source files and stages their copies

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::app::store::RepositoryStore;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::error::{Operation, OperationResult, WithOperation};
use crate::ports::*;

/// A source file left untracked and why
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: String,
}

/// Outcome of one ingestion pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub ingested: Vec<VideoRecord>,
    pub skipped: Vec<SkippedFile>,
    /// Ids whose missing staged copy was restored
    pub repaired: Vec<u64>,
}

impl IngestReport {
    pub fn is_empty(&self) -> bool {
        self.ingested.is_empty() && self.skipped.is_empty() && self.repaired.is_empty()
    }
}

/// Interactor for the ingestion use case
pub struct IngestInteractor {
    fs_port: Arc<dyn FsPort>,
    categories: Arc<CategoryRegistry>,
    formats: Arc<FormatRegistry>,
}

impl IngestInteractor {
    pub fn new(
        fs_port: Arc<dyn FsPort>,
        categories: Arc<CategoryRegistry>,
        formats: Arc<FormatRegistry>,
    ) -> Self {
        Self {
            fs_port,
            categories,
            formats,
        }
    }

    /// Scan the source directory once
    pub async fn execute(&self, store: &mut RepositoryStore) -> OperationResult<IngestReport> {
        self.scan(store).await.during(Operation::Ingestion)
    }

    async fn scan(&self, store: &mut RepositoryStore) -> Result<IngestReport, DomainError> {
        let state = store.state();
        self.fs_port.create_directory(&state.staged_dir).await?;
        self.fs_port.create_directory(&state.edited_dir).await?;

        let source_dir = state.source_dir.clone();
        let files = self.fs_port.list_files(&source_dir).await?;
        debug!(dir = %source_dir.display(), files = files.len(), "Scanning source directory");

        let mut report = IngestReport::default();
        for file in files {
            if is_ignored_file(&file.name) {
                continue;
            }
            if store.state().knows_source(&file.name) {
                if let Some(id) = self.repair(store, &file.name).await? {
                    report.repaired.push(id);
                }
                continue;
            }

            match self.ingest_one(store, &file).await {
                Ok(record) => report.ingested.push(record),
                Err(e) if e.is_skippable() => {
                    warn!(file = %file.name, reason = %e, "Skipping source file");
                    report.skipped.push(SkippedFile {
                        file_name: file.name.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            ingested = report.ingested.len(),
            skipped = report.skipped.len(),
            repaired = report.repaired.len(),
            "Ingestion finished"
        );
        Ok(report)
    }

    async fn ingest_one(
        &self,
        store: &mut RepositoryStore,
        file: &SourceFile,
    ) -> Result<VideoRecord, DomainError> {
        let category = self.categories.match_category(&file.name)?;
        self.formats.match_format(&file.name)?;
        let extension = file_extension(&file.name).unwrap_or_default();

        let record = store
            .append_new(&file.name, file.modified, extension, &category.id)
            .await?;
        info!(id = record.id, file = %file.name, category = %category.id, "New video");

        let state = store.state();
        self.fs_port
            .copy_file(&state.source_path(&record), &state.staged_path(&record))
            .await?;
        Ok(record)
    }

    /// Restore the staged copy of an already-tracked file when it went missing
    async fn repair(
        &self,
        store: &RepositoryStore,
        file_name: &str,
    ) -> Result<Option<u64>, DomainError> {
        let state = store.state();
        let Some(record) = state.videos.iter().find(|v| v.source_file_name == file_name) else {
            return Ok(None);
        };
        let staged = state.staged_path(record);
        if self.fs_port.file_exists(&staged).await? {
            return Ok(None);
        }
        warn!(id = record.id, path = %staged.display(), "Staged original missing, copying again");
        self.fs_port
            .copy_file(&state.source_path(record), &staged)
            .await?;
        Ok(Some(record.id))
    }
}
