// Purge interactor - Deletes a record and its files

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::app::store::RepositoryStore;
use crate::domain::errors::*;
use crate::error::{Operation, OperationResult, WithOperation};
use crate::ports::*;

/// A purged record and the files that could not be deleted
#[derive(Debug, Clone, PartialEq)]
pub struct PurgeOutcome {
    pub id: u64,
    pub leftovers: Vec<PathBuf>,
}

/// Interactor for the purge use case
pub struct PurgeInteractor {
    fs_port: Arc<dyn FsPort>,
}

impl PurgeInteractor {
    pub fn new(fs_port: Arc<dyn FsPort>) -> Self {
        Self { fs_port }
    }

    /// Purge one record in any lifecycle state
    pub async fn execute(&self, store: &mut RepositoryStore, id: u64) -> OperationResult<PurgeOutcome> {
        self.purge(store, id).await.during(Operation::Purge)
    }

    /// Purge every uploaded record
    pub async fn purge_uploaded(
        &self,
        store: &mut RepositoryStore,
    ) -> OperationResult<Vec<PurgeOutcome>> {
        let ids: Vec<u64> = store
            .records()
            .iter()
            .filter(|v| v.is_uploaded())
            .map(|v| v.id)
            .collect();

        let mut outcomes = Vec::with_capacity(ids.len());
        for id in ids {
            outcomes.push(self.execute(store, id).await?);
        }
        Ok(outcomes)
    }

    async fn purge(&self, store: &mut RepositoryStore, id: u64) -> Result<PurgeOutcome, DomainError> {
        let state = store.state();
        let record = store.find(id)?;
        let mut targets = vec![state.source_path(record), state.staged_path(record)];
        if record.is_edited() {
            targets.push(state.edited_path(record));
        }

        let mut leftovers = Vec::new();
        for path in targets {
            if let Err(e) = self.fs_port.delete_file(&path).await {
                warn!(id, error = %e, "Failed to delete file");
                leftovers.push(path);
            }
        }

        store.remove(id).await?;
        info!(id, leftovers = leftovers.len(), "Video purged");
        Ok(PurgeOutcome { id, leftovers })
    }
}
