use anyhow::Result;
use std::sync::Arc;

use crate::adapters::{CommandUploadAdapter, FFmpegAdapter, JsonRepositoryAdapter, LocalFsAdapter};
use crate::app::{
    edit_interactor::EditInteractor, ingest_interactor::IngestInteractor,
    purge_interactor::PurgeInteractor, store::RepositoryStore,
    upload_interactor::UploadInteractor,
};
use crate::config_initialization::Settings;
use crate::domain::errors::DomainError;
use crate::domain::rules::CategoryRegistry;
use crate::ports::{ConfirmPort, FsPort, RepositoryPort, TranscodePort, UploadPort};

pub trait AppContainer {
    fn ingest_interactor(&self) -> Arc<IngestInteractor>;
    fn edit_interactor(&self) -> Arc<EditInteractor>;
    fn upload_interactor(&self) -> Arc<UploadInteractor>;
    fn purge_interactor(&self) -> Arc<PurgeInteractor>;
}

/// Ports handed to the container; tests swap in doubles
pub struct Ports {
    pub repository: Arc<dyn RepositoryPort>,
    pub fs: Arc<dyn FsPort>,
    pub transcode: Arc<dyn TranscodePort>,
    pub upload: Arc<dyn UploadPort>,
    pub confirm: Arc<dyn ConfirmPort>,
}

impl Ports {
    /// Production adapters configured from `settings`
    pub fn from_settings(settings: &Settings, confirm: Arc<dyn ConfirmPort>) -> Self {
        Self {
            repository: Arc::new(JsonRepositoryAdapter::new(&settings.repository_file)),
            fs: Arc::new(LocalFsAdapter::new()),
            transcode: Arc::new(FFmpegAdapter::new(&settings.transcoder)),
            upload: Arc::new(CommandUploadAdapter::new(
                &settings.uploader.program,
                settings.uploader.args.clone(),
            )),
            confirm,
        }
    }
}

pub struct DefaultAppContainer {
    categories: Arc<CategoryRegistry>,
    repository_port: Arc<dyn RepositoryPort>,
    ingest_interactor: Arc<IngestInteractor>,
    edit_interactor: Arc<EditInteractor>,
    upload_interactor: Arc<UploadInteractor>,
    purge_interactor: Arc<PurgeInteractor>,
}

impl DefaultAppContainer {
    pub fn new(settings: &Settings, ports: Ports) -> Result<Self> {
        let categories = Arc::new(settings.category_registry()?);
        let formats = Arc::new(settings.format_registry()?);

        let ingest_interactor = Arc::new(IngestInteractor::new(
            Arc::clone(&ports.fs),
            Arc::clone(&categories),
            Arc::clone(&formats),
        ));

        let edit_interactor = Arc::new(EditInteractor::new(
            Arc::clone(&ports.fs),
            Arc::clone(&ports.transcode),
            Arc::clone(&categories),
            Arc::clone(&formats),
        ));

        let upload_interactor = Arc::new(UploadInteractor::new(
            Arc::clone(&ports.upload),
            Arc::clone(&ports.confirm),
            Arc::clone(&categories),
        ));

        let purge_interactor = Arc::new(PurgeInteractor::new(Arc::clone(&ports.fs)));

        Ok(Self {
            categories,
            repository_port: ports.repository,
            ingest_interactor,
            edit_interactor,
            upload_interactor,
            purge_interactor,
        })
    }

    /// Categories in effect, for display
    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    /// Load the repository this container persists to
    pub async fn open_store(&self) -> Result<RepositoryStore, DomainError> {
        RepositoryStore::open(Arc::clone(&self.repository_port)).await
    }
}

impl AppContainer for DefaultAppContainer {
    fn ingest_interactor(&self) -> Arc<IngestInteractor> {
        Arc::clone(&self.ingest_interactor)
    }

    fn edit_interactor(&self) -> Arc<EditInteractor> {
        Arc::clone(&self.edit_interactor)
    }

    fn upload_interactor(&self) -> Arc<UploadInteractor> {
        Arc::clone(&self.upload_interactor)
    }

    fn purge_interactor(&self) -> Arc<PurgeInteractor> {
        Arc::clone(&self.purge_interactor)
    }
}
