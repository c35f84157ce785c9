// Application layer - Use case interactors

pub mod container;
pub mod edit_interactor;
pub mod ingest_interactor;
pub mod purge_interactor;
pub mod store;
pub mod upload_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer, Ports};
pub use edit_interactor::EditInteractor;
pub use ingest_interactor::IngestInteractor;
pub use purge_interactor::PurgeInteractor;
pub use store::RepositoryStore;
pub use upload_interactor::UploadInteractor;
