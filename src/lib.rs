//! clipshelf library
//!
//! Tracks recorded clips through ingestion, editing and publishing. The
//! lifecycle of every clip lives in one JSON repository file; editing runs an
//! external transcoder and publishing hands off to an external uploader.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{LifecycleState, RepositoryState, TrimRange, VideoRecord};
pub use error::{Operation, OperationError, OperationResult};
