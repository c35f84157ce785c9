// Domain errors - Error types for the domain layer

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types
#[derive(Error, Debug)]
pub enum DomainError {
    /// Repository file was absent and a template has been written in its place
    #[error("Repository file {path} needs configuration: fill in the placeholder fields and launch again")]
    ConfigMissing { path: PathBuf },

    /// Repository file exists but cannot be read or parsed
    #[error("Failed to read repository file {path}: {message}")]
    RepositoryRead { path: PathBuf, message: String },

    /// Saving the repository failed; the previous version is kept at `backup`
    #[error("Failed to save repository file {path}: {message}{}", backup_hint(.backup))]
    Persistence {
        path: PathBuf,
        backup: Option<PathBuf>,
        message: String,
    },

    /// No category prefix matches the file name
    #[error("Unknown category for file: {file_name}")]
    UnknownCategory { file_name: String },

    /// A stored record references a category the registry does not know
    #[error("Invalid category id: {category_id}")]
    UnknownCategoryId { category_id: String },

    /// No format is registered for the file extension
    #[error("Unknown format for file: {file_name}")]
    UnknownFormat { file_name: String },

    /// A category or format descriptor failed validation
    #[error("Invalid descriptor {id}: {message}")]
    InvalidDescriptor { id: String, message: String },

    /// Template could not be rendered against a record
    #[error("Failed to render template {template:?}: {message}")]
    Template { template: String, message: String },

    /// Transcoder could not be started
    #[error("Failed to start transcoder {program}: {message}")]
    TranscoderUnavailable { program: String, message: String },

    /// Transcoder exited with a non-zero status
    #[error("Transcoder failed with {}:\n{output}", status_text(.status))]
    Transcode { status: Option<i32>, output: String },

    /// Staged-original file is missing, there is nothing to edit
    #[error("Staged original for video {id} is missing: {path}")]
    StagedOriginalMissing { id: u64, path: PathBuf },

    /// Operator-supplied id does not match the upload target
    #[error("Upload confirmation failed: typed {supplied}, expected {expected}")]
    UploadConfirmationMismatch { expected: u64, supplied: u64 },

    /// Upload requested for a record that was never edited
    #[error("Video {id} has not been edited yet")]
    NotEdited { id: u64 },

    /// Upload requested for a record that is already published
    #[error("Video {id} is already uploaded")]
    AlreadyUploaded { id: u64 },

    /// External upload collaborator failed
    #[error("uploader error: {message}")]
    Upload { message: String },

    /// Record id absent from the repository
    #[error("Video not in repository: {id}")]
    RecordNotFound { id: u64 },

    /// File system operation failed
    #[error("File system error at {path}: {message}")]
    Filesystem { path: PathBuf, message: String },

    /// Operator input could not be read or parsed
    #[error("Invalid input: {message}")]
    Prompt { message: String },
}

impl DomainError {
    /// Errors that must end the process instead of returning to the session
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DomainError::ConfigMissing { .. }
                | DomainError::RepositoryRead { .. }
                | DomainError::Persistence { .. }
                | DomainError::RecordNotFound { .. }
        )
    }

    /// Soft errors that ingestion logs and skips
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            DomainError::UnknownCategory { .. } | DomainError::UnknownFormat { .. }
        )
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        DomainError::Filesystem {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

fn backup_hint(backup: &Option<PathBuf>) -> String {
    match backup {
        Some(path) => format!(" (previous version backed up at {})", path.display()),
        None => String::new(),
    }
}

fn status_text(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
