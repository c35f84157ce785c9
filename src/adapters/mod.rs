// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod fs_local;
pub mod json_repository;
pub mod upload_command;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use fs_local::LocalFsAdapter;
pub use json_repository::JsonRepositoryAdapter;
pub use upload_command::CommandUploadAdapter;
