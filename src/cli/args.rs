//! Command-line argument definitions

use clap::Args;
use std::path::PathBuf;

use crate::utils::logging::{LogFormat, LogLevel};

/// Options shared by every command; each can also come from the environment
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Settings file
    #[arg(long, env = "CLIPSHELF_CONFIG", default_value = "clipshelf.toml", global = true)]
    pub config: PathBuf,

    /// Repository file (overrides the settings file)
    #[arg(long, env = "CLIPSHELF_REPOSITORY", global = true)]
    pub repository: Option<PathBuf>,

    /// Transcoder program
    #[arg(long, env = "CLIPSHELF_TRANSCODER", global = true)]
    pub transcoder: Option<String>,

    /// Uploader program
    #[arg(long, env = "CLIPSHELF_UPLOADER", global = true)]
    pub uploader: Option<String>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, env = "CLIPSHELF_LOG_LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Log output format (pretty, compact, json)
    #[arg(long, env = "CLIPSHELF_LOG_FORMAT", global = true)]
    pub log_format: Option<LogFormat>,
}

/// Arguments for the edit command
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct EditArgs {
    /// Ids of the videos to edit
    pub ids: Vec<u64>,

    /// Edit the oldest unedited video
    #[arg(long)]
    pub oldest: bool,

    /// Edit every unedited video
    #[arg(long)]
    pub unedited: bool,

    /// Edit every video not uploaded yet
    #[arg(long)]
    pub unuploaded: bool,
}

/// Arguments for the set-range command
#[derive(Args, Debug)]
pub struct SetRangeArgs {
    /// Range start in seconds
    pub start: u32,

    /// Range end in seconds
    pub end: u32,

    /// Video id (default: the most recently edited video)
    #[arg(long)]
    pub id: Option<u64>,

    /// Store the range without editing again
    #[arg(long)]
    pub no_edit: bool,
}

/// Arguments for the upload command
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Id of the video to upload
    #[arg(required_unless_present = "pending", conflicts_with = "pending")]
    pub id: Option<u64>,

    /// Upload every edited video not uploaded yet, confirming each
    #[arg(long)]
    pub pending: bool,

    /// Confirm with this id instead of asking on stdin
    #[arg(long, value_name = "ID", requires = "id")]
    pub confirm: Option<u64>,
}

/// Arguments for the purge command
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct PurgeArgs {
    /// Ids of the videos to purge
    pub ids: Vec<u64>,

    /// Purge every uploaded video
    #[arg(long)]
    pub uploaded: bool,
}
