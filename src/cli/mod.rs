//! CLI module for clipshelf
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;
pub mod menu;
pub mod prompt;

pub use args::{EditArgs, GlobalArgs, PurgeArgs, SetRangeArgs, UploadArgs};

/// clipshelf
///
/// Tracks gameplay recordings from a capture folder through editing into
/// vertical shorts and publishing, keeping the lifecycle of every clip in a
/// single JSON repository file.
#[derive(Parser, Debug)]
#[command(name = "clipshelf")]
#[command(about = "Ingest, edit and publish short gameplay clips")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The command to execute (default: menu)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tracked videos
    List,
    /// Register new files from the source directory
    Ingest,
    /// Run the category transform over staged originals
    Edit(args::EditArgs),
    /// Store a trim range override and edit again
    SetRange(args::SetRangeArgs),
    /// Publish edited videos
    Upload(args::UploadArgs),
    /// Delete videos and their files
    Purge(args::PurgeArgs),
    /// Interactive menu
    Menu,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_menu() {
        let cli = Cli::try_parse_from(["clipshelf"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.global.config, std::path::PathBuf::from("clipshelf.toml"));
    }

    #[test]
    fn test_edit_selection_is_exclusive() {
        assert!(Cli::try_parse_from(["clipshelf", "edit"]).is_err());
        assert!(Cli::try_parse_from(["clipshelf", "edit", "1000", "--oldest"]).is_err());

        let cli = Cli::try_parse_from(["clipshelf", "edit", "1000", "1001"]).unwrap();
        match cli.command {
            Some(Commands::Edit(args)) => assert_eq!(args.ids, vec![1000, 1001]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_upload_confirm_and_global_flags() {
        let cli = Cli::try_parse_from([
            "clipshelf",
            "upload",
            "1000",
            "--confirm",
            "1000",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.global.log_level, Some(crate::utils::logging::LogLevel::Debug));
        match cli.command {
            Some(Commands::Upload(args)) => {
                assert_eq!(args.id, Some(1000));
                assert_eq!(args.confirm, Some(1000));
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["clipshelf", "upload", "--pending", "--confirm", "1"]).is_err());
    }
}
