//! clipshelf
//!
//! Command-line tool that ingests gameplay recordings, edits them into
//! vertical shorts with an external transcoder and publishes them.
//!
//! # Usage
//!
//! ```bash
//! clipshelf                      # interactive menu
//! clipshelf ingest
//! clipshelf edit --oldest
//! clipshelf set-range 3 40 --id 1000
//! clipshelf upload 1000 --confirm 1000
//! clipshelf purge --uploaded
//! ```

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use clipshelf::app::{DefaultAppContainer, Ports};
use clipshelf::cli::prompt::StdinPrompt;
use clipshelf::cli::{commands, menu, Cli, Commands};
use clipshelf::config_initialization::{initialize_settings, log_settings};
use clipshelf::utils::logging::init_logging;
use clipshelf::DomainError;

/// Main entry point for the clipshelf CLI application
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = initialize_settings(&cli.global)?;
    init_logging(&settings.logging)?;
    log_settings(&cli.global, &settings);

    let prompt = Arc::new(StdinPrompt::new());
    let ports = Ports::from_settings(&settings, prompt.clone());
    let container = DefaultAppContainer::new(&settings, ports)?;

    let mut store = match commands::open_store(&container).await {
        Ok(store) => store,
        Err(e) => {
            if let DomainError::ConfigMissing { path } = &e.source {
                eprintln!(
                    "Repository file {} needs configuration. Fill in the FILLHERE fields and launch again.",
                    path.display()
                );
                std::process::exit(2);
            }
            return Err(e.into());
        }
    };

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::List => commands::list(&container, &store)?,
        Commands::Ingest => commands::ingest(&container, &mut store).await?,
        Commands::Edit(args) => commands::edit(&container, &mut store, args).await?,
        Commands::SetRange(args) => commands::set_range(&container, &mut store, args).await?,
        Commands::Upload(args) => commands::upload(&container, &mut store, args).await?,
        Commands::Purge(args) => commands::purge(&container, &mut store, args).await?,
        Commands::Menu => menu::run(&container, &mut store, prompt).await?,
    }

    info!("clipshelf finished");
    Ok(())
}
