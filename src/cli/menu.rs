//! Interactive menu
//!
//! Each round rescans the source directory, prints the record table and the
//! actions, then runs the chosen action. Failures are printed and the loop
//! goes on, except for fatal ones which end the process.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use crate::app::{DefaultAppContainer, EditInteractor, RepositoryStore};
use crate::cli::args::{EditArgs, PurgeArgs, SetRangeArgs, UploadArgs};
use crate::cli::commands;
use crate::cli::prompt::StdinPrompt;

/// Keys in display order
const KEYS: &[char] = &['q', 'w', 'e', 'r', 't', 'a', 's', 'd', 'f', 'g', 'z', 'x', 'c', 'v', 'b'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    EditOldestUnedited,
    SetRangeLatestEdited,
    EditAllUnedited,
    EditAllUnuploaded,
    UploadOne,
    UploadPending,
    PurgeOne,
    PurgeUploaded,
    Exit,
}

impl MenuAction {
    pub const ALL: &'static [MenuAction] = &[
        MenuAction::EditOldestUnedited,
        MenuAction::SetRangeLatestEdited,
        MenuAction::EditAllUnedited,
        MenuAction::EditAllUnuploaded,
        MenuAction::UploadOne,
        MenuAction::UploadPending,
        MenuAction::PurgeOne,
        MenuAction::PurgeUploaded,
        MenuAction::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::EditOldestUnedited => "edit oldest unedited",
            MenuAction::SetRangeLatestEdited => "set range of latest edited and edit again",
            MenuAction::EditAllUnedited => "edit all unedited",
            MenuAction::EditAllUnuploaded => "edit all not uploaded",
            MenuAction::UploadOne => "upload one",
            MenuAction::UploadPending => "upload all edited and not uploaded",
            MenuAction::PurgeOne => "purge one",
            MenuAction::PurgeUploaded => "purge all uploaded",
            MenuAction::Exit => "exit",
        }
    }

    /// Action bound to the first character of `input`
    pub fn from_input(input: &str) -> Option<Self> {
        let key = input.trim().chars().next()?;
        let index = KEYS.iter().position(|k| *k == key)?;
        Self::ALL.get(index).copied()
    }
}

fn print_actions() {
    for (key, action) in KEYS.iter().zip(MenuAction::ALL) {
        println!("[{}] {}", key, action.label());
    }
}

/// Run the menu until exit, end of input or a fatal error
pub async fn run(
    container: &DefaultAppContainer,
    store: &mut RepositoryStore,
    prompt: Arc<StdinPrompt>,
) -> Result<()> {
    loop {
        if let Err(e) = commands::ingest(container, store).await {
            if commands::is_fatal(&e) {
                return Err(e);
            }
            println!("Error: {:#}", e);
        }

        println!();
        commands::print_records(container.categories(), store);
        print_actions();

        let Some(input) = prompt.read_line(">> ").await? else {
            info!("End of input, leaving menu");
            return Ok(());
        };
        let Some(action) = MenuAction::from_input(&input) else {
            println!("unknown {}", input);
            continue;
        };
        if action == MenuAction::Exit {
            return Ok(());
        }

        if let Err(e) = run_action(container, store, &prompt, action).await {
            if commands::is_fatal(&e) {
                error!(error = %e, "Fatal error, leaving menu");
                return Err(e);
            }
            println!("Error: {:#}", e);
        }
    }
}

async fn run_action(
    container: &DefaultAppContainer,
    store: &mut RepositoryStore,
    prompt: &StdinPrompt,
    action: MenuAction,
) -> Result<()> {
    info!(action = action.label(), "Running menu action");
    match action {
        MenuAction::EditOldestUnedited => {
            commands::edit(container, store, edit_selection(|a| a.oldest = true)).await
        }
        MenuAction::SetRangeLatestEdited => {
            let Some(id) = EditInteractor::latest_edited(store) else {
                println!("Nothing edited yet");
                return Ok(());
            };
            let range = prompt.read_range(&format!("{} start end: ", id)).await?;
            let args = SetRangeArgs {
                start: range.start,
                end: range.end,
                id: Some(id),
                no_edit: false,
            };
            commands::set_range(container, store, args).await
        }
        MenuAction::EditAllUnedited => {
            commands::edit(container, store, edit_selection(|a| a.unedited = true)).await
        }
        MenuAction::EditAllUnuploaded => {
            commands::edit(container, store, edit_selection(|a| a.unuploaded = true)).await
        }
        MenuAction::UploadOne => {
            let id = prompt.read_id("id: ").await?;
            let args = UploadArgs {
                id: Some(id),
                pending: false,
                confirm: None,
            };
            commands::upload(container, store, args).await
        }
        MenuAction::UploadPending => {
            let args = UploadArgs {
                id: None,
                pending: true,
                confirm: None,
            };
            commands::upload(container, store, args).await
        }
        MenuAction::PurgeOne => {
            let id = prompt.read_id("id: ").await?;
            let args = PurgeArgs {
                ids: vec![id],
                uploaded: false,
            };
            commands::purge(container, store, args).await
        }
        MenuAction::PurgeUploaded => {
            let args = PurgeArgs {
                ids: Vec::new(),
                uploaded: true,
            };
            commands::purge(container, store, args).await
        }
        MenuAction::Exit => Ok(()),
    }
}

fn edit_selection(select: impl FnOnce(&mut EditArgs)) -> EditArgs {
    let mut args = EditArgs {
        ids: Vec::new(),
        oldest: false,
        unedited: false,
        unuploaded: false,
    };
    select(&mut args);
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_map_in_display_order() {
        assert_eq!(MenuAction::from_input("q"), Some(MenuAction::EditOldestUnedited));
        assert_eq!(MenuAction::from_input("w\n"), Some(MenuAction::SetRangeLatestEdited));
        assert_eq!(MenuAction::from_input("f"), Some(MenuAction::Exit));
        assert_eq!(MenuAction::from_input("qq"), Some(MenuAction::EditOldestUnedited));
    }

    #[test]
    fn test_unknown_or_unbound_keys() {
        assert_eq!(MenuAction::from_input(""), None);
        assert_eq!(MenuAction::from_input("p"), None);
        // bound key with no action
        assert_eq!(MenuAction::from_input("g"), None);
        assert!(MenuAction::ALL.len() <= KEYS.len());
    }
}
