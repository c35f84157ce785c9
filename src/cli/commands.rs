//! Command implementations

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::app::edit_interactor::{EditInteractor, EditOutcome};
use crate::app::ingest_interactor::IngestReport;
use crate::app::{AppContainer, DefaultAppContainer, RepositoryStore};
use crate::cli::args::{EditArgs, PurgeArgs, SetRangeArgs, UploadArgs};
use crate::domain::errors::DomainError;
use crate::domain::model::TrimRange;
use crate::domain::rules::CategoryRegistry;
use crate::error::{Operation, OperationError, OperationResult, WithOperation};
use crate::utils::format_duration;
use crate::utils::time::format_table_time;

/// Open the repository named by the settings
pub async fn open_store(container: &DefaultAppContainer) -> OperationResult<RepositoryStore> {
    let store = container.open_store().await.during(Operation::Load)?;
    info!(
        path = %store.location().display(),
        videos = store.records().len(),
        "Repository opened"
    );
    Ok(store)
}

/// Execute the list command
pub fn list(container: &DefaultAppContainer, store: &RepositoryStore) -> Result<()> {
    print_records(container.categories(), store);
    Ok(())
}

/// Execute the ingest command
pub async fn ingest(container: &DefaultAppContainer, store: &mut RepositoryStore) -> Result<()> {
    let report = container
        .ingest_interactor()
        .execute(store)
        .await
        .context("Failed to scan the source directory")?;
    print_ingest_report(&report);
    Ok(())
}

/// Execute the edit command
pub async fn edit(
    container: &DefaultAppContainer,
    store: &mut RepositoryStore,
    args: EditArgs,
) -> Result<()> {
    let interactor = container.edit_interactor();
    let outcomes = if args.oldest {
        let outcome = interactor.edit_oldest_unedited(store).await?;
        if outcome.is_none() {
            println!("Nothing to edit");
        }
        outcome.into_iter().collect()
    } else if args.unedited {
        interactor.edit_all_unedited(store).await?
    } else if args.unuploaded {
        interactor.edit_all_unuploaded(store).await?
    } else {
        let mut outcomes = Vec::with_capacity(args.ids.len());
        for id in args.ids {
            outcomes.push(interactor.execute(store, id).await?);
        }
        outcomes
    };
    print_edit_outcomes(&outcomes);
    Ok(())
}

/// Execute the set-range command
pub async fn set_range(
    container: &DefaultAppContainer,
    store: &mut RepositoryStore,
    args: SetRangeArgs,
) -> Result<()> {
    let range = TrimRange::new(args.start, args.end).during(Operation::SetRange)?;
    let id = match args.id {
        Some(id) => id,
        None => EditInteractor::latest_edited(store)
            .context("No edited video to adjust, pass --id")?,
    };

    if args.no_edit {
        store.set_range(id, range).await.during(Operation::SetRange)?;
        println!("{}: range {}", id, range);
        return Ok(());
    }
    let outcome = container
        .edit_interactor()
        .set_range_and_edit(store, id, range)
        .await?;
    print_edit_outcomes(&[outcome]);
    Ok(())
}

/// Execute the upload command
pub async fn upload(
    container: &DefaultAppContainer,
    store: &mut RepositoryStore,
    args: UploadArgs,
) -> Result<()> {
    let interactor = container.upload_interactor();
    let outcomes = match (args.id, args.confirm) {
        (Some(id), Some(confirmation)) => {
            vec![interactor.upload_confirmed(store, id, confirmation).await?]
        }
        (Some(id), None) => vec![interactor.execute(store, id).await?],
        (None, _) => interactor.upload_pending(store).await?,
    };
    if outcomes.is_empty() {
        println!("Nothing to upload");
    }
    for outcome in outcomes {
        println!("{}: uploaded as {}", outcome.id, outcome.url);
    }
    Ok(())
}

/// Execute the purge command
pub async fn purge(
    container: &DefaultAppContainer,
    store: &mut RepositoryStore,
    args: PurgeArgs,
) -> Result<()> {
    let interactor = container.purge_interactor();
    let outcomes = if args.uploaded {
        interactor.purge_uploaded(store).await?
    } else {
        let mut outcomes = Vec::with_capacity(args.ids.len());
        for id in args.ids {
            outcomes.push(interactor.execute(store, id).await?);
        }
        outcomes
    };
    if outcomes.is_empty() {
        println!("Nothing to purge");
    }
    for outcome in outcomes {
        println!("{}: purged", outcome.id);
        for path in &outcome.leftovers {
            warn!(id = outcome.id, path = %path.display(), "File left behind");
        }
    }
    Ok(())
}

/// Whether an error returned by a command must end the process
pub fn is_fatal(err: &anyhow::Error) -> bool {
    if let Some(op) = err.downcast_ref::<OperationError>() {
        return op.is_fatal();
    }
    err.downcast_ref::<DomainError>()
        .map_or(false, DomainError::is_fatal)
}

/// Print the record table
pub fn print_records(categories: &CategoryRegistry, store: &RepositoryStore) {
    let header = ["id", "cat.", "sourceFileName", "createdAt", "editedAt", "uploadedAt", "range"];
    let rows: Vec<[String; 7]> = store
        .records()
        .iter()
        .map(|v| {
            let range = v
                .range
                .or_else(|| categories.by_id(&v.category_id).ok().map(|c| c.default_range))
                .map_or_else(|| "-".to_string(), |r| r.to_string());
            [
                v.id.to_string(),
                v.category_id.clone(),
                v.source_file_name.clone(),
                format_table_time(Some(v.created_at)),
                format_table_time(v.edited_at),
                format_table_time(v.uploaded_at),
                range,
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    println!("{}", line(&header.map(str::to_string)[..]));
    for row in &rows {
        println!("{}", line(&row[..]));
    }
}

fn print_ingest_report(report: &IngestReport) {
    for record in &report.ingested {
        println!("New video ({}): {}", record.id, record.source_file_name);
    }
    for id in &report.repaired {
        println!("Restored staged original of {}", id);
    }
    for skipped in &report.skipped {
        println!("Skipped {}: {}", skipped.file_name, skipped.reason);
    }
}

fn print_edit_outcomes(outcomes: &[EditOutcome]) {
    for outcome in outcomes {
        println!(
            "{}: edited in {} -> {}",
            outcome.id,
            format_duration(outcome.elapsed),
            outcome.output.display()
        );
    }
}
