//! Execution of parsed commands against a [`Tracker`].

use crate::{AppConfig, Commands, cli::ViewArgs};
use apptrack_core::{
    models::{Scope, SearchFilter, SubmissionData},
    ports::RecordStore,
};
use apptrack_engine::{CompanyOrder, SubmissionFailure, Tracker};
use serde::{Deserialize, Serialize};
use std::{
    io::{Read as _, Write},
    path::Path,
};
use tracing::{Level, event};

/// A JSON document for `add`: one submission or a batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AddInput {
    /// A single submission
    One(SubmissionData),
    /// Several positions at one employer
    Batch(Vec<SubmissionData>),
}

#[derive(Serialize)]
struct Done {
    ok: bool,
}

/// Run `command`, writing its JSON result to `out`.
pub async fn run<S: RecordStore>(
    tracker: &Tracker<S>,
    config: &AppConfig,
    command: Commands,
    out: impl Write,
) -> anyhow::Result<()> {
    let order = |view: &ViewArgs| -> CompanyOrder {
        view.order.map(Into::into).unwrap_or(config.listing.order)
    };

    match command {
        Commands::List { scope, view } => {
            let scope = scope.scope();
            if view.companies {
                emit(out, &tracker.companies(&scope, order(&view)).await?)
            } else {
                let records = match &scope {
                    Scope::Owner(owner) => tracker.list_for_owner(owner).await?,
                    Scope::All => tracker.list_all().await?,
                };
                emit(out, &records)
            }
        }
        Commands::Add {
            owner,
            input,
            primary,
        } => {
            let owner = owner.key();
            match read_json(input.as_deref())? {
                AddInput::One(data) => emit(out, &settle(tracker.add_one(&owner, data).await?)?),
                AddInput::Batch(batch) => emit(
                    out,
                    &settle(tracker.add_batch(&owner, batch, primary).await?)?,
                ),
            }
        }
        Commands::Update { owner, id, input } => {
            let data: SubmissionData = read_json(input.as_deref())?;
            settle(tracker.update_one(&owner.key(), id, data).await?)?;
            emit(out, &Done { ok: true })
        }
        Commands::Delete { owner, id } => {
            settle(tracker.delete_one(&owner.key(), id).await?)?;
            emit(out, &Done { ok: true })
        }
        Commands::Primary { owner, id } => {
            settle(tracker.set_primary(&owner.key(), id).await?)?;
            emit(out, &Done { ok: true })
        }
        Commands::Siblings { owner, id } => {
            emit(out, &settle(tracker.siblings(&owner.key(), id).await?)?)
        }
        Commands::Search {
            scope,
            filter,
            view,
        } => {
            let scope = scope.scope();
            let filter = SearchFilter::from(&filter);
            if view.companies {
                let groups = tracker
                    .search_companies(&scope, &filter, order(&view))
                    .await?;
                emit(out, &groups)
            } else {
                emit(out, &tracker.search(&scope, &filter).await?)
            }
        }
        Commands::Export {
            scope,
            filter,
            companies,
            output,
        } => {
            let scope = scope.scope();
            let filter = SearchFilter::from(&filter);
            let bytes = if companies {
                let groups = tracker
                    .search_companies(&scope, &filter, config.listing.order)
                    .await?;
                tracker.export_companies_bytes(&groups)?
            } else {
                tracker.export_search_bytes(&scope, &filter).await?
            };
            std::fs::write(&output, &bytes)?;
            event!(Level::INFO, path = %output.display(), bytes = bytes.len(), "wrote workbook");
            emit(out, &Done { ok: true })
        }
        Commands::Preview { input } => {
            let (bytes, filename) = read_workbook(&input)?;
            emit(out, &tracker.preview_import(&bytes, &filename)?)
        }
        Commands::Import { owner, input, mode } => {
            let (bytes, filename) = read_workbook(&input)?;
            let summary = tracker
                .import(&owner.key(), &bytes, &filename, mode.into())
                .await?;
            emit(out, &summary)
        }
    }
}

// Domain failures become command errors
fn settle<T>(result: Result<T, SubmissionFailure>) -> anyhow::Result<T> {
    Ok(result?)
}

fn emit<T: Serialize + ?Sized>(mut out: impl Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: Option<&Path>) -> anyhow::Result<T> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    Ok(serde_json::from_str(&text)?)
}

fn read_workbook(path: &Path) -> anyhow::Result<(Vec<u8>, String)> {
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((bytes, filename))
}
