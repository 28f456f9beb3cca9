//! Update command: merge the inbox batches into the historical store.

use anyhow::Result;
use signals_data::{CsvDropFeed, Updater};
use signals_monitor::RunContext;
use tracing::info;

use super::{abort, today, Workspace};
use crate::cli::StageArgs;

pub fn run(workspace: &Workspace, args: StageArgs) -> Result<()> {
    let ctx = RunContext::new("update", today(), &workspace.ledger);
    let symbols = workspace.symbols(&args.symbols, &ctx)?;

    let settings = &workspace.config.updater;
    let feed = CsvDropFeed::new(workspace.config.storage.inbox_dir());
    let updater = Updater::new(&workspace.series)
        .with_policy(settings.merge_policy)
        .with_recent_window(settings.recent_window);

    let summary = updater
        .run(&symbols, &feed, &ctx)
        .map_err(|e| abort(&ctx, e))?;

    info!(
        updated = summary.updated(),
        unchanged = summary.unchanged(),
        failed = summary.failed(),
        rows_added = summary.rows_added(),
        "Update finished"
    );
    println!("{}", summary.status(ctx.date()).message);
    Ok(())
}
