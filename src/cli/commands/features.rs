//! Features command: snapshot indicator values from the recent windows.

use anyhow::Result;
use signals_features::{FeatureBuilder, MIN_HISTORY};
use signals_monitor::RunContext;
use tracing::{info, warn};

use super::{abort, today, Workspace};
use crate::cli::StageArgs;

pub fn run(workspace: &Workspace, args: StageArgs) -> Result<()> {
    let ctx = RunContext::new("features", today(), &workspace.ledger);
    let symbols = workspace.symbols(&args.symbols, &ctx)?;

    let recent_window = workspace.config.updater.recent_window;
    if recent_window < MIN_HISTORY {
        warn!(
            recent_window,
            required = MIN_HISTORY,
            "Recent window shorter than the feature history; every symbol will be skipped"
        );
    }

    let output = workspace.config.storage.features_path();
    let summary = FeatureBuilder::new(&workspace.series)
        .run(&symbols, &output, &ctx)
        .map_err(|e| abort(&ctx, e))?;

    info!(
        built = summary.built(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        output = %output.display(),
        "Features finished"
    );
    println!("{}", summary.status(ctx.date()).message);
    Ok(())
}
