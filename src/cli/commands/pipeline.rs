//! Pipeline command: update, features, execute and aggregate in order.

use anyhow::Result;
use tracing::info;

use super::{aggregate, execute, features, update, Workspace};
use crate::cli::PipelineArgs;

pub fn run(workspace: &Workspace, args: PipelineArgs) -> Result<()> {
    info!("Starting pipeline");

    update::run(workspace, args.stage.clone())?;
    features::run(workspace, args.stage.clone())?;
    execute::run(workspace, args.stage)?;
    aggregate::run(workspace, args.report)?;

    info!("Pipeline finished");
    Ok(())
}
