//! Execute command: run every configured strategy over every symbol.

use anyhow::Result;
use signals_engine::ExecutionEngine;
use signals_monitor::RunContext;
use signals_strategies::StrategyRegistry;
use tracing::info;

use super::{abort, today, Workspace};
use crate::cli::StageArgs;

pub fn run(workspace: &Workspace, args: StageArgs) -> Result<()> {
    let ctx = RunContext::new("strategy_signals", today(), &workspace.ledger);
    let symbols = workspace.symbols(&args.symbols, &ctx)?;

    let registry = StrategyRegistry::new();
    let strategies = registry.discover(&workspace.config.strategies);
    if strategies.is_empty() {
        return Err(abort(&ctx, "no strategy could be loaded"));
    }

    let engine = ExecutionEngine::new(&workspace.series, &workspace.signals);
    let summary = engine
        .run(&symbols, &strategies, &ctx)
        .map_err(|e| abort(&ctx, e))?;

    info!(
        written = summary.written(),
        failed = summary.failed(),
        strategies = strategies.len(),
        "Execution finished"
    );
    println!("{}", summary.status(ctx.date()).message);
    Ok(())
}
