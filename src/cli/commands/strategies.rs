//! List strategies command.

use anyhow::Result;
use signals_config::AppConfig;
use signals_strategies::StrategyRegistry;

pub fn run(config: Option<&AppConfig>) -> Result<()> {
    let registry = StrategyRegistry::new();

    println!("Available Strategies");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for info in registry.list() {
        println!("  {} ", info.kind);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", info.description);
        println!("  defaults: {}", info.default_config);
        println!();
    }

    match config {
        Some(config) => {
            println!("Configured instances:");
            for spec in &config.strategies {
                let status = if registry.exists(&spec.kind) {
                    ""
                } else {
                    "  (unknown kind)"
                };
                println!("  {:<24} {}{}", spec.id, spec.kind, status);
            }
        }
        None => println!("No valid configuration found; configured instances not shown."),
    }

    Ok(())
}
