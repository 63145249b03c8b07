//! List strategies command.

use anyhow::Result;
use stratlab_strategies::StrategyRegistry;

pub async fn run() -> Result<()> {
    let registry = StrategyRegistry::new();

    println!("Available Strategies");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for info in registry.list() {
        let consensus = if info.in_consensus {
            "consensus"
        } else {
            "standalone"
        };
        println!("  {} ({}, {})", info.name, info.key, consensus);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", info.description);
        println!("  Defaults: {}", info.default_config);
        println!();
    }

    println!("Use --strategy <key> to select a strategy.");
    println!();
    println!("Strategy keys: {}", registry.names().join(", "));

    Ok(())
}
