use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use strata::Engine;
use strata_router::{audit, Inventory};

/// Exits with status 1 when any conflict is found
pub fn execute(engine: &Engine) -> Result<ExitCode> {
    let inventory = Inventory::scan(engine.app_dir());
    let conflicts = audit::audit(&inventory);

    if conflicts.is_empty() {
        println!(
            "{} {} file(s) checked, no duplicate routes",
            "✓".green().bold(),
            inventory.len()
        );
        return Ok(ExitCode::SUCCESS);
    }

    for conflict in &conflicts {
        println!("{} {}", "✗".red().bold(), conflict);
    }
    println!();
    println!("{}", format!("{} duplicate route(s)", conflicts.len()).red());
    Ok(ExitCode::from(1))
}
