use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use strata::Engine;
use strata_router::{FileRole, Inventory, RouteEntry};

pub fn execute(engine: &Engine, json: bool) -> Result<ExitCode> {
    let inventory = Inventory::scan(engine.app_dir());

    if json {
        println!("{}", serde_json::to_string_pretty(inventory.entries())?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {}",
        "Routes under".green().bold(),
        engine.app_dir().display()
    );
    println!();

    if inventory.is_empty() {
        println!("{}", "  (no files)".dimmed());
        return Ok(ExitCode::SUCCESS);
    }

    for entry in &inventory {
        println!("  {:<10} {:<40} {}", role_label(entry.role), entry.path, url_for(entry));
    }

    println!();
    println!("{} file(s)", inventory.len());
    Ok(ExitCode::SUCCESS)
}

fn role_label(role: FileRole) -> colored::ColoredString {
    match role {
        FileRole::Route => "route".magenta(),
        FileRole::Index => "index".green(),
        FileRole::Layout => "layout".cyan(),
        FileRole::NotFound => "not-found".yellow(),
        FileRole::Other => "asset".dimmed(),
    }
}

/// URL an addressable entry answers to; empty for other files
fn url_for(entry: &RouteEntry) -> String {
    if entry.role.is_addressable() {
        format!("/{}", strata_router::path::join(&entry.logical_directory()))
    } else {
        String::new()
    }
}
