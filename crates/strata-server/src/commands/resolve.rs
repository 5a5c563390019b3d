use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use strata::Engine;
use strata_router::ParamValue;

pub fn execute(engine: &Engine, path: &str, json: bool) -> Result<ExitCode> {
    let uri = path.split('?').next().unwrap_or(path);
    let inspection = engine.inspect(uri);

    if json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} /{}", "URL".bold(), inspection.uri);

    match &inspection.route {
        Some(m) => {
            println!("  {:<8} {}", "file".green(), m.file().display());
            println!("  {:<8} {:?}", "match".green(), m.kind);
            let mut params: Vec<_> = m.params.iter().collect();
            params.sort_by(|a, b| a.0.cmp(b.0));
            for (name, value) in params {
                let value = match value {
                    ParamValue::One(v) => v.clone(),
                    ParamValue::Many(vs) => format!("{:?}", vs),
                };
                println!("  {:<8} {} = {}", "param".cyan(), name, value);
            }
            if m.is_route_entry() {
                println!("  {}", "routing entry point: served without layouts".dimmed());
            }
        }
        None => println!("  {}", "not found".yellow()),
    }

    if inspection.blocked_without_same_origin {
        println!("  {}", "private: requires a same-origin request".yellow());
    }

    if inspection.layouts.is_empty() {
        println!("  {}", "no root layout".red());
    }
    for layout in &inspection.layouts {
        println!("  {:<8} {}", "layout".cyan(), layout.display());
    }

    Ok(ExitCode::SUCCESS)
}
