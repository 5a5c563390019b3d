mod commands;
mod server;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use strata::{Config, Engine};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "strata")]
#[command(version, about = "Strata - file-routed pages with nested layouts", long_about = None)]
struct Cli {
    /// Config file (default: $STRATA_CONFIG or ./strata.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the routes root over HTTP
    Serve {
        /// Port to run the server on (overrides the config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides the config)
        #[arg(long)]
        host: Option<String>,
    },

    /// List every file in the routes root with its role and URL
    Routes {
        /// Print the inventory as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report routes that collide once group folders are removed
    Audit,

    /// Show what a URL resolves to and which layouts wrap it
    Resolve {
        /// URL path, e.g. /blog/hello
        path: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let engine = load_engine(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port, host } => {
            server::serve(engine, host, port).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Routes { json } => commands::routes::execute(&engine, json),
        Commands::Audit => commands::audit::execute(&engine),
        Commands::Resolve { path, json } => commands::resolve::execute(&engine, &path, json),
    }
}

/// Paths in an explicit config file are relative to that file's directory
fn load_engine(config_path: Option<&Path>) -> Result<Engine> {
    match config_path {
        Some(path) => {
            let config = Config::load(path)?;
            let root = path.parent().unwrap_or_else(|| Path::new(""));
            Ok(Engine::with_project_root(config, root))
        }
        None => Ok(Engine::new(Config::load_default()?)),
    }
}
