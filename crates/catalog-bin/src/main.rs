//! Emoji catalog - a sectioned catalog kept in sync with its on-screen view.

mod app;
mod catalog_adapter;
mod command;
mod dispatcher;
mod presenter;

use std::path::PathBuf;

use catalog_config_and_utils::{init_logging, Config, Paths};
use clap::{Parser, Subcommand};

use crate::app::RunMode;

/// Emoji catalog command-line interface.
#[derive(Parser)]
#[command(name = "emoji-catalog")]
#[command(about = "Browse and edit a sectioned emoji catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error). Defaults to the configured level
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Base directory for config and logs. Defaults to ~/.emoji-catalog
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// JSON catalog to load instead of the configured one
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session
    Repl,
    /// Print the catalog and exit
    List,
    /// Print the catalog as JSON and exit
    Export,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    let mut config = Config::load(&paths)?;
    if let Some(catalog) = cli.catalog {
        config.catalog_file = Some(catalog);
    }

    // Initialize logging
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let log_file = if config.log_to_file {
        paths.ensure_dirs()?;
        Some(paths.log_file())
    } else {
        None
    };
    init_logging(level, log_file)?;

    let mode = match cli.command {
        Some(Commands::Repl) | None => RunMode::Repl,
        Some(Commands::List) => RunMode::List,
        Some(Commands::Export) => RunMode::Export,
    };
    app::run(config, mode).await?;

    Ok(())
}
