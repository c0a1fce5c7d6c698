mod config;
mod db;
mod error;
mod logging;
mod models;
mod report;
mod run;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

fn main() -> Result<()> {
    let cli = run::Cli::parse();

    let mut config = config::AppConfig::load(cli.config.as_deref())?;
    if let Some(path) = &cli.db {
        config.database_path = Some(path.clone());
    }
    let db_path = config.db_path()?;

    // The TUI owns the terminal, so it logs to a file instead of stderr
    match &cli.command {
        None => logging::init_file(&config.log_filter, &config.log_path()?)?,
        Some(_) => logging::init_stderr(&config.log_filter)?,
    }
    debug!(?config, "configuration loaded");

    let db = db::Database::open(&db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

    match cli.command {
        None => run::as_tui(&db),
        Some(command) => run::as_cli(command, &db),
    }
}
