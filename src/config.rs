use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "FINBOARD";
const CONFIG_FILE: &str = "config.toml";
const DB_FILE: &str = "finboard.db";
const LOG_FILE: &str = "finboard.log";

/// Settings read from `config.toml` and `FINBOARD_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    /// Overrides the default database location in the data directory.
    pub(crate) database_path: Option<PathBuf>,
    /// `tracing` filter directive. `RUST_LOG` takes precedence.
    pub(crate) log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            log_filter: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Load the config file (the explicit one must exist, the default one may
    /// not) and layer environment variables on top.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        builder = match explicit {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => match project_dirs() {
                Some(dirs) => builder.add_source(
                    config::File::from(dirs.config_dir().join(CONFIG_FILE)).required(false),
                ),
                None => builder,
            },
        };
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));

        let settings: AppConfig = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;
        Ok(settings)
    }

    /// The database file, creating its parent directory when needed.
    pub(crate) fn db_path(&self) -> Result<PathBuf> {
        let path = match &self.database_path {
            Some(path) => path.clone(),
            None => data_dir()?.join(DB_FILE),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(path)
    }

    /// Where the TUI writes its log, next to the database.
    pub(crate) fn log_path(&self) -> Result<PathBuf> {
        let db = self.db_path()?;
        Ok(db.with_file_name(LOG_FILE))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "finboard", "finboard")
}

fn data_dir() -> Result<PathBuf> {
    let dirs = project_dirs().ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().to_path_buf())
}
