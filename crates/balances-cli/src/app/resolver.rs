//! Path resolution for config and database files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, BalancesConfig};

/// Resolve the config file path: `--config` / `BALANCES_CONFIG`, then XDG.
pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(value) = cli.config.as_deref() {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the database path: `--database` / `BALANCES_DATABASE`, then config.
pub fn resolve_database_path(cli: &Cli, config: Option<&BalancesConfig>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.database.as_deref() {
        return Ok(PathBuf::from(path));
    }
    match config {
        Some(config) => Ok(PathBuf::from(&config.database.path)),
        None => Err(anyhow::anyhow!(missing_config_message(&resolve_config_path(cli)?))),
    }
}

/// Error message when the config file is missing.
pub fn missing_config_message(config_path: &Path) -> String {
    format!(
        "No config found at {}\n\nRun:\n  balances init\n\nOr specify a database path:\n  BALANCES_DATABASE=/path/to/balances.db balances init",
        config_path.display()
    )
}
