//! Application context for the Balances CLI.
//!
//! Combines CLI arguments with the lazily-loaded config and services.

use std::sync::Arc;

use once_cell::unsync::OnceCell;
use tracing::debug;
use uuid::Uuid;

use balances_core::{BalancesError, Database, Services};

use crate::cli::Cli;
use crate::config::{read_config, BalancesConfig};
use crate::constants::DEFAULT_LIST_PAGE_SIZE;

use super::resolver::{missing_config_message, resolve_config_path, resolve_database_path};

/// Application context that bundles CLI args with config and storage.
///
/// This avoids repeatedly loading config and threading multiple parameters
/// through handler functions.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<BalancesConfig>>,
    services: OnceCell<Services>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
            services: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn json(&self) -> bool {
        self.cli.json
    }

    /// The config file, if one exists.
    pub fn config(&self) -> anyhow::Result<Option<&BalancesConfig>> {
        let config = self.config.get_or_try_init(|| {
            let path = resolve_config_path(self.cli)?;
            if !path.exists() {
                return Ok::<_, anyhow::Error>(None);
            }
            read_config(&path).map(Some)
        })?;
        Ok(config.as_ref())
    }

    /// Actor recorded in audit columns.
    pub fn actor(&self) -> anyhow::Result<Uuid> {
        match self.config()? {
            Some(config) => Ok(config.user.id),
            None => {
                let path = resolve_config_path(self.cli)?;
                Err(BalancesError::Unauthorized(missing_config_message(&path)).into())
            }
        }
    }

    pub fn page_size(&self, flag: Option<u32>) -> anyhow::Result<u32> {
        Ok(flag
            .or(self.config()?.and_then(|config| config.ui.page_size))
            .unwrap_or(DEFAULT_LIST_PAGE_SIZE))
    }

    /// Open (and migrate) the database on first use.
    pub fn services(&self) -> anyhow::Result<&Services> {
        self.services.get_or_try_init(|| {
            let path = resolve_database_path(self.cli, self.config()?)?;
            if !path.exists() {
                return Err(anyhow::anyhow!(
                    "No database found at {}\n\nRun:\n  balances init",
                    path.display()
                ));
            }
            let db = Database::open(&path)?;
            db.migrate()?;
            debug!(path = %path.display(), "database opened");
            Ok(Services::new(Arc::new(db)))
        })
    }
}
