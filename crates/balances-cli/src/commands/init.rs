//! `balances init`: write the config and create the database.

use uuid::Uuid;

use balances_core::{BalancesError, Database};

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_database_path, write_config, BalancesConfig};
use crate::helpers::parse_uuid;
use crate::output::print_json;

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let cli = ctx.cli();
    let config_path = resolve_config_path(cli)?;
    if config_path.exists() && !args.force {
        return Err(BalancesError::not_permitted(
            "init",
            "Config",
            format!(
                "a config already exists at {} (use --force to overwrite)",
                config_path.display()
            ),
        )
        .into());
    }

    let database_path = match args.path.as_deref().or(cli.database.as_deref()) {
        Some(path) => std::path::PathBuf::from(path),
        None => default_database_path()?,
    };
    let user = match args.user.as_deref() {
        Some(value) => parse_uuid(value, "user id")?,
        None => Uuid::now_v7(),
    };
    if user.is_nil() {
        return Err(BalancesError::Unauthorized("the user id must not be nil".to_string()).into());
    }
    if args.page_size == Some(0) {
        return Err(BalancesError::bad_request("page size must be at least 1").into());
    }

    if let Some(parent) = database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                )
            })?;
        }
    }
    let db = Database::open(&database_path)?;
    db.migrate()?;

    let config = BalancesConfig::new(database_path.clone(), user, args.page_size);
    write_config(&config_path, &config)?;

    if ctx.json() {
        return print_json(&serde_json::json!({
            "config": config_path,
            "database": database_path,
            "user": user,
            "schema_version": db.schema_version()?,
        }));
    }
    if !ctx.quiet() {
        println!("Initialized balances database at {}", database_path.display());
        println!("Config written to {}", config_path.display());
    }
    Ok(())
}
