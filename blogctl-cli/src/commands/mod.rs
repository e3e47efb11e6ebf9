//! Command implementations for the blogctl CLI

pub mod migrate;
pub mod posts;
pub mod serve;
pub mod tags;

pub use migrate::run_migrate;
pub use posts::run_posts;
pub use serve::run_serve;
pub use tags::run_tags;

use anyhow::{Context, Result};
use blogctl_server::db::create_pool_with_options;
use blogctl_server::{BlogConfig, PgStore};
use serde::Serialize;

/// Connect to the configured database.
pub(crate) async fn connect(config: &BlogConfig) -> Result<PgStore> {
    let database_url = config.database_url.as_deref().context(
        "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or blogctl.toml",
    )?;

    let pool = create_pool_with_options(database_url, config.max_connections)
        .await
        .context("Failed to create database pool")?;

    Ok(PgStore::new(pool))
}

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
