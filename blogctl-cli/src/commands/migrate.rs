//! Schema migration command

use anyhow::{Context, Result};
use blogctl_server::db::migrations;
use blogctl_server::BlogConfig;

use super::connect;

pub async fn run_migrate(config: &BlogConfig) -> Result<()> {
    let store = connect(config).await?;

    migrations::run(store.pool())
        .await
        .context("Failed to run migrations")?;

    tracing::info!("Schema is up to date");
    Ok(())
}
