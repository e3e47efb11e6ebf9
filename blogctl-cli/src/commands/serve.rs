//! HTTP server command
//!
//! Runs the blog server with page, API, and health routes.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use blogctl_server::db::{migrations, BlogStore, MemoryStore};
use blogctl_server::http::{run_server, AppState};
use blogctl_server::{demo, AskamaRenderer, AssetStorage, BlogConfig};
use chrono::Utc;
use clap::Parser;

use super::connect;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:8000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Base URL for post images (default: /media/)
    #[arg(long)]
    pub media_url: Option<String>,

    /// Serve demo content from an in-memory store instead of PostgreSQL
    #[arg(long)]
    pub in_memory: bool,

    /// Do not run schema migrations at start-up
    #[arg(long, conflicts_with = "in_memory")]
    pub skip_migrations: bool,
}

impl ServeArgs {
    fn apply(&self, config: &mut BlogConfig) {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if self.cors_permissive {
            config.cors_permissive = true;
        }
        if let Some(media_url) = &self.media_url {
            config.media_url = media_url.clone();
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, mut config: BlogConfig) -> Result<()> {
    args.apply(&mut config);

    let store: Arc<dyn BlogStore> = if args.in_memory {
        tracing::warn!("Serving demo content from an in-memory store; nothing is persisted");
        let store = MemoryStore::new();
        demo::seed(&store, Utc::now())
            .await
            .context("Failed to seed demo content")?;
        Arc::new(store)
    } else {
        let store = connect(&config).await?;
        if !args.skip_migrations {
            migrations::run(store.pool())
                .await
                .context("Failed to run migrations")?;
        }
        Arc::new(store)
    };

    tracing::info!("Starting blogctl server on {}", config.bind_addr);

    let state = AppState::new(
        store,
        Arc::new(AskamaRenderer),
        AssetStorage::new(&config.media_url),
    );

    // Blocks until shutdown
    run_server(state, &config).await.context("Server error")?;

    Ok(())
}
