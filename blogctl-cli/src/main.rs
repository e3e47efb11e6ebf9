//! blogctl CLI - blog server and content maintenance
//!
//! Entry point for the `blogctl` binary:
//! - HTTP server over PostgreSQL or an in-memory preview store (`serve`)
//! - Schema creation (`migrate`)
//! - Post and tag listings as JSON (`posts`, `tags`)

use std::path::PathBuf;

use anyhow::{Context, Result};
use blogctl_server::BlogConfig;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "blogctl",
    author,
    version,
    about = "Blog server with popular posts, tag pages, and comment counts",
    long_about = "Serve the blog over HTTP and inspect its content. Configuration comes from \
                  blogctl.toml, then the environment, then command-line flags."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Path to a TOML config file (default: ./blogctl.toml if present)
    #[arg(long, short = 'c', global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Database URL (overrides config file and DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server (HTML pages, JSON API, health check)
    Serve(commands::serve::ServeArgs),
    /// Create or update the database schema
    Migrate,
    /// List posts as JSON (by year, by popularity, or a single post)
    Posts(commands::posts::PostsArgs),
    /// List popular tags or add a tag
    Tags(commands::tags::TagsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    let mut config = BlogConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(url) = cli.database_url {
        config.database_url = Some(url);
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config).await?,
        Commands::Migrate => commands::run_migrate(&config).await?,
        Commands::Posts(args) => commands::run_posts(args, &config).await?,
        Commands::Tags(args) => commands::run_tags(args, &config).await?,
    }
    Ok(())
}
