//! Server configuration - TOML file plus environment overrides
//!
//! Resolution order (later wins):
//! 1. built-in defaults
//! 2. `blogctl.toml` (or the file passed explicitly)
//! 3. environment: `DATABASE_URL`, `BLOG_BIND`, `BLOG_MEDIA_URL`,
//!    `BLOG_MAX_CONNECTIONS`, `BLOG_CORS_PERMISSIVE`

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::DEFAULT_MEDIA_URL;
use crate::db::pool::DEFAULT_MAX_CONNECTIONS;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "blogctl.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Blog server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// PostgreSQL connection string; required unless serving in memory
    pub database_url: Option<String>,

    /// Address to bind to (default: 127.0.0.1:8000)
    pub bind_addr: SocketAddr,

    pub max_connections: u32,

    /// Base URL that image references are resolved against
    pub media_url: String,

    /// Allow any CORS origin (default: false = localhost only)
    pub cors_permissive: bool,

    pub request_timeout_secs: u64,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            media_url: DEFAULT_MEDIA_URL.to_string(),
            cors_permissive: false,
            request_timeout_secs: 30,
        }
    }
}

impl BlogConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from `path`, or from `blogctl.toml` when it exists, then apply
    /// the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        };

        let mut config = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config file");
                let raw = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io { path, source })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(bind) = lookup("BLOG_BIND") {
            self.bind_addr = bind.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BLOG_BIND",
                value: bind.clone(),
            })?;
        }
        if let Some(media) = lookup("BLOG_MEDIA_URL") {
            self.media_url = media;
        }
        if let Some(max) = lookup("BLOG_MAX_CONNECTIONS") {
            self.max_connections = max.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BLOG_MAX_CONNECTIONS",
                value: max.clone(),
            })?;
        }
        if let Some(flag) = lookup("BLOG_CORS_PERMISSIVE") {
            self.cors_permissive = matches!(flag.as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }
}
