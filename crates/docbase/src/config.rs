//! TOML configuration parsing and validation.
//!
//! Default location is `./config/docs.toml`; override with `--config`.
//!
//! ```toml
//! [db]
//! path = "./data/docs.sqlite"
//!
//! [server]
//! bind = "127.0.0.1:7340"
//!
//! [search]
//! snippet_chars = 100
//! snippet_mode = "leading"   # or "around_match"
//!
//! [[auth.tokens]]
//! user_id = "alice"
//! role = "admin"
//! sha256 = "<hex digest of the bearer token>"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! `[search]`, `[auth]`, and `[logging]` may be omitted.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use docbase_core::auth::Role;
use docbase_core::search::{SearchOptions, SnippetMode};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,
    #[serde(default)]
    pub snippet_mode: SnippetMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            snippet_chars: default_snippet_chars(),
            snippet_mode: SnippetMode::default(),
        }
    }
}

impl SearchConfig {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            snippet_chars: self.snippet_chars,
            snippet_mode: self.snippet_mode,
        }
    }
}

fn default_snippet_chars() -> usize {
    100
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

/// A bearer token, stored as the hex SHA-256 digest of the secret.
#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    pub user_id: String,
    pub role: Role,
    pub sha256: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.search.snippet_chars == 0 {
        anyhow::bail!("search.snippet_chars must be >= 1");
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    for token in &config.auth.tokens {
        if token.role == Role::Anonymous {
            anyhow::bail!(
                "auth.tokens: role for '{}' must be admin or reader",
                token.user_id
            );
        }
        let digest = &token.sha256;
        if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!(
                "auth.tokens: sha256 for '{}' must be a 64-character hex digest",
                token.user_id
            );
        }
    }

    match config.logging.level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => {}
        other => anyhow::bail!(
            "Unknown logging level: '{}'. Must be trace, debug, info, warn, error, or off.",
            other
        ),
    }

    Ok(config)
}
