//! Configuration file management for roadmap.
//!
//! Provides a TOML config file at `~/.config/roadmap/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use roadmap_core::feedback::FeedbackConfig;
use roadmap_db::config::DbConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub feedback: FeedbackSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
}

impl ServerSection {
    pub const DEFAULT_BIND: &str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 8000;
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: Self::DEFAULT_BIND.to_owned(),
            port: Self::DEFAULT_PORT,
        }
    }
}

/// Feedback model settings. Unset fields fall through to env vars and
/// defaults.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FeedbackSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the roadmap config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/roadmap` or `~/.config/roadmap`,
/// also on macOS.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("roadmap");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("roadmap")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    toml::from_str(&contents).context("failed to parse config file")
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct RoadmapConfig {
    pub db_config: DbConfig,
    pub feedback: FeedbackConfig,
    pub server: ServerSection,
}

impl RoadmapConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - DB URL: `cli_db_url` > `ROADMAP_DATABASE_URL` > `database.url` > `DbConfig::DEFAULT_URL`
    /// - Feedback: `ROADMAP_OLLAMA_URL`, `ROADMAP_OLLAMA_MODEL`,
    ///   `ROADMAP_FEEDBACK_TIMEOUT_SECS` > `[feedback]` > `FeedbackConfig` defaults
    /// - Server: `[server]` > defaults (the `serve` flags override later)
    ///
    /// A config file that exists but does not parse is an error; a missing
    /// one is not.
    pub fn resolve(cli_db_url: Option<&str>) -> Result<Self> {
        let file_config = if config_path().exists() {
            Some(load_config()?)
        } else {
            None
        };

        let db_url = if let Some(url) = cli_db_url {
            url.to_owned()
        } else if let Ok(url) = std::env::var("ROADMAP_DATABASE_URL") {
            url
        } else if let Some(ref cfg) = file_config {
            cfg.database.url.clone()
        } else {
            DbConfig::DEFAULT_URL.to_owned()
        };

        let (section, server) = match file_config {
            Some(cfg) => (cfg.feedback, cfg.server),
            None => (FeedbackSection::default(), ServerSection::default()),
        };

        let defaults = FeedbackConfig::default();
        let base_url = std::env::var("ROADMAP_OLLAMA_URL")
            .ok()
            .or(section.base_url)
            .unwrap_or(defaults.base_url);
        let model = std::env::var("ROADMAP_OLLAMA_MODEL")
            .ok()
            .or(section.model)
            .unwrap_or(defaults.model);
        let timeout = match std::env::var("ROADMAP_FEEDBACK_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse()
                    .with_context(|| format!("invalid ROADMAP_FEEDBACK_TIMEOUT_SECS: {raw}"))?,
            ),
            Err(_) => section
                .timeout_secs
                .map_or(defaults.timeout, Duration::from_secs),
        };

        Ok(Self {
            db_config: DbConfig::new(db_url),
            feedback: FeedbackConfig::new(base_url, model, timeout),
            server,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
