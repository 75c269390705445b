//! Configuration file management for fitcoach.
//!
//! Provides a TOML-based config file at `~/.config/fitcoach/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use fitcoach_core::plan::GeneratorOptions;
use fitcoach_db::config::DbConfig;

/// Env var overriding the HTTP bind address.
pub const BIND_ENV_VAR: &str = "FITCOACH_BIND";
/// Env var overriding the HTTP port.
pub const PORT_ENV_VAR: &str = "FITCOACH_PORT";

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub generator: GeneratorOptions,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_owned(),
            port: DEFAULT_PORT,
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the fitcoach config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/fitcoach` or `~/.config/fitcoach`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("fitcoach");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("fitcoach")
}

/// Return the path to the fitcoach config file.
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
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
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

    // The file carries the database URL, which may embed a password.
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
pub struct FitcoachConfig {
    pub db_config: DbConfig,
    pub server: ServerSection,
    pub generator: GeneratorOptions,
}

impl FitcoachConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - DB URL: `cli_db_url` > `FITCOACH_DATABASE_URL` > `database.url` > `DbConfig::DEFAULT_URL`
    /// - Server: `FITCOACH_BIND` / `FITCOACH_PORT` > `[server]` > `127.0.0.1:3000`
    /// - Generator: `[generator]` > defaults
    pub fn resolve(cli_db_url: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();

        let db_url = if let Some(url) = cli_db_url {
            url.to_owned()
        } else if let Ok(url) = std::env::var(DbConfig::ENV_VAR) {
            url
        } else if let Some(ref cfg) = file_config {
            cfg.database.url.clone()
        } else {
            DbConfig::DEFAULT_URL.to_owned()
        };

        let (mut server, generator) = match file_config {
            Some(cfg) => (cfg.server, cfg.generator),
            None => (ServerSection::default(), GeneratorOptions::default()),
        };

        if let Ok(bind) = std::env::var(BIND_ENV_VAR) {
            server.bind = bind;
        }
        if let Ok(port) = std::env::var(PORT_ENV_VAR) {
            server.port = port
                .parse()
                .with_context(|| format!("{PORT_ENV_VAR} is not a valid port: {port:?}"))?;
        }

        Ok(Self {
            db_config: DbConfig::new(db_url),
            server,
            generator,
        })
    }

    /// Apply `serve --bind/--port` flags on top of the resolved server section.
    pub fn server_with_overrides(&self, bind: Option<&str>, port: Option<u16>) -> ServerSection {
        ServerSection {
            bind: bind.map_or_else(|| self.server.bind.clone(), str::to_owned),
            port: port.unwrap_or(self.server.port),
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
