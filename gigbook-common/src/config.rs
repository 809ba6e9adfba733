//! Configuration loading and root folder resolution
//!
//! Settings come from, in priority order:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "GIGBOOK_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "gigbook.db";

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl TomlConfig {
    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))
    }

    /// Load the explicit file if given, else the platform default file
    ///
    /// An explicit file that is missing or invalid is an error. A broken
    /// platform default file is not fatal: a warning is logged and defaults
    /// are used.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };

        match Self::load(&path) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("{}; using defaults", e);
                Ok(Self::default())
            }
        }
    }
}

/// First existing platform config file, if any
///
/// Linux checks `~/.config/gigbook/config.toml` then `/etc/gigbook/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("gigbook").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/gigbook/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    // ~/.local/share/gigbook, ~/Library/Application Support/gigbook, %LOCALAPPDATA%\gigbook
    dirs::data_local_dir()
        .map(|d| d.join("gigbook"))
        .unwrap_or_else(|| PathBuf::from("./gigbook_data"))
}

/// Resolve the root folder holding the database
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// Values supplied on the command line (clap fills these, env included)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved settings for the web service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn resolve(cli: &CliOverrides, toml: &TomlConfig) -> Result<Self> {
        let root_folder = resolve_root_folder(cli.root_folder.as_deref(), ROOT_FOLDER_ENV, toml);

        let database_path = cli
            .database
            .clone()
            .unwrap_or_else(|| root_folder.join(DATABASE_FILE));

        let bind_address = cli
            .bind_address
            .clone()
            .or_else(|| toml.bind_address.clone())
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        if bind_address.trim().is_empty() {
            return Err(Error::Config("bind_address is empty".to_string()));
        }

        let port = cli.port.or(toml.port).unwrap_or(DEFAULT_PORT);

        let log_level = cli
            .log_level
            .clone()
            .or_else(|| toml.log_level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            root_folder,
            database_path,
            bind_address,
            port,
            log_level,
            log_file: toml.log_file.clone(),
        })
    }

    /// `host:port` for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
