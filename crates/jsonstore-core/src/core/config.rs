//! Configuration for jsonstore
//!
//! Defaults, optionally replaced by a TOML file, then overridden by
//! `JSONSTORE_*` environment variables. The server applies CLI flags on top
//! and validates the result.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::{
    DEFAULT_BASE_PATH, DEFAULT_HTTP_PORT, DEFAULT_LOG_LEVEL, DEFAULT_STORE_PATH, LOG_LEVELS,
};
use crate::types::error::{Error, Result};

/// Available storage backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageType {
    /// Backing JSON file
    File,
    /// Process memory only
    Memory,
}

impl FromStr for StorageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("file") {
            Ok(StorageType::File)
        } else if s.eq_ignore_ascii_case("memory") {
            Ok(StorageType::Memory)
        } else {
            Err(Error::config(format!(
                "Invalid storage type: {}. Valid options: file, memory",
                s
            )))
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::File => f.write_str("file"),
            StorageType::Memory => f.write_str("memory"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server bind address
    pub http_addr: SocketAddr,

    /// Route prefix of the store endpoints
    pub base_path: String,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage backend type
    pub storage_type: StorageType,

    /// Backing file path (file storage only)
    pub path: PathBuf,

    /// Write an empty store when the backing file is missing
    pub create_if_missing: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_HTTP_PORT)),
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::File,
            path: PathBuf::from(DEFAULT_STORE_PATH),
            create_if_missing: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &str) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read config file {}: {}", path, e)))?;
    toml::from_str(&contents)
        .map_err(|e| Error::config(format!("Failed to parse config file {}: {}", path, e)))
}

impl Config {
    /// Load from `path` (or defaults) and apply environment overrides.
    ///
    /// Not validated yet: callers layer their own overrides on top and then
    /// call [`Config::validate`].
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    fn load_with<F>(path: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => {
                let config = load_config(path)?;
                info!("Loaded configuration from: {}", path);
                config
            }
            None => Config::default(),
        };
        config.apply_overrides_from(lookup)?;
        Ok(config)
    }

    /// Apply `JSONSTORE_*` overrides from any key lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("JSONSTORE_HTTP_ADDR") {
            self.server.http_addr = addr
                .parse()
                .map_err(|e| Error::config(format!("Invalid HTTP address: {}", e)))?;
        }

        if let Some(base_path) = lookup("JSONSTORE_BASE_PATH") {
            self.server.base_path = base_path;
        }

        if let Some(storage_type) = lookup("JSONSTORE_STORAGE_TYPE") {
            self.storage.storage_type = storage_type.parse()?;
        }

        if let Some(path) = lookup("JSONSTORE_STORE_PATH") {
            self.storage.path = PathBuf::from(path);
        }

        if let Some(level) = lookup("JSONSTORE_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let base_path = &self.server.base_path;
        if !base_path.starts_with('/') || base_path.len() < 2 || base_path.ends_with('/') {
            return Err(Error::config(format!(
                "Invalid base path '{}': must start with '/', name a segment and not end with '/'",
                base_path
            )));
        }
        if base_path.contains(|c: char| c == '{' || c == '}') {
            return Err(Error::config(format!(
                "Invalid base path '{}': braces are not allowed",
                base_path
            )));
        }

        if self.storage.storage_type == StorageType::File && self.storage.path.as_os_str().is_empty()
        {
            return Err(Error::config("Store path must not be empty"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::config(format!(
                "Invalid log level '{}'. Valid options: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.server.http_addr.port(), 8080);
        assert_eq!(config.server.base_path, "/store");
        assert_eq!(config.storage.storage_type, StorageType::File);
        assert_eq!(config.storage.path, PathBuf::from("./store.json"));
        assert!(config.storage.create_if_missing);
        config.validate().unwrap();
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [storage]
            path = "/var/lib/jsonstore/db.json"
            storage_type = "Memory"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.path, PathBuf::from("/var/lib/jsonstore/db.json"));
        assert_eq!(config.storage.storage_type, StorageType::Memory);
        assert!(config.storage.create_if_missing);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.server.base_path, "/store");
    }

    #[test]
    fn load_reads_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("jsonstore.toml");
        std::fs::write(&path, "[server]\nhttp_addr = \"127.0.0.1:3000\"\n").unwrap();
        let config = load_config(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.http_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("missing.toml");
        assert!(matches!(load_config(missing.to_str().unwrap()), Err(Error::Config(_))));

        let bad = temp.path().join("bad.toml");
        std::fs::write(&bad, "[server\n").unwrap();
        assert!(matches!(load_config(bad.to_str().unwrap()), Err(Error::Config(_))));
    }

    #[test]
    fn load_layers_environment_over_file_without_validating() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("jsonstore.toml");
        std::fs::write(&path, "[server]\nbase_path = \"/api\"\n[logging]\nlevel = \"loud\"\n").unwrap();

        let config = Config::load_with(
            path.to_str(),
            lookup(&[("JSONSTORE_STORE_PATH", "env.json")]),
        )
        .unwrap();
        assert_eq!(config.server.base_path, "/api");
        assert_eq!(config.storage.path, PathBuf::from("env.json"));
        // a later override can still fix the level before validation
        assert!(config.validate().is_err());

        let config = Config::load_with(None, lookup(&[])).unwrap();
        assert_eq!(config.server.base_path, "/store");
    }

    #[test]
    fn overrides_apply() {
        let mut config = Config::default();
        config
            .apply_overrides_from(lookup(&[
                ("JSONSTORE_HTTP_ADDR", "127.0.0.1:9999"),
                ("JSONSTORE_BASE_PATH", "/api"),
                ("JSONSTORE_STORAGE_TYPE", "memory"),
                ("JSONSTORE_STORE_PATH", "other.json"),
                ("JSONSTORE_LOG_LEVEL", "warn"),
            ]))
            .unwrap();
        assert_eq!(config.server.http_addr.port(), 9999);
        assert_eq!(config.server.base_path, "/api");
        assert_eq!(config.storage.storage_type, StorageType::Memory);
        assert_eq!(config.storage.path, PathBuf::from("other.json"));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let mut config = Config::default();
        assert!(config
            .apply_overrides_from(lookup(&[("JSONSTORE_HTTP_ADDR", "nowhere")]))
            .is_err());
        assert!(config
            .apply_overrides_from(lookup(&[("JSONSTORE_STORAGE_TYPE", "tape")]))
            .is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        for base_path in ["store", "/", "/store/", "/{x}"] {
            let mut config = Config::default();
            config.server.base_path = base_path.to_string();
            assert!(config.validate().is_err(), "accepted {}", base_path);
        }

        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.storage.path = PathBuf::new();
        assert!(config.validate().is_err());
        config.storage.storage_type = StorageType::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn storage_type_parsing() {
        assert_eq!("FILE".parse::<StorageType>().unwrap(), StorageType::File);
        assert_eq!("memory".parse::<StorageType>().unwrap(), StorageType::Memory);
        assert_eq!(StorageType::Memory.to_string(), "memory");
    }
}
