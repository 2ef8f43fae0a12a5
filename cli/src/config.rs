// Configuration management for the geoassert CLI
//
// Stored in:
// - Linux: ~/.config/geoassert/config.json
// - macOS: ~/Library/Application Support/geoassert/config.json

use anyhow::{Context, Result};
use geoassert_core::ble::DEFAULT_RPC_TIMEOUT;
use geoassert_core::MinerEndpoint;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Miner bus address
    pub miner: MinerEndpoint,

    /// Upper bound on one miner call, in milliseconds
    pub rpc_timeout_ms: u64,

    /// Object path notifications are addressed to
    pub characteristic_path: String,

    /// Default log filter when RUST_LOG is unset
    pub log_level: String,

    /// Daily-rolling log file; stderr when unset
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            miner: MinerEndpoint::default(),
            rpc_timeout_ms: DEFAULT_RPC_TIMEOUT.as_millis() as u64,
            characteristic_path: "/org/bluez/geoassert/service0/char0".to_string(),
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Get the config directory path (cross-platform)
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("geoassert");

        std::fs::create_dir_all(&config_dir)
            .context("Failed to create config directory")?;

        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .context("Failed to read config file")?;
            let config: Config = serde_json::from_str(&contents)
                .context("Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .context("Failed to write config file")?;
        Ok(())
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }

    /// Set a config value and persist it
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Set a config value in memory
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "miner.destination" => self.miner.destination = value.to_string(),
            "miner.path" => self.miner.path = value.to_string(),
            "miner.interface" => self.miner.interface = value.to_string(),
            "miner.method" => self.miner.method = value.to_string(),
            "rpc_timeout_ms" => {
                self.rpc_timeout_ms = value.parse()
                    .context("Invalid number")?;
            }
            "characteristic_path" => self.characteristic_path = value.to_string(),
            "log_level" => self.log_level = value.to_string(),
            "log_file" => {
                self.log_file = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Get a config value
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "miner.destination" => Some(self.miner.destination.clone()),
            "miner.path" => Some(self.miner.path.clone()),
            "miner.interface" => Some(self.miner.interface.clone()),
            "miner.method" => Some(self.miner.method.clone()),
            "rpc_timeout_ms" => Some(self.rpc_timeout_ms.to_string()),
            "characteristic_path" => Some(self.characteristic_path.clone()),
            "log_level" => Some(self.log_level.clone()),
            "log_file" => self.log_file.clone(),
            _ => None,
        }
    }

    /// List all config values
    pub fn list(&self) -> Vec<(String, String)> {
        vec![
            ("miner.destination".to_string(), self.miner.destination.clone()),
            ("miner.path".to_string(), self.miner.path.clone()),
            ("miner.interface".to_string(), self.miner.interface.clone()),
            ("miner.method".to_string(), self.miner.method.clone()),
            ("rpc_timeout_ms".to_string(), format!("{}ms", self.rpc_timeout_ms)),
            ("characteristic_path".to_string(), self.characteristic_path.clone()),
            ("log_level".to_string(), self.log_level.clone()),
            ("log_file".to_string(), self.log_file.clone().unwrap_or_else(|| "(stderr)".to_string())),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.miner.destination, "com.helium.Miner");
        assert_eq!(config.rpc_timeout(), Duration::from_secs(10));
        assert_eq!(config.log_level, "info");
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config.miner, deserialized.miner);
        assert_eq!(config.rpc_timeout_ms, deserialized.rpc_timeout_ms);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"rpc_timeout_ms": 2500}"#).unwrap();
        assert_eq!(config.rpc_timeout(), Duration::from_millis(2500));
        assert_eq!(config.miner.method, "AssertLocation");
    }

    #[test]
    fn test_apply_and_get() {
        let mut config = Config::default();
        config.apply("miner.destination", "com.example.Miner").unwrap();
        config.apply("rpc_timeout_ms", "500").unwrap();
        config.apply("log_file", "/var/log/geoassert.log").unwrap();

        assert_eq!(config.get("miner.destination").as_deref(), Some("com.example.Miner"));
        assert_eq!(config.rpc_timeout_ms, 500);
        assert_eq!(config.get("log_file").as_deref(), Some("/var/log/geoassert.log"));

        config.apply("log_file", "").unwrap();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_apply_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.apply("rpc_timeout_ms", "soon").is_err());
        assert!(config.apply("listen_port", "9000").is_err());
        assert!(config.get("listen_port").is_none());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());

        let mut changed = config.clone();
        changed.apply("characteristic_path", "/char7").unwrap();
        changed.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.characteristic_path, "/char7");
    }
}
