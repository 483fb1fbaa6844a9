//! Process-level config: data directory, Ollama endpoint, logging, bind address. Loaded from env.
//!
//! Conversation settings (model, context limit, ...) are persisted separately by the storage crate
//! and can change at runtime; this config is fixed for the life of the process.

use std::env;
use std::path::PathBuf;

use crate::error::{Result, RheaError};

pub const DEFAULT_DATA_DIR: &str = ".rhea";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_LOG_FILE: &str = "logs/rhea.log";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// RHEA_DATA_DIR; holds config.json and profiles.json
    pub data_dir: PathBuf,
    /// OLLAMA_BASE_URL
    pub ollama_base_url: String,
    /// LOG_FILE
    pub log_file: String,
    /// RHEA_BIND_ADDR (server only)
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            log_file: DEFAULT_LOG_FILE.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl AppConfig {
    /// Load from environment variables; unset or blank variables take defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: non_blank_var("RHEA_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            ollama_base_url: non_blank_var("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            log_file: non_blank_var("LOG_FILE").unwrap_or(defaults.log_file),
            bind_addr: non_blank_var("RHEA_BIND_ADDR").unwrap_or(defaults.bind_addr),
        }
    }

    /// Overrides the data directory if `dir` is given (e.g. from a CLI flag).
    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.data_dir = dir;
        }
        self
    }

    /// Overrides the Ollama base URL if `url` is given.
    pub fn with_ollama_base_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.ollama_base_url = url;
        }
        self
    }

    /// Overrides the bind address if `addr` is given.
    pub fn with_bind_addr(mut self, addr: Option<String>) -> Self {
        if let Some(addr) = addr {
            self.bind_addr = addr;
        }
        self
    }

    /// Validate config: the Ollama URL must parse and the bind address must be `host:port`.
    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.ollama_base_url).is_err() {
            return Err(RheaError::Config(format!(
                "OLLAMA_BASE_URL is not a valid URL: {}",
                self.ollama_base_url
            )));
        }
        let port_ok = self
            .bind_addr
            .rsplit_once(':')
            .map(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok())
            .unwrap_or(false);
        if !port_ok {
            return Err(RheaError::Config(format!(
                "RHEA_BIND_ADDR must be host:port, got: {}",
                self.bind_addr
            )));
        }
        Ok(())
    }
}

fn non_blank_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var("RHEA_DATA_DIR");
        env::remove_var("OLLAMA_BASE_URL");
        env::remove_var("LOG_FILE");
        env::remove_var("RHEA_BIND_ADDR");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = AppConfig::from_env();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.data_dir, PathBuf::from(".rhea"));
        assert_eq!(config.ollama_base_url, "http://localhost:11434");
        assert_eq!(config.log_file, "logs/rhea.log");
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_custom_values() {
        clear_env();
        env::set_var("RHEA_DATA_DIR", "/tmp/rhea-data");
        env::set_var("OLLAMA_BASE_URL", "http://gpu-box:11434");
        env::set_var("LOG_FILE", "/tmp/rhea.log");
        env::set_var("RHEA_BIND_ADDR", "127.0.0.1:8080");

        let config = AppConfig::from_env();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/rhea-data"));
        assert_eq!(config.ollama_base_url, "http://gpu-box:11434");
        assert_eq!(config.log_file, "/tmp/rhea.log");
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_env_falls_back_to_default() {
        clear_env();
        env::set_var("OLLAMA_BASE_URL", "   ");
        assert_eq!(AppConfig::from_env().ollama_base_url, DEFAULT_OLLAMA_BASE_URL);
        clear_env();
    }

    #[test]
    fn test_overrides_win_over_env_values() {
        let config = AppConfig::default()
            .with_data_dir(Some(PathBuf::from("data")))
            .with_ollama_base_url(None)
            .with_bind_addr(Some("127.0.0.1:4000".to_string()));
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.ollama_base_url, DEFAULT_OLLAMA_BASE_URL);
        assert_eq!(config.bind_addr, "127.0.0.1:4000");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_url = AppConfig::default().with_ollama_base_url(Some("not a url".to_string()));
        assert!(matches!(bad_url.validate(), Err(RheaError::Config(_))));

        let bad_addr = AppConfig::default().with_bind_addr(Some("localhost".to_string()));
        assert!(matches!(bad_addr.validate(), Err(RheaError::Config(_))));

        let bad_port = AppConfig::default().with_bind_addr(Some("localhost:http".to_string()));
        assert!(bad_port.validate().is_err());
    }
}
