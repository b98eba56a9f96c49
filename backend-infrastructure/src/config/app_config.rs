use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, RuntimeConfig, StorageBackend, DEFAULT_TARGET_OFFSET};

use crate::config::validation::{validate_timestamp_offset, validate_worker_count};

pub const CONFIG_ENV: &str = "EVENTS_CONFIG";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub storage: StorageBackend,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub worker_count: usize,
    pub timestamp_offset: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            storage: StorageBackend::Memory,
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "events".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            worker_count: 5,
            timestamp_offset: DEFAULT_TARGET_OFFSET.to_string(),
            max_body_bytes: 8 * 1024 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            Self::from_toml(&content)?
        } else {
            warn!(path = %path, "config file not found, using defaults");
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| anyhow!("invalid config: {}", err))
    }

    pub fn normalize(&mut self) {
        if let Some(user) = &self.clickhouse_user {
            if user.trim().is_empty() {
                self.clickhouse_user = None;
            }
        }
        if let Some(password) = &self.clickhouse_password {
            if password.trim().is_empty() {
                self.clickhouse_password = None;
            }
        }
        self.bind_addr = self.bind_addr.trim().to_string();
        self.timestamp_offset = self.timestamp_offset.trim().to_string();
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        validate_worker_count(self.worker_count)?;
        validate_timestamp_offset(&self.timestamp_offset)?;
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.storage == StorageBackend::Clickhouse && self.clickhouse_url.trim().is_empty() {
            return Err(anyhow!("clickhouse_url must not be empty"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> Result<RuntimeConfig> {
        Ok(RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            worker_count: self.worker_count,
            timestamp_offset: validate_timestamp_offset(&self.timestamp_offset)?,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        })
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            storage: self.storage,
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("EVENTS_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("EVENTS_STORAGE") {
            match value.trim().to_lowercase().as_str() {
                "memory" => self.storage = StorageBackend::Memory,
                "clickhouse" => self.storage = StorageBackend::Clickhouse,
                other => warn!(storage = other, "ignoring unknown EVENTS_STORAGE"),
            }
        }
        if let Ok(value) = env::var("EVENTS_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Ok(value) = env::var("EVENTS_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("EVENTS_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("EVENTS_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Ok(value) = env::var("EVENTS_WORKER_COUNT") {
            self.worker_count = value.parse().unwrap_or(self.worker_count);
        }
        if let Ok(value) = env::var("EVENTS_TIMESTAMP_OFFSET") {
            self.timestamp_offset = value;
        }
        if let Ok(value) = env::var("EVENTS_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("EVENTS_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().expect("defaults validate");
        let runtime = config.to_runtime_config().expect("runtime");
        assert_eq!(runtime.worker_count, 5);
        assert_eq!(runtime.timestamp_offset.local_minus_utc(), 19_800);
        assert_eq!(config.to_db_config().storage, StorageBackend::Memory);
    }

    #[test]
    fn parses_partial_toml() {
        let mut config = AppConfig::from_toml(
            r#"
storage = "clickhouse"
clickhouse_database = "transactions"
clickhouse_user = "  "
worker_count = 8
timestamp_offset = " -04:00 "
"#,
        )
        .expect("parse");
        config.normalize();
        config.validate().expect("validate");
        assert_eq!(config.storage, StorageBackend::Clickhouse);
        assert_eq!(config.clickhouse_database, "transactions");
        assert_eq!(config.clickhouse_user, None);
        assert_eq!(config.worker_count, 8);
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        let runtime = config.to_runtime_config().expect("runtime");
        assert_eq!(runtime.timestamp_offset.local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn example_config_matches_defaults() {
        let mut config =
            AppConfig::from_toml(include_str!("../../../config.example.toml")).expect("parse");
        config.normalize();
        config.validate().expect("validate");
        assert_eq!(config.clickhouse_user, None);
        assert_eq!(config.max_body_bytes, AppConfig::default().max_body_bytes);
        assert_eq!(config.worker_count, AppConfig::default().worker_count);
    }

    #[test]
    fn rejects_invalid_settings() {
        let mut config = AppConfig::default();
        config.worker_count = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.timestamp_offset = "Asia/Kolkata".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.bind_addr = "localhost".to_string();
        assert!(config.validate().is_err());

        assert!(AppConfig::from_toml("storage = \"postgres\"").is_err());
    }
}
