//! Process configuration, read once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use nexus_ai::AiConfig;
use nexus_infra::FileKeyValueStore;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_INSIGHTS_DEBOUNCE_MS: u64 = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub insights_debounce: Duration,
    pub ai: AiConfig,
}

impl ApiConfig {
    /// `NEXUS_BIND_ADDR`, `NEXUS_DATA_DIR`, `NEXUS_INSIGHTS_DEBOUNCE_MS` plus the AI variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = non_blank("NEXUS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name: "NEXUS_BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let insights_debounce = match non_blank("NEXUS_INSIGHTS_DEBOUNCE_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::Invalid {
                    name: "NEXUS_INSIGHTS_DEBOUNCE_MS",
                    value: raw,
                })?,
            None => Duration::from_millis(DEFAULT_INSIGHTS_DEBOUNCE_MS),
        };

        let data_dir = non_blank("NEXUS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(FileKeyValueStore::default_dir);

        Ok(Self {
            bind_addr,
            data_dir,
            insights_debounce,
            ai: AiConfig::from_lookup(&lookup),
        })
    }
}
