use std::{fs, time::Duration};

use serde::Deserialize;

use crate::{error::Error, schema::ChainConfig};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The path to the session storage directory; empty keeps the session in memory.
    pub data_dir: String,
    /// The address to listen on for HTTP Server.
    pub http_addr: String,
    /// Whether the chain is a testnet, reported to the UI.
    pub is_testnet: bool,
    /// Network parameters of the chain.
    pub chain: ChainConfig,
    /// Session store tuning.
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            http_addr: "127.0.0.1:8000".to_string(),
            is_testnet: true,
            chain: ChainConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    /// Load the configuration from the given path.
    pub fn load(path: &str) -> Result<Self, Error> {
        let content =
            fs::read_to_string(path).map_err(|_| Error::ConfigNotExist(path.to_string()))?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds between background freshness checks of the connected wallet.
    pub refresh_interval_secs: u64,
    /// Seconds a connect attempt may take before it is abandoned.
    pub connect_timeout_secs: u64,
    /// Per-request timeout of chain queries.
    pub query_timeout_secs: u64,
}

impl SessionConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 5,
            connect_timeout_secs: 60,
            query_timeout_secs: 10,
        }
    }
}
