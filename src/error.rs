use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Config file not exist: {0}")]
    ConfigNotExist(String),
    #[error(transparent)]
    InvalidConfig(#[from] toml::de::Error),
    #[error("Invalid http address: {0}")]
    InvalidHttpAddr(#[from] std::net::AddrParseError),
    #[error("Invalid gas price: {0}")]
    InvalidGasPrice(String),
    #[error("Fee for {0} gas at {1} overflows")]
    FeeOverflow(u64, String),
    #[error("Failed to decode json")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Failed to access db")]
    DbError(#[from] sled::Error),

    #[error("{0} wallet not installed")]
    ProviderNotInstalled(String),
    #[error("Failed to connect to {0}: {1}")]
    ConnectionRejected(String, String),
    #[error("Unsupported wallet: {0}")]
    UnsupportedWallet(String),
    #[error("Signing not supported for {0}")]
    SigningUnsupported(String),
    #[error("Signing failed: {0}")]
    SigningFailed(String),
    #[error("{0} not initialized")]
    SignerNotInitialized(String),
    #[error("Timed out after {0:?} waiting for {1}")]
    Timeout(Duration, String),
    #[error("Failed to query chain: {0}")]
    QueryError(#[from] reqwest::Error),

    #[error(transparent)]
    WalletError(#[from] wallet::WalletError),
}
