//! Wallet providers: the closed set of agents that can hand out accounts.

use std::{fmt, fmt::Debug, str::FromStr};

use async_trait::async_trait;
use log::info;

use super::SigningClient;
use crate::{
    error::Error,
    schema::{ChainConfig, WalletInfo},
};

mod extension;
mod test_wallet;

pub use extension::ExtensionProvider;
pub use test_wallet::{TestWalletProvider, TEST_MNEMONIC};

const KEPLR_LOGO: &str = "https://wallet.keplr.app/keplr-brand-assets/keplr-logo.svg";
const COSMOSTATION_LOGO: &str = "https://wallet.cosmostation.io/favicon.ico";
const TEST_WALLET_LOGO: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMjQiIGhlaWdodD0iMjQiIHZpZXdCb3g9IjAgMCAyNCAyNCIgZmlsbD0ibm9uZSIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj4KPHBhdGggZD0iTTIxIDhWMThIMTdWMTZIMTlWMTBIMTdWOEgyMVpNMy41IDZIOFY0SDMuNUM0LjMzIDQgNSA0LjY3IDUgNS41VjE4LjVDNSAxOS4zMyA0LjMzIDIwIDMuNSAyMEgyVjE4SDMuNVY2WiIgZmlsbD0iIzMzNzNkYyIvPgo8L3N2Zz4K";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalletKind {
    Keplr,
    Cosmostation,
    TestWallet,
}

impl WalletKind {
    /// All kinds, in discovery order.
    pub const ALL: [WalletKind; 3] = [
        WalletKind::Keplr,
        WalletKind::Cosmostation,
        WalletKind::TestWallet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WalletKind::Keplr => "Keplr",
            WalletKind::Cosmostation => "Cosmostation",
            WalletKind::TestWallet => "Test Wallet",
        }
    }

    pub fn logo(&self) -> &'static str {
        match self {
            WalletKind::Keplr => KEPLR_LOGO,
            WalletKind::Cosmostation => COSMOSTATION_LOGO,
            WalletKind::TestWallet => TEST_WALLET_LOGO,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WalletKind::Keplr => "Keplr is a browser extension wallet for Cosmos-based blockchains",
            WalletKind::Cosmostation => "Cosmostation is a non-custodial wallet for Cosmos ecosystem",
            WalletKind::TestWallet => "Test wallet for development purposes",
        }
    }
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WalletKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WalletKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnsupportedWallet(s.to_string()))
    }
}

/// What every provider can do for the adapter.
#[async_trait]
pub trait WalletProvider: Debug + Send + Sync {
    fn kind(&self) -> WalletKind;

    /// Whether the provider is present in the environment right now.
    fn is_installed(&self) -> bool;

    fn descriptor(&self) -> WalletInfo {
        let kind = self.kind();

        WalletInfo {
            name: kind.name().to_string(),
            logo: kind.logo().to_string(),
            description: kind.description().to_string(),
            is_installed: self.is_installed(),
            is_connected: false,
        }
    }

    /// Run the provider's connect procedure for `chain_id` and return the account address.
    async fn connect(&self, chain: &ChainConfig, chain_id: &str) -> Result<String, Error>;

    /// Re-request the active account without prompting the user.
    async fn current_address(&self, chain: &ChainConfig) -> Result<String, Error>;

    /// A handle able to sign for the active account.
    async fn signer(&self, chain: &ChainConfig) -> Result<SigningClient, Error>;

    /// Providers have no programmatic disconnect; the user revokes access from the wallet itself.
    async fn disconnect(&self) {
        info!("📣 Disconnecting {}", self.kind());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_wallet_kind() {
        for kind in WalletKind::ALL {
            assert_eq!(kind.name().parse::<WalletKind>().unwrap(), kind);
        }

        let res = "MetaMask".parse::<WalletKind>();
        assert!(matches!(res, Err(Error::UnsupportedWallet(name)) if name == "MetaMask"));
        assert!("test wallet".parse::<WalletKind>().is_err());
    }

    #[test]
    fn test_wallet_is_last() {
        assert_eq!(WalletKind::ALL.last(), Some(&WalletKind::TestWallet));
        assert_eq!(WalletKind::TestWallet.to_string(), "Test Wallet");
    }
}
