//! The bridge between the session model and the concrete wallet providers.

use std::sync::Arc;

use log::{error, info, warn};

use super::{
    provider::{ExtensionProvider, TestWalletProvider, WalletKind, WalletProvider},
    ChainQuery, ExtensionHost, SigningClient,
};
use crate::{
    error::Error,
    schema::{ChainConfig, ConnectedWallet, WalletInfo},
};

#[derive(Debug)]
pub struct WalletAdapter<Q: ChainQuery> {
    chain: ChainConfig,
    query: Q,
    // One provider per `WalletKind`, in discovery order.
    providers: Vec<Box<dyn WalletProvider>>,
}

impl<Q: ChainQuery> WalletAdapter<Q> {
    pub fn new(chain: ChainConfig, query: Q, host: Arc<dyn ExtensionHost>) -> Self {
        let providers = WalletKind::ALL
            .into_iter()
            .map(|kind| -> Box<dyn WalletProvider> {
                match kind {
                    WalletKind::TestWallet => Box::new(TestWalletProvider::new()),
                    _ => Box::new(ExtensionProvider::new(kind, host.clone())),
                }
            })
            .collect();

        Self {
            chain,
            query,
            providers,
        }
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    /// Installed providers: the extensions found in the host, then the test wallet.
    pub fn discover_wallets(&self) -> Vec<WalletInfo> {
        self.providers
            .iter()
            .filter(|p| p.is_installed())
            .map(|p| p.descriptor())
            .collect()
    }

    /// Connect to the provider called `name` and build a fresh session for `chain_id`.
    pub async fn connect(&self, name: &str, chain_id: &str) -> Result<ConnectedWallet, Error> {
        let provider = self.provider(name)?;
        let address = provider.connect(&self.chain, chain_id).await?;
        let balance = self.get_balance(&address).await;

        Ok(ConnectedWallet {
            name: provider.kind().to_string(),
            address,
            balance,
            chain_id: chain_id.to_string(),
        })
    }

    /// Balance of the fee denom held by `address`, in minimal units.
    ///
    /// Query failures are logged and reported as `"0"`; use `query_balance` to
    /// tell an unreachable endpoint from an empty account.
    pub async fn get_balance(&self, address: &str) -> String {
        self.query_balance(address).await.unwrap_or_else(|e| {
            error!("❌ Error fetching balance of {address}: {e}");
            "0".to_string()
        })
    }

    pub async fn query_balance(&self, address: &str) -> Result<String, Error> {
        let balances = self.query.all_balances(address).await?;

        Ok(balances
            .into_iter()
            .find(|coin| coin.denom == self.chain.coin_denom)
            .map(|coin| coin.amount)
            .unwrap_or_else(|| "0".to_string()))
    }

    /// Whether the provider still hands out an account. Never fails.
    pub async fn check_connection(&self, name: &str) -> bool {
        match self.provider(name) {
            Ok(provider) => provider.current_address(&self.chain).await.is_ok(),
            Err(_) => false,
        }
    }

    /// A fresh snapshot of the session held by provider `name`, if it is still available.
    pub async fn get_wallet_info(&self, name: &str) -> Option<ConnectedWallet> {
        let provider = self.provider(name).ok()?;

        match provider.current_address(&self.chain).await {
            Ok(address) => {
                let balance = self.get_balance(&address).await;
                Some(ConnectedWallet {
                    name: provider.kind().to_string(),
                    address,
                    balance,
                    chain_id: self.chain.chain_id.clone(),
                })
            }
            Err(e) => {
                warn!("❌ Error getting wallet info of {name}: {e}");
                None
            }
        }
    }

    /// A handle able to sign for the account of provider `name`.
    pub async fn get_signing_handle(&self, name: &str) -> Result<SigningClient, Error> {
        let provider = self
            .provider(name)
            .map_err(|_| Error::SigningUnsupported(name.to_string()))?;

        provider.signer(&self.chain).await
    }

    /// Let provider `name` know the session ended.
    pub async fn disconnect(&self, name: &str) {
        match self.provider(name) {
            Ok(provider) => provider.disconnect().await,
            Err(_) => info!("📣 Disconnecting unknown wallet {name}"),
        }
    }

    fn provider(&self, name: &str) -> Result<&dyn WalletProvider, Error> {
        let kind: WalletKind = name.parse()?;

        self.providers
            .iter()
            .find(|p| p.kind() == kind)
            .map(|p| p.as_ref())
            .ok_or_else(|| Error::UnsupportedWallet(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        biz::mock::{adapter_with, MockExtension, MockHost, MockQuery},
        data::RestQuery,
    };

    #[tokio::test]
    async fn discovery_without_extensions() {
        let adapter = adapter_with(MockHost::empty(), MockQuery::default());
        let wallets = adapter.discover_wallets();

        assert_eq!(wallets.len(), 1);
        assert_eq!(wallets[0].name, "Test Wallet");
        assert!(wallets[0].is_installed);
    }

    #[tokio::test]
    async fn discovery_order() {
        let host = MockHost::new(
            Some(Arc::new(MockExtension::new("k"))),
            Some(Arc::new(MockExtension::new("c"))),
        );
        let adapter = adapter_with(host, MockQuery::default());
        let names: Vec<String> = adapter
            .discover_wallets()
            .into_iter()
            .map(|w| w.name)
            .collect();

        assert_eq!(names, vec!["Keplr", "Cosmostation", "Test Wallet"]);

        let host = MockHost::new(None, Some(Arc::new(MockExtension::new("c"))));
        let adapter = adapter_with(host, MockQuery::default());
        let names: Vec<String> = adapter
            .discover_wallets()
            .into_iter()
            .map(|w| w.name)
            .collect();

        assert_eq!(names, vec!["Cosmostation", "Test Wallet"]);
    }

    #[tokio::test]
    async fn connect_unsupported_wallet() {
        let adapter = adapter_with(MockHost::empty(), MockQuery::default());

        for name in ["MetaMask", "", "keplr"] {
            let res = adapter.connect(name, "mychain-1").await;
            assert!(matches!(res, Err(Error::UnsupportedWallet(_))));
        }
    }

    #[tokio::test]
    async fn connect_test_wallet() {
        let query = MockQuery::default();
        let adapter = adapter_with(MockHost::empty(), query.clone());
        let address = adapter
            .connect("Test Wallet", "mychain-1")
            .await
            .unwrap()
            .address;
        query.set_balance(&address, "token", "1500");
        query.set_balance(&address, "stake", "99");

        let wallet = adapter.connect("Test Wallet", "mychain-1").await.unwrap();
        assert_eq!(wallet.name, "Test Wallet");
        assert_eq!(wallet.address, address);
        assert_eq!(wallet.balance, "1500");
        assert_eq!(wallet.chain_id, "mychain-1");
    }

    #[tokio::test]
    async fn connect_extension_fetches_balance() {
        let query = MockQuery::default();
        query.set_balance("myblockchain1keplr", "token", "42");
        let host = MockHost::keplr(Some(Arc::new(MockExtension::new("myblockchain1keplr"))));
        let adapter = adapter_with(host, query);

        let wallet = adapter.connect("Keplr", "mychain-1").await.unwrap();
        assert_eq!(wallet.name, "Keplr");
        assert_eq!(wallet.balance, "42");

        let res = adapter.connect("Cosmostation", "mychain-1").await;
        assert!(matches!(res, Err(Error::ProviderNotInstalled(_))));
    }

    #[tokio::test]
    async fn balance_falls_back_to_zero() {
        let query = MockQuery::default();
        query.set_balance("addr", "stake", "10");
        let adapter = adapter_with(MockHost::empty(), query.clone());

        // Denom absent.
        assert_eq!(adapter.get_balance("addr").await, "0");

        // Endpoint failing.
        query.set_failing(true);
        assert_eq!(adapter.get_balance("addr").await, "0");
        assert!(adapter.query_balance("addr").await.is_err());
    }

    #[tokio::test]
    async fn balance_of_unreachable_endpoint_is_zero() {
        let chain = ChainConfig {
            rest: "http://127.0.0.1:1".to_string(),
            ..ChainConfig::default()
        };
        let query = RestQuery::new(&chain.rest, std::time::Duration::from_secs(2));
        let adapter = WalletAdapter::new(chain, query, Arc::new(MockHost::empty()));

        assert_eq!(adapter.get_balance("myblockchain1abc").await, "0");
    }

    #[tokio::test]
    async fn check_connection() {
        let ext = Arc::new(MockExtension::new("myblockchain1keplr"));
        let adapter = adapter_with(MockHost::keplr(Some(ext.clone())), MockQuery::default());

        assert!(adapter.check_connection("Keplr").await);
        assert!(adapter.check_connection("Test Wallet").await);
        assert!(!adapter.check_connection("Cosmostation").await);
        assert!(!adapter.check_connection("Unknown").await);

        ext.set_live(false);
        assert!(!adapter.check_connection("Keplr").await);
    }

    #[tokio::test]
    async fn wallet_info_follows_the_extension_account() {
        let ext = Arc::new(MockExtension::new("myblockchain1first"));
        let adapter = adapter_with(MockHost::keplr(Some(ext.clone())), MockQuery::default());

        let info = adapter.get_wallet_info("Keplr").await.unwrap();
        assert_eq!(info.address, "myblockchain1first");
        assert_eq!(info.chain_id, "mychain-1");

        ext.set_address("myblockchain1second");
        let info = adapter.get_wallet_info("Keplr").await.unwrap();
        assert_eq!(info.address, "myblockchain1second");

        ext.set_live(false);
        assert!(adapter.get_wallet_info("Keplr").await.is_none());
        assert!(adapter.get_wallet_info("Cosmostation").await.is_none());
        assert!(adapter.get_wallet_info("Unknown").await.is_none());
    }

    #[tokio::test]
    async fn signing_handles() {
        let adapter = adapter_with(MockHost::empty(), MockQuery::default());

        let res = adapter.get_signing_handle("Unknown").await;
        assert!(matches!(res, Err(Error::SigningUnsupported(_))));

        let res = adapter.get_signing_handle("Test Wallet").await;
        assert!(matches!(res, Err(Error::SignerNotInitialized(_))));

        let wallet = adapter.connect("Test Wallet", "mychain-1").await.unwrap();
        let client = adapter.get_signing_handle("Test Wallet").await.unwrap();
        assert_eq!(client.address(), wallet.address);
    }
}
