use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use log::info;
use wallet::HdWallet;

use super::{WalletKind, WalletProvider};
use crate::{biz::SigningClient, error::Error, schema::ChainConfig};

/// Publicly known recovery phrase of the development wallet. Never fund it on a real network.
pub const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";

/// Built-in development provider; always installed.
#[derive(Debug, Default)]
pub struct TestWalletProvider {
    // Signing handle created by the last connect or address lookup.
    client: RwLock<Option<SigningClient>>,
}

impl TestWalletProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn wallet(chain: &ChainConfig) -> Result<HdWallet, Error> {
        Ok(HdWallet::from_mnemonic(TEST_MNEMONIC, &chain.bech32_prefix)?)
    }

    // Derive the wallet and cache a fresh signing handle for `chain_id`.
    async fn open_client(
        &self,
        chain: &ChainConfig,
        chain_id: &str,
    ) -> Result<SigningClient, Error> {
        let wallet = Arc::new(Self::wallet(chain)?);
        let client =
            SigningClient::connect_with_signer(&chain.rpc, chain_id, wallet, chain.gas_price()?)
                .await?;

        *self.client.write().unwrap() = Some(client.clone());
        Ok(client)
    }
}

#[async_trait]
impl WalletProvider for TestWalletProvider {
    fn kind(&self) -> WalletKind {
        WalletKind::TestWallet
    }

    fn is_installed(&self) -> bool {
        true
    }

    async fn connect(&self, chain: &ChainConfig, chain_id: &str) -> Result<String, Error> {
        let client = self.open_client(chain, chain_id).await?;
        let address = client.address().to_string();
        info!("📣 Test wallet ready: {address}");

        Ok(address)
    }

    /// Also restores the signing handle, so a session resumed without a
    /// connect can still sign.
    async fn current_address(&self, chain: &ChainConfig) -> Result<String, Error> {
        let cached = self.client.read().unwrap().clone();
        let client = match cached {
            Some(client) => client,
            None => self.open_client(chain, &chain.chain_id).await?,
        };

        Ok(client.address().to_string())
    }

    async fn signer(&self, _chain: &ChainConfig) -> Result<SigningClient, Error> {
        self.client
            .read()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::SignerNotInitialized(WalletKind::TestWallet.to_string()))
    }
}
