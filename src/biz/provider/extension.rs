use std::{fmt::Display, sync::Arc};

use async_trait::async_trait;
use log::info;

use super::{WalletKind, WalletProvider};
use crate::{
    biz::{ExtensionApi, ExtensionHost, SigningClient},
    error::Error,
    schema::{ChainConfig, ChainInfo},
};

/// A provider backed by a browser extension injected into the host.
#[derive(Debug)]
pub struct ExtensionProvider {
    kind: WalletKind,
    host: Arc<dyn ExtensionHost>,
}

impl ExtensionProvider {
    pub fn new(kind: WalletKind, host: Arc<dyn ExtensionHost>) -> Self {
        Self { kind, host }
    }

    fn extension(&self) -> Result<Arc<dyn ExtensionApi>, Error> {
        self.host
            .extension(self.kind)
            .ok_or_else(|| Error::ProviderNotInstalled(self.kind.to_string()))
    }

    fn rejected(&self, reason: impl Display) -> Error {
        Error::ConnectionRejected(self.kind.to_string(), reason.to_string())
    }
}

#[async_trait]
impl WalletProvider for ExtensionProvider {
    fn kind(&self) -> WalletKind {
        self.kind
    }

    fn is_installed(&self) -> bool {
        self.host.extension(self.kind).is_some()
    }

    async fn connect(&self, chain: &ChainConfig, chain_id: &str) -> Result<String, Error> {
        let ext = self.extension()?;

        ext.suggest_chain(&ChainInfo::from(chain))
            .await
            .map_err(|e| self.rejected(e))?;
        ext.enable(chain_id).await.map_err(|e| self.rejected(e))?;

        // Prefer the signer's account list; extensions without one report their key.
        let address = match ext.offline_signer(chain_id) {
            Some(signer) => signer
                .accounts()
                .await
                .map_err(|e| self.rejected(e))?
                .into_iter()
                .next()
                .map(|account| account.address)
                .ok_or_else(|| self.rejected(format!("No accounts found in {}", self.kind)))?,
            None => {
                ext.get_key(chain_id)
                    .await
                    .map_err(|e| self.rejected(e))?
                    .bech32_address
            }
        };

        info!("📣 {} enabled {chain_id} for {address}", self.kind);
        Ok(address)
    }

    async fn current_address(&self, chain: &ChainConfig) -> Result<String, Error> {
        let key = self
            .extension()?
            .get_key(&chain.chain_id)
            .await
            .map_err(|e| self.rejected(e))?;

        Ok(key.bech32_address)
    }

    async fn signer(&self, chain: &ChainConfig) -> Result<SigningClient, Error> {
        let signer = self
            .extension()?
            .offline_signer(&chain.chain_id)
            .ok_or_else(|| Error::SigningUnsupported(self.kind.to_string()))?;

        SigningClient::connect_with_signer(&chain.rpc, &chain.chain_id, signer, chain.gas_price()?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biz::mock::{MockExtension, MockHost};

    fn provider(ext: Option<Arc<MockExtension>>) -> ExtensionProvider {
        ExtensionProvider::new(WalletKind::Keplr, Arc::new(MockHost::keplr(ext)))
    }

    #[tokio::test]
    async fn connect_runs_the_full_procedure() {
        let ext = Arc::new(MockExtension::new("myblockchain1keplr"));
        let chain = ChainConfig::default();

        let address = provider(Some(ext.clone()))
            .connect(&chain, "mychain-1")
            .await
            .unwrap();

        assert_eq!(address, "myblockchain1keplr");
        assert_eq!(ext.suggested_chains(), vec!["mychain-1".to_string()]);
        assert_eq!(ext.enable_calls(), 1);
    }

    #[tokio::test]
    async fn connect_prefers_the_offline_signer() {
        let ext = Arc::new(MockExtension::with_signer("myblockchain"));
        let expected = ext.signer_address().unwrap();

        let address = provider(Some(ext))
            .connect(&ChainConfig::default(), "mychain-1")
            .await
            .unwrap();

        assert_eq!(address, expected);
    }

    #[tokio::test]
    async fn missing_extension_is_not_installed() {
        let provider = provider(None);
        assert!(!provider.is_installed());
        assert!(!provider.descriptor().is_installed);

        let res = provider.connect(&ChainConfig::default(), "mychain-1").await;
        assert!(matches!(res, Err(Error::ProviderNotInstalled(name)) if name == "Keplr"));
    }

    #[tokio::test]
    async fn rejection_carries_the_extension_message() {
        let ext = Arc::new(MockExtension::new("myblockchain1keplr"));
        ext.reject_with("Request rejected");

        let res = provider(Some(ext))
            .connect(&ChainConfig::default(), "mychain-1")
            .await;

        match res {
            Err(err @ Error::ConnectionRejected(..)) => {
                assert_eq!(err.to_string(), "Failed to connect to Keplr: Request rejected")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn signer_requires_an_offline_signer() {
        let chain = ChainConfig::default();

        let res = provider(Some(Arc::new(MockExtension::new("addr"))))
            .signer(&chain)
            .await;
        assert!(matches!(res, Err(Error::SigningUnsupported(_))));

        let ext = Arc::new(MockExtension::with_signer("myblockchain"));
        let expected = ext.signer_address().unwrap();
        let client = provider(Some(ext)).signer(&chain).await.unwrap();
        assert_eq!(client.address(), expected);
    }
}
