//! Capabilities of browser wallet extensions, as seen from the adapter.
//!
//! Extensions are external agents: the adapter only relies on the Keplr-style
//! surface below, whichever extension actually sits behind it.

use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use wallet::{AccountData, HdWallet, Signature};

use super::WalletKind;
use crate::schema::ChainInfo;

/// A failure reported by an extension, e.g. the user rejecting a request.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ExtensionError(pub String);

impl From<wallet::WalletError> for ExtensionError {
    fn from(err: wallet::WalletError) -> Self {
        Self(err.to_string())
    }
}

/// The key an extension reports for a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    pub name: String,
    pub algo: String,
    /// Compressed public key, hex encoded.
    pub pub_key: String,
    pub bech32_address: String,
}

/// Signs sign docs without ever exposing the private key.
#[async_trait]
pub trait OfflineSigner: Debug + Send + Sync {
    async fn accounts(&self) -> Result<Vec<AccountData>, ExtensionError>;

    async fn sign_direct(
        &self,
        signer_address: &str,
        sign_bytes: &[u8],
    ) -> Result<Signature, ExtensionError>;
}

/// The Keplr-compatible API an extension injects into the page.
#[async_trait]
pub trait ExtensionApi: Debug + Send + Sync {
    /// Register the chain with the extension. Extensions without chain
    /// registration accept the request silently.
    async fn suggest_chain(&self, _chain_info: &ChainInfo) -> Result<(), ExtensionError> {
        Ok(())
    }

    /// Ask the user to allow this page to use `chain_id`.
    async fn enable(&self, chain_id: &str) -> Result<(), ExtensionError>;

    /// The currently selected key for `chain_id`.
    async fn get_key(&self, chain_id: &str) -> Result<Key, ExtensionError>;

    /// The extension's offline signer for `chain_id`, if it hands one out.
    fn offline_signer(&self, _chain_id: &str) -> Option<Arc<dyn OfflineSigner>> {
        None
    }
}

/// The environment the client runs in, searched for injected extensions.
pub trait ExtensionHost: Debug + Send + Sync + 'static {
    fn extension(&self, kind: WalletKind) -> Option<Arc<dyn ExtensionApi>>;
}

#[async_trait]
impl OfflineSigner for HdWallet {
    async fn accounts(&self) -> Result<Vec<AccountData>, ExtensionError> {
        Ok(HdWallet::accounts(self))
    }

    async fn sign_direct(
        &self,
        signer_address: &str,
        sign_bytes: &[u8],
    ) -> Result<Signature, ExtensionError> {
        Ok(self.sign(sign_bytes, signer_address)?)
    }
}
