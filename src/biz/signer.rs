//! Signing handles bound to one account of a provider.

use std::sync::Arc;

use wallet::Signature;

use super::OfflineSigner;
use crate::{
    error::Error,
    schema::{Coin, GasPrice},
};

/// A capability to sign on behalf of one account, with the fee settings and
/// endpoint that transactions from it go through.
#[derive(Debug, Clone)]
pub struct SigningClient {
    rpc: String,
    chain_id: String,
    address: String,
    gas_price: GasPrice,
    signer: Arc<dyn OfflineSigner>,
}

impl SigningClient {
    /// Bind `signer`'s first account to the chain at `rpc`.
    pub async fn connect_with_signer(
        rpc: &str,
        chain_id: &str,
        signer: Arc<dyn OfflineSigner>,
        gas_price: GasPrice,
    ) -> Result<Self, Error> {
        let accounts = signer
            .accounts()
            .await
            .map_err(|e| Error::SigningFailed(e.to_string()))?;
        let account = accounts
            .into_iter()
            .next()
            .ok_or_else(|| Error::SigningFailed("signer has no accounts".to_string()))?;

        Ok(Self {
            rpc: rpc.to_string(),
            chain_id: chain_id.to_string(),
            address: account.address,
            gas_price,
            signer,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn rpc(&self) -> &str {
        &self.rpc
    }

    pub fn gas_price(&self) -> &GasPrice {
        &self.gas_price
    }

    /// Fee paid for a transaction of `gas_limit` at this client's gas price.
    pub fn fee(&self, gas_limit: u64) -> Result<Coin, Error> {
        self.gas_price.fee(gas_limit)
    }

    /// Sign serialized sign doc bytes with the bound account.
    pub async fn sign(&self, sign_bytes: &[u8]) -> Result<Signature, Error> {
        self.signer
            .sign_direct(&self.address, sign_bytes)
            .await
            .map_err(|e| Error::SigningFailed(e.to_string()))
    }
}
