//! In-memory stand-ins for extensions and the chain, shared by the biz tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use wallet::HdWallet;

use super::{
    ChainQuery, ExtensionApi, ExtensionError, ExtensionHost, Key, OfflineSigner, WalletAdapter,
    WalletKind,
};
use crate::{
    error::Error,
    schema::{ChainConfig, ChainInfo, Coin},
};

pub fn adapter_with(host: MockHost, query: MockQuery) -> WalletAdapter<MockQuery> {
    WalletAdapter::new(ChainConfig::default(), query, Arc::new(host))
}

#[derive(Debug, Clone, Default)]
pub struct MockQuery {
    balances: Arc<Mutex<HashMap<String, Vec<Coin>>>>,
    failing: Arc<AtomicBool>,
}

impl MockQuery {
    pub fn set_balance(&self, address: &str, denom: &str, amount: &str) {
        let mut balances = self.balances.lock().unwrap();
        let coins = balances.entry(address.to_string()).or_default();
        coins.retain(|coin| coin.denom != denom);
        coins.push(Coin {
            denom: denom.to_string(),
            amount: amount.to_string(),
        });
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChainQuery for MockQuery {
    async fn all_balances(&self, address: &str) -> Result<Vec<Coin>, Error> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Timeout(Duration::ZERO, "balances".to_string()));
        }

        let balances = self.balances.lock().unwrap();
        Ok(balances.get(address).cloned().unwrap_or_default())
    }
}

/// A scriptable Keplr-like extension.
#[derive(Debug)]
pub struct MockExtension {
    address: Mutex<String>,
    live: AtomicBool,
    rejection: Mutex<Option<String>>,
    enable_delay: Mutex<Duration>,
    enable_calls: AtomicUsize,
    suggested: Mutex<Vec<String>>,
    signer: Option<Arc<HdWallet>>,
}

impl MockExtension {
    pub fn new(address: &str) -> Self {
        Self {
            address: Mutex::new(address.to_string()),
            live: AtomicBool::new(true),
            rejection: Mutex::new(None),
            enable_delay: Mutex::new(Duration::ZERO),
            enable_calls: AtomicUsize::new(0),
            suggested: Mutex::new(Vec::new()),
            signer: None,
        }
    }

    /// An extension that also hands out an offline signer for its account.
    pub fn with_signer(prefix: &str) -> Self {
        let wallet = HdWallet::from_seed(&[7u8; 32], prefix, 0).unwrap();
        let mut ext = Self::new(wallet.address().as_str());
        ext.signer = Some(Arc::new(wallet));
        ext
    }

    pub fn signer_address(&self) -> Option<String> {
        self.signer.as_ref().map(|w| w.address().to_string())
    }

    /// Reject the next `enable` requests, after the enable delay.
    pub fn reject_with(&self, message: &str) {
        *self.rejection.lock().unwrap() = Some(message.to_string());
    }

    /// A locked extension refuses to report its key.
    pub fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::SeqCst);
    }

    pub fn set_address(&self, address: &str) {
        *self.address.lock().unwrap() = address.to_string();
    }

    pub fn set_enable_delay(&self, delay: Duration) {
        *self.enable_delay.lock().unwrap() = delay;
    }

    pub fn enable_calls(&self) -> usize {
        self.enable_calls.load(Ordering::SeqCst)
    }

    pub fn suggested_chains(&self) -> Vec<String> {
        self.suggested.lock().unwrap().clone()
    }

    fn check_rejection(&self) -> Result<(), ExtensionError> {
        match self.rejection.lock().unwrap().clone() {
            Some(message) => Err(ExtensionError(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ExtensionApi for MockExtension {
    async fn suggest_chain(&self, chain_info: &ChainInfo) -> Result<(), ExtensionError> {
        self.suggested
            .lock()
            .unwrap()
            .push(chain_info.chain_id.clone());
        Ok(())
    }

    async fn enable(&self, _chain_id: &str) -> Result<(), ExtensionError> {
        self.enable_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.enable_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.check_rejection()
    }

    async fn get_key(&self, _chain_id: &str) -> Result<Key, ExtensionError> {
        if !self.live.load(Ordering::SeqCst) {
            return Err(ExtensionError("Extension is locked".to_string()));
        }

        Ok(Key {
            name: "mock".to_string(),
            algo: "secp256k1".to_string(),
            pub_key: String::new(),
            bech32_address: self.address.lock().unwrap().clone(),
        })
    }

    fn offline_signer(&self, _chain_id: &str) -> Option<Arc<dyn OfflineSigner>> {
        self.signer
            .clone()
            .map(|signer| signer as Arc<dyn OfflineSigner>)
    }
}

#[derive(Debug, Default)]
pub struct MockHost {
    keplr: Option<Arc<MockExtension>>,
    cosmostation: Option<Arc<MockExtension>>,
}

impl MockHost {
    pub fn new(keplr: Option<Arc<MockExtension>>, cosmostation: Option<Arc<MockExtension>>) -> Self {
        Self {
            keplr,
            cosmostation,
        }
    }

    pub fn keplr(keplr: Option<Arc<MockExtension>>) -> Self {
        Self::new(keplr, None)
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl ExtensionHost for MockHost {
    fn extension(&self, kind: WalletKind) -> Option<Arc<dyn ExtensionApi>> {
        let ext = match kind {
            WalletKind::Keplr => self.keplr.clone(),
            WalletKind::Cosmostation => self.cosmostation.clone(),
            WalletKind::TestWallet => None,
        };

        ext.map(|ext| ext as Arc<dyn ExtensionApi>)
    }
}
