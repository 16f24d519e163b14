//! The single source of truth for the wallet session.
//!
//! The store moves between three states:
//!
//! ```text
//! Disconnected --connect_wallet--> Connecting --ok--> Connected
//!       ^                              |                  |
//!       +------------ failure ---------+                  |
//!       +---------- disconnect / provider gone -----------+
//! ```
//!
//! Every transition bumps an epoch. Work started under one epoch (a refresh
//! tick, a balance refresh) is dropped if the epoch moved on meanwhile.

use std::{
    future::Future,
    ops::Deref,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, RwLock,
    },
    time::Duration,
};

use log::{error, info};
use serde::Serialize;
use tokio::{sync::broadcast, task::JoinHandle, time};

use super::{refresher, ChainQuery, Notice, Notifier, SessionStorage, WalletAdapter};
use crate::{
    config::Config,
    error::Error,
    schema::{ConnectedWallet, SavedWallet, WalletInfo},
};

/// Connect notices share this id, so the loading notice is replaced by the outcome.
pub const CONNECT_NOTICE_ID: &str = "wallet-connect";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected(ConnectedWallet),
}

impl SessionState {
    pub fn is_connecting(&self) -> bool {
        matches!(self, SessionState::Connecting)
    }

    pub fn connected_wallet(&self) -> Option<&ConnectedWallet> {
        match self {
            SessionState::Connected(wallet) => Some(wallet),
            _ => None,
        }
    }
}

/// What consumers observe of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletState {
    pub connected_wallet: Option<ConnectedWallet>,
    pub available_wallets: Vec<WalletInfo>,
    pub is_connecting: bool,
    pub chain_id: String,
    pub is_testnet: bool,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub refresh_interval: Duration,
    pub connect_timeout: Duration,
    pub is_testnet: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            refresh_interval: config.session.refresh_interval(),
            connect_timeout: config.session.connect_timeout(),
            is_testnet: config.is_testnet,
        }
    }
}

#[derive(Debug)]
pub struct SessionStore<Q: ChainQuery, K: SessionStorage> {
    inner: Arc<SessionInner<Q, K>>,
}

impl<Q: ChainQuery, K: SessionStorage> Clone for SessionStore<Q, K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

// Implement `Deref` so that `SessionStore` can be treated as `SessionInner`.
impl<Q: ChainQuery, K: SessionStorage> Deref for SessionStore<Q, K> {
    type Target = SessionInner<Q, K>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug)]
pub struct SessionInner<Q: ChainQuery, K: SessionStorage> {
    adapter: WalletAdapter<Q>,
    storage: K,
    options: SessionOptions,
    notifier: Notifier,

    // Never held across an await.
    state: RwLock<SessionState>,
    available_wallets: RwLock<Vec<WalletInfo>>,
    epoch: AtomicU64,

    // The freshness task of the current Connected session, if any.
    refresher: Mutex<Option<JoinHandle<()>>>,
}

impl<Q: ChainQuery, K: SessionStorage> SessionStore<Q, K> {
    /// A store in the Disconnected state. Use `open` to also discover wallets
    /// and restore the persisted session.
    pub fn new(adapter: WalletAdapter<Q>, storage: K, options: SessionOptions) -> Self {
        let inner = SessionInner {
            adapter,
            storage,
            options,
            notifier: Notifier::new(),
            state: RwLock::new(SessionState::Disconnected),
            available_wallets: RwLock::new(Vec::new()),
            epoch: AtomicU64::new(0),
            refresher: Mutex::new(None),
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    pub async fn open(adapter: WalletAdapter<Q>, storage: K, options: SessionOptions) -> Self {
        let store = Self::new(adapter, storage, options);
        store.init_wallets();
        store.restore_session().await;
        store
    }

    /// Connect to the wallet called `name`.
    ///
    /// Returns `Ok(None)` without doing anything if another connect is in flight,
    /// or if the session was ended while this one was connecting.
    pub async fn connect_wallet(&self, name: &str) -> Result<Option<ConnectedWallet>, Error> {
        let Some(epoch) = self.begin_connecting() else {
            info!("📣 Already connecting, ignoring request for {name}");
            return Ok(None);
        };
        self.notifier
            .notify(Notice::loading("Connecting to wallet...").with_id(CONNECT_NOTICE_ID));

        let chain_id = self.chain_id().to_string();
        let res = self
            .with_timeout(name, self.adapter.connect(name, &chain_id))
            .await;

        match res {
            Ok(wallet) => {
                if !self.enter_connected(epoch, wallet.clone()) {
                    info!("📣 Session ended while connecting to {name}, dropping it");
                    return Ok(None);
                }
                self.notifier.notify(
                    Notice::success(format!("Connected to {}", wallet.name))
                        .with_id(CONNECT_NOTICE_ID),
                );
                Ok(Some(wallet))
            }
            Err(err) => {
                // A newer request owns the store by now; leave its state alone.
                self.abandon(epoch);
                self.notifier
                    .notify(Notice::error(err.to_string()).with_id(CONNECT_NOTICE_ID));
                Err(err)
            }
        }
    }

    /// End the session. Always leaves the store Disconnected with nothing persisted.
    pub async fn disconnect_wallet(&self) {
        let previous = self.reset();

        if let SessionState::Connected(wallet) = previous {
            self.adapter.disconnect(&wallet.name).await;
            self.notifier.notify(Notice::success("Wallet disconnected"));
        }
    }

    /// Re-read address and balance of the connected wallet right away.
    pub async fn refresh_balance(&self) -> Option<ConnectedWallet> {
        let current = self.connected_wallet()?;
        let epoch = self.epoch();

        match self.adapter.get_wallet_info(&current.name).await {
            Some(updated) => {
                self.apply_update(epoch, updated);
                self.connected_wallet()
            }
            None => {
                self.notifier.notify(Notice::error("Failed to refresh balance"));
                None
            }
        }
    }

    async fn restore_session(&self) {
        let saved = match self.storage.load() {
            Ok(Some(saved)) => saved,
            Ok(None) => return,
            Err(e) => {
                error!("❌ Error checking existing connection: {e}");
                self.forget();
                return;
            }
        };
        let Some(epoch) = self.begin_connecting() else {
            return;
        };

        let restore = async {
            let wallet = if self.adapter.check_connection(&saved.name).await {
                self.adapter.get_wallet_info(&saved.name).await
            } else {
                None
            };
            Ok::<_, Error>(wallet)
        };

        match self.with_timeout(&saved.name, restore).await {
            Ok(Some(wallet)) => {
                info!("📣 Restored {} session for {}", wallet.name, wallet.address);
                self.enter_connected(epoch, wallet);
            }
            Ok(None) => {
                info!("📣 Saved {} session is gone, discarding it", saved.name);
                self.abandon(epoch);
            }
            Err(e) => {
                error!("❌ Error restoring {} session: {e}", saved.name);
                self.abandon(epoch);
            }
        }
    }

    // Commit the result of the connect started at `epoch`. Persisting and the
    // refresher swap happen under the state lock. Fails if anything else
    // happened to the store since.
    fn enter_connected(&self, epoch: u64, wallet: ConnectedWallet) -> bool {
        let mut state = self.state.write().unwrap();
        if self.epoch() != epoch || !state.is_connecting() {
            return false;
        }
        self.persist(&wallet);
        *state = SessionState::Connected(wallet);
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let handle = refresher::spawn(
            Arc::downgrade(&self.inner),
            epoch,
            self.options.refresh_interval,
        );
        if let Some(old) = self.refresher.lock().unwrap().replace(handle) {
            old.abort();
        }
        true
    }
}

impl<Q: ChainQuery, K: SessionStorage> SessionInner<Q, K> {
    pub fn adapter(&self) -> &WalletAdapter<Q> {
        &self.adapter
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notifier.subscribe()
    }

    /// Recent notices newer than `after`, for clients that poll.
    pub fn notices(&self, after: Option<u64>) -> Vec<Notice> {
        self.notifier.since(after)
    }

    pub fn state(&self) -> SessionState {
        self.state.read().unwrap().clone()
    }

    pub fn connected_wallet(&self) -> Option<ConnectedWallet> {
        self.state.read().unwrap().connected_wallet().cloned()
    }

    pub fn is_connecting(&self) -> bool {
        self.state.read().unwrap().is_connecting()
    }

    pub fn chain_id(&self) -> &str {
        &self.adapter.chain().chain_id
    }

    pub fn is_testnet(&self) -> bool {
        self.options.is_testnet
    }

    /// Installed wallets, with the one backing the current session marked connected.
    pub fn available_wallets(&self) -> Vec<WalletInfo> {
        let connected = self.connected_wallet().map(|w| w.name);

        self.available_wallets
            .read()
            .unwrap()
            .iter()
            .cloned()
            .map(|mut info| {
                info.is_connected = connected.as_deref() == Some(info.name.as_str());
                info
            })
            .collect()
    }

    pub fn snapshot(&self) -> WalletState {
        let state = self.state();

        WalletState {
            available_wallets: self.available_wallets(),
            is_connecting: state.is_connecting(),
            connected_wallet: state.connected_wallet().cloned(),
            chain_id: self.chain_id().to_string(),
            is_testnet: self.is_testnet(),
        }
    }

    /// Look for installed wallets again.
    pub fn init_wallets(&self) {
        let wallets = self.adapter.discover_wallets();
        info!(
            "📣 Available wallets: {:?}",
            wallets.iter().map(|w| &w.name).collect::<Vec<_>>()
        );

        *self.available_wallets.write().unwrap() = wallets;
    }

    /// Stop background work. The session itself is kept, persisted identity included.
    pub fn close(&self) {
        self.stop_refresh();
    }

    /// One freshness check of the session started at `epoch`.
    /// Returns false once that session is over.
    pub(super) async fn check_for_changes(&self, epoch: u64) -> bool {
        let Some(current) = self.connected_wallet() else {
            return false;
        };
        if self.epoch() != epoch {
            return false;
        }

        if !self.adapter.check_connection(&current.name).await {
            if self.end_session(epoch) {
                self.adapter.disconnect(&current.name).await;
                self.notifier
                    .notify(Notice::error(format!("{} is no longer connected", current.name)));
            }
            return false;
        }

        if let Some(updated) = self.adapter.get_wallet_info(&current.name).await {
            self.apply_update(epoch, updated);
        }
        self.epoch() == epoch
    }

    pub(super) fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    // Enter Connecting and return the epoch owned by this connect attempt.
    fn begin_connecting(&self) -> Option<u64> {
        let mut state = self.state.write().unwrap();
        if state.is_connecting() {
            return None;
        }

        *state = SessionState::Connecting;
        self.stop_refresh();
        Some(self.epoch.fetch_add(1, Ordering::SeqCst) + 1)
    }

    // Back to Disconnected with nothing persisted, whatever the state was.
    fn reset(&self) -> SessionState {
        let mut state = self.state.write().unwrap();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.stop_refresh();
        self.forget();
        std::mem::replace(&mut *state, SessionState::Disconnected)
    }

    // Give up the connect attempt of `epoch`, unless a newer one took over.
    fn abandon(&self, epoch: u64) -> bool {
        let mut state = self.state.write().unwrap();
        if self.epoch() != epoch {
            return false;
        }

        *state = SessionState::Disconnected;
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.forget();
        true
    }

    // Disconnect the session of `epoch`, unless something else already moved on.
    fn end_session(&self, epoch: u64) -> bool {
        let mut state = self.state.write().unwrap();
        if self.epoch() != epoch || state.connected_wallet().is_none() {
            return false;
        }

        *state = SessionState::Disconnected;
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.forget();
        true
    }

    // Merge a fresh snapshot into the session of `epoch`, keeping its name and chain id.
    fn apply_update(&self, epoch: u64, updated: ConnectedWallet) {
        let mut state = self.state.write().unwrap();
        if self.epoch() != epoch {
            return;
        }
        let SessionState::Connected(wallet) = &mut *state else {
            return;
        };

        if wallet.address != updated.address {
            wallet.address = updated.address;
            wallet.balance = updated.balance;
            self.save(&SavedWallet::from(&*wallet));
            drop(state);

            self.notifier.notify(Notice::info("Account changed"));
        } else {
            wallet.balance = updated.balance;
        }
    }

    async fn with_timeout<T>(
        &self,
        name: &str,
        fut: impl Future<Output = Result<T, Error>>,
    ) -> Result<T, Error> {
        let timeout = self.options.connect_timeout;

        match time::timeout(timeout, fut).await {
            Ok(res) => res,
            Err(_) => Err(Error::Timeout(timeout, name.to_string())),
        }
    }

    fn stop_refresh(&self) {
        if let Some(handle) = self.refresher.lock().unwrap().take() {
            handle.abort();
        }
    }

    fn persist(&self, wallet: &ConnectedWallet) {
        self.save(&SavedWallet::from(wallet));
    }

    fn save(&self, saved: &SavedWallet) {
        if let Err(e) = self.storage.save(saved) {
            error!("❌ Error saving wallet session: {e}");
        }
    }

    fn forget(&self) {
        if let Err(e) = self.storage.clear() {
            error!("❌ Error clearing wallet session: {e}");
        }
    }
}

impl<Q: ChainQuery, K: SessionStorage> Drop for SessionInner<Q, K> {
    fn drop(&mut self) {
        if let Ok(slot) = self.refresher.get_mut() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}
