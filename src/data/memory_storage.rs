use std::sync::{Arc, RwLock};

use crate::{biz::SessionStorage, error::Error, schema::SavedWallet};

/// Session storage that lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<RwLock<Option<SavedWallet>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<SavedWallet>, Error> {
        Ok(self.inner.read().unwrap().clone())
    }

    fn save(&self, wallet: &SavedWallet) -> Result<(), Error> {
        *self.inner.write().unwrap() = Some(wallet.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        self.inner.write().unwrap().take();
        Ok(())
    }
}
