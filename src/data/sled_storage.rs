use crate::{biz::SessionStorage, error::Error, schema::SavedWallet};

const SESSION_TREE: &str = "session";
const CONNECTED_WALLET_KEY: &str = "connectedWallet";

/// Session storage persisted in a sled database, as one JSON record.
#[derive(Debug, Clone)]
pub struct SledStorage {
    session: sled::Tree,
}

impl SledStorage {
    pub fn new(data_dir: &str) -> Result<Self, Error> {
        let db = sled::open(data_dir)?;

        Ok(Self {
            session: db.open_tree(SESSION_TREE)?,
        })
    }
}

impl SessionStorage for SledStorage {
    fn load(&self) -> Result<Option<SavedWallet>, Error> {
        match self.session.get(CONNECTED_WALLET_KEY)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save(&self, wallet: &SavedWallet) -> Result<(), Error> {
        let bytes = serde_json::to_vec(wallet)?;
        self.session.insert(CONNECTED_WALLET_KEY, bytes)?;
        self.session.flush()?;

        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        self.session.remove(CONNECTED_WALLET_KEY)?;
        self.session.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn save_load_clear() {
        let dir = tempdir_with_prefix("session");
        let storage = SledStorage::new(dir.to_str().unwrap()).unwrap();
        let wallet = SavedWallet {
            name: "Test Wallet".to_string(),
            address: "myblockchain1abc".to_string(),
        };

        assert_eq!(storage.load().unwrap(), None);
        storage.save(&wallet).unwrap();
        assert_eq!(storage.load().unwrap(), Some(wallet.clone()));
        assert_eq!(storage.clone().load().unwrap(), Some(wallet));

        storage.clear().unwrap();
        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn corrupt_record_is_an_error() {
        let dir = tempdir_with_prefix("corrupt");
        let storage = SledStorage::new(dir.to_str().unwrap()).unwrap();
        storage
            .session
            .insert(CONNECTED_WALLET_KEY, &b"not json"[..])
            .unwrap();

        assert!(matches!(storage.load(), Err(Error::InvalidJson(_))));
    }

    fn tempdir_with_prefix(prefix: &str) -> PathBuf {
        tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .unwrap()
            .into_path()
    }
}
