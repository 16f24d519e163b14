use std::fmt::Debug;

use crate::{error::Error, schema::SavedWallet};

/// Durable storage of the active session's identity.
pub trait SessionStorage: Debug + Clone + Send + Sync + 'static {
    /// The last saved identity, if any.
    fn load(&self) -> Result<Option<SavedWallet>, Error>;

    /// Replace the saved identity.
    fn save(&self, wallet: &SavedWallet) -> Result<(), Error>;

    /// Forget the saved identity. Clearing an empty storage is not an error.
    fn clear(&self) -> Result<(), Error>;
}
