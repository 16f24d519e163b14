use std::fmt::Debug;

use async_trait::async_trait;

use crate::{error::Error, schema::Coin};

/// Read-only access to the chain.
#[async_trait]
pub trait ChainQuery: Debug + Send + Sync + 'static {
    /// All balances held by `address`, one entry per denom.
    async fn all_balances(&self, address: &str) -> Result<Vec<Coin>, Error>;
}
