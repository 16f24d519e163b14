//! Wallet session logic, independent of the outer surfaces.

mod adapter;
mod extension;
mod notice;
mod provider;
mod query;
mod refresher;
mod session;
mod signer;
mod storage;

#[cfg(test)]
pub mod mock;

pub use adapter::*;
pub use extension::*;
pub use notice::*;
pub use provider::*;
pub use query::*;
pub use session::*;
pub use signer::*;
pub use storage::*;
