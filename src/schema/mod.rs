//! Schema definition for tinydapp.

mod chain;
mod wallet;

pub use self::chain::*;
pub use self::wallet::*;
