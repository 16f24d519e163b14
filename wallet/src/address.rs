//! Bech32 account addresses.
//!
//! An account address is the 20-byte `ripemd160(sha256(pubkey))` of a compressed
//! secp256k1 public key, encoded as bech32 under the chain's human readable prefix.

use std::{fmt, ops::Deref};

use bech32::{FromBase32, ToBase32, Variant};
use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::WalletError;

// Serialize and deserialize Address as its bech32 string.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address {
    prefix: String,
    bytes: [u8; 20],
    encoded: String,
}

impl Address {
    /// Build an address from raw bytes under the given prefix.
    pub fn new(prefix: &str, bytes: [u8; 20]) -> Result<Self, WalletError> {
        let encoded = bech32::encode(prefix, bytes.to_base32(), Variant::Bech32)?;

        Ok(Self {
            prefix: prefix.to_string(),
            bytes,
            encoded,
        })
    }

    /// Derive the account address of a compressed (33-byte) public key.
    pub fn from_pubkey(prefix: &str, pubkey: &[u8]) -> Result<Self, WalletError> {
        let hash = Ripemd160::digest(Sha256::digest(pubkey));

        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash);
        Self::new(prefix, bytes)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

// Implement Deref so that Address can be used as &[u8; 20]
impl Deref for Address {
    type Target = [u8; 20];

    fn deref(&self) -> &Self::Target {
        &self.bytes
    }
}

impl TryFrom<&str> for Address {
    type Error = WalletError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let (prefix, data, variant) = bech32::decode(value)?;
        if variant != Variant::Bech32 {
            return Err(WalletError::InvalidAddress(value.to_string()));
        }

        let data = Vec::<u8>::from_base32(&data)?;
        let bytes: [u8; 20] = data
            .try_into()
            .map_err(|_| WalletError::InvalidAddress(value.to_string()))?;

        Self::new(&prefix, bytes)
    }
}

impl TryFrom<String> for Address {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.encoded
    }
}
