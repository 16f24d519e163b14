//! Signature type for sign docs.
//!
//! A signature is a 64-byte array holding the compact `r || s` form of an
//! `ecdsa::Signature`, with `s` normalized to the lower half of the curve order.

use std::{fmt, ops::Deref};

use k256::ecdsa;

use crate::WalletError;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 64]);

impl Signature {
    /// Hex representation, as used in logs and JSON bodies.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Deref for Signature {
    type Target = [u8; 64];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl From<ecdsa::Signature> for Signature {
    fn from(sig: ecdsa::Signature) -> Self {
        let sig = sig.normalize_s().unwrap_or(sig);
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(sig.to_bytes().as_ref());
        Self(bytes)
    }
}

impl TryFrom<&Signature> for ecdsa::Signature {
    type Error = WalletError;

    fn try_from(value: &Signature) -> Result<Self, Self::Error> {
        ecdsa::Signature::from_slice(&value[..]).map_err(|_| WalletError::InvalidSignature)
    }
}

impl From<[u8; 64]> for Signature {
    fn from(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }
}

impl From<Signature> for [u8; 64] {
    fn from(signature: Signature) -> Self {
        signature.0
    }
}
