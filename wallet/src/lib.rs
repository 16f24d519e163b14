//! A deterministic HD wallet for Cosmos SDK chains: mnemonic → secp256k1 keys →
//! bech32 accounts, plus signing/verifying of sign docs.

use bip39::{Language, Mnemonic, MnemonicType, Seed};
use k256::ecdsa::{
    signature::{Signer, Verifier},
    SigningKey, VerifyingKey,
};
use serde::Serialize;

mod address;
mod error;
mod hd;
mod signature;

pub use address::Address;
pub use error::WalletError;
pub use hd::{cosmos_path, derive_signing_key, COSMOS_COIN_TYPE};
pub use signature::Signature;

/// An account exposed by a signer, shaped like the accounts browser extensions return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountData {
    pub address: String,
    pub algo: String,
    /// Compressed secp256k1 public key, hex encoded.
    pub pubkey: String,
}

#[derive(Clone)]
pub struct HdWallet {
    signing_key: SigningKey,
    address: Address,
}

impl HdWallet {
    /// Restore the first account (`m/44'/118'/0'/0/0`) of a mnemonic under `prefix`.
    pub fn from_mnemonic(phrase: &str, prefix: &str) -> Result<Self, WalletError> {
        let mnemonic =
            Mnemonic::from_phrase(phrase, Language::English).map_err(|_| WalletError::InvalidMnemonic)?;
        let seed = Seed::new(&mnemonic, "");

        Self::from_seed(seed.as_bytes(), prefix, 0)
    }

    /// Derive the account at `index` of a 64-byte BIP-39 seed.
    pub fn from_seed(seed: &[u8], prefix: &str, index: u32) -> Result<Self, WalletError> {
        let signing_key = derive_signing_key(seed, &cosmos_path(index))?;
        let pubkey = signing_key.verifying_key().to_encoded_point(true);
        let address = Address::from_pubkey(prefix, pubkey.as_bytes())?;

        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Create a wallet from a fresh 24-word mnemonic, returned alongside it.
    pub fn generate(prefix: &str) -> Result<(String, Self), WalletError> {
        let mnemonic = Mnemonic::new(MnemonicType::Words24, Language::English);
        let wallet = Self::from_mnemonic(mnemonic.phrase(), prefix)?;

        Ok((mnemonic.phrase().to_string(), wallet))
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Compressed public key (33 bytes).
    pub fn pubkey(&self) -> Vec<u8> {
        self.signing_key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    pub fn accounts(&self) -> Vec<AccountData> {
        vec![AccountData {
            address: self.address.to_string(),
            algo: "secp256k1".to_string(),
            pubkey: hex::encode(self.pubkey()),
        }]
    }

    /// Sign `sign_bytes` (hashed with SHA-256) on behalf of `signer_address`.
    pub fn sign(&self, sign_bytes: &[u8], signer_address: &str) -> Result<Signature, WalletError> {
        if self.address.as_str() != signer_address {
            return Err(WalletError::AccountNotFound(signer_address.to_string()));
        }

        let sig: k256::ecdsa::Signature = self.signing_key.try_sign(sign_bytes)?;
        Ok(Signature::from(sig))
    }
}

impl std::fmt::Debug for HdWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HdWallet {{ address: {} }}", self.address)
    }
}

/// Verify a signature against a compressed public key, does not require a wallet.
pub fn verify_signature(
    msg: &[u8],
    pubkey: &[u8],
    signature: impl Into<Signature>,
) -> Result<(), WalletError> {
    let signature = signature.into();
    let sig: k256::ecdsa::Signature = (&signature).try_into()?;
    let key = VerifyingKey::from_sec1_bytes(pubkey).map_err(|_| WalletError::InvalidSignature)?;

    key.verify(msg, &sig)
        .map_err(|_| WalletError::InvalidSignature)
}
