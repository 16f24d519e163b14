#[derive(thiserror::Error, Debug)]
pub enum WalletError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Invalid mnemonic phrase")]
    InvalidMnemonic,
    #[error("Key derivation failed at index {0:#x}")]
    DerivationFailed(u32),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error(transparent)]
    Bech32Error(#[from] bech32::Error),
    #[error(transparent)]
    SignError(#[from] k256::ecdsa::Error),
    #[error("Invalid signature")]
    InvalidSignature,
}
