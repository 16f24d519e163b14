//! BIP-32 hierarchical key derivation over secp256k1.

use hmac::{Hmac, Mac};
use k256::{
    ecdsa::SigningKey,
    elliptic_curve::PrimeField,
    FieldBytes, Scalar,
};
use sha2::Sha512;

use crate::WalletError;

type HmacSha512 = Hmac<Sha512>;

const HARDENED: u32 = 0x8000_0000;

/// SLIP-44 coin type registered for Cosmos SDK chains.
pub const COSMOS_COIN_TYPE: u32 = 118;

/// The Cosmos account path `m/44'/118'/0'/0/{index}`.
pub fn cosmos_path(index: u32) -> [u32; 5] {
    [
        44 | HARDENED,
        COSMOS_COIN_TYPE | HARDENED,
        HARDENED,
        0,
        index,
    ]
}

/// Derive the signing key at `path` from a BIP-39 seed.
pub fn derive_signing_key(seed: &[u8], path: &[u32]) -> Result<SigningKey, WalletError> {
    let mut mac =
        HmacSha512::new_from_slice(b"Bitcoin seed").map_err(|_| WalletError::DerivationFailed(0))?;
    mac.update(seed);
    let master = mac.finalize().into_bytes();

    let mut key = [0u8; 32];
    let mut chain_code = [0u8; 32];
    key.copy_from_slice(&master[..32]);
    chain_code.copy_from_slice(&master[32..]);

    for &index in path {
        (key, chain_code) = derive_child(&key, &chain_code, index)?;
    }

    Ok(SigningKey::from_bytes(&key.into())?)
}

fn derive_child(
    parent_key: &[u8; 32],
    chain_code: &[u8; 32],
    index: u32,
) -> Result<([u8; 32], [u8; 32]), WalletError> {
    let mut mac =
        HmacSha512::new_from_slice(chain_code).map_err(|_| WalletError::DerivationFailed(index))?;

    if index >= HARDENED {
        mac.update(&[0u8]);
        mac.update(parent_key);
    } else {
        let parent = SigningKey::from_bytes(&FieldBytes::from(*parent_key))?;
        mac.update(parent.verifying_key().to_encoded_point(true).as_bytes());
    }
    mac.update(&index.to_be_bytes());
    let out = mac.finalize().into_bytes();

    // child = parse256(IL) + parent (mod n); IL >= n or a zero child are invalid.
    let mut il = [0u8; 32];
    il.copy_from_slice(&out[..32]);
    let tweak: Option<Scalar> = Scalar::from_repr(il.into()).into();
    let parent: Option<Scalar> = Scalar::from_repr((*parent_key).into()).into();
    let child = tweak
        .zip(parent)
        .map(|(t, p)| t + p)
        .filter(|s| !bool::from(s.is_zero()))
        .ok_or(WalletError::DerivationFailed(index))?;

    let mut key = [0u8; 32];
    let mut code = [0u8; 32];
    key.copy_from_slice(&child.to_repr());
    code.copy_from_slice(&out[32..]);

    Ok((key, code))
}

#[cfg(test)]
mod tests {
    use super::*;

    use hex_literal::hex;

    #[test]
    fn bip32_test_vector_1() {
        // BIP-32 test vector 1, chain m/0'/1/2'/2/1000000000.
        let seed = hex!("000102030405060708090a0b0c0d0e0f");
        let key = derive_signing_key(&seed, &[HARDENED, 1, 2 | HARDENED, 2, 1_000_000_000]).unwrap();

        assert_eq!(
            key.to_bytes().as_slice(),
            &hex!("471b76e389e528d6de6d816857e012c5455051cad6660850e58372a6c3e6e7c8")[..]
        );
    }

    #[test]
    fn bip32_test_vector_1_master() {
        let seed = hex!("000102030405060708090a0b0c0d0e0f");
        let key = derive_signing_key(&seed, &[]).unwrap();

        assert_eq!(
            key.to_bytes().as_slice(),
            &hex!("e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35")[..]
        );
    }

    #[test]
    fn cosmos_path_is_hardened_until_change() {
        let path = cosmos_path(3);

        assert_eq!(path[0], 0x8000_002c);
        assert_eq!(path[1], 0x8000_0076);
        assert_eq!(path[2], HARDENED);
        assert_eq!(path[3], 0);
        assert_eq!(path[4], 3);
    }
}
