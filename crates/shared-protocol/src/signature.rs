//! Payload signing for game state snapshots.
//!
//! The payload is serialized to JSON with `serde_json` and hashed with
//! HMAC-SHA256 under the given key, or plain SHA-256 when there is no key.
//! Output is `0x`-prefixed lowercase hex.
//!
//! Key order follows `serde_json`: struct fields are written in declaration
//! order, while `serde_json::Value` objects are written with their keys
//! sorted. A signer holding insertion-ordered JSON text must sort object keys
//! the same way, or sign a typed payload, to produce matching signatures.

use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("payload is not serializable: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid signature encoding: {0}")]
    Encoding(#[from] hex::FromHexError),
    #[error("invalid signing key")]
    InvalidKey,
}

/// Sign a payload.
pub fn sign_payload<T: Serialize + ?Sized>(
    payload: &T,
    key: Option<&[u8]>,
) -> Result<String, SignatureError> {
    let bytes = serde_json::to_vec(payload)?;
    let digest = match key {
        Some(key) => hmac_digest(key, &bytes)?,
        None => Sha256::digest(&bytes).to_vec(),
    };
    Ok(format!("0x{}", hex::encode(digest)))
}

/// Check a signature produced by [`sign_payload`].
///
/// Keyed signatures are compared in constant time.
pub fn verify_payload<T: Serialize + ?Sized>(
    payload: &T,
    key: Option<&[u8]>,
    signature: &str,
) -> Result<bool, SignatureError> {
    let expected = hex::decode(signature.strip_prefix("0x").unwrap_or(signature))?;
    let bytes = serde_json::to_vec(payload)?;

    match key {
        Some(key) => {
            let mut mac = new_mac(key)?;
            mac.update(&bytes);
            Ok(mac.verify_slice(&expected).is_ok())
        }
        None => Ok(Sha256::digest(&bytes).as_slice() == expected.as_slice()),
    }
}

fn hmac_digest(key: &[u8], bytes: &[u8]) -> Result<Vec<u8>, SignatureError> {
    let mut mac = new_mac(key)?;
    mac.update(bytes);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn new_mac(key: &[u8]) -> Result<HmacSha256, SignatureError> {
    HmacSha256::new_from_slice(key).map_err(|_| SignatureError::InvalidKey)
}
