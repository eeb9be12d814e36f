//! Cryptographic primitives: digests, HMAC-SHA256, NaCl secretbox and
//! secure randomness.
//!
//! Everything here is a pure function over byte buffers. Key handling and
//! wire encodings live with the services that own them.

use crypto_secretbox::aead::{Aead, KeyInit};
use crypto_secretbox::{Nonce, XSalsa20Poly1305};
use hmac::{Hmac, Mac};
use md5::Md5;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::CryptoError;

type HmacSha256 = Hmac<Sha256>;

/// Secretbox key length in bytes.
pub const KEY_BYTES: usize = 32;

/// Secretbox nonce length in bytes.
pub const NONCE_BYTES: usize = 24;

/// HMAC-SHA256 of `data` under `key`.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    // HMAC accepts keys of any length
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key).expect("hmac accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// MD5 digest of `data`. Only used for the `body_md5` request parameter,
/// which the API requires; never for anything security-sensitive.
pub fn md5(data: &[u8]) -> [u8; 16] {
    Md5::digest(data).into()
}

/// Encrypt `plaintext` under `key` and `nonce` per the NaCl secretbox
/// construction (XSalsa20-Poly1305). The returned ciphertext carries the
/// authenticator tag; the nonce is not included.
pub fn secretbox_seal(
    plaintext: &[u8],
    nonce: &[u8; NONCE_BYTES],
    key: &[u8; KEY_BYTES],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = XSalsa20Poly1305::new(key.into());
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| CryptoError::EncryptionFailed)
}

/// Decrypt and authenticate a secretbox `ciphertext`.
///
/// Fails with [`CryptoError::DecryptionFailed`] if the ciphertext was
/// tampered with or the key or nonce is wrong. Callers must surface this;
/// it is never "no data".
pub fn secretbox_open(
    ciphertext: &[u8],
    nonce: &[u8; NONCE_BYTES],
    key: &[u8; KEY_BYTES],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = XSalsa20Poly1305::new(key.into());
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)
}

/// `count` bytes from the operating system's CSPRNG.
///
/// Zero-length requests are a caller bug and fail explicitly, as does an
/// unavailable OS generator. There is no non-cryptographic fallback.
pub fn secure_random_bytes(count: usize) -> Result<Vec<u8>, CryptoError> {
    if count == 0 {
        return Err(CryptoError::ZeroRandomBytesRequested);
    }
    let mut bytes = vec![0u8; count];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(bytes)
}

/// Constant-time equality of two byte strings. Differing lengths compare
/// unequal without leaking where the difference is.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
