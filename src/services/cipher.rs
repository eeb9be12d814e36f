//! Payload encryption for end-to-end encrypted channels.
//!
//! The per-channel key is the SHA-256 digest of the full channel name
//! concatenated with the master key's base64 text. The raw 32-byte digest
//! is the secretbox key; its base64 form is the `shared_secret` handed to
//! authorized subscribers. The two encodings must not be confused: the
//! cipher only ever uses the raw digest.

use base64::prelude::*;

use crate::crypto;
use crate::error::CryptoError;
use crate::models::event::EncryptedPayload;

/// Encrypts and decrypts event payloads for encrypted channels.
#[derive(Clone)]
pub struct PayloadCipher {
    master_key_base64: String,
}

impl PayloadCipher {
    /// `master_key_base64` must already be validated (see `ClientOptions`).
    pub fn new(master_key_base64: impl Into<String>) -> Self {
        Self {
            master_key_base64: master_key_base64.into(),
        }
    }

    /// The raw per-channel encryption key. Recomputed on every call,
    /// never transmitted.
    pub fn channel_key(&self, channel_full_name: &str) -> [u8; crypto::KEY_BYTES] {
        let mut input = Vec::with_capacity(channel_full_name.len() + self.master_key_base64.len());
        input.extend_from_slice(channel_full_name.as_bytes());
        input.extend_from_slice(self.master_key_base64.as_bytes());
        crypto::sha256(&input)
    }

    /// The per-channel key in its transportable base64 form, as returned
    /// to authorized subscribers of encrypted channels.
    pub fn shared_secret(&self, channel_full_name: &str) -> String {
        BASE64_STANDARD.encode(self.channel_key(channel_full_name))
    }

    /// Encrypt a payload for the channel under a fresh random nonce.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        channel_full_name: &str,
    ) -> Result<EncryptedPayload, CryptoError> {
        let nonce_bytes = crypto::secure_random_bytes(crypto::NONCE_BYTES)?;
        let mut nonce = [0u8; crypto::NONCE_BYTES];
        nonce.copy_from_slice(&nonce_bytes);

        let key = self.channel_key(channel_full_name);
        let ciphertext = crypto::secretbox_seal(plaintext, &nonce, &key)?;
        Ok(EncryptedPayload::from_raw(&nonce, &ciphertext))
    }

    /// Decrypt a payload received for the channel.
    ///
    /// Authentication failure (tampering, wrong key, wrong nonce) surfaces
    /// as [`CryptoError::DecryptionFailed`].
    pub fn decrypt(
        &self,
        payload: &EncryptedPayload,
        channel_full_name: &str,
    ) -> Result<Vec<u8>, CryptoError> {
        let nonce_bytes = BASE64_STANDARD
            .decode(&payload.nonce)
            .map_err(|_| CryptoError::MalformedPayload)?;
        let nonce: [u8; crypto::NONCE_BYTES] = nonce_bytes
            .try_into()
            .map_err(|_| CryptoError::MalformedPayload)?;
        let ciphertext = BASE64_STANDARD
            .decode(&payload.ciphertext)
            .map_err(|_| CryptoError::MalformedPayload)?;

        let key = self.channel_key(channel_full_name);
        crypto::secretbox_open(&ciphertext, &nonce, &key)
    }
}
