//! Webhook verification: authenticate inbound callbacks and decrypt any
//! encrypted-channel event payloads they carry.

use tracing::debug;

use crate::crypto;
use crate::error::{ClientResult, CryptoError, WebhookError};
use crate::models::channel::ChannelType;
use crate::models::event::EncryptedPayload;
use crate::models::webhook::Webhook;
use crate::services::cipher::PayloadCipher;

/// Header carrying the application key of the sending app.
pub const PUSHER_KEY_HEADER: &str = "X-Pusher-Key";

/// Header carrying the hex HMAC-SHA256 of the raw request body.
pub const PUSHER_SIGNATURE_HEADER: &str = "X-Pusher-Signature";

/// The parts of an inbound webhook request this crate needs: the two
/// authenticity headers and the raw body bytes, exactly as received.
#[derive(Debug, Clone, Copy)]
pub struct WebhookRequest<'a> {
    key: Option<&'a str>,
    signature: Option<&'a str>,
    body: Option<&'a [u8]>,
}

impl<'a> WebhookRequest<'a> {
    pub fn new(key: Option<&'a str>, signature: Option<&'a str>, body: Option<&'a [u8]>) -> Self {
        Self {
            key,
            signature,
            body,
        }
    }

    /// Pick the authenticity headers out of a full header list.
    /// Header name matching is case-insensitive.
    pub fn from_headers(
        headers: impl IntoIterator<Item = (&'a str, &'a str)>,
        body: Option<&'a [u8]>,
    ) -> Self {
        let mut key = None;
        let mut signature = None;
        for (name, value) in headers {
            if name.eq_ignore_ascii_case(PUSHER_KEY_HEADER) {
                key = Some(value);
            } else if name.eq_ignore_ascii_case(PUSHER_SIGNATURE_HEADER) {
                signature = Some(value);
            }
        }
        Self::new(key, signature, body)
    }
}

/// Verifies webhook authenticity and decodes the payload.
#[derive(Clone)]
pub struct WebhookVerifier {
    key: String,
    secret: String,
    cipher: PayloadCipher,
}

impl WebhookVerifier {
    pub fn new(key: impl Into<String>, secret: impl Into<String>, cipher: PayloadCipher) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            cipher,
        }
    }

    /// Verify an inbound webhook request and decode it.
    ///
    /// The key header must equal the configured app key, the body must be
    /// non-empty, and the signature header must equal the hex HMAC-SHA256
    /// of the raw body under the app secret. Events on encrypted channels
    /// are decrypted in place; one failed decryption fails the whole call.
    pub fn verify(&self, request: &WebhookRequest<'_>) -> ClientResult<Webhook> {
        let key = request
            .key
            .ok_or(WebhookError::MissingHeader(PUSHER_KEY_HEADER))?;
        if key != self.key {
            debug!("rejected webhook: key header mismatch");
            return Err(WebhookError::KeyMismatch.into());
        }

        let body = match request.body {
            Some(body) if !body.is_empty() => body,
            _ => return Err(WebhookError::MissingBody.into()),
        };

        let expected = hex::encode(crypto::hmac_sha256(self.secret.as_bytes(), body));
        let signature = request
            .signature
            .ok_or(WebhookError::MissingHeader(PUSHER_SIGNATURE_HEADER))?;
        if !crypto::constant_time_eq(signature.as_bytes(), expected.as_bytes()) {
            debug!("rejected webhook: signature mismatch");
            return Err(WebhookError::SignatureMismatch.into());
        }

        let mut webhook: Webhook = serde_json::from_slice(body)?;
        for event in &mut webhook.events {
            if ChannelType::from_name(&event.channel) != ChannelType::Encrypted {
                continue;
            }
            if let Some(data) = &event.data {
                let payload: EncryptedPayload = serde_json::from_str(data)?;
                let plaintext = self.cipher.decrypt(&payload, &event.channel)?;
                // Payloads are JSON text by protocol
                let plaintext =
                    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)?;
                event.data = Some(plaintext);
            }
        }
        Ok(webhook)
    }
}
