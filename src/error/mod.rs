//! Error types for configuration, cryptography and webhook verification.

use thiserror::Error;

/// Invalid client configuration, or an operation the channel
/// configuration does not permit.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("encryption master key is not valid base64")]
    MasterKeyNotBase64,

    #[error("encryption master key must decode to 32 bytes, got {0}")]
    MasterKeyLength(usize),

    #[error("custom host must not include a scheme prefix: {0}")]
    HostHasScheme(String),

    #[error("custom host must not end with '/': {0}")]
    HostHasTrailingSlash(String),

    #[error("public channel {0} does not require subscription auth")]
    AuthForPublicChannel(String),

    #[error("presence channel {0} requires user data for subscription auth")]
    MissingPresenceUserData(String),

    #[error("cannot trigger on multiple channels when one of them is encrypted")]
    EncryptedMulticast,
}

/// A failed cryptographic operation. These are deterministic for their
/// inputs; retrying without changing the input cannot succeed.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("payload encryption failed")]
    EncryptionFailed,

    #[error("payload decryption failed: ciphertext rejected by authenticator")]
    DecryptionFailed,

    #[error("encrypted payload is malformed: bad base64 or nonce length")]
    MalformedPayload,

    #[error("zero random bytes requested")]
    ZeroRandomBytesRequested,

    #[error("system random generator unavailable: {0}")]
    Rng(#[from] rand::Error),
}

/// A webhook request that could not be authenticated.
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("missing {0} header on webhook request")]
    MissingHeader(&'static str),

    #[error("webhook key header does not match the configured app key")]
    KeyMismatch,

    #[error("webhook signature header does not match the request body")]
    SignatureMismatch,

    #[error("webhook request has no body")]
    MissingBody,
}

/// Top-level error for client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Webhook verification error: {0}")]
    Webhook(#[from] WebhookError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;
