//! Business logic: request signing, payload encryption, channel auth and
//! webhook verification.

pub mod auth;
pub mod cipher;
pub mod signer;
pub mod webhook;

pub use auth::AuthService;
pub use cipher::PayloadCipher;
pub use signer::{RequestSigner, SigningContext};
pub use webhook::{WebhookRequest, WebhookVerifier};
