//! Server-side client for the Pusher Channels HTTP API, built with Rust.
//!
//! Signs outbound API requests, issues subscription auth tokens for
//! private, presence and encrypted channels, encrypts and decrypts
//! payloads on end-to-end encrypted channels, and verifies inbound
//! webhooks. All operations are synchronous and CPU-bound; executing the
//! signed requests over HTTP is left to the caller's transport.

pub mod client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod services;

pub use client::Client;
pub use config::ClientOptions;
pub use error::{ClientError, ClientResult, ConfigError, CryptoError, WebhookError};
pub use models::channel::{Channel, ChannelType};
pub use models::event::{BatchEvent, EncryptedPayload, Event};
pub use models::request::SignedRequest;
pub use models::token::{ChannelAuthToken, PresenceUserData};
pub use models::webhook::{Webhook, WebhookEvent, WebhookEventType};
pub use services::webhook::{WebhookRequest, PUSHER_KEY_HEADER, PUSHER_SIGNATURE_HEADER};
