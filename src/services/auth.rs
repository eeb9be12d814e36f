//! Subscription auth for private, presence and encrypted channels
//! (Pusher-compatible HMAC).

use tracing::debug;

use crate::crypto;
use crate::error::{ClientError, ClientResult, ConfigError};
use crate::models::channel::{Channel, ChannelType};
use crate::models::token::{ChannelAuthToken, PresenceUserData};
use crate::services::cipher::PayloadCipher;

/// Issues subscription auth tokens.
/// Pusher-style: HMAC-SHA256(app_secret, socket_id:channel_name[:channel_data]).
#[derive(Clone)]
pub struct AuthService {
    key: String,
    secret: String,
    cipher: PayloadCipher,
}

impl AuthService {
    pub fn new(key: impl Into<String>, secret: impl Into<String>, cipher: PayloadCipher) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            cipher,
        }
    }

    /// Issue an auth token for a subscription attempt.
    ///
    /// Public channels never require auth and are rejected. Presence
    /// channels require `user_data`; its JSON-encoded form is covered by
    /// the signature and returned verbatim as `channel_data`. Encrypted
    /// channels additionally receive the channel's `shared_secret`.
    pub fn authenticate(
        &self,
        channel: &Channel,
        socket_id: &str,
        user_data: Option<&PresenceUserData>,
    ) -> ClientResult<ChannelAuthToken> {
        let full_name = channel.full_name();
        match channel.channel_type() {
            ChannelType::Public => {
                return Err(ClientError::Config(ConfigError::AuthForPublicChannel(
                    full_name,
                )));
            }
            ChannelType::Presence if user_data.is_none() => {
                return Err(ClientError::Config(ConfigError::MissingPresenceUserData(
                    full_name,
                )));
            }
            _ => {}
        }

        // The encoded string is signed and returned as-is; a client that
        // re-serializes it differently would fail signature checks.
        let channel_data = user_data.map(serde_json::to_string).transpose()?;

        let mut to_sign = format!("{socket_id}:{full_name}");
        if let Some(data) = &channel_data {
            to_sign.push(':');
            to_sign.push_str(data);
        }

        let signature = hex::encode(crypto::hmac_sha256(self.secret.as_bytes(), to_sign.as_bytes()));
        let shared_secret = (channel.channel_type() == ChannelType::Encrypted)
            .then(|| self.cipher.shared_secret(&full_name));
        debug!(channel = %full_name, socket_id = %socket_id, "issued channel auth token");

        Ok(ChannelAuthToken {
            auth: format!("{}:{}", self.key, signature),
            channel_data,
            shared_secret,
        })
    }
}
