//! Subscription auth tokens for private, presence and encrypted channels.

use serde::{Deserialize, Serialize};

/// Data shared about a connected user when authorizing a presence channel
/// subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceUserData {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_info: Option<serde_json::Value>,
}

impl PresenceUserData {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_info: None,
        }
    }

    pub fn with_info(user_id: impl Into<String>, user_info: serde_json::Value) -> Self {
        Self {
            user_id: user_id.into(),
            user_info: Some(user_info),
        }
    }
}

/// The auth token handed back to a subscribing client.
///
/// Serializes to the subscription-auth response body the Channels protocol
/// expects: `auth`, plus `channel_data` (presence) or `shared_secret`
/// (encrypted) where applicable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelAuthToken {
    /// `"{app_key}:{hex HMAC-SHA256 signature}"`.
    pub auth: String,

    /// The exact user-data JSON string the signature covers.
    /// Present for presence channels only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_data: Option<String>,

    /// Base64 of the per-channel encryption key.
    /// Present for encrypted channels only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_secret: Option<String>,
}
