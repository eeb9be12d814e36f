//! Webhooks: verified notification callbacks from the Channels servers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A verified webhook: when it was created and the events it carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    /// Creation time, transmitted as `time_ms` (milliseconds since epoch).
    #[serde(rename = "time_ms", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub events: Vec<WebhookEvent>,
}

/// One event inside a webhook request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// The event type tag (the protocol calls this field `name`).
    #[serde(rename = "name")]
    pub event_type: WebhookEventType,

    /// Full name of the channel the event occurred on.
    pub channel: String,

    /// Client event name. Only set for `client_event`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,

    /// Client event payload as a JSON string. Decrypted in place for
    /// events on encrypted channels before the webhook reaches the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    /// Socket that sent the event. Only set for `client_event`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<String>,

    /// User attached to the socket. Presence channels only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Webhook event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// A channel gained its first subscriber.
    ChannelOccupied,
    /// A channel lost its last subscriber.
    ChannelVacated,
    /// A user joined a presence channel.
    MemberAdded,
    /// A user left a presence channel.
    MemberRemoved,
    /// A client event was triggered on a private or presence channel.
    ClientEvent,
}
