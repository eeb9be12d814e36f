//! Events to trigger over the HTTP API, and the encrypted payload wire shape.

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult, ConfigError};
use crate::models::channel::{Channel, ChannelType};

/// Where an event is published: one channel, or several at once.
#[derive(Debug, Clone)]
enum EventTarget {
    Single(Channel),
    Many(Vec<Channel>),
}

/// An event to trigger on a channel (or several channels).
///
/// The payload is held as its JSON-encoded string form, which is exactly
/// what the API transmits in the `data` field.
#[derive(Debug, Clone)]
pub struct Event {
    name: String,
    data: String,
    target: EventTarget,
    socket_id: Option<String>,
}

impl Event {
    /// An event for a single channel. The payload is JSON-encoded here and
    /// the encoded form is what gets signed and transmitted.
    pub fn new<T: Serialize>(
        name: impl Into<String>,
        data: &T,
        channel: Channel,
    ) -> ClientResult<Self> {
        Ok(Self {
            name: name.into(),
            data: serde_json::to_string(data)?,
            target: EventTarget::Single(channel),
            socket_id: None,
        })
    }

    /// An event published to several channels at once.
    ///
    /// Encrypted channels cannot take part in a multi-channel trigger; each
    /// would need its own per-channel ciphertext under a single `data` field.
    pub fn multicast<T: Serialize>(
        name: impl Into<String>,
        data: &T,
        channels: Vec<Channel>,
    ) -> ClientResult<Self> {
        if channels
            .iter()
            .any(|c| c.channel_type() == ChannelType::Encrypted)
        {
            return Err(ClientError::Config(ConfigError::EncryptedMulticast));
        }
        Ok(Self {
            name: name.into(),
            data: serde_json::to_string(data)?,
            target: EventTarget::Many(channels),
            socket_id: None,
        })
    }

    /// Exclude one connection from receiving the event.
    pub fn with_socket_id(mut self, socket_id: impl Into<String>) -> Self {
        self.socket_id = Some(socket_id.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The JSON-encoded payload string.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// The single target channel if, and only if, this event targets
    /// exactly one channel.
    pub fn channel(&self) -> Option<&Channel> {
        match &self.target {
            EventTarget::Single(channel) => Some(channel),
            EventTarget::Many(_) => None,
        }
    }

    /// The `/events` request body, with `data` substituted by the caller
    /// (it differs from `self.data` once a payload has been encrypted).
    pub(crate) fn wire_body(&self, data: &str) -> ClientResult<Vec<u8>> {
        let body = match &self.target {
            EventTarget::Single(channel) => TriggerBody {
                name: &self.name,
                data,
                channels: None,
                channel: Some(channel.full_name()),
                socket_id: self.socket_id.as_deref(),
            },
            EventTarget::Many(channels) => TriggerBody {
                name: &self.name,
                data,
                channels: Some(channels.iter().map(Channel::full_name).collect()),
                channel: None,
                socket_id: self.socket_id.as_deref(),
            },
        };
        Ok(serde_json::to_vec(&body)?)
    }
}

#[derive(Serialize)]
struct TriggerBody<'a> {
    name: &'a str,
    data: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    channels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    socket_id: Option<&'a str>,
}

/// One entry of a `/batch_events` request.
#[derive(Debug, Clone)]
pub struct BatchEvent {
    pub channel: Channel,
    pub name: String,
    pub data: String,
    pub socket_id: Option<String>,
}

impl BatchEvent {
    pub fn new<T: Serialize>(
        channel: Channel,
        name: impl Into<String>,
        data: &T,
    ) -> ClientResult<Self> {
        Ok(Self {
            channel,
            name: name.into(),
            data: serde_json::to_string(data)?,
            socket_id: None,
        })
    }
}

#[derive(Serialize)]
pub(crate) struct BatchEventBody<'a> {
    pub channel: String,
    pub name: &'a str,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<&'a str>,
}

#[derive(Serialize)]
pub(crate) struct BatchBody<'a> {
    pub batch: Vec<BatchEventBody<'a>>,
}

/// Wire form of an end-to-end encrypted payload, substituted for the
/// plaintext `data` of events on encrypted channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedPayload {
    /// 24-byte secretbox nonce, base64.
    pub nonce: String,
    /// Secretbox ciphertext (with authenticator tag), base64.
    pub ciphertext: String,
}

impl EncryptedPayload {
    pub(crate) fn from_raw(nonce: &[u8], ciphertext: &[u8]) -> Self {
        use base64::prelude::*;
        Self {
            nonce: BASE64_STANDARD.encode(nonce),
            ciphertext: BASE64_STANDARD.encode(ciphertext),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_channel_event_body() {
        let event = Event::new(
            "my-event",
            &serde_json::json!({"message": "hello world"}),
            Channel::new("my-channel", ChannelType::Public),
        )
        .unwrap();
        let body = String::from_utf8(event.wire_body(event.data()).unwrap()).unwrap();
        assert_eq!(
            body,
            r#"{"name":"my-event","data":"{\"message\":\"hello world\"}","channel":"my-channel"}"#
        );
    }

    #[test]
    fn multicast_body_lists_full_names() {
        let event = Event::multicast(
            "my-event",
            &serde_json::json!({}),
            vec![
                Channel::new("a", ChannelType::Private),
                Channel::new("b", ChannelType::Public),
            ],
        )
        .unwrap();
        let body = String::from_utf8(event.wire_body(event.data()).unwrap()).unwrap();
        assert_eq!(
            body,
            r#"{"name":"my-event","data":"{}","channels":["private-a","b"]}"#
        );
    }

    #[test]
    fn multicast_rejects_encrypted_channels() {
        let result = Event::multicast(
            "my-event",
            &serde_json::json!({}),
            vec![
                Channel::new("a", ChannelType::Private),
                Channel::new("b", ChannelType::Encrypted),
            ],
        );
        assert!(matches!(
            result,
            Err(ClientError::Config(ConfigError::EncryptedMulticast))
        ));
    }

    #[test]
    fn socket_id_is_included_when_set() {
        let event = Event::new(
            "my-event",
            &serde_json::json!({}),
            Channel::new("my-channel", ChannelType::Public),
        )
        .unwrap()
        .with_socket_id("123.456");
        let body = String::from_utf8(event.wire_body(event.data()).unwrap()).unwrap();
        assert!(body.ends_with(r#""socket_id":"123.456"}"#));
    }
}
