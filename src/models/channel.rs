//! Channel types and naming conventions.

use serde::{Deserialize, Serialize};

const ENCRYPTED_PREFIX: &str = "private-encrypted-";
const PRESENCE_PREFIX: &str = "presence-";
const PRIVATE_PREFIX: &str = "private-";

/// Channel type based on prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    /// Public channel: no auth required.
    Public,
    /// Private channel: requires auth token.
    Private,
    /// Presence channel: auth + track who is online.
    Presence,
    /// End-to-end encrypted channel: private restrictions + payload encryption.
    Encrypted,
}

impl ChannelType {
    /// Derive channel type from a full wire name. Pusher-style:
    /// `private-encrypted-*`, `presence-*`, `private-*`, no prefix for public.
    pub fn from_name(name: &str) -> Self {
        if name.starts_with(ENCRYPTED_PREFIX) {
            ChannelType::Encrypted
        } else if name.starts_with(PRESENCE_PREFIX) {
            ChannelType::Presence
        } else if name.starts_with(PRIVATE_PREFIX) {
            ChannelType::Private
        } else {
            ChannelType::Public
        }
    }

    /// The reserved wire-name prefix for this type. Empty for public.
    pub fn prefix(&self) -> &'static str {
        match self {
            ChannelType::Encrypted => ENCRYPTED_PREFIX,
            ChannelType::Presence => PRESENCE_PREFIX,
            ChannelType::Private => PRIVATE_PREFIX,
            ChannelType::Public => "",
        }
    }

    /// Whether subscriptions need an auth token (private restrictions).
    pub fn requires_auth(&self) -> bool {
        !matches!(self, ChannelType::Public)
    }
}

/// A channel: a short name plus a type. The full wire name is derived,
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    name: String,
    channel_type: ChannelType,
}

impl Channel {
    /// A channel from its short name (no type prefix) and type.
    pub fn new(name: impl Into<String>, channel_type: ChannelType) -> Self {
        Self {
            name: name.into(),
            channel_type,
        }
    }

    /// A channel from its full wire name, e.g. `"presence-my-channel"`.
    pub fn from_full_name(full_name: &str) -> Self {
        let channel_type = ChannelType::from_name(full_name);
        let name = full_name
            .strip_prefix(channel_type.prefix())
            .unwrap_or(full_name);
        Self::new(name, channel_type)
    }

    /// The short name without the type prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channel_type(&self) -> ChannelType {
        self.channel_type
    }

    /// The full wire name: the type prefix concatenated with the short name.
    pub fn full_name(&self) -> String {
        format!("{}{}", self.channel_type.prefix(), self.name)
    }
}
