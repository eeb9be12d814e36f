//! The client facade: wires the services together and produces signed
//! requests for the transport to execute.

use crate::config::ClientOptions;
use crate::error::ClientResult;
use crate::models::channel::{Channel, ChannelType};
use crate::models::event::{BatchBody, BatchEvent, BatchEventBody, Event};
use crate::models::request::SignedRequest;
use crate::models::token::{ChannelAuthToken, PresenceUserData};
use crate::models::webhook::Webhook;
use crate::services::auth::AuthService;
use crate::services::cipher::PayloadCipher;
use crate::services::signer::{RequestSigner, SigningContext};
use crate::services::webhook::{WebhookRequest, WebhookVerifier};

/// A Channels HTTP API client.
///
/// Builds signed requests, issues subscription auth tokens, encrypts
/// payloads for encrypted channels and verifies inbound webhooks. It
/// performs no I/O itself; executing a [`SignedRequest`] is the HTTP
/// transport's job.
#[derive(Clone)]
pub struct Client {
    options: ClientOptions,
    signer: RequestSigner,
    cipher: PayloadCipher,
    auth: AuthService,
    webhooks: WebhookVerifier,
}

impl Client {
    pub fn new(options: ClientOptions) -> Self {
        let cipher = PayloadCipher::new(options.master_key_base64());
        let signer = RequestSigner::new(options.key(), options.secret());
        let auth = AuthService::new(options.key(), options.secret(), cipher.clone());
        let webhooks = WebhookVerifier::new(options.key(), options.secret(), cipher.clone());
        Self {
            options,
            signer,
            cipher,
            auth,
            webhooks,
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// A signed `POST /apps/{app_id}/events` request for the event.
    ///
    /// On an encrypted channel the payload is replaced with its
    /// JSON-encoded encrypted form before the body is signed.
    pub fn trigger_request(&self, event: &Event) -> ClientResult<SignedRequest> {
        let data = match event
            .channel()
            .filter(|c| c.channel_type() == ChannelType::Encrypted)
        {
            Some(channel) => {
                let payload = self
                    .cipher
                    .encrypt(event.data().as_bytes(), &channel.full_name())?;
                serde_json::to_string(&payload)?
            }
            None => event.data().to_string(),
        };
        let body = event.wire_body(&data)?;
        let path = format!("/apps/{}/events", self.options.app_id());
        Ok(self.signed_request("POST", path, &[], Some(body)))
    }

    /// A signed `POST /apps/{app_id}/batch_events` request. Encryption is
    /// applied per entry, so encrypted channels are fine here.
    pub fn trigger_batch_request(&self, events: &[BatchEvent]) -> ClientResult<SignedRequest> {
        let mut batch = Vec::with_capacity(events.len());
        for event in events {
            let data = if event.channel.channel_type() == ChannelType::Encrypted {
                let payload = self
                    .cipher
                    .encrypt(event.data.as_bytes(), &event.channel.full_name())?;
                serde_json::to_string(&payload)?
            } else {
                event.data.clone()
            };
            batch.push(BatchEventBody {
                channel: event.channel.full_name(),
                name: &event.name,
                data,
                socket_id: event.socket_id.as_deref(),
            });
        }
        let body = serde_json::to_vec(&BatchBody { batch })?;
        let path = format!("/apps/{}/batch_events", self.options.app_id());
        Ok(self.signed_request("POST", path, &[], Some(body)))
    }

    /// A signed `GET /apps/{app_id}/channels` request, optionally filtered
    /// by full-name prefix, selecting the given channel attributes.
    pub fn channels_request(
        &self,
        filter_by_prefix: Option<&str>,
        attributes: &[&str],
    ) -> SignedRequest {
        let mut extra = Vec::new();
        if let Some(prefix) = filter_by_prefix {
            extra.push(("filter_by_prefix".to_string(), prefix.to_string()));
        }
        if !attributes.is_empty() {
            extra.push(("info".to_string(), attributes.join(",")));
        }
        let path = format!("/apps/{}/channels", self.options.app_id());
        self.signed_request("GET", path, &extra, None)
    }

    /// A signed `GET /apps/{app_id}/channels/{channel}` request.
    pub fn channel_info_request(&self, channel: &Channel, attributes: &[&str]) -> SignedRequest {
        let mut extra = Vec::new();
        if !attributes.is_empty() {
            extra.push(("info".to_string(), attributes.join(",")));
        }
        let path = format!(
            "/apps/{}/channels/{}",
            self.options.app_id(),
            channel.full_name()
        );
        self.signed_request("GET", path, &extra, None)
    }

    /// A signed `GET /apps/{app_id}/channels/{channel}/users` request
    /// (presence channels).
    pub fn channel_users_request(&self, channel: &Channel) -> SignedRequest {
        let path = format!(
            "/apps/{}/channels/{}/users",
            self.options.app_id(),
            channel.full_name()
        );
        self.signed_request("GET", path, &[], None)
    }

    /// Issue a subscription auth token. See [`AuthService::authenticate`].
    pub fn authenticate(
        &self,
        channel: &Channel,
        socket_id: &str,
        user_data: Option<&PresenceUserData>,
    ) -> ClientResult<ChannelAuthToken> {
        self.auth.authenticate(channel, socket_id, user_data)
    }

    /// Verify an inbound webhook. See [`WebhookVerifier::verify`].
    pub fn verify_webhook(&self, request: &WebhookRequest<'_>) -> ClientResult<Webhook> {
        self.webhooks.verify(request)
    }

    fn signed_request(
        &self,
        method: &'static str,
        path: String,
        extra_params: &[(String, String)],
        body: Option<Vec<u8>>,
    ) -> SignedRequest {
        let query = self.signer.signed_params(&SigningContext {
            method,
            path: &path,
            extra_params,
            body: body.as_deref(),
        });
        SignedRequest {
            method,
            scheme: self.options.scheme().to_string(),
            host: self.options.host().to_string(),
            port: self.options.api_port(),
            path,
            query,
            body,
        }
    }
}
