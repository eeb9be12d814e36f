//! End-to-end flows through the public client surface: trigger request
//! building and signing, subscription auth tokens, webhook verification,
//! and the encrypted-channel round trip.
//!
//! Run with `cargo test`. Everything here is offline; signed requests are
//! inspected rather than executed.

use base64::prelude::*;
use pusher_http::services::signer::{RequestSigner, SigningContext};
use pusher_http::{
    Channel, ChannelType, Client, ClientOptions, Event, PresenceUserData, WebhookEventType,
    WebhookRequest,
};

const APP_ID: u64 = 1070530;
const KEY: &str = "b5390e69136683c40d2d";
const SECRET: &str = "24aaea961cfe1335f796";
const MASTER_KEY: &str = "a7QyXV8eYrtJBehbuix68XCPO6+LrpnNNReWOkaXW7A=";

fn client() -> Client {
    let options = ClientOptions::with_cluster(APP_ID, KEY, SECRET, MASTER_KEY, "eu").unwrap();
    Client::new(options)
}

/// The signature in a built request must be reproducible by signing the
/// same context at the timestamp the request carries.
fn assert_signature_consistent(request: &pusher_http::SignedRequest, extra: &[(String, String)]) {
    let timestamp: i64 = request
        .query
        .iter()
        .find(|(name, _)| name == "auth_timestamp")
        .expect("auth_timestamp present")
        .1
        .parse()
        .expect("auth_timestamp is an integer");
    let signer = RequestSigner::new(KEY, SECRET);
    let recomputed = signer.signed_params_at(
        &SigningContext {
            method: request.method,
            path: &request.path,
            extra_params: extra,
            body: request.body.as_deref(),
        },
        timestamp,
    );
    assert_eq!(request.query, recomputed);
}

#[test]
fn trigger_request_is_signed_and_carries_exact_body() {
    let event = Event::new(
        "my-event",
        &serde_json::json!({"message": "hello world"}),
        Channel::new("my-channel", ChannelType::Public),
    )
    .unwrap();
    let request = client().trigger_request(&event).unwrap();

    assert_eq!(request.method, "POST");
    assert_eq!(request.host, "api-eu.pusher.com");
    assert_eq!(request.path, "/apps/1070530/events");
    assert_eq!(
        request.body.as_deref(),
        Some(
            br#"{"name":"my-event","data":"{\"message\":\"hello world\"}","channel":"my-channel"}"#
                .as_slice()
        )
    );
    // body_md5 covers the exact transmitted bytes
    assert!(request
        .query
        .iter()
        .any(|(name, value)| name == "body_md5" && value == "4d5783bcd23f11c136012d9983bc084e"));
    assert_eq!(request.query.last().unwrap().0, "auth_signature");
    assert_signature_consistent(&request, &[]);
}

#[test]
fn trigger_body_signature_matches_known_vector() {
    let event = Event::new(
        "my-event",
        &serde_json::json!({"message": "hello world"}),
        Channel::new("my-channel", ChannelType::Public),
    )
    .unwrap();
    let request = client().trigger_request(&event).unwrap();

    let signer = RequestSigner::new(KEY, SECRET);
    let params = signer.signed_params_at(
        &SigningContext {
            method: "POST",
            path: "/apps/1070530/events",
            extra_params: &[],
            body: request.body.as_deref(),
        },
        1619602993,
    );
    assert_eq!(
        params.last().unwrap().1,
        "c8b1e7b125a72a6e3d1847b008b17f00e2a0500c73f37680586860dd8554f5d9"
    );
}

#[test]
fn channels_request_sorts_filter_into_signed_params() {
    let request = client().channels_request(Some("presence-"), &[]);
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/apps/1070530/channels");
    let names: Vec<&str> = request.query.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "auth_key",
            "auth_timestamp",
            "auth_version",
            "filter_by_prefix",
            "auth_signature"
        ]
    );
    assert_signature_consistent(
        &request,
        &[("filter_by_prefix".to_string(), "presence-".to_string())],
    );

    // and the known vector at a pinned timestamp
    let signer = RequestSigner::new(KEY, SECRET);
    let params = signer.signed_params_at(
        &SigningContext {
            method: "GET",
            path: "/apps/1070530/channels",
            extra_params: &[("filter_by_prefix".to_string(), "presence-".to_string())],
            body: None,
        },
        1619602993,
    );
    assert_eq!(
        params.last().unwrap().1,
        "a7df9f5a436451f1caea044c9840469824c3b9cac030c65583a4efc61c4407c3"
    );
}

#[test]
fn channel_queries_use_full_names() {
    let channel = Channel::new("my-channel", ChannelType::Presence);
    let info = client().channel_info_request(&channel, &["user_count"]);
    assert_eq!(info.path, "/apps/1070530/channels/presence-my-channel");
    assert!(info
        .query
        .iter()
        .any(|(name, value)| name == "info" && value == "user_count"));

    let users = client().channel_users_request(&channel);
    assert_eq!(users.path, "/apps/1070530/channels/presence-my-channel/users");
}

#[test]
fn presence_auth_token_roundtrips_user_data() {
    let channel = Channel::new("my-channel", ChannelType::Presence);
    let token = client()
        .authenticate(&channel, "123.456", Some(&PresenceUserData::new("user_1")))
        .unwrap();
    assert_eq!(
        token.auth,
        format!("{KEY}:9f80a404199ac45a69b836a25fc88f09efb9ffef44d6fded36ac91b9d10887a2")
    );
    assert_eq!(token.channel_data.as_deref(), Some(r#"{"user_id":"user_1"}"#));

    // the serialized token is the subscription-auth response body
    let json = serde_json::to_value(&token).unwrap();
    assert!(json.get("auth").is_some());
    assert!(json.get("channel_data").is_some());
    assert!(json.get("shared_secret").is_none());
}

#[test]
fn webhook_scenario_verifies_and_rejects_tampering() {
    let options = ClientOptions::with_cluster(APP_ID, KEY, "S", MASTER_KEY, "eu").unwrap();
    let client = Client::new(options);

    let body: &[u8] =
        br#"{"time_ms":1619602993000,"events":[{"name":"channel_occupied","channel":"my-channel"}]}"#;
    // hex HMAC-SHA256 of the body under "S"
    let signature = "8024c5bd16b89f1c81f227cbd9b48cb315b838f26ebd5f61435714b687a71326";

    let webhook = client
        .verify_webhook(&WebhookRequest::new(Some(KEY), Some(signature), Some(body)))
        .unwrap();
    assert_eq!(webhook.events.len(), 1);
    assert_eq!(webhook.events[0].event_type, WebhookEventType::ChannelOccupied);
    assert_eq!(webhook.events[0].channel, "my-channel");

    let mut tampered = body.to_vec();
    tampered[20] ^= 0x01;
    assert!(client
        .verify_webhook(&WebhookRequest::new(Some(KEY), Some(signature), Some(&tampered)))
        .is_err());
}

#[test]
fn shared_secret_decrypts_triggered_payload() {
    let client = client();
    let channel = Channel::new("my-channel", ChannelType::Encrypted);

    // trigger on an encrypted channel: the body's data field is ciphertext
    let event = Event::new("my-event", &serde_json::json!({"message": "hello"}), channel.clone())
        .unwrap();
    let request = client.trigger_request(&event).unwrap();
    let body: serde_json::Value = serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
    let payload: pusher_http::EncryptedPayload =
        serde_json::from_str(body["data"].as_str().unwrap()).unwrap();

    // a subscriber holding the shared_secret can open it
    let token = client.authenticate(&channel, "123.456", None).unwrap();
    let key_bytes = BASE64_STANDARD
        .decode(token.shared_secret.unwrap())
        .unwrap();
    let key: [u8; 32] = key_bytes.try_into().unwrap();
    let nonce_bytes = BASE64_STANDARD.decode(&payload.nonce).unwrap();
    let nonce: [u8; 24] = nonce_bytes.try_into().unwrap();
    let ciphertext = BASE64_STANDARD.decode(&payload.ciphertext).unwrap();

    let plaintext = pusher_http::crypto::secretbox_open(&ciphertext, &nonce, &key).unwrap();
    assert_eq!(plaintext, br#"{"message":"hello"}"#);
}

#[test]
fn batch_trigger_encrypts_only_encrypted_entries() {
    let client = client();
    let events = vec![
        pusher_http::BatchEvent::new(
            Channel::new("plain", ChannelType::Public),
            "my-event",
            &serde_json::json!({"n": 1}),
        )
        .unwrap(),
        pusher_http::BatchEvent::new(
            Channel::new("locked", ChannelType::Encrypted),
            "my-event",
            &serde_json::json!({"n": 2}),
        )
        .unwrap(),
    ];
    let request = client.trigger_batch_request(&events).unwrap();
    assert_eq!(request.path, "/apps/1070530/batch_events");

    let body: serde_json::Value = serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
    let batch = body["batch"].as_array().unwrap();
    assert_eq!(batch[0]["channel"], "plain");
    assert_eq!(batch[0]["data"], r#"{"n":1}"#);
    assert_eq!(batch[1]["channel"], "private-encrypted-locked");
    let encrypted: pusher_http::EncryptedPayload =
        serde_json::from_str(batch[1]["data"].as_str().unwrap()).unwrap();
    assert!(!encrypted.ciphertext.is_empty());
}
