//! Client configuration: credentials, encryption master key and host
//! resolution.

use base64::prelude::*;

use crate::error::ConfigError;

const DEFAULT_CLUSTER: &str = "mt1";
const MASTER_KEY_BYTES: usize = 32;

/// Configuration for a Channels application, held immutably for the
/// lifetime of the client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    app_id: u64,
    key: String,
    secret: String,
    /// Master encryption key, held in its base64 text form. The decoded
    /// form must be exactly 32 bytes; construction enforces this.
    master_key_base64: String,
    cluster: Option<String>,
    host: String,
    port: u16,
    scheme: String,
    use_tls: bool,
}

impl ClientOptions {
    /// Options for the default `mt1` cluster, over TLS.
    ///
    /// `master_key_base64` is the base64 text of 32 random bytes
    /// (e.g. the output of `openssl rand -base64 32`).
    pub fn new(
        app_id: u64,
        key: impl Into<String>,
        secret: impl Into<String>,
        master_key_base64: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self::with_cluster(app_id, key, secret, master_key_base64, DEFAULT_CLUSTER)
    }

    /// Options for a named cluster, over TLS. The API host becomes
    /// `api-{cluster}.pusher.com`.
    pub fn with_cluster(
        app_id: u64,
        key: impl Into<String>,
        secret: impl Into<String>,
        master_key_base64: impl Into<String>,
        cluster: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let cluster = cluster.into();
        let host = format!("api-{cluster}.pusher.com");
        let master_key_base64 = validate_master_key(master_key_base64.into())?;
        Ok(Self {
            app_id,
            key: key.into(),
            secret: secret.into(),
            master_key_base64,
            cluster: Some(cluster),
            host,
            port: 443,
            scheme: "https".to_string(),
            use_tls: true,
        })
    }

    /// Options for a custom host, over TLS. The host is a bare hostname:
    /// no scheme prefix, no trailing slash.
    pub fn with_custom_host(
        app_id: u64,
        key: impl Into<String>,
        secret: impl Into<String>,
        master_key_base64: impl Into<String>,
        host: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let host = host.into();
        if host.starts_with("http://") || host.starts_with("https://") {
            return Err(ConfigError::HostHasScheme(host));
        }
        if host.ends_with('/') {
            return Err(ConfigError::HostHasTrailingSlash(host));
        }
        let master_key_base64 = validate_master_key(master_key_base64.into())?;
        Ok(Self {
            app_id,
            key: key.into(),
            secret: secret.into(),
            master_key_base64,
            cluster: None,
            host,
            port: 443,
            scheme: "https".to_string(),
            use_tls: true,
        })
    }

    /// Route traffic without TLS, on port 80 unless [`Self::port`] is set.
    pub fn without_tls(mut self) -> Self {
        self.use_tls = false;
        self.port = 80;
        self.scheme = "http".to_string();
        self
    }

    /// Override the port. Only meaningful without TLS; TLS always uses 443.
    pub fn port(mut self, port: u16) -> Self {
        if !self.use_tls {
            self.port = port;
        }
        self
    }

    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// The master key in its base64 text form. Key derivation consumes
    /// these exact UTF-8 bytes, not the decoded key.
    pub fn master_key_base64(&self) -> &str {
        &self.master_key_base64
    }

    pub fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn api_port(&self) -> u16 {
        self.port
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Load options from `PUSHER_APP_ID`, `PUSHER_KEY`, `PUSHER_SECRET`,
    /// `PUSHER_MASTER_KEY` and optionally `PUSHER_CLUSTER`.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let app_id = env_var("PUSHER_APP_ID")?
            .parse::<u64>()
            .map_err(|_| ConfigLoadError::InvalidAppId)?;
        let key = env_var("PUSHER_KEY")?;
        let secret = env_var("PUSHER_SECRET")?;
        let master_key = env_var("PUSHER_MASTER_KEY")?;
        let options = match std::env::var("PUSHER_CLUSTER") {
            Ok(cluster) => Self::with_cluster(app_id, key, secret, master_key, cluster)?,
            Err(_) => Self::new(app_id, key, secret, master_key)?,
        };
        Ok(options)
    }
}

fn env_var(name: &'static str) -> Result<String, ConfigLoadError> {
    std::env::var(name).map_err(|_| ConfigLoadError::MissingVar(name))
}

fn validate_master_key(master_key_base64: String) -> Result<String, ConfigError> {
    let decoded = BASE64_STANDARD
        .decode(&master_key_base64)
        .map_err(|_| ConfigError::MasterKeyNotBase64)?;
    if decoded.len() != MASTER_KEY_BYTES {
        return Err(ConfigError::MasterKeyLength(decoded.len()));
    }
    Ok(master_key_base64)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("PUSHER_APP_ID is not a number")]
    InvalidAppId,

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}
