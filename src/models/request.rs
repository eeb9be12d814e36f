//! The transport boundary: a fully signed request ready to be executed.

/// A signed API request. This crate stops here; executing the request
/// (and any retry policy around it) belongs to the HTTP transport.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// Uppercase HTTP method, e.g. `"POST"`.
    pub method: &'static str,
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Path without query string, e.g. `"/apps/1070530/events"`.
    pub path: String,
    /// Final query parameters in signed order; `auth_signature` is last.
    pub query: Vec<(String, String)>,
    /// JSON body bytes, exactly as covered by `body_md5`.
    pub body: Option<Vec<u8>>,
}

impl SignedRequest {
    /// Percent-encoded query string in parameter order.
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(name, value)| {
                format!("{}={}", urlencoding::encode(name), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// The full request URL.
    pub fn url(&self) -> String {
        format!(
            "{}://{}:{}{}?{}",
            self.scheme,
            self.host,
            self.port,
            self.path,
            self.query_string()
        )
    }
}
