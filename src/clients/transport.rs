//! Transports that carry requests to the TypePad API.
//!
//! [`Transport`] is the seam between the batching client and the network.
//! [`HttpTransport`] is the reqwest implementation used in production; tests
//! substitute in-memory transports that count or script responses.

use std::collections::HashMap;

use crate::clients::errors::HttpError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::ClientConfig;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sends requests and returns their responses.
///
/// Requests handed to a transport always carry absolute URLs.
#[allow(async_fn_in_trait)]
pub trait Transport: Send + Sync {
    /// Sends a single request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if no response could be obtained. Non-2xx
    /// responses are returned as `Ok`.
    async fn submit(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError>;

    /// Sends a group of requests collected by one batch.
    ///
    /// Results are returned in the order of `requests`. The default
    /// implementation submits them one after another.
    async fn submit_batch(&self, requests: &[HttpRequest]) -> Vec<Result<HttpResponse, HttpError>> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            results.push(self.submit(request).await);
        }
        results
    }
}

/// HTTP transport backed by `reqwest`.
///
/// The transport carries default headers:
/// - `User-Agent`, with the configured prefix if any
/// - `Accept: application/json`
///
/// # Thread Safety
///
/// `HttpTransport` is `Send + Sync`, making it safe to share across async tasks.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    default_headers: HashMap<String, String>,
}

// Verify HttpTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpTransport>();
};

impl HttpTransport {
    /// Creates a new transport for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (for example, TLS initialization failure).
    pub fn new(config: &ClientConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}TypePad API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            default_headers,
        })
    }

    /// Returns the default headers for this transport.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

impl Transport for HttpTransport {
    async fn submit(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut headers = self.default_headers.clone();
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };
        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }

        tracing::debug!("{} {}", request.http_method, request.url);
        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body = res.bytes().await?.to_vec();

        Ok(HttpResponse::new(code, res_headers, body))
    }
}
