//! The batching client.
//!
//! A [`BatchClient`] collects requests registered while a batch is open and
//! issues them together when the batch completes. Each registered request
//! carries a callback that receives its response; callbacks fire in the order
//! the requests were registered.

use std::sync::{Mutex, PoisonError};

use url::Url;

use crate::clients::errors::{BatchError, HttpError};
use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::HttpResponse;
use crate::clients::transport::{HttpTransport, Transport};
use crate::config::ClientConfig;

/// Callback invoked with the outcome of a batched request.
pub type BatchCallback = Box<dyn FnOnce(Result<HttpResponse, HttpError>) + Send>;

struct PendingRequest {
    request: HttpRequest,
    callback: BatchCallback,
}

/// A client that resolves URLs against the configured endpoint and groups
/// requests into batches.
///
/// # Example
///
/// ```rust,ignore
/// use typepad::{BatchClient, ClientConfig};
/// use typepad::api::User;
///
/// let client = BatchClient::new(ClientConfig::default())?;
///
/// client.batch_request()?;
/// let me = User::get_self(&client)?;
/// client.complete_batch().await?;
///
/// let me = me.deliver(&client).await?;
/// ```
pub struct BatchClient<T: Transport = HttpTransport> {
    config: ClientConfig,
    transport: T,
    pending: Mutex<Option<Vec<PendingRequest>>>,
}

// Verify BatchClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BatchClient>();
};

impl BatchClient<HttpTransport> {
    /// Creates a client that talks to the network over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the HTTP transport cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, HttpError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> BatchClient<T> {
    /// Creates a client over the given transport.
    #[must_use]
    pub const fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            pending: Mutex::new(None),
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolves `url` against the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidUrl`] if the URL cannot be resolved.
    pub fn resolve_url(&self, url: &str) -> Result<Url, HttpError> {
        self.config
            .endpoint()
            .join(url)
            .map_err(|_| HttpError::InvalidUrl {
                url: url.to_string(),
            })
    }

    /// Opens a new batch.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::BatchAlreadyOpen`] if a batch is already open.
    pub fn batch_request(&self) -> Result<(), BatchError> {
        let mut pending = self.lock();
        if pending.is_some() {
            return Err(BatchError::BatchAlreadyOpen);
        }
        *pending = Some(Vec::new());
        tracing::debug!("Opened batch request");
        Ok(())
    }

    /// Returns `true` if a batch is currently open.
    #[must_use]
    pub fn has_open_batch(&self) -> bool {
        self.lock().is_some()
    }

    /// Registers a request with the open batch.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::NoOpenBatch`] if no batch is open. The callback
    /// is dropped without being called in that case.
    pub fn batch(&self, request: HttpRequest, callback: BatchCallback) -> Result<(), BatchError> {
        let mut pending = self.lock();
        let Some(requests) = pending.as_mut() else {
            return Err(BatchError::NoOpenBatch);
        };
        tracing::debug!("Registered batched request for {}", request.url);
        requests.push(PendingRequest { request, callback });
        Ok(())
    }

    /// Issues every request registered with the open batch and closes it.
    ///
    /// Callbacks fire in registration order. Returns the number of requests
    /// that were issued.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::NoOpenBatch`] if no batch is open.
    pub async fn complete_batch(&self) -> Result<usize, BatchError> {
        let requests = self.lock().take().ok_or(BatchError::NoOpenBatch)?;
        let count = requests.len();

        let mut prepared = Vec::with_capacity(count);
        let mut callbacks = Vec::with_capacity(count);
        for PendingRequest { request, callback } in requests {
            prepared.push(self.absolute(request));
            callbacks.push(callback);
        }

        let sendable: Vec<HttpRequest> = prepared
            .iter()
            .filter_map(|request| request.as_ref().ok().cloned())
            .collect();
        let mut responses = self.transport.submit_batch(&sendable).await.into_iter();

        for (request, callback) in prepared.into_iter().zip(callbacks) {
            let result = match request {
                Ok(request) => responses.next().unwrap_or_else(|| {
                    Err(HttpError::InvalidUrl {
                        url: request.url.clone(),
                    })
                }),
                Err(err) => Err(err),
            };
            callback(result);
        }

        tracing::debug!("Completed batch request with {count} requests");
        Ok(count)
    }

    /// Sends a single request directly, outside of any batch.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the URL cannot be resolved or the request fails.
    pub async fn submit(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let request = self.absolute(request)?;
        self.transport.submit(&request).await
    }

    fn absolute(&self, mut request: HttpRequest) -> Result<HttpRequest, HttpError> {
        request.url = self.resolve_url(&request.url)?.into();
        Ok(request)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Vec<PendingRequest>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Transport + std::fmt::Debug> std::fmt::Debug for BatchClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchClient")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .field("has_open_batch", &self.has_open_batch())
            .finish()
    }
}
