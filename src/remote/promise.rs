//! Lazy, memoized handles to remote resources.
//!
//! A [`Promise`] names a resource by URL and yields it on
//! [`deliver`](Promise::deliver). It moves through
//! `Unresolved → Resolving → Delivered` or `Unresolved → Resolving → Failed`.
//! A delivered value is shared by every clone of the promise; a failure is
//! returned again on every later call.
//!
//! # Batching
//!
//! Creating a promise never touches the batch, so a list promise can be
//! filtered or sliced into a new one without queueing the full list.
//! [`register`](Promise::register) queues a promise with the open batch, and
//! [`BatchClient::complete_batch`] fetches everything queued.
//!
//! Types whose class requires batching are only fetched that way. Delivering
//! one that is not yet queued registers it and completes the open batch; if
//! none is open, delivery fails with [`RemoteError::BatchRequired`] instead
//! of falling back to a direct request. Other types are fetched directly on
//! first delivery.
//!
//! # Example
//!
//! ```rust,ignore
//! use typepad::api::User;
//!
//! client.batch_request()?;
//! let me = User::get_self(&client)?;
//! me.register(&client)?;
//! client.complete_batch().await?;
//! let me = me.deliver(&client).await?;
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use url::Url;

use crate::clients::{BatchClient, BatchError, HttpError, HttpRequest, HttpResponse, Transport};
use crate::remote::errors::{DecodeError, RemoteError};
use crate::remote::resource::Resource;

/// Where a promise is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromiseStatus {
    /// Nothing has been requested yet.
    Unresolved,
    /// A request is registered or in flight.
    Resolving,
    /// The resource was fetched and decoded.
    Delivered,
    /// Fetching or decoding failed.
    Failed,
}

enum PromiseState<T> {
    Unresolved,
    Resolving,
    Delivered(Arc<T>),
    Failed(RemoteError),
}

impl<T> Clone for PromiseState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Unresolved => Self::Unresolved,
            Self::Resolving => Self::Resolving,
            Self::Delivered(value) => Self::Delivered(Arc::clone(value)),
            Self::Failed(err) => Self::Failed(err.clone()),
        }
    }
}

struct Shared<T> {
    state: PromiseState<T>,
    batch_requests: bool,
}

struct PromiseInner<T> {
    url: Url,
    shared: Mutex<Shared<T>>,
}

impl<T: Resource> PromiseInner<T> {
    fn lock(&self) -> MutexGuard<'_, Shared<T>> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn complete(&self, result: Result<HttpResponse, HttpError>) {
        let state = match self.decode_response(result) {
            Ok(value) => {
                tracing::debug!("Delivered {} {}", T::NAME, self.url);
                PromiseState::Delivered(Arc::new(value))
            }
            Err(err) => {
                tracing::warn!("Failed to deliver {} {}: {}", T::NAME, self.url, err);
                PromiseState::Failed(err)
            }
        };
        self.lock().state = state;
    }

    fn decode_response(&self, result: Result<HttpResponse, HttpError>) -> Result<T, RemoteError> {
        let response = result?;
        if !response.is_ok() {
            return Err(RemoteError::Status {
                url: self.url.to_string(),
                code: response.code,
            });
        }
        let decode_error = |source: DecodeError| RemoteError::Decode {
            url: self.url.to_string(),
            source,
        };
        let data = response.json().map_err(|err| decode_error(err.into()))?;
        T::decode(&data, Some(self.url.clone())).map_err(decode_error)
    }
}

/// A lazy handle to the resource at a URL.
///
/// Cloning a promise is cheap; clones share state.
pub struct Promise<T> {
    inner: Arc<PromiseInner<T>>,
}

// Verify Promise is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Promise<crate::api::User>>();
};

impl<T: Resource> Promise<T> {
    /// Creates a promise for the resource at `url`, using the type's
    /// batching policy.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Http`] if the URL cannot be resolved.
    pub fn get<C: Transport>(client: &BatchClient<C>, url: &str) -> Result<Self, RemoteError> {
        Self::get_with(client, url, T::batch_requests())
    }

    /// Creates an unresolved promise for the resource at `url`.
    ///
    /// Nothing is queued or fetched until the promise is
    /// [registered](Self::register) or [delivered](Self::deliver).
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Http`] if the URL cannot be resolved.
    pub fn get_with<C: Transport>(
        client: &BatchClient<C>,
        url: &str,
        batch_requests: bool,
    ) -> Result<Self, RemoteError> {
        Ok(Self::with_state(
            client.resolve_url(url)?,
            PromiseState::Unresolved,
            batch_requests,
        ))
    }

    /// Creates a promise that is already delivered with `value`.
    #[must_use]
    pub fn delivered(url: Url, value: T) -> Self {
        Self::with_state(
            url,
            PromiseState::Delivered(Arc::new(value)),
            T::batch_requests(),
        )
    }

    fn with_state(url: Url, state: PromiseState<T>, batch_requests: bool) -> Self {
        Self {
            inner: Arc::new(PromiseInner {
                url,
                shared: Mutex::new(Shared {
                    state,
                    batch_requests,
                }),
            }),
        }
    }

    /// Overrides the batching policy of an unresolved promise.
    ///
    /// Has no effect once the promise is resolving or settled.
    #[must_use]
    pub fn with_batch_requests(self, batch_requests: bool) -> Self {
        {
            let mut shared = self.inner.lock();
            if matches!(shared.state, PromiseState::Unresolved) {
                shared.batch_requests = batch_requests;
            }
        }
        self
    }

    /// Queues this promise with the client's open batch, to be fetched by
    /// [`BatchClient::complete_batch`].
    ///
    /// Does nothing if the promise is already resolving or settled.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::NoOpenBatch`] if no batch is open.
    pub fn register<C: Transport>(&self, client: &BatchClient<C>) -> Result<(), BatchError> {
        {
            let mut shared = self.inner.lock();
            if !matches!(shared.state, PromiseState::Unresolved) {
                return Ok(());
            }
            shared.state = PromiseState::Resolving;
        }

        let inner = Arc::clone(&self.inner);
        let registered = client.batch(
            HttpRequest::get(self.inner.url.as_str()),
            Box::new(move |result| inner.complete(result)),
        );
        if registered.is_err() {
            self.inner.lock().state = PromiseState::Unresolved;
        }
        registered
    }

    /// Returns the resource, fetching it if needed.
    ///
    /// - A delivered promise returns its value without network activity.
    /// - A failed promise returns the same error again.
    /// - A registered promise completes the open batch.
    /// - An unregistered batch-only promise registers itself and completes
    ///   the open batch.
    /// - A batch-only promise with no open batch fails with
    ///   [`RemoteError::BatchRequired`] and stays failed.
    /// - Any other promise is fetched with a direct request.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] if the resource cannot be fetched or decoded,
    /// or [`RemoteError::NotDelivered`] if it is waiting on a request this
    /// call cannot complete.
    pub async fn deliver<C: Transport>(&self, client: &BatchClient<C>) -> Result<Arc<T>, RemoteError> {
        let (state, batch_requests) = {
            let shared = self.inner.lock();
            (shared.state.clone(), shared.batch_requests)
        };

        match state {
            PromiseState::Delivered(value) => return Ok(value),
            PromiseState::Failed(err) => return Err(err),
            PromiseState::Resolving => {
                if client.has_open_batch() {
                    client.complete_batch().await?;
                }
                return self.settled();
            }
            PromiseState::Unresolved => {}
        }

        if batch_requests {
            if self.register(client).is_err() {
                let err = RemoteError::BatchRequired {
                    type_name: T::NAME,
                    url: self.inner.url.to_string(),
                };
                tracing::warn!("{err}");
                self.inner.lock().state = PromiseState::Failed(err.clone());
                return Err(err);
            }
            client.complete_batch().await?;
            return self.settled();
        }

        self.inner.lock().state = PromiseState::Resolving;
        tracing::debug!("Delivering {} {} directly", T::NAME, self.inner.url);
        let result = client.submit(HttpRequest::get(self.inner.url.as_str())).await;
        self.inner.complete(result);
        self.settled()
    }

    fn settled(&self) -> Result<Arc<T>, RemoteError> {
        match &self.inner.lock().state {
            PromiseState::Delivered(value) => Ok(Arc::clone(value)),
            PromiseState::Failed(err) => Err(err.clone()),
            PromiseState::Unresolved | PromiseState::Resolving => Err(RemoteError::NotDelivered {
                url: self.inner.url.to_string(),
            }),
        }
    }

    /// Returns the delivered value without fetching.
    #[must_use]
    pub fn value(&self) -> Option<Arc<T>> {
        match &self.inner.lock().state {
            PromiseState::Delivered(value) => Some(Arc::clone(value)),
            _ => None,
        }
    }

    /// Returns where this promise is in its lifecycle.
    #[must_use]
    pub fn status(&self) -> PromiseStatus {
        match self.inner.lock().state {
            PromiseState::Unresolved => PromiseStatus::Unresolved,
            PromiseState::Resolving => PromiseStatus::Resolving,
            PromiseState::Delivered(_) => PromiseStatus::Delivered,
            PromiseState::Failed(_) => PromiseStatus::Failed,
        }
    }

    /// Returns `true` once the resource has been delivered.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.status() == PromiseStatus::Delivered
    }

    /// Returns whether this promise may only be fetched in a batch.
    #[must_use]
    pub fn batch_requests(&self) -> bool {
        self.inner.lock().batch_requests
    }

    /// Returns the absolute URL of the resource.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.inner.url
    }
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Resource> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("type", &T::NAME)
            .field("url", &self.inner.url.as_str())
            .field("status", &self.status())
            .finish()
    }
}
