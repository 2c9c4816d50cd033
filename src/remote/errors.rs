//! Error types for remote objects.
//!
//! # Error Handling
//!
//! - [`DecodeError`]: A wire value could not be converted to its declared kind
//! - [`FilterError`]: A list URL could not be rewritten with filters
//! - [`LinkSetError`]: A link-set lookup key matched nothing or was malformed
//! - [`RemoteError`]: The error of every operation that talks to the API
//!
//! [`RemoteError`] is `Clone` so that a failed [`Promise`](crate::remote::Promise)
//! can hand back the same failure every time it is asked.
//!
//! # Example
//!
//! ```rust,ignore
//! use typepad::remote::RemoteError;
//!
//! match user.deliver(&client).await {
//!     Ok(user) => println!("Hello {:?}", user.display_name()),
//!     Err(RemoteError::BatchRequired { type_name, url }) => {
//!         println!("{type_name} at {url} must be fetched in a batch");
//!     }
//!     Err(RemoteError::Status { code: 404, url }) => println!("{url} is gone"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::clients::{BatchError, HttpError};

/// A wire value could not be decoded into its declared kind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A JSON object was expected.
    #[error("expected a JSON object")]
    NotAnObject,

    /// A JSON array was expected.
    #[error("expected a JSON array")]
    NotAList,

    /// A JSON primitive was expected but an array or object was found.
    #[error("expected a JSON primitive")]
    NotScalar,

    /// A timestamp string could not be parsed.
    #[error("invalid timestamp '{value}'")]
    InvalidDatetime {
        /// The unparseable value.
        value: String,
    },

    /// A field refers to a class that is not registered.
    #[error("unknown class '{name}'")]
    UnknownClass {
        /// The class name that could not be resolved.
        name: String,
    },

    /// The payload is not valid JSON for the expected shape.
    #[error("invalid JSON: {message}")]
    InvalidJson {
        /// Description of the parse failure.
        message: String,
    },

    /// Decoding a named field failed.
    #[error("field '{field}': {source}")]
    Field {
        /// The attribute name of the field.
        field: &'static str,
        /// The underlying failure.
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Wraps this error with the name of the field being decoded.
    #[must_use]
    pub fn in_field(self, field: &'static str) -> Self {
        Self::Field {
            field,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping field annotations.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidJson {
            message: err.to_string(),
        }
    }
}

/// A list URL could not be rewritten with filters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The list's URL does not name a `.json` resource.
    #[error("list location '{url}' does not end in '.json'")]
    MalformedLocation {
        /// The offending URL.
        url: String,
    },

    /// An object was given as a filter value but has no URL identifier.
    #[error("filter value for '{key}' must be an object with a url_id")]
    EntityWithoutUrlId {
        /// The filter key.
        key: String,
    },
}

/// A link-set lookup failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkSetError {
    /// No link has the requested relation.
    #[error("No such link '{rel}' in this set")]
    NoSuchLink {
        /// The requested relation.
        rel: String,
    },

    /// The lookup key is not understood.
    #[error("Invalid link-set key '{key}'")]
    InvalidKey {
        /// The malformed key.
        key: String,
    },
}

/// Error type for operations that reach the TypePad API.
#[derive(Debug, Error, Clone)]
pub enum RemoteError {
    /// A batch-only object was asked to deliver outside an open batch.
    #[error("Cannot deliver {type_name} {url} except by batch request")]
    BatchRequired {
        /// The type being delivered.
        type_name: &'static str,
        /// The object's URL.
        url: String,
    },

    /// The API answered with a non-2xx status.
    #[error("Request for {url} failed with status {code}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        code: u16,
    },

    /// The response could not be decoded.
    #[error("Could not decode response from {url}: {source}")]
    Decode {
        /// The requested URL.
        url: String,
        /// The decode failure.
        source: DecodeError,
    },

    /// The request could not be sent.
    #[error(transparent)]
    Http(Arc<HttpError>),

    /// The batch lifecycle was used out of order.
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// A list URL could not be filtered.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// The class declares no link field with that name.
    #[error("{class} has no link named '{name}'")]
    UnknownLink {
        /// The owning class.
        class: &'static str,
        /// The requested link name.
        name: String,
    },

    /// The link exists but resolves to a different type than requested.
    #[error("link '{name}' of {class} does not resolve to {requested}")]
    LinkTypeMismatch {
        /// The owning class.
        class: &'static str,
        /// The link name.
        name: &'static str,
        /// The requested type.
        requested: &'static str,
    },

    /// The owner lacks the data needed to compute the link's URL.
    #[error("cannot compute URL for link '{name}' of {class}")]
    MissingLinkUrl {
        /// The owning class.
        class: &'static str,
        /// The link name.
        name: &'static str,
    },

    /// The class has no endpoint to address instances by URL identifier.
    #[error("{class} has no endpoint")]
    NoEndpoint {
        /// The class without an endpoint.
        class: &'static str,
    },

    /// The object is still waiting on a request that has not completed.
    #[error("{url} has not been delivered yet")]
    NotDelivered {
        /// The object's URL.
        url: String,
    },
}

impl From<HttpError> for RemoteError {
    fn from(err: HttpError) -> Self {
        Self::Http(Arc::new(err))
    }
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DecodeError>();
    assert_send_sync::<FilterError>();
    assert_send_sync::<LinkSetError>();
    assert_send_sync::<RemoteError>();
};
