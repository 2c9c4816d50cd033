//! Transport-level error types for the TypePad API client.
//!
//! # Error Handling
//!
//! - [`HttpError`]: A request could not be sent or its URL could not be resolved
//! - [`BatchError`]: The batch lifecycle was used out of order
//!
//! Non-2xx responses are not errors at this layer. They are returned as an
//! [`HttpResponse`](crate::clients::HttpResponse) and interpreted by the
//! caller, which knows which URL it asked for.
//!
//! # Example
//!
//! ```rust,ignore
//! use typepad::clients::{BatchClient, BatchError};
//!
//! match client.batch(request, callback) {
//!     Ok(()) => {}
//!     Err(BatchError::NoOpenBatch) => println!("open a batch first"),
//!     Err(e) => println!("batch error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Unified error type for failures below the HTTP status line.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request URL could not be resolved against the endpoint.
    #[error("Invalid request URL '{url}'")]
    InvalidUrl {
        /// The URL that could not be resolved.
        url: String,
    },
}

/// Errors raised by the batch lifecycle of a [`BatchClient`](crate::clients::BatchClient).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BatchError {
    /// A request was registered, or a batch completed, while no batch was open.
    #[error("No batch request is open. Call batch_request() before registering requests.")]
    NoOpenBatch,

    /// A batch was opened while another one was still open.
    #[error("A batch request is already open. Complete it before opening another.")]
    BatchAlreadyOpen,
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpError>();
    assert_send_sync::<BatchError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_error_includes_url() {
        let error = HttpError::InvalidUrl {
            url: "http://[::1".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid request URL 'http://[::1'");
    }

    #[test]
    fn test_batch_error_messages() {
        assert!(BatchError::NoOpenBatch
            .to_string()
            .contains("No batch request is open"));
        assert!(BatchError::BatchAlreadyOpen
            .to_string()
            .contains("already open"));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let http_error: &dyn std::error::Error = &HttpError::InvalidUrl { url: String::new() };
        let _ = http_error;

        let batch_error: &dyn std::error::Error = &BatchError::NoOpenBatch;
        let _ = batch_error;
    }
}
