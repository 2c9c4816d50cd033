//! HTTP plumbing for TypePad API communication.
//!
//! This module carries requests from remote objects to the API. Promises
//! register their requests with a [`BatchClient`], which collects them while
//! a batch is open and hands them to a [`Transport`] when the batch is
//! completed.
//!
//! # Overview
//!
//! - [`BatchClient`]: Collects requests into batches and resolves URLs
//! - [`Transport`]: The seam between the client and the network
//! - [`HttpTransport`]: The `reqwest` transport used in production
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A response from the API
//!
//! # Example
//!
//! ```rust,ignore
//! use typepad::clients::{BatchClient, HttpRequest};
//! use typepad::ClientConfig;
//!
//! let client = BatchClient::new(ClientConfig::default())?;
//!
//! client.batch_request()?;
//! client.batch(
//!     HttpRequest::get("https://api.typepad.com/users/@self.json"),
//!     Box::new(|result| println!("{:?}", result.map(|response| response.code))),
//! )?;
//! let delivered = client.complete_batch().await?;
//! ```

mod batch;
mod errors;
mod http_request;
mod http_response;
mod transport;

pub use batch::{BatchCallback, BatchClient};
pub use errors::{BatchError, HttpError};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use transport::{HttpTransport, Transport, SDK_VERSION};
