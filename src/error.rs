//! Error types for client configuration.
//!
//! This module contains the errors raised while building a
//! [`ClientConfig`](crate::ClientConfig). Errors raised while talking to the
//! API or decoding its payloads live next to the code that raises them, in
//! [`clients`](crate::clients) and [`remote`](crate::remote).
//!
//! # Example
//!
//! ```rust
//! use typepad::{ApiEndpoint, ConfigError};
//!
//! let result = ApiEndpoint::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidEndpoint { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The API endpoint is not an absolute `http` or `https` URL.
    #[error("Invalid API endpoint '{url}'. Expected an absolute URL such as 'https://api.typepad.com/'.")]
    InvalidEndpoint {
        /// The invalid endpoint that was provided.
        url: String,
    },

    /// A user agent prefix was given but is blank.
    #[error("User agent prefix cannot be empty. Omit it to use the default user agent.")]
    EmptyUserAgentPrefix,
}
