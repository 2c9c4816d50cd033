//! Validated newtype wrappers for configuration values.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use url::Url;

/// The validated base address of the API.
///
/// Every relative URL the client handles is resolved against this address
/// before submission. The endpoint always ends in `/` so that joining
/// `users/@self.json` keeps any path prefix of the endpoint.
///
/// # Example
///
/// ```rust
/// use typepad::ApiEndpoint;
///
/// let endpoint = ApiEndpoint::new("https://api.typepad.com").unwrap();
/// assert_eq!(endpoint.as_str(), "https://api.typepad.com/");
///
/// let url = endpoint.join("/users/@self.json").unwrap();
/// assert_eq!(url.as_str(), "https://api.typepad.com/users/@self.json");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiEndpoint(Url);

impl ApiEndpoint {
    /// The public TypePad API endpoint.
    pub const DEFAULT: &'static str = "https://api.typepad.com/";

    /// Creates a new validated endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] if the value is not an
    /// absolute `http` or `https` URL.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ConfigError> {
        let endpoint = endpoint.into();
        let trimmed = endpoint.trim();

        let mut url = Url::parse(trimmed).map_err(|_| ConfigError::InvalidEndpoint {
            url: endpoint.clone(),
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ConfigError::InvalidEndpoint { url: endpoint });
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self(url))
    }

    /// Returns the endpoint as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the endpoint as a parsed URL.
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }

    /// Resolves `url` against the endpoint.
    ///
    /// Absolute URLs are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] if `url` cannot be resolved.
    pub fn join(&self, url: &str) -> Result<Url, url::ParseError> {
        self.0.join(url)
    }
}

impl Default for ApiEndpoint {
    fn default() -> Self {
        Self(Url::parse(Self::DEFAULT).unwrap_or_else(|_| unreachable!()))
    }
}

impl AsRef<str> for ApiEndpoint {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ApiEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ApiEndpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiEndpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_trailing_slash() {
        let endpoint = ApiEndpoint::new("https://api.typepad.com/v1").unwrap();
        assert_eq!(endpoint.as_str(), "https://api.typepad.com/v1/");
    }

    #[test]
    fn test_endpoint_keeps_existing_trailing_slash() {
        let endpoint = ApiEndpoint::new("http://localhost:3000/").unwrap();
        assert_eq!(endpoint.as_str(), "http://localhost:3000/");
    }

    #[test]
    fn test_endpoint_rejects_relative_and_non_http() {
        assert!(ApiEndpoint::new("api.typepad.com").is_err());
        assert!(ApiEndpoint::new("ftp://api.typepad.com/").is_err());
        assert!(ApiEndpoint::new("").is_err());
    }

    #[test]
    fn test_join_resolves_relative_paths() {
        let endpoint = ApiEndpoint::new("https://api.typepad.com/").unwrap();
        let url = endpoint.join("groups/6p00e5/events.json").unwrap();
        assert_eq!(url.as_str(), "https://api.typepad.com/groups/6p00e5/events.json");
    }

    #[test]
    fn test_join_keeps_absolute_urls() {
        let endpoint = ApiEndpoint::default();
        let url = endpoint.join("http://example.com/x.json").unwrap();
        assert_eq!(url.as_str(), "http://example.com/x.json");
    }

    #[test]
    fn test_endpoint_serde_round_trip() {
        let endpoint = ApiEndpoint::new("https://api.typepad.com").unwrap();
        let json = serde_json::to_string(&endpoint).unwrap();
        assert_eq!(json, r#""https://api.typepad.com/""#);

        let parsed: ApiEndpoint = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, endpoint);

        let invalid: Result<ApiEndpoint, _> = serde_json::from_str(r#""nope""#);
        assert!(invalid.is_err());
    }
}
