//! Traits for types that can be fetched from the API.
//!
//! [`Resource`] is what a [`Promise`] needs from its target: a name for
//! errors, the batching policy, which link targets it can stand for, and how
//! to decode a response. [`RemoteType`] adds the operations shared by every
//! declared object type in [`api`](crate::api).
//!
//! # Example
//!
//! ```rust,ignore
//! use typepad::api::User;
//! use typepad::remote::RemoteType;
//!
//! client.batch_request()?;
//! let user = User::get_by_url_id(&client, "6p00e5")?;
//! user.register(&client)?;
//! client.complete_batch().await?;
//!
//! let user = user.deliver(&client).await?;
//! println!("{:?}", user.make_self_link(&client));
//! ```

use serde_json::Value;
use url::Url;

use crate::clients::{BatchClient, Transport};
use crate::remote::class::ObjectClass;
use crate::remote::errors::{DecodeError, RemoteError};
use crate::remote::fields::LinkTarget;
use crate::remote::object::RemoteObject;
use crate::remote::promise::Promise;
use crate::remote::registry;

/// A type a [`Promise`] can resolve to.
pub trait Resource: Sized + Send + Sync + 'static {
    /// The name used in error messages.
    const NAME: &'static str;

    /// Whether instances may only be fetched as part of a batch.
    fn batch_requests() -> bool;

    /// Returns `true` if a link declared with `target` may be followed as
    /// this type.
    fn accepts(target: &LinkTarget) -> bool;

    /// Decodes a response body fetched from `location`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the body does not fit this type.
    fn decode(data: &Value, location: Option<Url>) -> Result<Self, DecodeError>;
}

/// A declared object type of the API.
///
/// Implementors are thin wrappers around a [`RemoteObject`] of a fixed
/// [`ObjectClass`]. They are generated by the `remote_object!` macro in
/// [`api`](crate::api).
pub trait RemoteType: Resource + Clone + AsRef<RemoteObject> + From<RemoteObject> {
    /// Returns the class this type wraps.
    fn class() -> &'static ObjectClass;

    /// Returns a promise for the instance at `url`.
    ///
    /// Relative URLs are resolved against the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Http`] if the URL cannot be resolved.
    fn get<C: Transport>(client: &BatchClient<C>, url: &str) -> Result<Promise<Self>, RemoteError> {
        Promise::get(client, url)
    }

    /// Returns a promise for the instance with the given URL identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NoEndpoint`] if the class has no endpoint, or
    /// [`RemoteError::Http`] if the URL cannot be resolved.
    fn get_by_url_id<C: Transport>(
        client: &BatchClient<C>,
        url_id: &str,
    ) -> Result<Promise<Self>, RemoteError> {
        let class = Self::class();
        let path = class
            .path_for(url_id)
            .ok_or(RemoteError::NoEndpoint { class: class.name })?;
        Promise::get(client, &path)
    }

    /// Decodes an instance from a wire object.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the data does not fit the class.
    fn from_dict(data: &Value) -> Result<Self, DecodeError> {
        RemoteObject::from_dict(Self::class(), data).map(Self::from)
    }

    /// Encodes this instance as a wire object.
    fn to_dict(&self) -> Value {
        self.as_ref().to_dict()
    }

    /// Returns the canonical URL of this instance, if its class has an
    /// endpoint and the instance has a URL identifier.
    fn make_self_link<C: Transport>(&self, client: &BatchClient<C>) -> Option<Url> {
        self.as_ref().make_self_link(client)
    }
}

/// Returns `true` if a link to a single object of the target's class may be
/// followed as `class`.
///
/// The target class must be `class` or one of its subclasses.
#[must_use]
pub fn accepts_object(class: &'static ObjectClass, target: &LinkTarget) -> bool {
    match target {
        LinkTarget::Object(name) => {
            registry::class_named(name).is_some_and(|target| target.is_subclass_of(class))
        }
        LinkTarget::List(_) => false,
    }
}

/// Decodes an instance of `class` fetched from `location`.
///
/// # Errors
///
/// Returns [`DecodeError`] as [`RemoteObject::update_from_dict`] does.
pub fn decode_object(
    class: &'static ObjectClass,
    data: &Value,
    location: Option<Url>,
) -> Result<RemoteObject, DecodeError> {
    let mut object = RemoteObject::new(class);
    if let Some(location) = location {
        object.set_location(location);
    }
    object.update_from_dict(data)?;
    Ok(object)
}
