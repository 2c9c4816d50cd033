//! The generic remote object.
//!
//! A [`RemoteObject`] is an instance of some [`ObjectClass`]: a map from
//! attribute name to decoded [`FieldValue`], plus the URL it was fetched from
//! and a per-instance cache of followed links. Typed wrappers in
//! [`api`](crate::api) dereference to it.
//!
//! # Reclassification
//!
//! Payloads announce their concrete type in `objectTypes`. When
//! [`update_from_dict`](RemoteObject::update_from_dict) sees a tag for a more
//! specific class than the one being decoded, the object is rebuilt as that
//! class and decoding starts over, so an `Asset` link that answers with a
//! `Post` decodes every `Post` field.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use url::Url;

use crate::clients::{BatchClient, Transport};
use crate::remote::class::ObjectClass;
use crate::remote::errors::{DecodeError, RemoteError};
use crate::remote::fields::{FieldKind, FieldValue};
use crate::remote::link::LinkSet;
use crate::remote::list::ListObject;
use crate::remote::naming::url_id_suffix;
use crate::remote::promise::Promise;
use crate::remote::registry;
use crate::remote::resource::Resource;

/// Wire key of the discriminator list.
pub const OBJECT_TYPES_KEY: &str = "objectTypes";

type LinkCache = Mutex<HashMap<&'static str, Box<dyn Any + Send + Sync>>>;

/// An instance of a remote object class.
pub struct RemoteObject {
    class: &'static ObjectClass,
    values: BTreeMap<&'static str, FieldValue>,
    location: Option<Url>,
    delivered: bool,
    links: LinkCache,
}

// Verify RemoteObject is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RemoteObject>();
};

impl RemoteObject {
    /// Creates an empty, undelivered instance of `class`.
    #[must_use]
    pub fn new(class: &'static ObjectClass) -> Self {
        Self {
            class,
            values: BTreeMap::new(),
            location: None,
            delivered: false,
            links: LinkCache::default(),
        }
    }

    /// Decodes an instance of `class` (or of a subclass named by the data's
    /// `objectTypes`) from a wire object.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] as [`update_from_dict`](Self::update_from_dict) does.
    ///
    /// # Example
    ///
    /// ```rust
    /// use typepad::api::ASSET;
    /// use typepad::remote::RemoteObject;
    /// use serde_json::json;
    ///
    /// let data = json!({
    ///     "objectTypes": ["tag:api.typepad.com,2009:Post"],
    ///     "title": "Hello",
    /// });
    /// let object = RemoteObject::from_dict(&ASSET, &data).unwrap();
    /// assert_eq!(object.class_name(), "Post");
    /// assert_eq!(object.string("title"), Some("Hello"));
    /// ```
    pub fn from_dict(class: &'static ObjectClass, data: &Value) -> Result<Self, DecodeError> {
        let mut object = Self::new(class);
        object.update_from_dict(data)?;
        Ok(object)
    }

    /// Fills this instance from a wire object.
    ///
    /// If the data's `objectTypes` name a more specific class, the instance
    /// is first rebuilt as that class. Each declared field present in `data`
    /// is decoded; absent fields keep their current value. If the instance
    /// has no location yet, the `href` of its `self` link is used.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotAnObject`] if `data` is not a JSON object,
    /// or the first field's [`DecodeError`] wrapped in
    /// [`DecodeError::Field`]. After an error the instance must not be
    /// relied upon.
    pub fn update_from_dict(&mut self, data: &Value) -> Result<(), DecodeError> {
        let map = data.as_object().ok_or(DecodeError::NotAnObject)?;

        if self.reclass_for_data(data) {
            return self.update_from_dict(data);
        }

        for field in self.class.all_fields() {
            if field.is_link() {
                continue;
            }
            let Some(raw) = map.get(field.wire_key()) else {
                continue;
            };
            match field.decode(raw).map_err(|err| err.in_field(field.name))? {
                Some(value) => {
                    self.values.insert(field.name, value);
                }
                None => {
                    self.values.remove(field.name);
                }
            }
        }

        if self.location.is_none() {
            self.location = self
                .links()
                .and_then(|links| links.by_rel("self"))
                .and_then(|link| link.href.as_deref())
                .and_then(|href| Url::parse(href).ok());
        }

        self.delivered = true;
        Ok(())
    }

    /// Rebuilds this instance as the class named by the data's `objectTypes`,
    /// if that differs from the current class.
    ///
    /// Tags are tried in order and the first one naming a registered class
    /// other than the current class or one of its ancestors wins. Once the
    /// current class is itself among the tags, only its subclasses can win,
    /// so repeated calls with the same data settle on one class. A missing or
    /// malformed `objectTypes` changes nothing.
    ///
    /// The rebuilt instance keeps the location; decoded values and followed
    /// links are discarded. Returns `true` if the class changed.
    pub fn reclass_for_data(&mut self, data: &Value) -> bool {
        let candidates: Vec<&'static ObjectClass> = data
            .get(OBJECT_TYPES_KEY)
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .filter_map(registry::class_for_tag)
                    .collect()
            })
            .unwrap_or_default();

        let current = self.class;
        let settled = candidates.iter().any(|class| *class == current);
        let winner = candidates.into_iter().find(|class| {
            !current.is_subclass_of(class) && (!settled || class.is_subclass_of(current))
        });

        let Some(winner) = winner else {
            return false;
        };

        tracing::debug!("Reclassifying {} as {}", current.name, winner.name);
        *self = Self {
            location: self.location.take(),
            ..Self::new(winner)
        };
        true
    }

    /// Encodes this instance as a wire object.
    ///
    /// Includes every set field under its wire key and, if no
    /// `objectTypes` was decoded, the class's discriminator tag.
    #[must_use]
    pub fn to_dict(&self) -> Value {
        let mut map = Map::new();
        for field in self.class.all_fields() {
            if let Some(value) = self.values.get(field.name) {
                map.insert(field.wire_key().to_string(), field.encode(value));
            }
        }
        if !map.contains_key(OBJECT_TYPES_KEY) {
            if let Some(tag) = self.class.effective_object_type() {
                map.insert(
                    OBJECT_TYPES_KEY.to_string(),
                    Value::Array(vec![Value::String(tag.to_string())]),
                );
            }
        }
        Value::Object(map)
    }

    /// Returns the class of this instance.
    #[must_use]
    pub const fn class(&self) -> &'static ObjectClass {
        self.class
    }

    /// Returns the name of this instance's class.
    #[must_use]
    pub const fn class_name(&self) -> &'static str {
        self.class.name
    }

    /// Returns the URL this instance lives at, if known.
    #[must_use]
    pub const fn location(&self) -> Option<&Url> {
        self.location.as_ref()
    }

    /// Sets the URL this instance lives at.
    pub fn set_location(&mut self, location: Url) {
        self.location = Some(location);
    }

    /// Returns `true` once data has been decoded into this instance.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        self.delivered
    }

    /// Returns the decoded value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Sets a declared field, returning the previous value.
    ///
    /// Returns `None` without storing anything if the class declares no
    /// such field.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Option<FieldValue> {
        let field = self.class.find_field(name).filter(|f| !f.is_link())?;
        self.values.insert(field.name, value.into())
    }

    /// Returns a string field.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    /// Returns an integer field.
    #[must_use]
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_i64)
    }

    /// Returns a boolean field.
    #[must_use]
    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_bool)
    }

    /// Returns a timestamp field.
    #[must_use]
    pub fn datetime(&self, name: &str) -> Option<DateTime<Utc>> {
        self.get(name).and_then(FieldValue::as_datetime)
    }

    /// Returns a nested object field.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&Self> {
        self.get(name).and_then(FieldValue::as_object)
    }

    /// Returns a list field; unset lists are empty.
    ///
    /// A list field that arrived as a paginated envelope has no plain items
    /// and yields nothing here; read it with [`objects`](Self::objects) or
    /// [`list_object`](Self::list_object).
    #[must_use]
    pub fn list(&self, name: &str) -> &[FieldValue] {
        self.get(name)
            .and_then(FieldValue::as_list)
            .unwrap_or_default()
    }

    /// Returns the string items of a list field.
    #[must_use]
    pub fn strings(&self, name: &str) -> Vec<&str> {
        self.list(name).iter().filter_map(FieldValue::as_str).collect()
    }

    /// Returns the nested objects of a list field, whether it arrived as a
    /// plain array or as a paginated envelope.
    #[must_use]
    pub fn objects(&self, name: &str) -> Vec<&Self> {
        match self.get(name) {
            Some(FieldValue::ListObject(list)) => list.iter().collect(),
            Some(value) => value
                .as_list()
                .unwrap_or_default()
                .iter()
                .filter_map(FieldValue::as_object)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Returns a nested list-resource field.
    #[must_use]
    pub fn list_object(&self, name: &str) -> Option<&ListObject> {
        self.get(name).and_then(FieldValue::as_list_object)
    }

    /// Returns the `links` field.
    #[must_use]
    pub fn links(&self) -> Option<&LinkSet> {
        self.get("links").and_then(FieldValue::as_links)
    }

    /// Returns the decoded `objectTypes` tags.
    #[must_use]
    pub fn object_types(&self) -> Vec<&str> {
        self.strings("object_types")
    }

    /// Returns the identifier used in this object's URLs.
    ///
    /// This is the `url_id` field when present, otherwise the part of the
    /// `id` field after its last `-`.
    #[must_use]
    pub fn url_id(&self) -> Option<&str> {
        self.string("url_id")
            .or_else(|| self.string("id").map(url_id_suffix))
    }

    /// Returns the canonical URL of this object, built from its class
    /// endpoint and URL identifier.
    #[must_use]
    pub fn make_self_link<C: Transport>(&self, client: &BatchClient<C>) -> Option<Url> {
        let path = self.class.path_for(self.url_id()?)?;
        client.resolve_url(&path).ok()
    }

    /// Returns the promise for a lazy link field.
    ///
    /// The first call computes the link's URL from this object and creates
    /// an unresolved promise. Later calls return the same promise, so the
    /// resource is fetched at most once until
    /// [`invalidate_link`](Self::invalidate_link) is called.
    ///
    /// # Errors
    ///
    /// - [`RemoteError::UnknownLink`] if the class has no link field `name`
    /// - [`RemoteError::LinkTypeMismatch`] if the link does not resolve to `T`
    /// - [`RemoteError::MissingLinkUrl`] if this object lacks the data the
    ///   link's URL is computed from
    /// - [`RemoteError::Http`] if the URL cannot be resolved
    pub fn link<T: Resource, C: Transport>(
        &self,
        name: &str,
        client: &BatchClient<C>,
    ) -> Result<Promise<T>, RemoteError> {
        let unknown = || RemoteError::UnknownLink {
            class: self.class.name,
            name: name.to_string(),
        };
        let field = self.class.find_field(name).ok_or_else(unknown)?;
        let FieldKind::Link { target, path } = field.kind else {
            return Err(unknown());
        };
        if !T::accepts(&target) {
            return Err(RemoteError::LinkTypeMismatch {
                class: self.class.name,
                name: field.name,
                requested: T::NAME,
            });
        }

        let mut cache = self.cache();
        if let Some(promise) = cache
            .get(field.name)
            .and_then(|cached| cached.downcast_ref::<Promise<T>>())
        {
            return Ok(promise.clone());
        }

        let url = path.url_for(self).ok_or(RemoteError::MissingLinkUrl {
            class: self.class.name,
            name: field.name,
        })?;
        let promise = Promise::<T>::get(client, &url)?;
        cache.insert(field.name, Box::new(promise.clone()));
        Ok(promise)
    }

    /// Forgets the cached promise for a link field, so the next
    /// [`link`](Self::link) call fetches it again. Returns `true` if a
    /// promise was cached.
    pub fn invalidate_link(&self, name: &str) -> bool {
        self.cache().remove(name).is_some()
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<&'static str, Box<dyn Any + Send + Sync>>> {
        self.links.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clone for RemoteObject {
    /// Clones the decoded state. Followed links are not shared with the copy.
    fn clone(&self) -> Self {
        Self {
            class: self.class,
            values: self.values.clone(),
            location: self.location.clone(),
            delivered: self.delivered,
            links: LinkCache::default(),
        }
    }
}

impl PartialEq for RemoteObject {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class
            && self.location == other.location
            && self.values == other.values
    }
}

impl fmt::Debug for RemoteObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteObject")
            .field("class", &self.class.name)
            .field("location", &self.location.as_ref().map(Url::as_str))
            .field("delivered", &self.delivered)
            .field("values", &self.values)
            .finish()
    }
}
