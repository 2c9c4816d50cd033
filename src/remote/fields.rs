//! Field descriptors and decoded field values.
//!
//! A [`Field`] is immutable metadata declared once on an
//! [`ObjectClass`](crate::remote::ObjectClass): the attribute name, the wire
//! key when it differs, and the [`FieldKind`] that says how to decode and
//! encode the value. Decoded values live on each
//! [`RemoteObject`](crate::remote::RemoteObject) as [`FieldValue`]s.
//!
//! # Example
//!
//! ```rust
//! use typepad::remote::{Element, Field};
//! use serde_json::json;
//!
//! const FIELDS: &[Field] = &[
//!     Field::scalar("display_name").api_name("displayName"),
//!     Field::datetime("published"),
//!     Field::list("categories", Element::Scalar),
//! ];
//!
//! let published = FIELDS[1].decode(&json!("2009-03-30T18:31:22Z")).unwrap().unwrap();
//! assert_eq!(FIELDS[1].encode(&published), json!("2009-03-30T18:31:22Z"));
//! assert_eq!(FIELDS[0].wire_key(), "displayName");
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::remote::errors::DecodeError;
use crate::remote::link::LinkSet;
use crate::remote::list::ListObject;
use crate::remote::object::RemoteObject;
use crate::remote::registry;

/// Canonical wire form of timestamps.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// The kind of an element inside a list or mapping field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Element {
    /// A JSON primitive kept as-is.
    Scalar,
    /// A timestamp string.
    Datetime,
    /// A nested object of the named class.
    Object(&'static str),
}

/// What a lazy link resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkTarget {
    /// A single object of the named class.
    Object(&'static str),
    /// A list resource whose entries are of the named class.
    List(&'static str),
}

impl LinkTarget {
    /// Returns the name of the target class (the entry class for lists).
    #[must_use]
    pub const fn class_name(&self) -> &'static str {
        match self {
            Self::Object(name) | Self::List(name) => *name,
        }
    }
}

/// How a lazy link computes its URL from the owning object.
#[derive(Clone, Copy)]
pub enum LinkPath {
    /// A child resource of the owner: `…/owner.json` becomes
    /// `…/owner/<segment>.json`.
    Child(&'static str),
    /// A resource addressed by the owner's URL identifier:
    /// `/<collection>/<url_id>/<segment>.json`.
    UrlId {
        /// The collection the owner lives in, such as `users`.
        collection: &'static str,
        /// The path below the owner, such as `events` or `assets/@post`.
        segment: &'static str,
    },
    /// A URL computed by an arbitrary function of the owner.
    Custom(fn(&RemoteObject) -> Option<String>),
}

impl LinkPath {
    /// Computes the link URL for `owner`, or `None` if the owner lacks the
    /// location or identifier the rule needs.
    ///
    /// `UrlId` rules yield endpoint-relative URLs.
    #[must_use]
    pub fn url_for(&self, owner: &RemoteObject) -> Option<String> {
        match self {
            Self::Child(segment) => {
                let mut url = owner.location()?.clone();
                let stem = url.path().strip_suffix(".json")?.to_string();
                url.set_path(&format!("{stem}/{segment}.json"));
                url.set_query(None);
                Some(url.into())
            }
            Self::UrlId {
                collection,
                segment,
            } => owner
                .url_id()
                .map(|url_id| format!("/{collection}/{url_id}/{segment}.json")),
            Self::Custom(rule) => rule(owner),
        }
    }
}

impl fmt::Debug for LinkPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Child(segment) => f.debug_tuple("Child").field(segment).finish(),
            Self::UrlId {
                collection,
                segment,
            } => f
                .debug_struct("UrlId")
                .field("collection", collection)
                .field("segment", segment)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// The semantic kind of a field.
#[derive(Clone, Copy, Debug)]
pub enum FieldKind {
    /// A JSON primitive.
    Scalar,
    /// A timestamp string.
    Datetime,
    /// A nested object of the named class.
    Object(&'static str),
    /// A sequence of elements.
    ///
    /// A paginated-list envelope found where an object list was expected
    /// decodes to a [`ListObject`].
    List(Element),
    /// A string-keyed mapping of elements, in wire order.
    Dict(Element),
    /// A `links` array.
    LinkSet,
    /// A nested paginated-list envelope whose entries are of the named class.
    ListOf(&'static str),
    /// A lazily fetched related resource. Never present on the wire.
    Link {
        /// What the link resolves to.
        target: LinkTarget,
        /// How its URL is computed.
        path: LinkPath,
    },
}

/// A field declared on an object class.
#[derive(Clone, Copy, Debug)]
pub struct Field {
    /// The attribute name.
    pub name: &'static str,
    /// The wire key, when it differs from the attribute name.
    pub api_name: Option<&'static str>,
    /// How the field is decoded and encoded.
    pub kind: FieldKind,
}

impl Field {
    /// Creates a field of the given kind.
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            api_name: None,
            kind,
        }
    }

    /// A scalar field.
    #[must_use]
    pub const fn scalar(name: &'static str) -> Self {
        Self::new(name, FieldKind::Scalar)
    }

    /// A timestamp field.
    #[must_use]
    pub const fn datetime(name: &'static str) -> Self {
        Self::new(name, FieldKind::Datetime)
    }

    /// A nested object field.
    #[must_use]
    pub const fn object(name: &'static str, class: &'static str) -> Self {
        Self::new(name, FieldKind::Object(class))
    }

    /// A list field.
    #[must_use]
    pub const fn list(name: &'static str, element: Element) -> Self {
        Self::new(name, FieldKind::List(element))
    }

    /// A mapping field.
    #[must_use]
    pub const fn dict(name: &'static str, element: Element) -> Self {
        Self::new(name, FieldKind::Dict(element))
    }

    /// A `links` field.
    #[must_use]
    pub const fn links(name: &'static str) -> Self {
        Self::new(name, FieldKind::LinkSet)
    }

    /// A nested list-resource field.
    #[must_use]
    pub const fn list_of(name: &'static str, class: &'static str) -> Self {
        Self::new(name, FieldKind::ListOf(class))
    }

    /// A lazy link field.
    #[must_use]
    pub const fn link(name: &'static str, target: LinkTarget, path: LinkPath) -> Self {
        Self::new(name, FieldKind::Link { target, path })
    }

    /// Sets the wire key.
    #[must_use]
    pub const fn api_name(mut self, api_name: &'static str) -> Self {
        self.api_name = Some(api_name);
        self
    }

    /// Returns the key this field is read from and written to on the wire.
    #[must_use]
    pub fn wire_key(&self) -> &'static str {
        self.api_name.unwrap_or(self.name)
    }

    /// Returns `true` for lazy link fields.
    #[must_use]
    pub const fn is_link(&self) -> bool {
        matches!(self.kind, FieldKind::Link { .. })
    }

    /// Decodes a raw wire value.
    ///
    /// `Ok(None)` means the field is unset: `null` for anything but a list,
    /// and always for link fields. A `null` list decodes to an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the value does not fit the field's kind.
    pub fn decode(&self, raw: &Value) -> Result<Option<FieldValue>, DecodeError> {
        match self.kind {
            FieldKind::Link { .. } => Ok(None),
            FieldKind::List(_) if raw.is_null() => Ok(Some(FieldValue::List(Vec::new()))),
            _ if raw.is_null() => Ok(None),
            FieldKind::Scalar => decode_element(Element::Scalar, raw).map(Some),
            FieldKind::Datetime => decode_element(Element::Datetime, raw).map(Some),
            FieldKind::Object(class) => decode_element(Element::Object(class), raw).map(Some),
            FieldKind::List(element) => decode_list(element, raw).map(Some),
            FieldKind::Dict(element) => {
                let map = raw.as_object().ok_or(DecodeError::NotAnObject)?;
                let mut entries = Vec::with_capacity(map.len());
                for (key, value) in map {
                    entries.push((key.clone(), decode_element(element, value)?));
                }
                Ok(Some(FieldValue::Dict(entries)))
            }
            FieldKind::LinkSet => LinkSet::from_value(raw).map(|links| Some(FieldValue::LinkSet(links))),
            FieldKind::ListOf(class) => {
                let list = ListObject::from_dict(registry::resolve(class)?, raw)?;
                Ok(Some(FieldValue::ListObject(Box::new(list))))
            }
        }
    }

    /// Encodes a decoded value back to its wire form.
    #[must_use]
    pub fn encode(&self, value: &FieldValue) -> Value {
        value.to_value()
    }
}

fn decode_list(element: Element, raw: &Value) -> Result<FieldValue, DecodeError> {
    match raw {
        Value::Array(items) => items
            .iter()
            .map(|item| decode_element(element, item))
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::List),
        Value::Object(map) if is_list_envelope(map) => match element {
            Element::Object(class) => {
                let list = ListObject::from_dict(registry::resolve(class)?, raw)?;
                Ok(FieldValue::ListObject(Box::new(list)))
            }
            Element::Scalar | Element::Datetime => Err(DecodeError::NotAList),
        },
        _ => Err(DecodeError::NotAList),
    }
}

fn decode_element(element: Element, raw: &Value) -> Result<FieldValue, DecodeError> {
    match element {
        Element::Scalar => match raw {
            Value::Array(_) | Value::Object(_) => Err(DecodeError::NotScalar),
            _ => Ok(FieldValue::Scalar(raw.clone())),
        },
        Element::Datetime => raw
            .as_str()
            .and_then(parse_datetime)
            .map(FieldValue::Datetime)
            .ok_or_else(|| DecodeError::InvalidDatetime {
                value: raw.as_str().map_or_else(|| raw.to_string(), str::to_string),
            }),
        Element::Object(class) => {
            if !raw.is_object() {
                return Err(DecodeError::NotAnObject);
            }
            let object = RemoteObject::from_dict(registry::resolve(class)?, raw)?;
            Ok(FieldValue::Object(Box::new(object)))
        }
    }
}

/// Returns `true` if `map` looks like a paginated-list envelope.
pub(crate) fn is_list_envelope(map: &Map<String, Value>) -> bool {
    ["entries", "totalResults", "startIndex"]
        .iter()
        .any(|key| map.contains_key(*key))
}

/// Parses an ISO-8601 timestamp.
///
/// Timestamps without an offset are taken to be UTC.
#[must_use]
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// A decoded field value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// A JSON primitive.
    Scalar(Value),
    /// A point in time.
    Datetime(DateTime<Utc>),
    /// A nested object.
    Object(Box<RemoteObject>),
    /// A sequence of values.
    List(Vec<FieldValue>),
    /// A mapping of values in wire order.
    Dict(Vec<(String, FieldValue)>),
    /// A set of links.
    LinkSet(LinkSet),
    /// A nested list resource.
    ListObject(Box<ListObject>),
}

impl FieldValue {
    /// Encodes the value to its wire form.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::Datetime(value) => Value::String(value.format(DATETIME_FORMAT).to_string()),
            Self::Object(object) => object.to_dict(),
            Self::List(items) => Value::Array(items.iter().map(Self::to_value).collect()),
            Self::Dict(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_value()))
                    .collect(),
            ),
            Self::LinkSet(links) => links.to_value(),
            Self::ListObject(list) => list.to_dict(),
        }
    }

    /// Returns the value as a string slice, if it is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => value.as_str(),
            _ => None,
        }
    }

    /// Returns the value as an integer, if it is an integer scalar.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(value) => value.as_i64(),
            _ => None,
        }
    }

    /// Returns the value as a boolean, if it is a boolean scalar.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(value) => value.as_bool(),
            _ => None,
        }
    }

    /// Returns the value as a timestamp.
    #[must_use]
    pub const fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Datetime(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the nested object.
    #[must_use]
    pub fn as_object(&self) -> Option<&RemoteObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the list items.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the link set.
    #[must_use]
    pub const fn as_links(&self) -> Option<&LinkSet> {
        match self {
            Self::LinkSet(links) => Some(links),
            _ => None,
        }
    }

    /// Returns the nested list resource.
    #[must_use]
    pub fn as_list_object(&self) -> Option<&ListObject> {
        match self {
            Self::ListObject(list) => Some(list),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Scalar(Value::String(value.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Scalar(Value::String(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Scalar(Value::Bool(value))
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Datetime(value)
    }
}

impl From<LinkSet> for FieldValue {
    fn from(value: LinkSet) -> Self {
        Self::LinkSet(value)
    }
}

impl From<RemoteObject> for FieldValue {
    fn from(value: RemoteObject) -> Self {
        Self::Object(Box::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_keeps_primitives_and_rejects_containers() {
        let field = Field::scalar("title");
        assert_eq!(
            field.decode(&json!("Hi")).unwrap(),
            Some(FieldValue::from("Hi"))
        );
        assert_eq!(
            field.decode(&json!(3)).unwrap(),
            Some(FieldValue::Scalar(json!(3)))
        );
        assert_eq!(field.decode(&json!([1])), Err(DecodeError::NotScalar));
        assert_eq!(field.decode(&json!({"a": 1})), Err(DecodeError::NotScalar));
        assert_eq!(field.decode(&Value::Null).unwrap(), None);
    }

    #[test]
    fn test_datetime_round_trip() {
        let field = Field::datetime("published");
        let decoded = field.decode(&json!("2009-03-30T18:31:22Z")).unwrap().unwrap();
        assert_eq!(
            decoded.as_datetime().unwrap(),
            Utc.with_ymd_and_hms(2009, 3, 30, 18, 31, 22).unwrap()
        );
        assert_eq!(field.encode(&decoded), json!("2009-03-30T18:31:22Z"));
    }

    #[test]
    fn test_datetime_accepts_offsets_and_naive_forms() {
        let with_offset = parse_datetime("2009-03-30T20:31:22+02:00").unwrap();
        let naive = parse_datetime("2009-03-30T18:31:22").unwrap();
        assert_eq!(with_offset, naive);
    }

    #[test]
    fn test_datetime_rejects_garbage() {
        let field = Field::datetime("updated");
        assert_eq!(
            field.decode(&json!("last tuesday")),
            Err(DecodeError::InvalidDatetime {
                value: "last tuesday".to_string()
            })
        );
        assert!(matches!(
            field.decode(&json!(12)),
            Err(DecodeError::InvalidDatetime { .. })
        ));
    }

    #[test]
    fn test_null_list_decodes_to_empty() {
        let field = Field::list("categories", Element::Scalar);
        assert_eq!(
            field.decode(&Value::Null).unwrap(),
            Some(FieldValue::List(Vec::new()))
        );
        assert_eq!(field.decode(&json!("x")), Err(DecodeError::NotAList));
    }

    #[test]
    fn test_list_preserves_order() {
        let field = Field::list("categories", Element::Scalar);
        let decoded = field.decode(&json!(["b", "a", "c"])).unwrap().unwrap();
        assert_eq!(field.encode(&decoded), json!(["b", "a", "c"]));
    }

    #[test]
    fn test_dict_preserves_key_order() {
        let field = Field::dict("counts", Element::Scalar);
        let decoded = field
            .decode(&json!({"zebra": 1, "apple": 2, "mango": 3}))
            .unwrap()
            .unwrap();
        let encoded = field.encode(&decoded);
        let keys: Vec<&String> = encoded.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_link_fields_are_never_decoded() {
        let field = Field::link(
            "events",
            LinkTarget::List("Event"),
            LinkPath::Child("events"),
        );
        assert!(field.is_link());
        assert_eq!(field.decode(&json!({"entries": []})).unwrap(), None);
    }

    #[test]
    fn test_wire_key_defaults_to_name() {
        assert_eq!(Field::scalar("title").wire_key(), "title");
        assert_eq!(
            Field::scalar("url_id").api_name("urlId").wire_key(),
            "urlId"
        );
    }
}
