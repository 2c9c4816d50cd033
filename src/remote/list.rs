//! Paginated list resources.
//!
//! The API returns collections as an envelope:
//!
//! ```json
//! {"totalResults": 120, "startIndex": 1, "links": [...], "entries": [...]}
//! ```
//!
//! [`ListObject`] decodes that envelope for a given entry class, reclassifying
//! each entry on its own. [`ListOf`] is the typed view a
//! [`Promise`] resolves to; promises for lists can be narrowed with
//! [`filter`](Promise::filter) and [`slice`](Promise::slice) before anything
//! is fetched.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Bound, RangeBounds};

use serde_json::{Map, Value};
use url::Url;

use crate::clients::{BatchClient, Transport};
use crate::remote::class::ObjectClass;
use crate::remote::errors::{DecodeError, RemoteError};
use crate::remote::fields::LinkTarget;
use crate::remote::filter::{self, FilterValue};
use crate::remote::link::LinkSet;
use crate::remote::object::RemoteObject;
use crate::remote::promise::Promise;
use crate::remote::registry;
use crate::remote::resource::{RemoteType, Resource};

/// A decoded list envelope.
#[derive(Clone, Debug, PartialEq)]
pub struct ListObject {
    entry_class: &'static ObjectClass,
    location: Option<Url>,
    total_results: Option<u64>,
    start_index: Option<u64>,
    links: LinkSet,
    entries: Vec<RemoteObject>,
}

impl ListObject {
    /// Creates an empty list of `entry_class`.
    #[must_use]
    pub const fn new(entry_class: &'static ObjectClass) -> Self {
        Self {
            entry_class,
            location: None,
            total_results: None,
            start_index: None,
            links: LinkSet::new(),
            entries: Vec::new(),
        }
    }

    /// Decodes a list envelope whose entries are of `entry_class` or its
    /// subclasses.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotAnObject`] if `data` is not an object, or a
    /// [`DecodeError::Field`] naming the member that failed.
    pub fn from_dict(entry_class: &'static ObjectClass, data: &Value) -> Result<Self, DecodeError> {
        let map = data.as_object().ok_or(DecodeError::NotAnObject)?;
        let mut list = Self::new(entry_class);

        list.total_results = decode_count(map.get("totalResults"))
            .map_err(|err| err.in_field("total_results"))?;
        list.start_index =
            decode_count(map.get("startIndex")).map_err(|err| err.in_field("start_index"))?;
        if let Some(links) = map.get("links") {
            list.links = LinkSet::from_value(links).map_err(|err| err.in_field("links"))?;
        }
        list.entries = match map.get("entries") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| RemoteObject::from_dict(entry_class, item))
                .collect::<Result<_, _>>()
                .map_err(|err| err.in_field("entries"))?,
            Some(_) => return Err(DecodeError::NotAList.in_field("entries")),
        };

        list.location = list
            .links
            .by_rel("self")
            .and_then(|link| link.href.as_deref())
            .and_then(|href| Url::parse(href).ok());
        Ok(list)
    }

    /// Encodes the envelope.
    #[must_use]
    pub fn to_dict(&self) -> Value {
        let mut map = Map::new();
        if let Some(total) = self.total_results {
            map.insert("totalResults".to_string(), Value::from(total));
        }
        if let Some(start) = self.start_index {
            map.insert("startIndex".to_string(), Value::from(start));
        }
        if !self.links.is_empty() {
            map.insert("links".to_string(), self.links.to_value());
        }
        map.insert(
            "entries".to_string(),
            Value::Array(self.entries.iter().map(RemoteObject::to_dict).collect()),
        );
        Value::Object(map)
    }

    /// Returns the number of entries on the server, falling back to the
    /// number decoded when the envelope has no total.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.total_results
            .unwrap_or_else(|| u64::try_from(self.entries.len()).unwrap_or(u64::MAX))
    }

    /// Returns the number of decoded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the decoded entries.
    #[must_use]
    pub fn entries(&self) -> &[RemoteObject] {
        &self.entries
    }

    /// Returns the entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RemoteObject> {
        self.entries.get(index)
    }

    /// Iterates over the decoded entries.
    pub fn iter(&self) -> std::slice::Iter<'_, RemoteObject> {
        self.entries.iter()
    }

    /// Returns `true` if an equal entry was decoded.
    #[must_use]
    pub fn contains(&self, entry: &RemoteObject) -> bool {
        self.entries.contains(entry)
    }

    /// Returns the envelope's links.
    #[must_use]
    pub const fn links(&self) -> &LinkSet {
        &self.links
    }

    /// Returns the server's total, if given.
    #[must_use]
    pub const fn total_results(&self) -> Option<u64> {
        self.total_results
    }

    /// Returns the server's start index, if given.
    #[must_use]
    pub const fn start_index(&self) -> Option<u64> {
        self.start_index
    }

    /// Returns the URL the list was fetched from.
    #[must_use]
    pub const fn location(&self) -> Option<&Url> {
        self.location.as_ref()
    }

    /// Sets the URL the list was fetched from.
    pub fn set_location(&mut self, location: Url) {
        self.location = Some(location);
    }

    /// Returns the declared entry class.
    #[must_use]
    pub const fn entry_class(&self) -> &'static ObjectClass {
        self.entry_class
    }
}

impl<'a> IntoIterator for &'a ListObject {
    type Item = &'a RemoteObject;
    type IntoIter = std::slice::Iter<'a, RemoteObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Counts arrive as numbers or numeric strings.
fn decode_count(raw: Option<&Value>) -> Result<Option<u64>, DecodeError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number.as_u64().map(Some).ok_or(DecodeError::NotScalar),
        Some(Value::String(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| DecodeError::NotScalar),
        Some(_) => Err(DecodeError::NotScalar),
    }
}

/// A list whose entries are viewed as `T`.
pub struct ListOf<T> {
    list: ListObject,
    marker: PhantomData<fn() -> T>,
}

impl<T: RemoteType> ListOf<T> {
    /// Wraps a decoded list.
    #[must_use]
    pub const fn new(list: ListObject) -> Self {
        Self {
            list,
            marker: PhantomData,
        }
    }

    /// Returns the number of entries on the server.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.list.count()
    }

    /// Returns the number of decoded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if no entries were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.list.get(index).cloned().map(T::from)
    }

    /// Iterates over the entries, front to back or back to front.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = T> + ExactSizeIterator + '_ {
        self.list.iter().cloned().map(T::from)
    }

    /// Returns `true` if an equal entry was decoded.
    #[must_use]
    pub fn contains(&self, entry: &T) -> bool {
        self.list.contains(entry.as_ref())
    }

    /// Returns the untyped entries.
    #[must_use]
    pub fn entries(&self) -> &[RemoteObject] {
        self.list.entries()
    }

    /// Returns the underlying envelope.
    #[must_use]
    pub const fn as_list(&self) -> &ListObject {
        &self.list
    }

    /// Returns the decoded entries within `range`, without fetching.
    ///
    /// Bounds past the end are clamped. The result carries no envelope
    /// members, so its [`count`](Self::count) is its length.
    #[must_use]
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Self {
        let (start, stop) = bounds(&range);
        self.sub_list(start, stop)
    }

    fn sub_list(&self, start: Option<usize>, stop: Option<usize>) -> Self {
        let entries = self.list.entries();
        let start = start.unwrap_or(0).min(entries.len());
        let stop = stop.unwrap_or(entries.len()).clamp(start, entries.len());

        let mut list = ListObject::new(self.list.entry_class());
        list.entries = entries[start..stop].to_vec();
        Self::new(list)
    }
}

/// Converts a range into an inclusive start and an exclusive stop.
fn bounds(range: &impl RangeBounds<usize>) -> (Option<usize>, Option<usize>) {
    let start = match range.start_bound() {
        Bound::Included(&start) => Some(start),
        Bound::Excluded(&start) => Some(start.saturating_add(1)),
        Bound::Unbounded => None,
    };
    let stop = match range.end_bound() {
        Bound::Included(&end) => Some(end.saturating_add(1)),
        Bound::Excluded(&end) => Some(end),
        Bound::Unbounded => None,
    };
    (start, stop)
}

impl<T: RemoteType> Resource for ListOf<T> {
    const NAME: &'static str = "List";

    fn batch_requests() -> bool {
        T::batch_requests()
    }

    fn accepts(target: &LinkTarget) -> bool {
        match target {
            LinkTarget::List(name) => {
                registry::class_named(name).is_some_and(|class| class.is_subclass_of(T::class()))
            }
            LinkTarget::Object(_) => false,
        }
    }

    fn decode(data: &Value, location: Option<Url>) -> Result<Self, DecodeError> {
        let mut list = ListObject::from_dict(T::class(), data)?;
        if let Some(location) = location {
            list.set_location(location);
        }
        Ok(Self::new(list))
    }
}

impl<T: RemoteType> IntoIterator for ListOf<T> {
    type Item = T;
    type IntoIter = std::iter::Map<std::vec::IntoIter<RemoteObject>, fn(RemoteObject) -> T>;

    fn into_iter(self) -> Self::IntoIter {
        self.list
            .entries
            .into_iter()
            .map(<T as From<RemoteObject>>::from as fn(RemoteObject) -> T)
    }
}

impl<T> Clone for ListOf<T> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
            marker: PhantomData,
        }
    }
}

impl<T> PartialEq for ListOf<T> {
    fn eq(&self, other: &Self) -> bool {
        self.list == other.list
    }
}

impl<T> fmt::Debug for ListOf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ListOf").field(&self.list).finish()
    }
}

impl<T: RemoteType> Promise<ListOf<T>> {
    /// Returns a promise for this list narrowed by `criteria`.
    ///
    /// The new promise keeps this one's batching policy. This promise is not
    /// changed. See [`filter::apply`] for how criteria map onto the URL.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Filter`] if the URL cannot be rewritten.
    pub fn filter<C: Transport>(
        &self,
        client: &BatchClient<C>,
        criteria: &[(&str, FilterValue)],
    ) -> Result<Self, RemoteError> {
        let url = filter::apply(self.url(), criteria)?;
        Self::get_with(client, url.as_str(), self.batch_requests())
    }

    /// Returns a promise for a sub-range of this list.
    ///
    /// If this list is already delivered, the sub-range is taken from its
    /// entries and the returned promise is delivered too. Otherwise the range
    /// is sent to the server: a start bound becomes `start-index`; with an
    /// end bound too, the range length becomes `max-results`. An end bound
    /// alone becomes `max-results`. This promise is not changed or queued.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Filter`] if the URL cannot be rewritten.
    pub fn slice<C: Transport>(
        &self,
        client: &BatchClient<C>,
        range: impl RangeBounds<usize>,
    ) -> Result<Self, RemoteError> {
        let (start, stop) = bounds(&range);

        let mut criteria = Vec::new();
        match (start, stop) {
            (Some(start), stop) => {
                criteria.push(("start_index", FilterValue::from(start)));
                if let Some(stop) = stop {
                    criteria.push(("max_results", FilterValue::from(stop.saturating_sub(start))));
                }
            }
            (None, Some(stop)) => criteria.push(("max_results", FilterValue::from(stop))),
            (None, None) => {}
        }

        if let Some(list) = self.value() {
            let url = filter::apply(self.url(), &criteria)?;
            tracing::debug!("Slicing delivered list {} locally", self.url());
            return Ok(Self::delivered(url, list.sub_list(start, stop)));
        }
        self.filter(client, &criteria)
    }

    /// Delivers the list and returns the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] if the list cannot be delivered.
    pub async fn entry<C: Transport>(
        &self,
        client: &BatchClient<C>,
        index: usize,
    ) -> Result<Option<T>, RemoteError> {
        Ok(self.deliver(client).await?.get(index))
    }

    /// Delivers the list and returns its server-side count.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] if the list cannot be delivered.
    pub async fn count<C: Transport>(&self, client: &BatchClient<C>) -> Result<u64, RemoteError> {
        Ok(self.deliver(client).await?.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Asset, ASSET, COMMENT, POST};
    use serde_json::json;

    fn envelope() -> Value {
        json!({
            "totalResults": "42",
            "startIndex": 1,
            "links": [{"rel": "self", "href": "https://api.typepad.com/groups/g1/assets.json"}],
            "entries": [
                {"objectTypes": ["tag:api.typepad.com,2009:Post"], "title": "A post"},
                {"objectTypes": ["tag:api.typepad.com,2009:Comment"], "content": "A comment"}
            ]
        })
    }

    #[test]
    fn test_entries_reclassify_individually() {
        let list = ListObject::from_dict(&ASSET, &envelope()).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0).unwrap().class(), &POST);
        assert_eq!(list.get(1).unwrap().class(), &COMMENT);
        assert_eq!(list.count(), 42);
        assert_eq!(list.start_index(), Some(1));
        assert_eq!(
            list.location().map(Url::as_str),
            Some("https://api.typepad.com/groups/g1/assets.json")
        );
    }

    #[test]
    fn test_count_falls_back_to_length() {
        let list = ListObject::from_dict(&ASSET, &json!({"entries": [{}, {}, {}]})).unwrap();
        assert_eq!(list.count(), 3);
        assert!(ListObject::from_dict(&ASSET, &json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_bad_members_name_the_member() {
        let err = ListObject::from_dict(&ASSET, &json!({"totalResults": "many"})).unwrap_err();
        assert!(matches!(err, DecodeError::Field { field: "total_results", .. }));

        let err = ListObject::from_dict(&ASSET, &json!({"entries": {"a": 1}})).unwrap_err();
        assert!(matches!(err, DecodeError::Field { field: "entries", .. }));
    }

    #[test]
    fn test_typed_view_iterates_both_ways() {
        let list: ListOf<Asset> = ListOf::decode(&envelope(), None).unwrap();
        let titles: Vec<&str> = list.entries().iter().map(RemoteObject::class_name).collect();
        assert_eq!(titles, ["Post", "Comment"]);

        let last = list.iter().next_back().unwrap();
        assert_eq!(last.as_ref().class(), &COMMENT);
        assert!(list.contains(&last));
        assert_eq!(list.into_iter().count(), 2);
    }

    #[test]
    fn test_list_links_accept_entry_subclasses() {
        assert!(ListOf::<Asset>::accepts(&LinkTarget::List("Post")));
        assert!(ListOf::<Asset>::accepts(&LinkTarget::List("Asset")));
        assert!(!ListOf::<Asset>::accepts(&LinkTarget::Object("Asset")));
        assert!(!ListOf::<Asset>::accepts(&LinkTarget::List("User")));
    }

    #[test]
    fn test_local_slice_clamps_to_entries() {
        let list: ListOf<Asset> = ListOf::decode(&envelope(), None).unwrap();

        let tail = list.slice(1..10);
        assert_eq!(tail.len(), 1);
        assert_eq!(tail.count(), 1);
        assert_eq!(tail.get(0).unwrap().as_ref().class(), &COMMENT);

        assert_eq!(list.slice(..).len(), 2);
        assert_eq!(list.slice(..=0).get(0).unwrap().as_ref().class(), &POST);
        assert!(list.slice(5..).is_empty());
    }

    #[test]
    fn test_round_trip_keeps_envelope_members() {
        let list = ListObject::from_dict(&ASSET, &envelope()).unwrap();
        let encoded = list.to_dict();
        assert_eq!(encoded["totalResults"], json!(42));
        assert_eq!(encoded["startIndex"], json!(1));
        assert_eq!(encoded["entries"][0]["title"], json!("A post"));
    }
}
