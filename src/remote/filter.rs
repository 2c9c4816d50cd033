//! URL rewriting for list filters.
//!
//! The API expresses structural filters as `@name` path segments in a fixed
//! order (`/groups/7/events/@spam/@by-user/6p00e5.json`) and everything else
//! as query parameters. [`apply`] merges new criteria into a list URL under
//! those rules.
//!
//! # Example
//!
//! ```rust
//! use typepad::remote::filter::{apply, FilterValue};
//! use url::Url;
//!
//! let list = Url::parse("https://api.typepad.com/users/mel/events.json").unwrap();
//! let filtered = apply(
//!     &list,
//!     &[("by_group", FilterValue::from("7")), ("status", FilterValue::from("spam"))],
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     filtered.as_str(),
//!     "https://api.typepad.com/users/mel/events/@spam/@by-group/7.json"
//! );
//! ```

use std::collections::BTreeMap;

use url::Url;

use crate::remote::errors::FilterError;
use crate::remote::object::RemoteObject;

/// Structural filters in the order the API expects them in a path.
pub const FILTER_ORDER: &[&str] = &[
    "following",
    "follower",
    "friend",
    "nonreciprocal",
    "published",
    "unpublished",
    "spam",
    "admin",
    "member",
    "by-group",
    "by-user",
    "photo",
    "post",
    "video",
    "audio",
    "comment",
    "link",
];

/// Structural filters followed by a value segment.
pub const VALUED_FILTERS: &[&str] = &["by-group", "by-user"];

/// Keys that select one structural filter by value, such as `status=spam`.
const AXES: &[(&str, &[&str])] = &[
    ("relationship", &["following", "follower", "friend", "nonreciprocal"]),
    ("status", &["published", "unpublished", "spam"]),
    ("role", &["admin", "member"]),
    ("content", &["photo", "post", "video", "audio", "comment", "link"]),
];

/// A filter criterion value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterValue {
    /// A flag; `false` removes the filter.
    Flag(bool),
    /// A literal value; an empty string removes the filter.
    Text(String),
    /// An object, filtered by its URL identifier.
    Entity(Option<String>),
}

impl FilterValue {
    /// Filters by an object's URL identifier.
    #[must_use]
    pub fn entity(object: &impl AsRef<RemoteObject>) -> Self {
        Self::from(object.as_ref())
    }

    fn render(&self, key: &str) -> Result<Option<String>, FilterError> {
        match self {
            Self::Flag(true) => Ok(Some("true".to_string())),
            Self::Flag(false) => Ok(None),
            Self::Text(text) if text.is_empty() => Ok(None),
            Self::Text(text) => Ok(Some(text.clone())),
            Self::Entity(Some(url_id)) => Ok(Some(url_id.clone())),
            Self::Entity(None) => Err(FilterError::EntityWithoutUrlId {
                key: key.to_string(),
            }),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

macro_rules! filter_value_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    Self::Text(value.to_string())
                }
            }
        )*
    };
}

filter_value_from_integer!(i32, i64, u32, u64, usize);

impl From<&RemoteObject> for FilterValue {
    fn from(object: &RemoteObject) -> Self {
        Self::Entity(object.url_id().map(str::to_string))
    }
}

/// A list URL split into base path, structural filters and query.
struct ListPath {
    base: Vec<String>,
    filters: BTreeMap<usize, Option<String>>,
    query: Vec<(String, String)>,
}

impl ListPath {
    fn parse(location: &Url) -> Result<Self, FilterError> {
        let malformed = || FilterError::MalformedLocation {
            url: location.to_string(),
        };
        let stem = location.path().strip_suffix(".json").ok_or_else(malformed)?;

        let mut base = Vec::new();
        let mut filters = BTreeMap::new();
        let mut segments = stem.split('/');
        while let Some(segment) = segments.next() {
            let Some(index) = segment.strip_prefix('@').and_then(filter_index) else {
                base.push(segment.to_string());
                continue;
            };
            let value = if VALUED_FILTERS.contains(&FILTER_ORDER[index]) {
                Some(segments.next().ok_or_else(malformed)?.to_string())
            } else {
                None
            };
            filters.insert(index, value);
        }

        let mut query: Vec<(String, String)> = Vec::new();
        for (key, value) in location.query_pairs() {
            if !query.iter().any(|(existing, _)| *existing == key) {
                query.push((key.into_owned(), value.into_owned()));
            }
        }

        Ok(Self {
            base,
            filters,
            query,
        })
    }

    fn set(&mut self, key: &str, value: &FilterValue) -> Result<(), FilterError> {
        let key = key.replace('_', "-");
        let rendered = value.render(&key)?;

        if let Some(index) = filter_index(&key) {
            match rendered {
                None => {
                    self.filters.remove(&index);
                }
                Some(value) if VALUED_FILTERS.contains(&key.as_str()) => {
                    self.filters
                        .insert(index, Some(urlencoding::encode(&value).into_owned()));
                }
                Some(_) => {
                    self.filters.insert(index, None);
                }
            }
            return Ok(());
        }

        if let Some((_, members)) = AXES.iter().find(|(axis, _)| *axis == key) {
            match rendered.as_deref() {
                None => {
                    for member in *members {
                        if let Some(index) = filter_index(member) {
                            self.filters.remove(&index);
                        }
                    }
                    return Ok(());
                }
                Some(member) => {
                    if let Some(index) = filter_index(member).filter(|_| members.contains(&member))
                    {
                        self.filters.insert(index, None);
                        return Ok(());
                    }
                }
            }
        }

        self.set_query(key, rendered);
        Ok(())
    }

    fn set_query(&mut self, key: String, value: Option<String>) {
        let existing = self.query.iter().position(|(k, _)| *k == key);
        match (existing, value) {
            (Some(position), Some(value)) => self.query[position].1 = value,
            (Some(position), None) => {
                self.query.remove(position);
            }
            (None, Some(value)) => self.query.push((key, value)),
            (None, None) => {}
        }
    }

    fn path(&self) -> String {
        let mut segments = self.base.clone();
        for (index, value) in &self.filters {
            segments.push(format!("@{}", FILTER_ORDER[*index]));
            if let Some(value) = value {
                segments.push(value.clone());
            }
        }
        format!("{}.json", segments.join("/"))
    }
}

fn filter_index(name: &str) -> Option<usize> {
    FILTER_ORDER.iter().position(|filter| *filter == name)
}

/// Returns `location` with `criteria` applied.
///
/// Keys are normalized by replacing `_` with `-`. A key naming a structural
/// filter becomes an `@` path segment; `relationship`, `status`, `role` and
/// `content` select the structural filter named by their value; any other key
/// becomes a query parameter. Structural filters already in the URL are
/// kept, and all of them are written in [`FILTER_ORDER`].
///
/// # Errors
///
/// - [`FilterError::MalformedLocation`] if the URL path does not end in
///   `.json` or a valued filter lacks its value segment
/// - [`FilterError::EntityWithoutUrlId`] if an object value has no URL
///   identifier
pub fn apply(location: &Url, criteria: &[(&str, FilterValue)]) -> Result<Url, FilterError> {
    let mut parts = ListPath::parse(location)?;
    for (key, value) in criteria {
        parts.set(key, value)?;
    }

    let mut url = location.clone();
    url.set_path(&parts.path());
    if parts.query.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(&parts.query);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::USER;
    use serde_json::json;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_filters_follow_canonical_order() {
        let base = url("https://api.typepad.com/groups/g1/assets.json");
        let forward = apply(
            &base,
            &[("status", "spam".into()), ("by_group", "7".into())],
        )
        .unwrap();
        let backward = apply(
            &base,
            &[("by_group", "7".into()), ("status", "spam".into())],
        )
        .unwrap();

        assert_eq!(forward, backward);
        assert_eq!(forward.path(), "/groups/g1/assets/@spam/@by-group/7.json");
    }

    #[test]
    fn test_existing_filters_are_kept_and_reordered() {
        let base = url("https://api.typepad.com/users/mel/events/@by-user/u2.json");
        let filtered = apply(&base, &[("following", true.into())]).unwrap();
        assert_eq!(
            filtered.path(),
            "/users/mel/events/@following/@by-user/u2.json"
        );
    }

    #[test]
    fn test_unknown_keys_become_query_parameters() {
        let base = url("https://api.typepad.com/assets.json?a=1");
        let filtered = apply(
            &base,
            &[("max_results", 5.into()), ("a", "2".into())],
        )
        .unwrap();
        assert_eq!(filtered.path(), "/assets.json");
        assert_eq!(filtered.query(), Some("a=2&max-results=5"));
    }

    #[test]
    fn test_false_flag_removes_filter() {
        let base = url("https://api.typepad.com/users/mel/relationships/@follower.json");
        let filtered = apply(&base, &[("follower", false.into())]).unwrap();
        assert_eq!(filtered.path(), "/users/mel/relationships.json");
    }

    #[test]
    fn test_unknown_at_segments_stay_in_the_base() {
        let base = url("https://api.typepad.com/users/@self/events.json");
        let filtered = apply(&base, &[("post", true.into())]).unwrap();
        assert_eq!(filtered.path(), "/users/@self/events/@post.json");
    }

    #[test]
    fn test_entities_filter_by_url_id() {
        let user = RemoteObject::from_dict(&USER, &json!({"urlId": "6p00e5"})).unwrap();
        let base = url("https://api.typepad.com/groups/g1/events.json");
        let filtered = apply(&base, &[("by_user", (&user).into())]).unwrap();
        assert_eq!(filtered.path(), "/groups/g1/events/@by-user/6p00e5.json");

        let anonymous = RemoteObject::new(&USER);
        assert_eq!(
            apply(&base, &[("by_user", (&anonymous).into())]),
            Err(FilterError::EntityWithoutUrlId {
                key: "by-user".to_string()
            })
        );
    }

    #[test]
    fn test_location_must_be_json() {
        let base = url("https://api.typepad.com/groups/g1/events");
        assert!(matches!(
            apply(&base, &[]),
            Err(FilterError::MalformedLocation { .. })
        ));

        let truncated = url("https://api.typepad.com/groups/g1/events/@by-user.json");
        assert!(matches!(
            apply(&truncated, &[]),
            Err(FilterError::MalformedLocation { .. })
        ));
    }

    #[test]
    fn test_axis_value_outside_axis_is_a_query_parameter() {
        let base = url("https://api.typepad.com/groups/g1/assets.json");
        let filtered = apply(&base, &[("status", "draft".into())]).unwrap();
        assert_eq!(filtered.path(), "/groups/g1/assets.json");
        assert_eq!(filtered.query(), Some("status=draft"));
    }
}
