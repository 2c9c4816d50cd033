//! Link records and link sets.
//!
//! Most TypePad objects carry a `links` array describing related resources:
//! the object's own URL (`rel="self"`), alternate HTML pages, and renditions
//! of images at several sizes. [`LinkSet`] holds those records and offers
//! relation-keyed and size-keyed lookups.
//!
//! # Lookup keys
//!
//! [`LinkSet::get`] understands the same string keys the API documentation
//! uses:
//!
//! | Key            | Result                                          |
//! |----------------|-------------------------------------------------|
//! | `avatar`       | the first link with `rel == "avatar"`           |
//! | `rel__avatar`  | every link with `rel == "avatar"`, as a set     |
//! | `width__N`     | see [`LinkSet::by_width`]                       |
//! | `size__N`      | see [`LinkSet::by_size`]                        |
//! | `maxwidth__N`  | see [`LinkSet::max_width`]                      |
//!
//! Link sets cannot be sliced; there is no positional indexing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::remote::errors::{DecodeError, LinkSetError};

/// A link from an object to a related resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// The relation of the linked resource to the owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    /// The URL of the linked resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Embeddable HTML for the linked resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// The MIME type of the linked resource.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Width in pixels, for images and video.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,
    /// Height in pixels, for images and video.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    /// Duration, for audio and video.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<serde_json::Number>,
    /// Number of items in the linked list resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Whether the linked resource is specific to the authenticated user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_user: Option<bool>,
    /// HTTP methods the linked resource accepts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_methods: Option<Vec<String>>,
}

impl Link {
    /// Creates a link with the given relation and URL.
    #[must_use]
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: Some(rel.into()),
            href: Some(href.into()),
            ..Self::default()
        }
    }

    /// Sets the pixel dimensions of the link.
    #[must_use]
    pub const fn with_size(mut self, width: u64, height: u64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    fn w(&self) -> u64 {
        self.width.unwrap_or(0)
    }

    fn h(&self) -> u64 {
        self.height.unwrap_or(0)
    }

    fn has_rel(&self, rel: &str) -> bool {
        self.rel.as_deref() == Some(rel)
    }
}

/// The result of a string-keyed [`LinkSet::get`] lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection<'a> {
    /// A single matching link.
    One(&'a Link),
    /// All links matching a `rel__` key.
    Many(LinkSet),
    /// A size or width lookup on a set with no candidates.
    Nothing,
}

impl<'a> Selection<'a> {
    /// Returns the single link, if this selection holds one.
    #[must_use]
    pub const fn link(&self) -> Option<&'a Link> {
        match self {
            Self::One(link) => Some(*link),
            Self::Many(_) | Self::Nothing => None,
        }
    }
}

impl<'a> From<Option<&'a Link>> for Selection<'a> {
    fn from(link: Option<&'a Link>) -> Self {
        link.map_or(Self::Nothing, Self::One)
    }
}

/// A set of [`Link`] records.
///
/// Records are unique by full value; the same relation may appear many times
/// with different URLs or sizes. Iteration follows insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkSet {
    links: Vec<Link>,
}

impl LinkSet {
    /// Creates an empty link set.
    #[must_use]
    pub const fn new() -> Self {
        Self { links: Vec::new() }
    }

    /// Decodes a link set from a wire `links` array.
    ///
    /// `null` decodes to an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotAList`] if the value is not an array, and
    /// [`DecodeError::NotAnObject`] or [`DecodeError::InvalidJson`] if an
    /// element is not a valid link record.
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let items = match value {
            Value::Null => return Ok(Self::new()),
            Value::Array(items) => items,
            _ => return Err(DecodeError::NotAList),
        };

        let mut set = Self::new();
        for item in items {
            if !item.is_object() {
                return Err(DecodeError::NotAnObject);
            }
            set.insert(Link::deserialize(item)?);
        }
        Ok(set)
    }

    /// Encodes the set as a wire `links` array, sorted by relation then URL.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut links: Vec<&Link> = self.links.iter().collect();
        links.sort_by(|a, b| (&a.rel, &a.href).cmp(&(&b.rel, &b.href)));
        Value::Array(
            links
                .into_iter()
                .map(|link| serde_json::to_value(link).unwrap_or(Value::Null))
                .collect(),
        )
    }

    /// Adds a link, returning `false` if an identical link was already present.
    pub fn insert(&mut self, link: Link) -> bool {
        if self.links.contains(&link) {
            return false;
        }
        self.links.push(link);
        true
    }

    /// Returns the number of links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if the set holds no links.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Iterates over the links in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        self.links.iter()
    }

    /// Returns `true` if any link has the given relation.
    #[must_use]
    pub fn contains_rel(&self, rel: &str) -> bool {
        self.links.iter().any(|link| link.has_rel(rel))
    }

    /// Returns the first link with the given relation.
    #[must_use]
    pub fn by_rel(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.has_rel(rel))
    }

    /// Returns every link with the given relation.
    #[must_use]
    pub fn all_by_rel(&self, rel: &str) -> Self {
        self.links
            .iter()
            .filter(|link| link.has_rel(rel))
            .cloned()
            .collect()
    }

    /// Returns the narrowest link at least `width` pixels wide.
    ///
    /// If no link is wide enough, or `width` is 0, the widest link is
    /// returned instead. Links without a width count as 0 pixels wide. Among
    /// equally good links the first one wins. Returns `None` only for an
    /// empty set.
    #[must_use]
    pub fn by_width(&self, width: u64) -> Option<&Link> {
        if width == 0 {
            return self.widest();
        }

        let mut best: Option<&Link> = None;
        for link in &self.links {
            if width <= link.w() && best.map_or(true, |b| link.w() < b.w()) {
                best = Some(link);
            }
        }
        best.or_else(|| self.widest())
    }

    /// Returns the link that best fits an `size`×`size` box.
    ///
    /// Prefers the largest link that fits inside the box; otherwise the
    /// smallest link that exceeds it; otherwise the largest link overall.
    /// A `size` of 0 asks for the largest link. Returns `None` only for an
    /// empty set.
    #[must_use]
    pub fn by_size(&self, size: u64) -> Option<&Link> {
        let mut fits: Option<&Link> = None;
        let mut oversize: Option<&Link> = None;
        let mut original: Option<&Link> = None;

        for link in &self.links {
            if link.w() > size || link.h() > size {
                if oversize.map_or(true, |o| o.w() > link.w() || o.h() > link.h()) {
                    oversize = Some(link);
                }
            } else if fits.map_or(true, |f| f.w() < link.w() || f.h() < link.h()) {
                fits = Some(link);
            }
            if original.map_or(true, |o| o.w() < link.w() || o.h() < link.h()) {
                original = Some(link);
            }
        }

        if size == 0 {
            return original;
        }
        fits.or(oversize).or(original)
    }

    /// Returns the widest link no wider than `width` pixels.
    ///
    /// Among links of equal width the last one wins.
    #[must_use]
    pub fn max_width(&self, width: u64) -> Option<&Link> {
        let mut best: Option<&Link> = None;
        for link in self.links.iter().filter(|link| link.w() <= width) {
            if best.map_or(true, |b| link.w() >= b.w()) {
                best = Some(link);
            }
        }
        best
    }

    /// Looks up links by a string key such as `"self"`, `"rel__avatar"` or
    /// `"width__200"`.
    ///
    /// # Errors
    ///
    /// Returns [`LinkSetError::NoSuchLink`] if a plain relation key matches
    /// nothing, and [`LinkSetError::InvalidKey`] if a size key does not end
    /// in a number.
    ///
    /// # Example
    ///
    /// ```rust
    /// use typepad::remote::{Link, LinkSet, Selection};
    ///
    /// let links: LinkSet = vec![
    ///     Link::new("avatar", "/a/100.jpg").with_size(100, 100),
    ///     Link::new("avatar", "/a/400.jpg").with_size(400, 400),
    /// ]
    /// .into_iter()
    /// .collect();
    ///
    /// let chosen = links.get("width__150").unwrap();
    /// assert_eq!(chosen.link().unwrap().href.as_deref(), Some("/a/400.jpg"));
    /// assert!(matches!(links.get("rel__avatar").unwrap(), Selection::Many(set) if set.len() == 2));
    /// ```
    pub fn get(&self, key: &str) -> Result<Selection<'_>, LinkSetError> {
        if let Some(rel) = key.strip_prefix("rel__") {
            return Ok(Selection::Many(self.all_by_rel(rel)));
        }
        if let Some(n) = key.strip_prefix("width__") {
            return Ok(self.by_width(Self::parse_size(key, n)?).into());
        }
        if let Some(n) = key.strip_prefix("size__") {
            return Ok(self.by_size(Self::parse_size(key, n)?).into());
        }
        if let Some(n) = key.strip_prefix("maxwidth__") {
            return Ok(self.max_width(Self::parse_size(key, n)?).into());
        }

        self.by_rel(key)
            .map(Selection::One)
            .ok_or_else(|| LinkSetError::NoSuchLink {
                rel: key.to_string(),
            })
    }

    fn widest(&self) -> Option<&Link> {
        let mut best: Option<&Link> = None;
        for link in &self.links {
            if best.map_or(true, |b| b.w() < link.w()) {
                best = Some(link);
            }
        }
        best
    }

    fn parse_size(key: &str, n: &str) -> Result<u64, LinkSetError> {
        n.parse().map_err(|_| LinkSetError::InvalidKey {
            key: key.to_string(),
        })
    }
}

impl FromIterator<Link> for LinkSet {
    fn from_iter<I: IntoIterator<Item = Link>>(iter: I) -> Self {
        let mut set = Self::new();
        for link in iter {
            set.insert(link);
        }
        set
    }
}

impl<'a> IntoIterator for &'a LinkSet {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for LinkSet {
    type Item = Link;
    type IntoIter = std::vec::IntoIter<Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn widths(ws: &[u64]) -> LinkSet {
        ws.iter()
            .map(|w| Link::new("enclosure", format!("/img/{w}.jpg")).with_size(*w, *w))
            .collect()
    }

    fn href(link: Option<&Link>) -> Option<&str> {
        link.and_then(|l| l.href.as_deref())
    }

    #[test]
    fn test_by_width_returns_narrowest_at_least_requested() {
        let links = widths(&[100, 200, 400]);
        assert_eq!(href(links.by_width(150)), Some("/img/200.jpg"));
        assert_eq!(href(links.by_width(200)), Some("/img/200.jpg"));
        assert_eq!(href(links.by_width(50)), Some("/img/100.jpg"));
    }

    #[test]
    fn test_by_width_falls_back_to_widest() {
        let links = widths(&[100, 200, 400]);
        assert_eq!(href(links.by_width(500)), Some("/img/400.jpg"));
        assert_eq!(href(links.by_width(0)), Some("/img/400.jpg"));
    }

    #[test]
    fn test_lookups_on_empty_set_return_nothing() {
        let links = LinkSet::new();
        for width in [0, 1, 150, 10_000] {
            assert!(links.by_width(width).is_none());
            assert!(links.by_size(width).is_none());
            assert!(links.max_width(width).is_none());
        }
        assert_eq!(links.get("width__150").unwrap(), Selection::Nothing);
    }

    #[test]
    fn test_by_size_prefers_largest_that_fits() {
        let links: LinkSet = vec![
            Link::new("enclosure", "/small").with_size(75, 50),
            Link::new("enclosure", "/medium").with_size(150, 100),
            Link::new("enclosure", "/large").with_size(600, 400),
        ]
        .into_iter()
        .collect();

        assert_eq!(href(links.by_size(200)), Some("/medium"));
        assert_eq!(href(links.by_size(60)), Some("/small"));
        assert_eq!(href(links.by_size(0)), Some("/large"));
        assert_eq!(href(links.by_size(1000)), Some("/large"));
    }

    #[test]
    fn test_max_width_picks_widest_not_exceeding() {
        let links = widths(&[100, 200, 400]);
        assert_eq!(href(links.max_width(250)), Some("/img/200.jpg"));
        assert_eq!(href(links.max_width(400)), Some("/img/400.jpg"));
        assert!(links.max_width(99).is_none());
    }

    #[test]
    fn test_get_by_rel_and_prefix() {
        let links: LinkSet = vec![
            Link::new("self", "/users/6p1.json"),
            Link::new("avatar", "/a/1.jpg"),
            Link::new("avatar", "/a/2.jpg"),
        ]
        .into_iter()
        .collect();

        let one = links.get("self").unwrap();
        assert_eq!(href(one.link()), Some("/users/6p1.json"));

        match links.get("rel__avatar").unwrap() {
            Selection::Many(set) => assert_eq!(set.len(), 2),
            other => panic!("unexpected selection {other:?}"),
        }

        assert!(links.contains_rel("avatar"));
        assert!(!links.contains_rel("alternate"));
    }

    #[test]
    fn test_get_errors() {
        let links = widths(&[100]);
        assert_eq!(
            links.get("alternate"),
            Err(LinkSetError::NoSuchLink {
                rel: "alternate".to_string()
            })
        );
        assert_eq!(
            links.get("width__wide"),
            Err(LinkSetError::InvalidKey {
                key: "width__wide".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_links_collapse() {
        let mut links = LinkSet::new();
        assert!(links.insert(Link::new("self", "/x.json")));
        assert!(!links.insert(Link::new("self", "/x.json")));
        assert!(links.insert(Link::new("alternate", "/x.json")));
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_wire_round_trip_is_sorted() {
        let raw = json!([
            {"rel": "self", "href": "/b.json", "type": "application/json"},
            {"rel": "avatar", "href": "/a.jpg", "width": 50, "height": 50, "byUser": false},
            {"rel": "replies", "href": "/c.json", "total": 3, "allowedMethods": ["GET", "POST"]}
        ]);

        let links = LinkSet::from_value(&raw).unwrap();
        assert_eq!(links.len(), 3);
        assert_eq!(links.by_rel("replies").unwrap().total, Some(3));

        let encoded = links.to_value();
        assert_eq!(encoded[0]["rel"], "avatar");
        assert_eq!(encoded[0]["byUser"], false);
        assert_eq!(encoded[1]["rel"], "replies");
        assert_eq!(encoded[1]["allowedMethods"], json!(["GET", "POST"]));
        assert_eq!(encoded[2]["type"], "application/json");
    }

    #[test]
    fn test_from_value_rejects_non_arrays() {
        assert_eq!(
            LinkSet::from_value(&json!({"rel": "self"})),
            Err(DecodeError::NotAList)
        );
        assert_eq!(LinkSet::from_value(&json!(["x"])), Err(DecodeError::NotAnObject));
        assert!(LinkSet::from_value(&Value::Null).unwrap().is_empty());
    }
}
