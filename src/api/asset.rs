//! Content: assets, their kinds, and references to them.
//!
//! Every kind of content is an [`Asset`]. Lists of assets decode each entry
//! as the kind its `objectTypes` names, so an entry of a `ListOf<Asset>` may
//! be a [`Post`], a [`Photo`] or a [`Comment`]:
//!
//! ```rust
//! use typepad::api::{Asset, POST};
//! use typepad::remote::RemoteType;
//! use serde_json::json;
//!
//! let asset = Asset::from_dict(&json!({
//!     "objectTypes": ["tag:api.typepad.com,2009:Post"],
//!     "title": "Hello",
//! }))
//! .unwrap();
//!
//! assert_eq!(asset.class(), &POST);
//! assert_eq!(asset.to_string(), "Hello");
//! ```

use std::fmt;

use chrono::{DateTime, Utc};

use crate::api::TYPEPAD_OBJECT;
use crate::clients::{BatchClient, Transport};
use crate::remote::{
    Element, Field, LinkPath, LinkTarget, ListOf, ObjectClass, Promise, RemoteError,
    RemoteObject, RemoteType,
};

use super::User;

const ASSET_FIELDS: &[Field] = &[
    Field::scalar("id"),
    Field::scalar("url_id").api_name("urlId"),
    Field::scalar("title"),
    Field::object("author", "User"),
    Field::datetime("published"),
    Field::datetime("updated"),
    Field::scalar("summary"),
    Field::scalar("content"),
    Field::scalar("rendered_content").api_name("renderedContent"),
    Field::scalar("text_format").api_name("textFormat"),
    Field::list("categories", Element::Scalar),
    Field::list("groups", Element::Scalar),
    Field::object("status", "PublicationStatus"),
    Field::links("links"),
    Field::object("in_reply_to", "AssetRef").api_name("inReplyTo"),
    Field::scalar("permalink_url").api_name("permalinkUrl"),
    Field::scalar("comment_count").api_name("commentCount"),
    Field::scalar("favorite_count").api_name("favoriteCount"),
    Field::link(
        "comments",
        LinkTarget::List("Comment"),
        LinkPath::UrlId {
            collection: "assets",
            segment: "comments",
        },
    ),
    Field::link("favorites", LinkTarget::List("Favorite"), LinkPath::Child("favorites")),
];

/// Class of [`Asset`].
pub static ASSET: ObjectClass = ObjectClass::new("Asset", Some(&TYPEPAD_OBJECT), ASSET_FIELDS)
    .object_type("tag:api.typepad.com,2009:Asset")
    .endpoint("/assets/{url_id}.json");

/// Class of [`Comment`].
pub static COMMENT: ObjectClass = ObjectClass::new("Comment", Some(&ASSET), &[])
    .object_type("tag:api.typepad.com,2009:Comment");

const POST_FIELDS: &[Field] = &[
    Field::scalar("reblog_count").api_name("reblogCount"),
    Field::list("crosspost_accounts", Element::Scalar).api_name("crosspostAccounts"),
];

/// Class of [`Post`].
pub static POST: ObjectClass = ObjectClass::new("Post", Some(&ASSET), POST_FIELDS)
    .object_type("tag:api.typepad.com,2009:Post");

const PHOTO_FIELDS: &[Field] = &[Field::dict("image_link", Element::Scalar).api_name("imageLink")];

/// Class of [`Photo`].
pub static PHOTO: ObjectClass = ObjectClass::new("Photo", Some(&ASSET), PHOTO_FIELDS)
    .object_type("tag:api.typepad.com,2009:Photo");

const AUDIO_FIELDS: &[Field] = &[Field::dict("audio_link", Element::Scalar).api_name("audioLink")];

/// Class of [`Audio`].
pub static AUDIO: ObjectClass = ObjectClass::new("Audio", Some(&ASSET), AUDIO_FIELDS)
    .object_type("tag:api.typepad.com,2009:Audio");

const VIDEO_FIELDS: &[Field] = &[
    Field::dict("video_link", Element::Scalar).api_name("videoLink"),
    Field::dict("preview_image_link", Element::Scalar).api_name("previewImageLink"),
];

/// Class of [`Video`].
pub static VIDEO: ObjectClass = ObjectClass::new("Video", Some(&ASSET), VIDEO_FIELDS)
    .object_type("tag:api.typepad.com,2009:Video");

const LINK_ASSET_FIELDS: &[Field] = &[Field::scalar("target_url").api_name("targetUrl")];

/// Class of [`LinkAsset`]. Its tag is `Link`.
pub static LINK_ASSET: ObjectClass = ObjectClass::new("LinkAsset", Some(&ASSET), LINK_ASSET_FIELDS)
    .object_type("tag:api.typepad.com,2009:Link");

/// Class of [`Document`].
pub static DOCUMENT: ObjectClass = ObjectClass::new("Document", Some(&ASSET), &[])
    .object_type("tag:api.typepad.com,2009:Document");

const FAVORITE_FIELDS: &[Field] = &[
    Field::scalar("id"),
    Field::scalar("url_id").api_name("urlId"),
    Field::object("author", "User"),
    Field::object("in_reply_to", "AssetRef").api_name("inReplyTo"),
    Field::datetime("published"),
];

/// Class of [`Favorite`].
pub static FAVORITE: ObjectClass = ObjectClass::new("Favorite", Some(&TYPEPAD_OBJECT), FAVORITE_FIELDS)
    .object_type("tag:api.typepad.com,2009:Favorite")
    .endpoint("/favorites/{url_id}.json");

const PUBLICATION_STATUS_FIELDS: &[Field] = &[Field::scalar("published"), Field::scalar("spam")];

/// Class of [`PublicationStatus`].
pub static PUBLICATION_STATUS: ObjectClass = ObjectClass::new(
    "PublicationStatus",
    Some(&TYPEPAD_OBJECT),
    PUBLICATION_STATUS_FIELDS,
);

const ASSET_REF_FIELDS: &[Field] = &[
    Field::scalar("ref"),
    Field::scalar("href"),
    Field::scalar("type"),
    Field::scalar("url_id").api_name("urlId"),
    Field::object("author", "User"),
];

/// Class of [`AssetRef`].
pub static ASSET_REF: ObjectClass = ObjectClass::new("AssetRef", Some(&TYPEPAD_OBJECT), ASSET_REF_FIELDS);

remote_object! {
    /// A piece of content.
    ///
    /// Displays as its title, falling back to its summary and then its
    /// content.
    Asset => ASSET
}

impl Asset {
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.string("title")
    }

    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.string("summary")
    }

    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.string("content")
    }

    #[must_use]
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.datetime("published")
    }

    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.strings("categories")
    }

    /// The embedded author.
    #[must_use]
    pub fn author(&self) -> Option<User> {
        self.object("author").cloned().map(User::from)
    }

    /// The embedded publication status.
    #[must_use]
    pub fn status(&self) -> Option<PublicationStatus> {
        self.object("status").cloned().map(PublicationStatus::from)
    }

    /// The asset this one replies to.
    #[must_use]
    pub fn in_reply_to(&self) -> Option<AssetRef> {
        self.object("in_reply_to").cloned().map(AssetRef::from)
    }

    /// Builds a reference to this asset, or `None` without an `id`.
    ///
    /// The reference carries the asset's `id` as `ref` and its API URL as
    /// `href`.
    #[must_use]
    pub fn asset_ref(&self) -> Option<AssetRef> {
        let id = self.string("id")?;
        let url_id = self.url_id()?;
        let mut reference = RemoteObject::new(&ASSET_REF);
        reference.set("ref", id.to_string());
        reference.set("href", format!("/assets/{url_id}.json"));
        reference.set("type", "application/json");
        Some(AssetRef::from(reference))
    }

    /// The comments on this asset.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::link`].
    pub fn comments<C: Transport>(
        &self,
        client: &BatchClient<C>,
    ) -> Result<Promise<ListOf<Comment>>, RemoteError> {
        self.link("comments", client)
    }

    /// The favorites of this asset. Needs the asset's location.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::link`].
    pub fn favorites<C: Transport>(
        &self,
        client: &BatchClient<C>,
    ) -> Result<Promise<ListOf<Favorite>>, RemoteError> {
        self.link("favorites", client)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .title()
            .filter(|title| !title.is_empty())
            .or_else(|| self.summary().filter(|summary| !summary.is_empty()))
            .or_else(|| self.content())
            .unwrap_or_default();
        f.write_str(text)
    }
}

remote_object! {
    /// A comment on an asset.
    Comment => COMMENT
}

remote_object! {
    /// A blog post.
    Post => POST
}

remote_object! {
    /// A photo.
    Photo => PHOTO
}

remote_object! {
    /// An audio recording.
    Audio => AUDIO
}

remote_object! {
    /// A video.
    Video => VIDEO
}

remote_object! {
    /// A shared link.
    LinkAsset => LINK_ASSET
}

remote_object! {
    /// A document.
    Document => DOCUMENT
}

remote_object! {
    /// A member marking an asset as a favorite.
    Favorite => FAVORITE
}

remote_object! {
    /// Whether an asset is published or held as spam.
    PublicationStatus => PUBLICATION_STATUS
}

impl PublicationStatus {
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.boolean("published").unwrap_or(false)
    }

    #[must_use]
    pub fn is_spam(&self) -> bool {
        self.boolean("spam").unwrap_or(false)
    }
}

remote_object! {
    /// A reference to an asset.
    AssetRef => ASSET_REF
}

impl AssetRef {
    /// The referenced asset's `id`.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.string("ref")
    }

    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.string("href")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use serde_json::json;

    fn client() -> BatchClient {
        BatchClient::new(ClientConfig::default()).unwrap()
    }

    #[test]
    fn test_asset_fields_decode() {
        let asset = Asset::from_dict(&json!({
            "id": "tag:api.typepad.com,2009:asset-6a00",
            "title": "Spring",
            "published": "2009-03-30T18:31:22Z",
            "author": {"displayName": "Mel", "urlId": "6p00e5"},
            "status": {"published": true, "spam": false},
            "inReplyTo": {"ref": "tag:x", "href": "/assets/9.json"},
            "categories": ["weather"],
        }))
        .unwrap();

        assert_eq!(asset.title(), Some("Spring"));
        assert_eq!(
            asset.published().map(|p| p.to_rfc3339()),
            Some("2009-03-30T18:31:22+00:00".to_string())
        );
        assert_eq!(asset.author().unwrap().display_name(), Some("Mel"));
        assert!(asset.status().unwrap().is_published());
        assert!(!asset.status().unwrap().is_spam());
        assert_eq!(asset.in_reply_to().unwrap().href(), Some("/assets/9.json"));
        assert_eq!(asset.categories(), ["weather"]);
    }

    #[test]
    fn test_asset_ref_points_at_asset() {
        let asset = Asset::from_dict(&json!({"id": "tag:typepad.com,2003:asset-1794"})).unwrap();
        let reference = asset.asset_ref().unwrap();
        assert_eq!(reference.reference(), Some("tag:typepad.com,2003:asset-1794"));
        assert_eq!(reference.href(), Some("/assets/1794.json"));
        assert_eq!(reference.string("type"), Some("application/json"));

        assert!(Asset::from_dict(&json!({})).unwrap().asset_ref().is_none());
    }

    #[test]
    fn test_display_falls_back_through_text_fields() {
        let titled = Asset::from_dict(&json!({"title": "T", "content": "C"})).unwrap();
        assert_eq!(titled.to_string(), "T");
        let summarized = Asset::from_dict(&json!({"title": "", "summary": "S"})).unwrap();
        assert_eq!(summarized.to_string(), "S");
        let bare = Asset::from_dict(&json!({"content": "C"})).unwrap();
        assert_eq!(bare.to_string(), "C");
    }

    #[test]
    fn test_comment_link_by_url_id() {
        let client = client();
        let asset = Asset::from_dict(&json!({"urlId": "6a00"})).unwrap();
        let comments = asset.comments(&client).unwrap();
        assert_eq!(comments.url().path(), "/assets/6a00/comments.json");
    }

    #[test]
    fn test_favorites_link_is_child_of_location() {
        let client = client();
        let mut asset = Asset::from_dict(&json!({"urlId": "6a00"})).unwrap();
        assert!(matches!(
            asset.favorites(&client),
            Err(RemoteError::MissingLinkUrl { .. })
        ));

        asset.set_location(url::Url::parse("https://api.typepad.com/assets/6a00.json?x=1").unwrap());
        let favorites = asset.favorites(&client).unwrap();
        assert_eq!(
            favorites.url().as_str(),
            "https://api.typepad.com/assets/6a00/favorites.json"
        );
    }

    #[test]
    fn test_subclass_link_accepted_as_parent() {
        let client = client();
        let post = Post::from_dict(&json!({"urlId": "p1"})).unwrap();
        let as_assets = post.link::<ListOf<Asset>, _>("comments", &client);
        assert!(as_assets.is_ok());
        let as_users = post.link::<ListOf<User>, _>("comments", &client);
        assert!(matches!(as_users, Err(RemoteError::LinkTypeMismatch { .. })));
    }
}
