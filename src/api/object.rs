//! Objects whose type is only known once their payload arrives.

use serde_json::Value;
use url::Url;

use super::{
    Account, Application, Asset, AssetRef, Audio, Comment, Document, Event, Favorite, Group,
    LinkAsset, Photo, Post, PublicationStatus, Relationship, RelationshipStatus, User,
    UserProfile, Video, ACCOUNT, APPLICATION, ASSET, ASSET_REF, AUDIO, COMMENT, DOCUMENT, EVENT,
    FAVORITE, GROUP, LINK_ASSET, PHOTO, POST, PUBLICATION_STATUS, RELATIONSHIP,
    RELATIONSHIP_STATUS, TYPEPAD_OBJECT, USER, USER_PROFILE, VIDEO,
};
use crate::remote::{
    accepts_object, decode_object, DecodeError, LinkTarget, RemoteObject, Resource,
};

/// A remote object of any declared type.
///
/// Decoding starts from the root class and follows the payload's
/// `objectTypes`, so the variant is the most specific type the server
/// announced. Payloads that match no dedicated type land in
/// [`ApiObject::Other`].
///
/// # Example
///
/// ```rust,ignore
/// use typepad::api::ApiObject;
///
/// match relationship.target() {
///     Some(ApiObject::Group(group)) => println!("member of {:?}", group.display_name()),
///     Some(ApiObject::User(user)) => println!("follows {:?}", user.display_name()),
///     _ => {}
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ApiObject {
    /// A TypePad member.
    User(User),
    /// A member's extended profile.
    UserProfile(UserProfile),
    /// An account a member holds on another service.
    Account(Account),
    /// A group of members.
    Group(Group),
    /// An application registered with TypePad.
    Application(Application),
    /// Content of no more specific kind.
    Asset(Asset),
    /// A reply to another asset.
    Comment(Comment),
    /// A blog post.
    Post(Post),
    /// An image asset.
    Photo(Photo),
    /// A sound asset.
    Audio(Audio),
    /// A video asset.
    Video(Video),
    /// A shared link to an external page.
    LinkAsset(LinkAsset),
    /// A document asset.
    Document(Document),
    /// A member marking an asset as a favorite.
    Favorite(Favorite),
    /// An entry in an activity stream.
    Event(Event),
    /// A connection between two objects.
    Relationship(Relationship),
    /// The kinds of a relationship.
    RelationshipStatus(RelationshipStatus),
    /// Whether an asset is published or held as spam.
    PublicationStatus(PublicationStatus),
    /// A reference to an asset by URL and identifier.
    AssetRef(AssetRef),
    /// An object of a class with no typed wrapper.
    Other(RemoteObject),
}

impl ApiObject {
    /// Wraps `object` in the variant matching its class.
    #[must_use]
    pub fn from_object(object: RemoteObject) -> Self {
        let class = object.class();
        if std::ptr::eq(class, &USER) {
            Self::User(object.into())
        } else if std::ptr::eq(class, &USER_PROFILE) {
            Self::UserProfile(object.into())
        } else if std::ptr::eq(class, &ACCOUNT) {
            Self::Account(object.into())
        } else if std::ptr::eq(class, &GROUP) {
            Self::Group(object.into())
        } else if std::ptr::eq(class, &APPLICATION) {
            Self::Application(object.into())
        } else if std::ptr::eq(class, &ASSET) {
            Self::Asset(object.into())
        } else if std::ptr::eq(class, &COMMENT) {
            Self::Comment(object.into())
        } else if std::ptr::eq(class, &POST) {
            Self::Post(object.into())
        } else if std::ptr::eq(class, &PHOTO) {
            Self::Photo(object.into())
        } else if std::ptr::eq(class, &AUDIO) {
            Self::Audio(object.into())
        } else if std::ptr::eq(class, &VIDEO) {
            Self::Video(object.into())
        } else if std::ptr::eq(class, &LINK_ASSET) {
            Self::LinkAsset(object.into())
        } else if std::ptr::eq(class, &DOCUMENT) {
            Self::Document(object.into())
        } else if std::ptr::eq(class, &FAVORITE) {
            Self::Favorite(object.into())
        } else if std::ptr::eq(class, &EVENT) {
            Self::Event(object.into())
        } else if std::ptr::eq(class, &RELATIONSHIP) {
            Self::Relationship(object.into())
        } else if std::ptr::eq(class, &RELATIONSHIP_STATUS) {
            Self::RelationshipStatus(object.into())
        } else if std::ptr::eq(class, &PUBLICATION_STATUS) {
            Self::PublicationStatus(object.into())
        } else if std::ptr::eq(class, &ASSET_REF) {
            Self::AssetRef(object.into())
        } else {
            Self::Other(object)
        }
    }

    /// Returns the wrapped object.
    #[must_use]
    pub fn as_object(&self) -> &RemoteObject {
        match self {
            Self::User(v) => v.as_ref(),
            Self::UserProfile(v) => v.as_ref(),
            Self::Account(v) => v.as_ref(),
            Self::Group(v) => v.as_ref(),
            Self::Application(v) => v.as_ref(),
            Self::Asset(v) => v.as_ref(),
            Self::Comment(v) => v.as_ref(),
            Self::Post(v) => v.as_ref(),
            Self::Photo(v) => v.as_ref(),
            Self::Audio(v) => v.as_ref(),
            Self::Video(v) => v.as_ref(),
            Self::LinkAsset(v) => v.as_ref(),
            Self::Document(v) => v.as_ref(),
            Self::Favorite(v) => v.as_ref(),
            Self::Event(v) => v.as_ref(),
            Self::Relationship(v) => v.as_ref(),
            Self::RelationshipStatus(v) => v.as_ref(),
            Self::PublicationStatus(v) => v.as_ref(),
            Self::AssetRef(v) => v.as_ref(),
            Self::Other(v) => v,
        }
    }

    /// Returns the name of the wrapped object's class.
    #[must_use]
    pub fn class_name(&self) -> &'static str {
        self.as_object().class_name()
    }
}

impl From<RemoteObject> for ApiObject {
    fn from(object: RemoteObject) -> Self {
        Self::from_object(object)
    }
}

impl AsRef<RemoteObject> for ApiObject {
    fn as_ref(&self) -> &RemoteObject {
        self.as_object()
    }
}

impl Resource for ApiObject {
    const NAME: &'static str = "TypePadObject";

    fn batch_requests() -> bool {
        TYPEPAD_OBJECT.batch_requests
    }

    fn accepts(target: &LinkTarget) -> bool {
        accepts_object(&TYPEPAD_OBJECT, target)
    }

    fn decode(data: &Value, location: Option<Url>) -> Result<Self, DecodeError> {
        decode_object(&TYPEPAD_OBJECT, data, location).map(Self::from_object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_picks_variant_from_object_types() {
        let object = ApiObject::decode(
            &json!({"objectTypes": ["tag:api.typepad.com,2009:Photo"], "title": "Lake"}),
            None,
        )
        .unwrap();
        let ApiObject::Photo(photo) = &object else {
            panic!("expected a photo, got {object:?}");
        };
        assert_eq!(photo.string("title"), Some("Lake"));
        assert_eq!(object.class_name(), "Photo");
    }

    #[test]
    fn test_untagged_payload_stays_generic() {
        let object = ApiObject::decode(&json!({"objectType": "unknown"}), None).unwrap();
        assert!(matches!(object, ApiObject::Other(_)));
        assert_eq!(object.class_name(), "TypePadObject");
    }

    #[test]
    fn test_fetched_location_is_kept() {
        let location = Url::parse("https://api.typepad.com/users/6p00e5.json").unwrap();
        let object = ApiObject::decode(
            &json!({"objectTypes": ["tag:api.typepad.com,2009:User"]}),
            Some(location.clone()),
        )
        .unwrap();
        assert!(matches!(object, ApiObject::User(_)));
        assert_eq!(object.as_object().location(), Some(&location));
    }

    #[test]
    fn test_accepts_any_object_link() {
        assert!(ApiObject::accepts(&LinkTarget::Object("User")));
        assert!(ApiObject::accepts(&LinkTarget::Object("TypePadObject")));
        assert!(!ApiObject::accepts(&LinkTarget::List("User")));
    }
}
