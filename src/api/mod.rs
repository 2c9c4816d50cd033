//! Object types of the TypePad API.
//!
//! Each type is described by a `static` [`ObjectClass`] and exposed as a
//! newtype over [`RemoteObject`](crate::remote::RemoteObject) that implements
//! [`RemoteType`](crate::remote::RemoteType). The newtypes dereference to
//! `RemoteObject`, so generic accessors such as
//! [`string`](crate::remote::RemoteObject::string) and
//! [`link`](crate::remote::RemoteObject::link) are available on all of them.
//!
//! # Available Types
//!
//! ## People
//!
//! - [`User`] - A TypePad member (`/users/{url_id}.json`)
//! - [`UserProfile`] - A member's extended profile
//! - [`Account`] - An account a member holds on another service
//!
//! ## Groups and applications
//!
//! - [`Group`] - A community of members (`/groups/{url_id}.json`)
//! - [`Application`] - An application registered with TypePad
//!
//! ## Content
//!
//! - [`Asset`] - Any piece of content (`/assets/{url_id}.json`)
//! - [`Comment`], [`Post`], [`Photo`], [`Audio`], [`Video`], [`LinkAsset`],
//!   [`Document`] - The kinds of asset
//! - [`Favorite`] - A member marking an asset as a favorite
//! - [`AssetRef`] - A reference to an asset
//! - [`PublicationStatus`] - Whether an asset is published or spam
//!
//! ## Activity
//!
//! - [`Event`] - Something a member did
//! - [`Relationship`] - A connection between a member and a member or group
//! - [`RelationshipStatus`] - The kinds of a relationship
//!
//! Payloads of unknown type can be decoded as [`ApiObject`], which picks the
//! variant from the payload's `objectTypes`.

use crate::remote::{Element, Field, ObjectClass};

/// Declares a newtype over `RemoteObject` for a static class.
macro_rules! remote_object {
    ($(#[$meta:meta])* $name:ident => $class:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name(crate::remote::RemoteObject);

        impl From<crate::remote::RemoteObject> for $name {
            fn from(object: crate::remote::RemoteObject) -> Self {
                Self(object)
            }
        }

        impl From<$name> for crate::remote::RemoteObject {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<crate::remote::RemoteObject> for $name {
            fn as_ref(&self) -> &crate::remote::RemoteObject {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = crate::remote::RemoteObject;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl crate::remote::Resource for $name {
            const NAME: &'static str = stringify!($name);

            fn batch_requests() -> bool {
                $class.batch_requests
            }

            fn accepts(target: &crate::remote::LinkTarget) -> bool {
                crate::remote::accepts_object(&$class, target)
            }

            fn decode(
                data: &serde_json::Value,
                location: Option<url::Url>,
            ) -> Result<Self, crate::remote::DecodeError> {
                crate::remote::decode_object(&$class, data, location).map(Self)
            }
        }

        impl crate::remote::RemoteType for $name {
            fn class() -> &'static crate::remote::ObjectClass {
                &$class
            }
        }
    };
}

mod asset;
mod event;
mod group;
mod object;
mod user;

pub use asset::{
    Asset, AssetRef, Audio, Comment, Document, Favorite, LinkAsset, Photo, Post,
    PublicationStatus, Video, ASSET, ASSET_REF, AUDIO, COMMENT, DOCUMENT, FAVORITE, LINK_ASSET,
    PHOTO, POST, PUBLICATION_STATUS, VIDEO,
};
pub use event::{
    Event, Relationship, RelationshipStatus, EVENT, RELATIONSHIP, RELATIONSHIP_STATUS,
};
pub use group::{Application, Group, APPLICATION, GROUP};
pub use object::ApiObject;
pub use user::{Account, User, UserProfile, ACCOUNT, USER, USER_PROFILE};

const TYPEPAD_OBJECT_FIELDS: &[Field] = &[
    Field::list("object_types", Element::Scalar).api_name("objectTypes"),
    Field::scalar("object_type").api_name("objectType"),
];

/// The root of the class hierarchy.
///
/// Every declared class descends from it, so a payload decoded as
/// `TypePadObject` is reclassified by its `objectTypes`.
pub static TYPEPAD_OBJECT: ObjectClass =
    ObjectClass::new("TypePadObject", None, TYPEPAD_OBJECT_FIELDS);

/// Every declared class.
pub static CLASSES: &[&ObjectClass] = &[
    &TYPEPAD_OBJECT,
    &USER,
    &USER_PROFILE,
    &ACCOUNT,
    &GROUP,
    &APPLICATION,
    &ASSET,
    &COMMENT,
    &POST,
    &PHOTO,
    &AUDIO,
    &VIDEO,
    &LINK_ASSET,
    &DOCUMENT,
    &FAVORITE,
    &EVENT,
    &RELATIONSHIP,
    &RELATIONSHIP_STATUS,
    &PUBLICATION_STATUS,
    &ASSET_REF,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_class_descends_from_root() {
        for class in CLASSES {
            assert!(class.is_subclass_of(&TYPEPAD_OBJECT), "{class}");
        }
    }

    #[test]
    fn test_tagged_classes() {
        let tagged: Vec<&str> = CLASSES
            .iter()
            .filter(|class| class.object_type.is_some())
            .map(|class| class.name)
            .collect();
        assert_eq!(
            tagged,
            [
                "User",
                "Group",
                "Application",
                "Asset",
                "Comment",
                "Post",
                "Photo",
                "Audio",
                "Video",
                "LinkAsset",
                "Document",
                "Favorite",
            ]
        );
    }
}
