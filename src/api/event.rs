//! Activity: events and relationships.

use chrono::{DateTime, Utc};

use crate::api::{ApiObject, TYPEPAD_OBJECT};
use crate::remote::{Element, Field, ObjectClass};

use super::{Asset, User};

const EVENT_FIELDS: &[Field] = &[
    Field::scalar("id"),
    Field::scalar("url_id").api_name("urlId"),
    Field::list("verbs", Element::Scalar),
    Field::object("actor", "User"),
    Field::object("object", "Asset"),
    Field::datetime("published"),
];

/// Class of [`Event`].
pub static EVENT: ObjectClass = ObjectClass::new("Event", Some(&TYPEPAD_OBJECT), EVENT_FIELDS)
    .endpoint("/events/{url_id}.json");

const RELATIONSHIP_FIELDS: &[Field] = &[
    Field::scalar("id"),
    Field::scalar("url_id").api_name("urlId"),
    Field::object("source", "TypePadObject"),
    Field::object("target", "TypePadObject"),
    Field::object("status", "RelationshipStatus"),
    Field::links("links"),
];

/// Class of [`Relationship`].
pub static RELATIONSHIP: ObjectClass =
    ObjectClass::new("Relationship", Some(&TYPEPAD_OBJECT), RELATIONSHIP_FIELDS)
        .endpoint("/relationships/{url_id}.json");

const RELATIONSHIP_STATUS_FIELDS: &[Field] = &[Field::list("types", Element::Scalar)];

/// Class of [`RelationshipStatus`].
pub static RELATIONSHIP_STATUS: ObjectClass = ObjectClass::new(
    "RelationshipStatus",
    Some(&TYPEPAD_OBJECT),
    RELATIONSHIP_STATUS_FIELDS,
);

remote_object! {
    /// Something a member did, such as posting an asset.
    Event => EVENT
}

impl Event {
    /// The verb URIs describing what happened.
    #[must_use]
    pub fn verbs(&self) -> Vec<&str> {
        self.strings("verbs")
    }

    #[must_use]
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.datetime("published")
    }

    /// The member who acted.
    #[must_use]
    pub fn actor(&self) -> Option<User> {
        self.0.object("actor").cloned().map(User::from)
    }

    /// The asset acted upon, decoded as its most specific kind.
    ///
    /// Shadows [`RemoteObject::object`](crate::remote::RemoteObject::object);
    /// reach the generic accessor through `as_ref()`.
    #[must_use]
    pub fn object(&self) -> Option<Asset> {
        self.0.object("object").cloned().map(Asset::from)
    }
}

remote_object! {
    /// A connection from a member to a member or a group.
    ///
    /// Either end may be any object type, so both are returned as
    /// [`ApiObject`].
    Relationship => RELATIONSHIP
}

impl Relationship {
    #[must_use]
    pub fn source(&self) -> Option<ApiObject> {
        self.object("source").cloned().map(ApiObject::from)
    }

    #[must_use]
    pub fn target(&self) -> Option<ApiObject> {
        self.object("target").cloned().map(ApiObject::from)
    }

    /// The kinds of this relationship, such as `.../Contact`.
    #[must_use]
    pub fn status_types(&self) -> Vec<String> {
        self.object("status")
            .map(|status| status.strings("types").into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

remote_object! {
    /// The kinds of a relationship.
    RelationshipStatus => RELATIONSHIP_STATUS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::POST;
    use crate::remote::RemoteType;
    use serde_json::json;

    #[test]
    fn test_event_object_is_most_specific_kind() {
        let event = Event::from_dict(&json!({
            "verbs": ["tag:api.typepad.com,2009:NewAsset"],
            "actor": {"displayName": "Mel"},
            "object": {"objectTypes": ["tag:api.typepad.com,2009:Post"], "title": "Hi"},
        }))
        .unwrap();

        assert_eq!(event.verbs(), ["tag:api.typepad.com,2009:NewAsset"]);
        assert_eq!(event.actor().unwrap().display_name(), Some("Mel"));
        let object = event.object().unwrap();
        assert_eq!(object.class(), &POST);
        assert_eq!(object.title(), Some("Hi"));
    }

    #[test]
    fn test_relationship_ends_are_polymorphic() {
        let relationship = Relationship::from_dict(&json!({
            "source": {"objectTypes": ["tag:api.typepad.com,2009:User"], "displayName": "Mel"},
            "target": {"objectTypes": ["tag:api.typepad.com,2009:Group"], "displayName": "Motion"},
            "status": {"types": ["tag:api.typepad.com,2009:Member"]},
        }))
        .unwrap();

        assert!(matches!(relationship.source(), Some(ApiObject::User(_))));
        assert!(matches!(relationship.target(), Some(ApiObject::Group(_))));
        assert_eq!(
            relationship.status_types(),
            ["tag:api.typepad.com,2009:Member"]
        );
    }
}
