//! Groups and applications.

use crate::api::TYPEPAD_OBJECT;
use crate::clients::{BatchClient, Transport};
use crate::remote::{
    Element, Field, LinkPath, LinkTarget, ListOf, ObjectClass, Promise, RemoteError,
};

use super::{Asset, Comment, Event, LinkAsset, Photo, Post, Relationship};

const fn by_group(segment: &'static str) -> LinkPath {
    LinkPath::UrlId {
        collection: "groups",
        segment,
    }
}

const GROUP_FIELDS: &[Field] = &[
    Field::scalar("id"),
    Field::scalar("url_id").api_name("urlId"),
    Field::scalar("display_name").api_name("displayName"),
    Field::scalar("tagline"),
    Field::scalar("avatar"),
    Field::list("urls", Element::Scalar),
    Field::links("links"),
    Field::scalar("site_url").api_name("siteUrl"),
    Field::link("memberships", LinkTarget::List("Relationship"), by_group("memberships")),
    Field::link("assets", LinkTarget::List("Asset"), by_group("assets")),
    Field::link("events", LinkTarget::List("Event"), by_group("events")),
    Field::link("comments", LinkTarget::List("Comment"), by_group("comments")),
    Field::link("posts", LinkTarget::List("Post"), by_group("assets/@post")),
    Field::link("photos", LinkTarget::List("Photo"), by_group("assets/@photo")),
    Field::link("link_assets", LinkTarget::List("LinkAsset"), by_group("assets/@link")),
];

/// Class of [`Group`].
pub static GROUP: ObjectClass = ObjectClass::new("Group", Some(&TYPEPAD_OBJECT), GROUP_FIELDS)
    .object_type("tag:api.typepad.com,2009:Group")
    .endpoint("/groups/{url_id}.json");

const APPLICATION_FIELDS: &[Field] = &[
    Field::scalar("id"),
    Field::scalar("url_id").api_name("urlId"),
    Field::scalar("api_key").api_name("apiKey"),
    Field::scalar("name"),
    Field::links("links"),
    Field::object("owner", "TypePadObject"),
    Field::scalar("oauth_request_token_url").api_name("oauthRequestTokenUrl"),
    Field::scalar("oauth_authorization_url").api_name("oauthAuthorizationUrl"),
    Field::scalar("oauth_access_token_url").api_name("oauthAccessTokenUrl"),
    Field::scalar("oauth_identification_url").api_name("oauthIdentificationUrl"),
    Field::scalar("session_sync_script_url").api_name("sessionSyncScriptUrl"),
    Field::scalar("signout_url").api_name("signoutUrl"),
    Field::scalar("user_flyouts_script_url").api_name("userFlyoutsScriptUrl"),
];

/// Class of [`Application`].
pub static APPLICATION: ObjectClass =
    ObjectClass::new("Application", Some(&TYPEPAD_OBJECT), APPLICATION_FIELDS)
        .object_type("tag:api.typepad.com,2009:Application")
        .endpoint("/applications/{url_id}.json");

remote_object! {
    /// A community of members.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use typepad::api::Group;
    /// use typepad::remote::RemoteType;
    ///
    /// client.batch_request()?;
    /// let group = Group::get_by_url_id(&client, "6p0120a5e990ac970c")?;
    /// group.register(&client)?;
    /// client.complete_batch().await?;
    /// let group = group.deliver(&client).await?;
    ///
    /// client.batch_request()?;
    /// let admins = group.memberships(&client)?.filter(&client, &[("admin", true.into())])?;
    /// admins.register(&client)?;
    /// client.complete_batch().await?;
    /// ```
    Group => GROUP
}

impl Group {
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.string("display_name")
    }

    #[must_use]
    pub fn tagline(&self) -> Option<&str> {
        self.string("tagline")
    }

    /// The group's members, as relationships between member and group.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::link`](crate::remote::RemoteObject::link).
    pub fn memberships<C: Transport>(
        &self,
        client: &BatchClient<C>,
    ) -> Result<Promise<ListOf<Relationship>>, RemoteError> {
        self.link("memberships", client)
    }

    /// Everything posted to the group.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::link`](crate::remote::RemoteObject::link).
    pub fn assets<C: Transport>(
        &self,
        client: &BatchClient<C>,
    ) -> Result<Promise<ListOf<Asset>>, RemoteError> {
        self.link("assets", client)
    }

    /// Activity in the group.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::link`](crate::remote::RemoteObject::link).
    pub fn events<C: Transport>(
        &self,
        client: &BatchClient<C>,
    ) -> Result<Promise<ListOf<Event>>, RemoteError> {
        self.link("events", client)
    }

    /// Comments posted in the group.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::link`](crate::remote::RemoteObject::link).
    pub fn comments<C: Transport>(
        &self,
        client: &BatchClient<C>,
    ) -> Result<Promise<ListOf<Comment>>, RemoteError> {
        self.link("comments", client)
    }

    /// Posts in the group.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::link`](crate::remote::RemoteObject::link).
    pub fn posts<C: Transport>(
        &self,
        client: &BatchClient<C>,
    ) -> Result<Promise<ListOf<Post>>, RemoteError> {
        self.link("posts", client)
    }

    /// Photos in the group.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::link`](crate::remote::RemoteObject::link).
    pub fn photos<C: Transport>(
        &self,
        client: &BatchClient<C>,
    ) -> Result<Promise<ListOf<Photo>>, RemoteError> {
        self.link("photos", client)
    }

    /// Links shared in the group.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::link`](crate::remote::RemoteObject::link).
    pub fn link_assets<C: Transport>(
        &self,
        client: &BatchClient<C>,
    ) -> Result<Promise<ListOf<LinkAsset>>, RemoteError> {
        self.link("link_assets", client)
    }
}

remote_object! {
    /// An application registered with TypePad.
    Application => APPLICATION
}

impl Application {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.string("name")
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.string("api_key")
    }

    #[must_use]
    pub fn oauth_authorization_url(&self) -> Option<&str> {
        self.string("oauth_authorization_url")
    }
}
