//! Members and their profiles.

use crate::api::TYPEPAD_OBJECT;
use crate::clients::{BatchClient, Transport};
use crate::remote::{
    Element, Field, LinkPath, LinkTarget, ListOf, ObjectClass, Promise, RemoteError,
    RemoteObject, RemoteType,
};

use super::{Event, Favorite, Relationship};

const fn by_user(segment: &'static str) -> LinkPath {
    LinkPath::UrlId {
        collection: "users",
        segment,
    }
}

const USER_FIELDS: &[Field] = &[
    Field::scalar("id"),
    Field::scalar("url_id").api_name("urlId"),
    Field::scalar("display_name").api_name("displayName"),
    Field::scalar("preferred_username").api_name("preferredUsername"),
    Field::scalar("profile_alias").api_name("profileAlias"),
    Field::scalar("about_me").api_name("aboutMe"),
    Field::list("interests", Element::Scalar),
    Field::list("urls", Element::Scalar),
    Field::list("accounts", Element::Object("Account")),
    Field::links("links"),
    Field::scalar("email"),
    Field::scalar("userpic"),
    Field::scalar("profile_page_url").api_name("profilePageUrl"),
    Field::link("profile", LinkTarget::Object("UserProfile"), by_user("profile")),
    Field::link("events", LinkTarget::List("Event"), by_user("events")),
    Field::link("notifications", LinkTarget::List("Event"), by_user("notifications")),
    Field::link("relationships", LinkTarget::List("Relationship"), by_user("relationships")),
    Field::link("memberships", LinkTarget::List("Relationship"), by_user("memberships")),
    Field::link("favorites", LinkTarget::List("Favorite"), by_user("favorites")),
    Field::link("comments", LinkTarget::List("Comment"), by_user("comments")),
    Field::link(
        "elsewhere_accounts",
        LinkTarget::List("Account"),
        by_user("elsewhere-accounts"),
    ),
];

/// Class of [`User`].
pub static USER: ObjectClass = ObjectClass::new("User", Some(&TYPEPAD_OBJECT), USER_FIELDS)
    .object_type("tag:api.typepad.com,2009:User")
    .endpoint("/users/{url_id}.json");

fn user_of_profile(profile: &RemoteObject) -> Option<String> {
    profile.url_id().map(|url_id| format!("/users/{url_id}.json"))
}

const USER_PROFILE_FIELDS: &[Field] = &[
    Field::scalar("id"),
    Field::scalar("url_id").api_name("urlId"),
    Field::scalar("display_name").api_name("displayName"),
    Field::scalar("preferred_username").api_name("preferredUsername"),
    Field::scalar("about_me").api_name("aboutMe"),
    Field::list("interests", Element::Scalar),
    Field::scalar("email"),
    Field::scalar("gender"),
    Field::scalar("homepage_url").api_name("homepageUrl"),
    Field::scalar("profile_page_url").api_name("profilePageUrl"),
    Field::scalar("profile_edit_page_url").api_name("profileEditPageUrl"),
    Field::scalar("membership_management_page_url").api_name("membershipManagementPageUrl"),
    Field::link(
        "user",
        LinkTarget::Object("User"),
        LinkPath::Custom(user_of_profile),
    ),
];

/// Class of [`UserProfile`].
pub static USER_PROFILE: ObjectClass =
    ObjectClass::new("UserProfile", Some(&TYPEPAD_OBJECT), USER_PROFILE_FIELDS)
        .endpoint("/users/{url_id}/profile.json");

const ACCOUNT_FIELDS: &[Field] = &[
    Field::scalar("id"),
    Field::scalar("domain"),
    Field::scalar("username"),
    Field::scalar("user_id").api_name("userId"),
    Field::scalar("url"),
    Field::scalar("provider_name").api_name("providerName"),
    Field::scalar("provider_url").api_name("providerURL"),
    Field::scalar("provider_icon_url").api_name("providerIconURL"),
    Field::scalar("crosspostable"),
];

/// Class of [`Account`].
pub static ACCOUNT: ObjectClass = ObjectClass::new("Account", Some(&TYPEPAD_OBJECT), ACCOUNT_FIELDS);

remote_object! {
    /// A TypePad member.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use typepad::api::User;
    ///
    /// client.batch_request()?;
    /// let me = User::get_self(&client)?;
    /// me.register(&client)?;
    /// client.complete_batch().await?;
    ///
    /// let me = me.deliver(&client).await?;
    /// println!("Signed in as {:?}", me.display_name());
    /// ```
    User => USER
}

impl User {
    /// Returns a promise for the authenticated member.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Http`] if the URL cannot be resolved.
    pub fn get_self<C: Transport>(client: &BatchClient<C>) -> Result<Promise<Self>, RemoteError> {
        Self::get(client, "/users/@self.json")
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.string("display_name")
    }

    #[must_use]
    pub fn preferred_username(&self) -> Option<&str> {
        self.string("preferred_username")
    }

    #[must_use]
    pub fn about_me(&self) -> Option<&str> {
        self.string("about_me")
    }

    #[must_use]
    pub fn interests(&self) -> Vec<&str> {
        self.strings("interests")
    }

    /// Returns the accounts this member holds elsewhere, as embedded in the
    /// member's own payload.
    #[must_use]
    pub fn accounts(&self) -> Vec<Account> {
        self.objects("accounts")
            .into_iter()
            .cloned()
            .map(Account::from)
            .collect()
    }

    /// The member's extended profile.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::link`].
    pub fn profile<C: Transport>(
        &self,
        client: &BatchClient<C>,
    ) -> Result<Promise<UserProfile>, RemoteError> {
        self.link("profile", client)
    }

    /// Things the member did.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::link`].
    pub fn events<C: Transport>(
        &self,
        client: &BatchClient<C>,
    ) -> Result<Promise<ListOf<Event>>, RemoteError> {
        self.link("events", client)
    }

    /// Things that happened to people and groups the member follows.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::link`].
    pub fn notifications<C: Transport>(
        &self,
        client: &BatchClient<C>,
    ) -> Result<Promise<ListOf<Event>>, RemoteError> {
        self.link("notifications", client)
    }

    /// The member's relationships with other members.
    ///
    /// Narrow with [`Promise::filter`], for example
    /// `("following", true.into())` or `("by_group", group.into())`.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::link`].
    pub fn relationships<C: Transport>(
        &self,
        client: &BatchClient<C>,
    ) -> Result<Promise<ListOf<Relationship>>, RemoteError> {
        self.link("relationships", client)
    }

    /// The member's group memberships.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::link`].
    pub fn memberships<C: Transport>(
        &self,
        client: &BatchClient<C>,
    ) -> Result<Promise<ListOf<Relationship>>, RemoteError> {
        self.link("memberships", client)
    }

    /// Assets the member marked as favorites.
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

remote_object! {
    /// A member's extended profile.
    UserProfile => USER_PROFILE
}

impl UserProfile {
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.string("display_name")
    }

    #[must_use]
    pub fn homepage_url(&self) -> Option<&str> {
        self.string("homepage_url")
    }

    /// The member this profile belongs to.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::link`].
    pub fn user<C: Transport>(&self, client: &BatchClient<C>) -> Result<Promise<User>, RemoteError> {
        self.link("user", client)
    }
}

remote_object! {
    /// An account a member holds on another service.
    Account => ACCOUNT
}

impl Account {
    #[must_use]
    pub fn provider_name(&self) -> Option<&str> {
        self.string("provider_name")
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.string("username")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::remote::PromiseStatus;
    use serde_json::json;

    fn client() -> BatchClient {
        BatchClient::new(ClientConfig::default()).unwrap()
    }

    #[test]
    fn test_get_self_targets_self_endpoint() {
        let client = client();
        let me = User::get_self(&client).unwrap();
        assert_eq!(me.url().as_str(), "https://api.typepad.com/users/@self.json");
    }

    #[test]
    fn test_get_by_url_id_fills_endpoint() {
        let client = client();
        let user = User::get_by_url_id(&client, "6p00e5").unwrap();
        assert_eq!(user.url().as_str(), "https://api.typepad.com/users/6p00e5.json");

        let profile = UserProfile::get_by_url_id(&client, "6p00e5").unwrap();
        assert_eq!(
            profile.url().as_str(),
            "https://api.typepad.com/users/6p00e5/profile.json"
        );

        assert!(matches!(
            Account::get_by_url_id(&client, "a1"),
            Err(RemoteError::NoEndpoint { class: "Account" })
        ));
    }

    #[test]
    fn test_links_are_computed_from_url_id() {
        let client = client();
        let user = User::from_dict(&json!({"id": "tag:typepad.com,2003:user-50"})).unwrap();

        let events = user.events(&client).unwrap();
        assert_eq!(
            events.url().as_str(),
            "https://api.typepad.com/users/50/events.json"
        );

        let user = User::from_dict(&json!({"urlId": "6p00e5"})).unwrap();
        let elsewhere = user
            .link::<ListOf<Account>, _>("elsewhere_accounts", &client)
            .unwrap();
        assert_eq!(elsewhere.url().path(), "/users/6p00e5/elsewhere-accounts.json");
    }

    #[test]
    fn test_links_need_an_identifier() {
        let client = client();
        let anonymous = User::from(RemoteObject::new(&USER));
        assert!(matches!(
            anonymous.events(&client),
            Err(RemoteError::MissingLinkUrl { name: "events", .. })
        ));
    }

    #[test]
    fn test_profile_links_back_to_user() {
        let client = client();
        let profile = UserProfile::from_dict(&json!({"urlId": "6p00e5"})).unwrap();
        let user = profile.user(&client).unwrap();
        assert_eq!(user.url().path(), "/users/6p00e5.json");
        assert_eq!(user.status(), PromiseStatus::Unresolved);
    }

    #[test]
    fn test_embedded_accounts_decode() {
        let user = User::from_dict(&json!({
            "accounts": [{"providerName": "Twitter", "username": "mel"}]
        }))
        .unwrap();
        let accounts = user.accounts();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].provider_name(), Some("Twitter"));
        assert_eq!(accounts[0].username(), Some("mel"));

        let paged = User::from_dict(&json!({
            "accounts": {"totalResults": 1, "entries": [{"providerName": "Flickr"}]}
        }))
        .unwrap();
        assert_eq!(paged.accounts()[0].provider_name(), Some("Flickr"));
    }

    #[test]
    fn test_make_self_link() {
        let client = client();
        let user = User::from_dict(&json!({"urlId": "6p00e5"})).unwrap();
        assert_eq!(
            user.make_self_link(&client).map(String::from).as_deref(),
            Some("https://api.typepad.com/users/6p00e5.json")
        );
        let account = Account::from_dict(&json!({"id": "a-1"})).unwrap();
        assert!(account.make_self_link(&client).is_none());
    }
}
