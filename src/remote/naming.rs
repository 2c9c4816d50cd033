//! Name translation between the wire and Rust.
//!
//! The API names properties in camelCase (`displayName`, `urlId`,
//! `avatarLink`); this crate exposes them in snake_case. Identifiers embed
//! their short form after the final `-` (`tag:typepad.com,2003:user-50`).

/// Translates a wire property name into its attribute name.
///
/// `URL` is treated as the word `Url`, every other uppercase letter starts a
/// new underscore-separated word, and hyphens become underscores.
///
/// # Example
///
/// ```rust
/// use typepad::remote::naming::field_name;
///
/// assert_eq!(field_name("displayName"), "display_name");
/// assert_eq!(field_name("profilePageURL"), "profile_page_url");
/// assert_eq!(field_name("by-group"), "by_group");
/// ```
#[must_use]
pub fn field_name(api_name: &str) -> String {
    let normalized = api_name.replace("URL", "Url");
    let mut name = String::with_capacity(normalized.len() + 4);
    for c in normalized.chars() {
        if c.is_ascii_uppercase() {
            name.push('_');
            name.push(c.to_ascii_lowercase());
        } else if c == '-' {
            name.push('_');
        } else {
            name.push(c);
        }
    }
    name
}

/// Returns the wire name to record for an attribute, if it differs.
///
/// Names the translation leaves unchanged need no override.
#[must_use]
pub fn api_name_override(api_name: &str) -> Option<&str> {
    (field_name(api_name) != api_name).then_some(api_name)
}

/// Returns the part of an identifier after its final `-`.
///
/// Identifiers without a `-` are returned whole.
///
/// # Example
///
/// ```rust
/// use typepad::remote::naming::url_id_suffix;
///
/// assert_eq!(url_id_suffix("tag:typepad.com,2003:user-50"), "50");
/// assert_eq!(url_id_suffix("tag:api.typepad.com,2009:6p00e5"), "tag:api.typepad.com,2009:6p00e5");
/// ```
#[must_use]
pub fn url_id_suffix(id: &str) -> &str {
    id.rsplit_once('-').map_or(id, |(_, suffix)| suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_becomes_snake_case() {
        assert_eq!(field_name("totalResults"), "total_results");
        assert_eq!(field_name("objectTypes"), "object_types");
        assert_eq!(field_name("title"), "title");
    }

    #[test]
    fn test_url_is_one_word() {
        assert_eq!(field_name("URL"), "_url");
        assert_eq!(field_name("homepageURL"), "homepage_url");
        assert_eq!(field_name("urlId"), "url_id");
    }

    #[test]
    fn test_hyphens_become_underscores() {
        assert_eq!(field_name("api-key"), "api_key");
    }

    #[test]
    fn test_override_only_when_changed() {
        assert_eq!(api_name_override("displayName"), Some("displayName"));
        assert_eq!(api_name_override("title"), None);
    }

    #[test]
    fn test_suffix_uses_last_hyphen() {
        assert_eq!(url_id_suffix("tag:typepad.com,2003:asset-17-94"), "94");
        assert_eq!(url_id_suffix("trailing-"), "");
    }
}
