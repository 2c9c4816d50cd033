//! Lookup of object classes by name and by discriminator tag.
//!
//! The table is the static [`CLASSES`](crate::api::CLASSES) list. It is
//! complete at compile time, so lookups need no registration step and no
//! locking.

use crate::api::CLASSES;
use crate::remote::class::ObjectClass;
use crate::remote::errors::DecodeError;

/// Authority and date prefix of every TypePad discriminator tag.
pub const TAG_PREFIX: &str = "tag:api.typepad.com,2009:";

/// Returns every registered class.
#[must_use]
pub fn classes() -> &'static [&'static ObjectClass] {
    CLASSES
}

/// Finds a class by name.
#[must_use]
pub fn class_named(name: &str) -> Option<&'static ObjectClass> {
    CLASSES.iter().copied().find(|class| class.name == name)
}

/// Finds the class that declares the given discriminator tag.
#[must_use]
pub fn class_for_tag(tag: &str) -> Option<&'static ObjectClass> {
    CLASSES
        .iter()
        .copied()
        .find(|class| class.object_type == Some(tag))
}

/// Finds a class by name, failing with [`DecodeError::UnknownClass`].
///
/// # Errors
///
/// Returns [`DecodeError::UnknownClass`] if no class has that name.
pub fn resolve(name: &str) -> Result<&'static ObjectClass, DecodeError> {
    class_named(name).ok_or_else(|| DecodeError::UnknownClass {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        for (i, class) in CLASSES.iter().enumerate() {
            assert!(
                CLASSES[i + 1..].iter().all(|other| other.name != class.name),
                "duplicate class name {}",
                class.name
            );
        }
    }

    #[test]
    fn test_tags_are_unique_and_prefixed() {
        let tags: Vec<&str> = CLASSES.iter().filter_map(|c| c.object_type).collect();
        for (i, tag) in tags.iter().enumerate() {
            assert!(tag.starts_with(TAG_PREFIX));
            assert!(!tags[i + 1..].contains(tag), "duplicate tag {tag}");
        }
    }

    #[test]
    fn test_lookup_by_tag() {
        let post = class_for_tag("tag:api.typepad.com,2009:Post").unwrap();
        assert_eq!(post.name, "Post");
        assert_eq!(
            class_for_tag("tag:api.typepad.com,2009:Link").unwrap().name,
            "LinkAsset"
        );
        assert!(class_for_tag("tag:api.typepad.com,2009:Nonsense").is_none());
    }

    #[test]
    fn test_field_class_references_resolve() {
        use crate::remote::fields::{Element, FieldKind};

        for class in CLASSES {
            for field in class.fields {
                let referenced = match field.kind {
                    FieldKind::Object(name)
                    | FieldKind::ListOf(name)
                    | FieldKind::List(Element::Object(name))
                    | FieldKind::Dict(Element::Object(name)) => Some(name),
                    FieldKind::Link { target, .. } => Some(target.class_name()),
                    _ => None,
                };
                if let Some(name) = referenced {
                    assert!(
                        resolve(name).is_ok(),
                        "{}.{} refers to unknown class {name}",
                        class.name,
                        field.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_unknown_class() {
        assert_eq!(
            resolve("Nope"),
            Err(DecodeError::UnknownClass {
                name: "Nope".to_string()
            })
        );
    }
}
