//! Object class metadata.
//!
//! Every type the API exposes is described by one `static` [`ObjectClass`]:
//! its name, parent class, discriminator tag, declared fields and collection
//! endpoint. Classes are plain data, so the whole hierarchy is built at
//! compile time and never changes.

use std::fmt;
use std::ptr;

use crate::remote::fields::Field;

/// Placeholder for the URL identifier in endpoint templates.
pub const URL_ID_PLACEHOLDER: &str = "{url_id}";

/// Static description of a remote object type.
///
/// # Example
///
/// ```rust
/// use typepad::remote::{Field, ObjectClass};
///
/// const BASE_FIELDS: &[Field] = &[Field::scalar("id")];
/// const NOTE_FIELDS: &[Field] = &[Field::scalar("text")];
///
/// static BASE: ObjectClass = ObjectClass::new("Base", None, BASE_FIELDS);
/// static NOTE: ObjectClass = ObjectClass::new("Note", Some(&BASE), NOTE_FIELDS)
///     .object_type("tag:example.com,2009:Note")
///     .endpoint("/notes/{url_id}.json");
///
/// assert!(NOTE.is_subclass_of(&BASE));
/// assert!(NOTE.find_field("id").is_some());
/// assert_eq!(NOTE.path_for("n1").as_deref(), Some("/notes/n1.json"));
/// ```
pub struct ObjectClass {
    /// The class name, unique across the registry.
    pub name: &'static str,
    /// The class this one extends.
    pub parent: Option<&'static ObjectClass>,
    /// The `objectTypes` tag that identifies this class on the wire.
    pub object_type: Option<&'static str>,
    /// Fields declared directly on this class.
    pub fields: &'static [Field],
    /// Template for the URL of a single instance, with a `{url_id}` placeholder.
    pub endpoint: Option<&'static str>,
    /// Whether instances may only be fetched as part of a batch.
    pub batch_requests: bool,
}

impl ObjectClass {
    /// Creates a class with no tag or endpoint that requires batched delivery.
    #[must_use]
    pub const fn new(
        name: &'static str,
        parent: Option<&'static Self>,
        fields: &'static [Field],
    ) -> Self {
        Self {
            name,
            parent,
            object_type: None,
            fields,
            endpoint: None,
            batch_requests: true,
        }
    }

    /// Sets the discriminator tag.
    #[must_use]
    pub const fn object_type(mut self, tag: &'static str) -> Self {
        self.object_type = Some(tag);
        self
    }

    /// Sets the endpoint template.
    #[must_use]
    pub const fn endpoint(mut self, template: &'static str) -> Self {
        self.endpoint = Some(template);
        self
    }

    /// Sets whether instances may only be fetched in a batch.
    #[must_use]
    pub const fn batch_requests(mut self, batch_requests: bool) -> Self {
        self.batch_requests = batch_requests;
        self
    }

    /// Iterates over this class and its ancestors, most specific first.
    pub fn lineage(&'static self) -> impl Iterator<Item = &'static Self> {
        std::iter::successors(Some(self), |class| class.parent)
    }

    /// Returns `true` if this class is `other` or descends from it.
    #[must_use]
    pub fn is_subclass_of(&self, other: &Self) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if ptr::eq(class, other) {
                return true;
            }
            current = class.parent;
        }
        false
    }

    /// Returns every field of the class, ancestors' fields first.
    ///
    /// A field redeclared by a subclass replaces the inherited one in place.
    #[must_use]
    pub fn all_fields(&self) -> Vec<&'static Field> {
        let mut fields: Vec<&'static Field> = match self.parent {
            Some(parent) => parent.all_fields(),
            None => Vec::new(),
        };
        for field in self.fields {
            match fields.iter_mut().find(|f| f.name == field.name) {
                Some(slot) => *slot = field,
                None => fields.push(field),
            }
        }
        fields
    }

    /// Finds a field by attribute name, searching ancestors too.
    #[must_use]
    pub fn find_field(&self, name: &str) -> Option<&'static Field> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .or_else(|| self.parent.and_then(|parent| parent.find_field(name)))
    }

    /// Returns the nearest discriminator tag declared on this class or an ancestor.
    #[must_use]
    pub fn effective_object_type(&self) -> Option<&'static str> {
        self.object_type
            .or_else(|| self.parent.and_then(Self::effective_object_type))
    }

    /// Fills the endpoint template with `url_id`.
    #[must_use]
    pub fn path_for(&self, url_id: &str) -> Option<String> {
        self.endpoint
            .map(|template| template.replace(URL_ID_PLACEHOLDER, url_id))
    }
}

impl PartialEq for ObjectClass {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other)
    }
}

impl Eq for ObjectClass {}

impl fmt::Debug for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectClass").field(&self.name).finish()
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
