//! The remote-object mapping layer.
//!
//! This module turns API JSON into typed objects and back, and fetches
//! related resources lazily:
//!
//! - [`Field`] and [`FieldKind`]: declared attributes and how they decode
//! - [`ObjectClass`]: static class metadata with single inheritance
//! - [`RemoteObject`]: an instance, with reclassification by `objectTypes`
//! - [`Promise`]: a memoized handle to a resource, delivered in batches
//! - [`ListObject`] and [`ListOf`]: paginated collections with
//!   [`filter`](Promise::filter) and [`slice`](Promise::slice)
//! - [`Link`] and [`LinkSet`]: link records with relation and size lookups
//!
//! # Example
//!
//! ```rust,ignore
//! use typepad::{BatchClient, ClientConfig};
//! use typepad::api::{Asset, Group};
//! use typepad::remote::{ListOf, RemoteType};
//!
//! let client = BatchClient::new(ClientConfig::default())?;
//!
//! client.batch_request()?;
//! let group = Group::get_by_url_id(&client, "6p0120a5e990ac970c")?;
//! group.register(&client)?;
//! client.complete_batch().await?;
//! let group = group.deliver(&client).await?;
//!
//! client.batch_request()?;
//! let posts = group
//!     .link::<ListOf<Asset>, _>("assets", &client)?
//!     .filter(&client, &[("post", true.into())])?
//!     .slice(&client, 0..10)?;
//! posts.register(&client)?;
//! client.complete_batch().await?;
//!
//! for post in posts.deliver(&client).await?.iter() {
//!     println!("{:?}", post.title());
//! }
//! ```

mod class;
mod errors;
mod fields;
pub mod filter;
mod link;
mod list;
pub mod naming;
mod object;
mod promise;
pub mod registry;
mod resource;

pub use class::{ObjectClass, URL_ID_PLACEHOLDER};
pub use errors::{DecodeError, FilterError, LinkSetError, RemoteError};
pub use fields::{
    parse_datetime, Element, Field, FieldKind, FieldValue, LinkPath, LinkTarget, DATETIME_FORMAT,
};
pub use filter::FilterValue;
pub use link::{Link, LinkSet, Selection};
pub use list::{ListObject, ListOf};
pub use object::{RemoteObject, OBJECT_TYPES_KEY};
pub use promise::{Promise, PromiseStatus};
pub use resource::{accepts_object, decode_object, RemoteType, Resource};
