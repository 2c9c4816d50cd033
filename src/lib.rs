//! # TypePad API Rust Client
//!
//! A Rust client for the TypePad REST API that maps its JSON payloads onto
//! typed remote objects, fetched lazily and in batches.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - A batching client, [`BatchClient`], that collects requests and sends them together
//! - Declarative object classes with field descriptors, in [`remote`]
//! - Automatic reclassification of payloads by their `objectTypes`
//! - Lazy links that fetch related objects and lists on demand, as [`remote::Promise`]s
//! - List resources with URL filters and slicing
//! - The TypePad object types themselves, in [`api`]
//!
//! ## Quick Start
//!
//! ```rust
//! use typepad::{ApiEndpoint, BatchClient, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .endpoint(ApiEndpoint::new("https://api.typepad.com").unwrap())
//!     .user_agent_prefix("MyApp/1.0")
//!     .build()
//!     .unwrap();
//!
//! let client = BatchClient::new(config).unwrap();
//! assert!(!client.has_open_batch());
//! ```
//!
//! ## Fetching Objects
//!
//! Promises are created unresolved. Registered promises are fetched together
//! when the batch completes:
//!
//! ```rust,ignore
//! use typepad::api::{Group, User};
//! use typepad::remote::RemoteType;
//!
//! client.batch_request()?;
//! let me = User::get_self(&client)?;
//! let group = Group::get_by_url_id(&client, "6p0120a5e990ac970c")?;
//! me.register(&client)?;
//! group.register(&client)?;
//! client.complete_batch().await?;
//!
//! let me = me.deliver(&client).await?;
//! let group = group.deliver(&client).await?;
//! ```
//!
//! ## Following Links
//!
//! Links declared on a class compute their URL from the owning object. A
//! list can be narrowed with filters and sliced before it is fetched:
//!
//! ```rust,ignore
//! use typepad::remote::FilterValue;
//!
//! client.batch_request()?;
//! let following = me
//!     .relationships(&client)?
//!     .filter(&client, &[("following", true.into()), ("by_group", FilterValue::entity(&group))])?
//!     .slice(&client, 0..25)?;
//! following.register(&client)?;
//! client.complete_batch().await?;
//!
//! for relationship in following.deliver(&client).await?.iter() {
//!     println!("{:?}", relationship.target().map(|t| t.class_name()));
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration and batches live on the client instance
//! - **Fail-fast validation**: Configuration newtypes validate on construction
//! - **Thread-safe**: Clients, objects and promises are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio async runtime

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod remote;

// Re-export public types at crate root for convenience
pub use config::{ApiEndpoint, ClientConfig, ClientConfigBuilder};
pub use error::ConfigError;

// Re-export client types
pub use clients::{
    BatchClient, BatchError, HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
    Transport,
};

// Re-export the object model
pub use remote::{
    DecodeError, FilterError, ListOf, Promise, PromiseStatus, RemoteError, RemoteObject,
    RemoteType, Resource,
};
