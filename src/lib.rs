//! Dynatrace API client library.
//!
//! A Rust library for the Dynatrace Environment API v2 entity endpoints.
//! Listing is lazy: a call returns a [`PaginatedList`] that fetches pages
//! (following the server's `nextPageKey` cursor) only as it is consumed.
//!
//! # Quick Start
//!
//! ```no_run
//! use dtapi::{DynatraceClient, EntityListQuery};
//!
//! #[tokio::main]
//! async fn main() -> dtapi::Result<()> {
//!     // Create client from environment variables
//!     let client = DynatraceClient::from_env()?;
//!     let entities = client.entities();
//!
//!     // Walk all hosts seen in the last two hours
//!     let mut hosts = entities.list("type(HOST)");
//!     while let Some(host) = hosts.try_next().await? {
//!         println!("{:?} {:?}", host.entity_id, host.display_name);
//!     }
//!
//!     // Narrow the timeframe and collect everything at once
//!     let services = entities
//!         .list_with_query(EntityListQuery::new("type(SERVICE)").time_from("now-1d"))
//!         .collect_all()
//!         .await?;
//!     println!("Found {} services", services.len());
//!
//!     // Entity type schemas
//!     let types = entities.list_types(50).collect_all().await?;
//!     println!("Found {} entity types", types.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`DynatraceClient`] - authenticated HTTP transport
//! - [`EntityService`] - façade borrowing the client, one method per operation
//! - [`PaginatedList`] - lazy cursor pagination shared by list endpoints
//! - [`Get`] / [`List`] - traits implemented by model types
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `DT_API_TOKEN` (required) - API token with the `entities.read` scope
//! - `DT_ENV_URL` (required) - Environment URL, e.g. `https://abc12345.live.dynatrace.com`

mod client;
mod error;
mod models;
mod pagination;
mod service;
mod traits;

pub mod cli;
pub mod output;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::DynatraceClient;
pub use error::{DynatraceError, Result};
pub use pagination::{Page, PaginatedList, MAX_PAGES};
pub use service::{EntityList, EntityService, EntityTypeList};

// Re-export traits
pub use traits::{Get, List, DEFAULT_PAGE_SIZE};

// Re-export models
pub use models::{
    // Entity types
    get_entity,
    Entity,
    EntityGetQuery,
    EntityListQuery,
    DEFAULT_FROM,
    DEFAULT_TO,
    // Entity type schemas
    EntityType,
    EntityTypeListQuery,
    EntityTypeProperty,
    RelationshipType,
    // Shared value types
    EntityShortRepresentation,
    ManagementZone,
    MeTag,
};
