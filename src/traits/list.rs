//! List trait for lazily paginated collections.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::DynatraceClient;
use crate::pagination::PaginatedList;

/// Default page size for list operations.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// List resources through a cursor-paginated endpoint.
///
/// Implementors name the endpoint and the response key that holds each
/// page's items. Listing returns a [`PaginatedList`] and performs no
/// request until it is driven.
///
/// # Example
///
/// ```ignore
/// use dtapi::{DynatraceClient, Entity, EntityListQuery, List};
///
/// let client = DynatraceClient::from_env()?;
/// let hosts = Entity::list(&client, EntityListQuery::new("type(HOST)"))
///     .collect_all()
///     .await?;
/// ```
pub trait List: DeserializeOwned {
    /// Query parameters sent with the first page request.
    type Query: Serialize;

    /// Endpoint path, relative to the environment URL.
    const PATH: &'static str;

    /// Response key holding the page's items.
    const LIST_ITEM: &'static str;

    /// Start a lazy listing with the given query.
    fn list(client: &DynatraceClient, query: Self::Query) -> PaginatedList<'_, Self, Self::Query> {
        PaginatedList::new(client, Self::PATH, Self::LIST_ITEM, query)
    }
}
