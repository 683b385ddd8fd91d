//! Get trait for fetching single resources.

use async_trait::async_trait;

use crate::client::DynatraceClient;
use crate::error::Result;

/// Fetch a single resource by ID.
///
/// Implement this trait for model types that can be fetched individually
/// (an entity by its entity ID, an entity type by its type name).
///
/// # Example
///
/// ```ignore
/// use dtapi::{DynatraceClient, Entity, Get};
///
/// let client = DynatraceClient::from_env()?;
/// let host = Entity::get(&client, "HOST-0123456789ABCDEF".to_string()).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this resource.
    type Id;

    /// Fetch the resource by ID.
    ///
    /// # Arguments
    ///
    /// * `client` - The Dynatrace API client
    /// * `id` - The resource identifier
    ///
    /// # Errors
    ///
    /// Returns [`DynatraceError::NotFound`](crate::DynatraceError::NotFound)
    /// if the server reports 404, or another error if the request fails.
    async fn get(client: &DynatraceClient, id: Self::Id) -> Result<Self>;
}
