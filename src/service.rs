//! Entity service.
//!
//! A thin façade over the entity endpoints, bound to a borrowed client.

use crate::client::DynatraceClient;
use crate::error::Result;
use crate::models::{
    get_entity, Entity, EntityGetQuery, EntityListQuery, EntityType, EntityTypeListQuery,
};
use crate::pagination::PaginatedList;
use crate::traits::{Get, List};

/// Lazy listing of monitored entities.
pub type EntityList<'a> = PaginatedList<'a, Entity, EntityListQuery>;

/// Lazy listing of entity types.
pub type EntityTypeList<'a> = PaginatedList<'a, EntityType, EntityTypeListQuery>;

/// Operations on monitored entities and entity types.
///
/// Obtained from [`DynatraceClient::entities`]. Listing methods return a
/// fresh [`PaginatedList`] per call and send nothing until it is driven.
#[derive(Debug, Clone, Copy)]
pub struct EntityService<'a> {
    client: &'a DynatraceClient,
}

impl<'a> EntityService<'a> {
    /// Bind the service to a client.
    pub fn new(client: &'a DynatraceClient) -> Self {
        Self { client }
    }

    /// List entities matching `entity_selector` over the last two hours,
    /// 50 per page.
    pub fn list(&self, entity_selector: impl Into<String>) -> EntityList<'a> {
        self.list_with_query(EntityListQuery::new(entity_selector))
    }

    /// List entities with an explicit query.
    pub fn list_with_query(&self, query: EntityListQuery) -> EntityList<'a> {
        tracing::debug!(selector = %query.entity_selector, "listing entities");
        Entity::list(self.client, query)
    }

    /// List all entity types.
    ///
    /// `page_size` is passed through unchecked; the server allows at most 500.
    pub fn list_types(&self, page_size: u32) -> EntityTypeList<'a> {
        EntityType::list(self.client, EntityTypeListQuery { page_size })
    }

    /// Fetch one entity by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entity does not exist.
    pub async fn get(&self, entity_id: &str) -> Result<Entity> {
        Entity::get(self.client, entity_id.to_string()).await
    }

    /// Fetch one entity with a timeframe or field projection.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entity does not exist.
    pub async fn get_with_query(&self, entity_id: &str, query: &EntityGetQuery) -> Result<Entity> {
        get_entity(self.client, entity_id, query).await
    }

    /// Fetch the schema of one entity type.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the type is unknown.
    pub async fn get_type(&self, type_name: &str) -> Result<EntityType> {
        EntityType::get(self.client, type_name.to_string()).await
    }
}
