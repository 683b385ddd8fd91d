//! Entity type metadata and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::DynatraceClient;
use crate::error::{DynatraceError, Result};
use crate::traits::{Get, List, DEFAULT_PAGE_SIZE};

/// Schema of one entity category (`HOST`, `SERVICE`, `PROCESS_GROUP`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityType {
    /// The type name, e.g. `HOST`.
    #[serde(rename = "type", default)]
    pub entity_type: Option<String>,

    /// Human-readable name of the type.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Dimension key used for this type in metric queries.
    #[serde(default)]
    pub dimension_key: Option<String>,

    /// Whether the environment holds more entities of this type than allowed.
    #[serde(default)]
    pub entity_limit_exceeded: bool,

    /// Properties an entity of this type can carry.
    #[serde(default)]
    pub properties: Vec<EntityTypeProperty>,

    /// Tag field descriptor.
    #[serde(default)]
    pub tags: Option<String>,

    /// Management zone field descriptor.
    #[serde(default)]
    pub management_zones: Option<String>,

    /// Relationships where this type is the source.
    #[serde(default)]
    pub from_relationships: Vec<RelationshipType>,

    /// Relationships where this type is the target.
    #[serde(default)]
    pub to_relationships: Vec<RelationshipType>,
}

impl EntityType {
    /// Look up a property definition by ID.
    pub fn property(&self, id: &str) -> Option<&EntityTypeProperty> {
        self.properties.iter().find(|p| p.id.as_deref() == Some(id))
    }
}

/// A property an entity type can carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityTypeProperty {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A relationship kind between entity types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipType {
    /// Relationship name, e.g. `isProcessOf`.
    #[serde(default)]
    pub id: Option<String>,

    /// Target types (outgoing relationships).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_types: Vec<String>,

    /// Source types (incoming relationships).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_types: Vec<String>,
}

/// Query parameters for listing entity types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityTypeListQuery {
    /// Types per page. The server caps this at 500.
    pub page_size: u32,
}

impl Default for EntityTypeListQuery {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[async_trait]
impl Get for EntityType {
    type Id = String; // Type name

    #[tracing::instrument(skip(client))]
    async fn get(client: &DynatraceClient, type_name: String) -> Result<Self> {
        let path = format!("{}/{}", Self::PATH, urlencoding::encode(&type_name));

        let response = client
            .get(&path)
            .await
            .map_err(|e| e.or_not_found("EntityType", &type_name))?;
        let entity_type: EntityType = response.json().await.map_err(DynatraceError::HttpError)?;
        Ok(entity_type)
    }
}

impl List for EntityType {
    type Query = EntityTypeListQuery;

    const PATH: &'static str = "/api/v2/entityTypes";
    const LIST_ITEM: &'static str = "types";
}
