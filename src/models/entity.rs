//! Monitored entity model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::client::DynatraceClient;
use crate::error::{DynatraceError, Result};
use crate::models::common::{ManagementZone, MeTag};
use crate::traits::{Get, List, DEFAULT_PAGE_SIZE};

/// Default start of the query timeframe.
pub const DEFAULT_FROM: &str = "now-2h";

/// Default end of the query timeframe.
pub const DEFAULT_TO: &str = "now";

/// A monitored entity (host, process group, service, ...).
///
/// Decoded from one item of the `entities` array. Every field defaults
/// when its key is missing; only `entityId`, `displayName`, `properties`
/// and `tags` are read from the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// The ID of the entity, e.g. `HOST-0123456789ABCDEF`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    /// The name of the entity, displayed in the UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Entity properties keyed by property ID. `null` reads as empty.
    #[serde(
        default,
        deserialize_with = "null_as_empty_map",
        skip_serializing_if = "Map::is_empty"
    )]
    pub properties: Map<String, Value>,

    /// Tags in the order the server returned them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<MeTag>,
}

fn null_as_empty_map<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Entity {
    /// Entity type derived from the ID prefix (`HOST-...` gives `HOST`).
    pub fn entity_type(&self) -> Option<&str> {
        self.entity_id
            .as_deref()
            .and_then(|id| id.rsplit_once('-'))
            .map(|(prefix, _)| prefix)
    }

    /// Look up a single property.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Find the first tag with the given key.
    pub fn tag(&self, key: &str) -> Option<&MeTag> {
        self.tags.iter().find(|t| t.key.as_deref() == Some(key))
    }

    /// Check whether a tag with the given key is attached.
    pub fn has_tag(&self, key: &str) -> bool {
        self.tag(key).is_some()
    }

    /// Management zones of the entity. Not read from the payload; always empty.
    pub fn management_zones(&self) -> Vec<ManagementZone> {
        Vec::new()
    }

    /// Outgoing relationships. Not read from the payload; always empty.
    pub fn from_relationships(&self) -> &str {
        ""
    }

    /// Incoming relationships. Not read from the payload; always empty.
    pub fn to_relationships(&self) -> &str {
        ""
    }

    /// When the entity was first seen. Not read from the payload; always `None`.
    pub fn first_seen_t_ms(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// When the entity was last seen. Not read from the payload; always `None`.
    pub fn last_seen_t_ms(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Query parameters for listing entities.
///
/// Field order matches the query string the server receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityListQuery {
    /// Entities per page. The server caps this at 500.
    pub page_size: u32,

    /// Entity selector, e.g. `type(HOST),tag(team:ops)`. Validated server-side.
    pub entity_selector: String,

    /// Start of the timeframe (`now-2h`, ISO timestamp or epoch millis).
    pub from: String,

    /// End of the timeframe.
    pub to: String,

    /// Extra fields to project, comma-separated (e.g. `+properties,+tags`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

impl EntityListQuery {
    /// Query for `entity_selector` over the last two hours.
    pub fn new(entity_selector: impl Into<String>) -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            entity_selector: entity_selector.into(),
            from: DEFAULT_FROM.to_string(),
            to: DEFAULT_TO.to_string(),
            fields: None,
        }
    }

    /// Set the start of the timeframe.
    #[must_use]
    pub fn time_from(mut self, time_from: impl Into<String>) -> Self {
        self.from = time_from.into();
        self
    }

    /// Set the end of the timeframe.
    #[must_use]
    pub fn time_to(mut self, time_to: impl Into<String>) -> Self {
        self.to = time_to.into();
        self
    }

    /// Set the field projection.
    #[must_use]
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Set the page size.
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Optional query parameters for fetching a single entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityGetQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

/// Fetch one entity with explicit query parameters.
#[tracing::instrument(skip(client))]
pub async fn get_entity(
    client: &DynatraceClient,
    entity_id: &str,
    query: &EntityGetQuery,
) -> Result<Entity> {
    let path = format!("{}/{}", Entity::PATH, urlencoding::encode(entity_id));

    let response = client
        .get_with_query(&path, query)
        .await
        .map_err(|e| e.or_not_found("Entity", entity_id))?;
    let entity: Entity = response.json().await.map_err(DynatraceError::HttpError)?;
    Ok(entity)
}

#[async_trait]
impl Get for Entity {
    type Id = String; // Entity ID

    async fn get(client: &DynatraceClient, entity_id: String) -> Result<Self> {
        get_entity(client, &entity_id, &EntityGetQuery::default()).await
    }
}

impl List for Entity {
    type Query = EntityListQuery;

    const PATH: &'static str = "/api/v2/entities";
    const LIST_ITEM: &'static str = "entities";
}
