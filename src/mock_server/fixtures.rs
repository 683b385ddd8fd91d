//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use serde_json::{json, Map, Value};

use crate::{Entity, EntityType, EntityTypeProperty, MeTag, RelationshipType};

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// The default data set served by [`MockServer::start`](super::MockServer::start).
pub struct DefaultScenario {
    pub entities: Vec<Entity>,
    pub entity_types: Vec<EntityType>,
}

impl Fixtures {
    // =========================================================================
    // Entity Fixtures
    // =========================================================================

    /// Create an entity with an ID and display name only.
    pub fn minimal_entity(entity_id: &str, display_name: &str) -> Entity {
        Entity {
            entity_id: Some(entity_id.to_string()),
            display_name: Some(display_name.to_string()),
            properties: Map::new(),
            tags: vec![],
        }
    }

    /// Create a Linux host.
    pub fn host(entity_id: &str, display_name: &str) -> Entity {
        let mut entity = Self::minimal_entity(entity_id, display_name);
        entity.properties = Self::properties(json!({
            "osType": "LINUX",
            "cpuCores": 4,
            "monitoringMode": "FULL_STACK"
        }));
        entity
    }

    /// Create a host carrying one contextless tag.
    pub fn tagged_host(
        entity_id: &str,
        display_name: &str,
        key: &str,
        value: Option<&str>,
    ) -> Entity {
        let mut entity = Self::host(entity_id, display_name);
        entity.tags.push(Self::tag(key, value));
        entity
    }

    /// Create a web request service.
    pub fn service(entity_id: &str, display_name: &str) -> Entity {
        let mut entity = Self::minimal_entity(entity_id, display_name);
        entity.properties = Self::properties(json!({
            "serviceType": "WEB_REQUEST_SERVICE",
            "serviceTechnologyTypes": ["Java"]
        }));
        entity
    }

    /// Create a contextless tag.
    pub fn tag(key: &str, value: Option<&str>) -> MeTag {
        let string_representation = match value {
            Some(v) => format!("{key}:{v}"),
            None => key.to_string(),
        };
        MeTag {
            context: Some("CONTEXTLESS".to_string()),
            key: Some(key.to_string()),
            value: value.map(str::to_string),
            string_representation: Some(string_representation),
        }
    }

    /// Create `count` hosts with sequential IDs.
    pub fn hosts(count: usize) -> Vec<Entity> {
        (1..=count)
            .map(|i| Self::host(&format!("HOST-{i:016X}"), &format!("host-{i:03}")))
            .collect()
    }

    fn properties(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    // =========================================================================
    // Entity Type Fixtures
    // =========================================================================

    /// Create an entity type with a display name and dimension key.
    pub fn entity_type(name: &str, display_name: &str) -> EntityType {
        EntityType {
            entity_type: Some(name.to_string()),
            display_name: Some(display_name.to_string()),
            dimension_key: Some(format!("dt.entity.{}", name.to_lowercase())),
            entity_limit_exceeded: false,
            properties: vec![],
            tags: Some("List".to_string()),
            management_zones: Some("List".to_string()),
            from_relationships: vec![],
            to_relationships: vec![],
        }
    }

    /// Create the HOST entity type with a few properties and relationships.
    pub fn host_type() -> EntityType {
        let mut ty = Self::entity_type("HOST", "Host");
        ty.properties = vec![
            Self::property("osType", "Enum", "OS type"),
            Self::property("cpuCores", "Number", "CPU cores"),
        ];
        ty.from_relationships = vec![RelationshipType {
            id: Some("isNetworkClientOfHost".to_string()),
            to_types: vec!["HOST".to_string()],
            from_types: vec![],
        }];
        ty.to_relationships = vec![RelationshipType {
            id: Some("isProcessOf".to_string()),
            to_types: vec![],
            from_types: vec!["PROCESS_GROUP_INSTANCE".to_string()],
        }];
        ty
    }

    fn property(id: &str, property_type: &str, display_name: &str) -> EntityTypeProperty {
        EntityTypeProperty {
            id: Some(id.to_string()),
            property_type: Some(property_type.to_string()),
            display_name: Some(display_name.to_string()),
        }
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// A small environment: three hosts, two services, three entity types.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario {
            entities: vec![
                Self::tagged_host("HOST-0000000000000001", "web-01", "team", Some("ops")),
                Self::tagged_host("HOST-0000000000000002", "web-02", "team", Some("ops")),
                Self::host("HOST-0000000000000003", "db-01"),
                Self::service("SERVICE-0000000000000001", "checkout"),
                Self::service("SERVICE-0000000000000002", "cart"),
            ],
            entity_types: vec![
                Self::host_type(),
                Self::entity_type("SERVICE", "Service"),
                Self::entity_type("PROCESS_GROUP", "Process Group"),
            ],
        }
    }
}
