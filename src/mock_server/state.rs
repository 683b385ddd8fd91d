//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Dynatrace API server.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Entity, EntityType};

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access. Maps are ordered
/// so paging is deterministic.
#[derive(Debug, Default)]
pub struct MockState {
    /// Entities indexed by entity ID (e.g., "HOST-0000000000000001").
    pub entities: BTreeMap<String, Entity>,

    /// Entity types indexed by type name (e.g., "HOST").
    pub entity_types: BTreeMap<String, EntityType>,

    /// Optional API token. If set, requests must send `Api-Token <token>`.
    pub required_token: Option<String>,

    /// Number of API requests handled (health checks excluded).
    pub requests_served: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add an entity to the state. Entities without an ID are ignored.
    pub fn with_entity(mut self, entity: Entity) -> Self {
        if let Some(id) = entity.entity_id.clone() {
            self.entities.insert(id, entity);
        }
        self
    }

    /// Add an entity type to the state. Types without a name are ignored.
    pub fn with_entity_type(mut self, entity_type: EntityType) -> Self {
        if let Some(name) = entity_type.entity_type.clone() {
            self.entity_types.insert(name, entity_type);
        }
        self
    }

    /// Set the required API token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Get an entity by ID.
    pub fn get_entity(&self, entity_id: &str) -> Option<&Entity> {
        self.entities.get(entity_id)
    }

    /// Get an entity type by name.
    pub fn get_entity_type(&self, type_name: &str) -> Option<&EntityType> {
        self.entity_types.get(type_name)
    }

    /// List entities matching an entity selector.
    ///
    /// Understands comma-separated `type(..)`, `entityId(..)`,
    /// `entityName(..)` and `tag(..)` predicates, all of which must hold.
    pub fn select_entities(&self, selector: &str) -> Result<Vec<&Entity>, String> {
        let predicates = parse_selector(selector)?;
        Ok(self
            .entities
            .values()
            .filter(|e| predicates.iter().all(|p| p.matches(e)))
            .collect())
    }

    /// List all entity types in name order.
    pub fn list_entity_types(&self) -> Vec<&EntityType> {
        self.entity_types.values().collect()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Predicate {
    Type(String),
    EntityId(Vec<String>),
    EntityName(String),
    Tag { key: String, value: Option<String> },
}

impl Predicate {
    fn matches(&self, entity: &Entity) -> bool {
        match self {
            Self::Type(t) => entity.entity_type() == Some(t.as_str()),
            Self::EntityId(ids) => entity
                .entity_id
                .as_ref()
                .map_or(false, |id| ids.contains(id)),
            Self::EntityName(name) => entity.display_name.as_deref() == Some(name.as_str()),
            Self::Tag { key, value } => entity.tags.iter().any(|t| {
                t.key.as_deref() == Some(key.as_str())
                    && (value.is_none() || t.value.as_deref() == value.as_deref())
            }),
        }
    }
}

fn parse_selector(selector: &str) -> Result<Vec<Predicate>, String> {
    if selector.trim().is_empty() {
        return Err("Constraints violated: entitySelector must not be empty".to_string());
    }

    split_top_level(selector)
        .into_iter()
        .map(|part| -> Result<Predicate, String> {
            let part = part.trim();
            let (name, args) = part
                .strip_suffix(')')
                .and_then(|p| p.split_once('('))
                .ok_or_else(|| format!("Invalid entity selector predicate: {part}"))?;
            let args: Vec<String> = args
                .split(',')
                .map(|a| a.trim().trim_matches('"').to_string())
                .filter(|a| !a.is_empty())
                .collect();

            match (name.trim(), args.as_slice()) {
                ("type", [t]) => Ok(Predicate::Type(t.clone())),
                ("entityId", ids) if !ids.is_empty() => Ok(Predicate::EntityId(ids.to_vec())),
                ("entityName", [n]) | ("entityName.equals", [n]) => {
                    Ok(Predicate::EntityName(n.clone()))
                }
                ("tag", [t]) => {
                    let (key, value) = match t.split_once(':') {
                        Some((k, v)) => (k.to_string(), Some(v.to_string())),
                        None => (t.clone(), None),
                    };
                    Ok(Predicate::Tag { key, value })
                }
                _ => Err(format!("Invalid entity selector predicate: {part}")),
            }
        })
        .collect()
}

/// Split on commas that are not inside parentheses.
fn split_top_level(selector: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in selector.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&selector[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&selector[start..]);
    parts
}
