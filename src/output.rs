//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization, and the table row types
//! used for list output.

use tabled::Tabled;

use crate::{Entity, EntityType};

/// Trait for human-readable key-value output.
///
/// Implemented by model types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Entity {
    fn pretty_print(&self) -> String {
        let id = self.entity_id.as_deref().unwrap_or("<unknown>");
        let divider = "─".repeat(id.len().max(30));

        let mut lines = vec![format!("Entity: {}", id), divider];

        if let Some(ref name) = self.display_name {
            lines.push(format!("Name:           {}", name));
        }

        if let Some(entity_type) = self.entity_type() {
            lines.push(format!("Type:           {}", entity_type));
        }

        if !self.tags.is_empty() {
            let tags: Vec<String> = self.tags.iter().map(ToString::to_string).collect();
            lines.push(format!("Tags:           {}", tags.join(", ")));
        }

        for (key, value) in &self.properties {
            lines.push(format!("  {:<14}{}", key, value));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for EntityType {
    fn pretty_print(&self) -> String {
        let name = self.entity_type.as_deref().unwrap_or("<unknown>");
        let divider = "─".repeat(name.len().max(30));

        let mut lines = vec![format!("Entity Type: {}", name), divider];

        if let Some(ref display_name) = self.display_name {
            lines.push(format!("Name:           {}", display_name));
        }

        if let Some(ref key) = self.dimension_key {
            lines.push(format!("Dimension:      {}", key));
        }

        lines.push(format!("Properties:     {}", self.properties.len()));
        lines.push(format!(
            "Relationships:  {} outgoing, {} incoming",
            self.from_relationships.len(),
            self.to_relationships.len()
        ));

        if self.entity_limit_exceeded {
            lines.push("Limit:          exceeded".to_string());
        }

        lines.join("\n")
    }
}

/// Table row for an entity.
#[derive(Tabled)]
pub struct EntityRow {
    #[tabled(rename = "entity id")]
    pub entity_id: String,
    pub name: String,
    pub tags: String,
}

impl From<&Entity> for EntityRow {
    fn from(e: &Entity) -> Self {
        Self {
            entity_id: e.entity_id.clone().unwrap_or_default(),
            name: e.display_name.clone().unwrap_or_default(),
            tags: e
                .tags
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Table row for an entity type.
#[derive(Tabled)]
pub struct EntityTypeRow {
    #[tabled(rename = "type")]
    pub entity_type: String,
    pub name: String,
    pub properties: usize,
}

impl From<&EntityType> for EntityTypeRow {
    fn from(t: &EntityType) -> Self {
        Self {
            entity_type: t.entity_type.clone().unwrap_or_default(),
            name: t.display_name.clone().unwrap_or_default(),
            properties: t.properties.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_pretty_print_format() {
        let entity: Entity = serde_json::from_value(serde_json::json!({
            "entityId": "HOST-ABC",
            "displayName": "web-01",
            "tags": [{ "key": "team", "value": "ops" }],
            "properties": { "osType": "LINUX" }
        }))
        .unwrap();

        let output = entity.pretty_print();
        assert!(output.starts_with("Entity: HOST-ABC"));
        assert!(output.contains("Name:           web-01"));
        assert!(output.contains("Type:           HOST"));
        assert!(output.contains("team:ops"));
        assert!(output.contains("osType"));
    }

    #[test]
    fn test_entity_pretty_print_empty() {
        let output = Entity::default().pretty_print();
        assert!(output.starts_with("Entity: <unknown>"));
    }

    #[test]
    fn test_entity_type_row() {
        let ty: EntityType = serde_json::from_value(serde_json::json!({
            "type": "HOST",
            "displayName": "Host",
            "properties": [{ "id": "osType" }, { "id": "cpuCores" }]
        }))
        .unwrap();

        let row = EntityTypeRow::from(&ty);
        assert_eq!(row.entity_type, "HOST");
        assert_eq!(row.properties, 2);
    }
}
