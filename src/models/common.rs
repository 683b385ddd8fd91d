//! Small value types shared across entity payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A tag attached to a monitored entity.
///
/// Tags carry an optional context (`CONTEXTLESS`, `ENVIRONMENT`, `AWS`, ...),
/// a key and an optional value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeTag {
    /// Origin of the tag.
    #[serde(default)]
    pub context: Option<String>,

    /// Tag key.
    #[serde(default)]
    pub key: Option<String>,

    /// Tag value, absent for key-only tags.
    #[serde(default)]
    pub value: Option<String>,

    /// Server-rendered form, e.g. `[Environment]team:ops`.
    #[serde(default)]
    pub string_representation: Option<String>,
}

impl MeTag {
    /// Whether the tag was defined manually rather than imported.
    pub fn is_contextless(&self) -> bool {
        self.context
            .as_deref()
            .map_or(true, |c| c.eq_ignore_ascii_case("CONTEXTLESS"))
    }
}

impl fmt::Display for MeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref repr) = self.string_representation {
            return f.write_str(repr);
        }

        if !self.is_contextless() {
            if let Some(ref context) = self.context {
                write!(f, "[{context}]")?;
            }
        }
        f.write_str(self.key.as_deref().unwrap_or_default())?;
        if let Some(ref value) = self.value {
            write!(f, ":{value}")?;
        }
        Ok(())
    }
}

/// A management zone reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagementZone {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A minimal pointer to another configuration object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityShortRepresentation {
    /// The ID of the referenced object.
    #[serde(default)]
    pub id: Option<String>,

    /// The name of the referenced object.
    #[serde(default)]
    pub name: Option<String>,

    /// A short description.
    #[serde(default)]
    pub description: Option<String>,
}
