use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which entity a custom attribute is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeModel {
    Contact,
    Conversation,
}

impl fmt::Display for AttributeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeModel::Contact => write!(f, "contact"),
            AttributeModel::Conversation => write!(f, "conversation"),
        }
    }
}

/// A workspace-defined custom attribute, supplied by the external store.
///
/// `key` is unique per workspace and model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    pub id: String,
    pub display_name: String,
    pub key: String,
    #[serde(default)]
    pub description: String,
    pub attribute_model: AttributeModel,
}

/// Read-only lookup table of custom attribute definitions.
///
/// The core never creates or deletes definitions; it only checks that
/// attribute keys referenced by nodes and `{{token}}` interpolation exist.
#[derive(Debug, Clone, Default)]
pub struct AttributeRegistry {
    by_key: AHashMap<(AttributeModel, String), AttributeDefinition>,
}

impl AttributeRegistry {
    pub fn new(definitions: Vec<AttributeDefinition>) -> Self {
        let mut by_key = AHashMap::with_capacity(definitions.len());
        for def in definitions {
            by_key.insert((def.attribute_model, def.key.clone()), def);
        }
        Self { by_key }
    }

    pub fn get(&self, model: AttributeModel, key: &str) -> Option<&AttributeDefinition> {
        self.by_key.get(&(model, key.to_string()))
    }

    pub fn contains(&self, model: AttributeModel, key: &str) -> bool {
        self.get(model, key).is_some()
    }

    /// Iterates all definitions, optionally restricted to one model.
    pub fn iter(
        &self,
        model: Option<AttributeModel>,
    ) -> impl Iterator<Item = &AttributeDefinition> {
        self.by_key
            .values()
            .filter(move |def| model.is_none_or(|m| def.attribute_model == m))
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
