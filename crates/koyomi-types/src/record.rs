//! Property-bearing records.
//!
//! A record is owned by the external store. This crate never creates or
//! destroys one on the store's behalf; callers build mutated copies and hand
//! them back as mutation intents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{PropertyId, RecordId};

/// Property values keyed by template ID. Values are opaque strings whose
/// meaning is defined by the schema.
pub type Properties = BTreeMap<PropertyId, String>;

/// A record as delivered by the record store (a "card" on a board).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identifier, unique within the store.
    pub id: RecordId,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Optional icon (typically a single emoji).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Raw property values.
    #[serde(default)]
    pub properties: Properties,
}

impl Record {
    /// Create a record with no icon and no properties.
    pub fn new(id: impl Into<RecordId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: None,
            properties: Properties::new(),
        }
    }

    /// Builder: set the icon.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Builder: set a property value.
    pub fn with_property(mut self, id: impl Into<PropertyId>, value: impl Into<String>) -> Self {
        self.properties.insert(id.into(), value.into());
        self
    }

    /// Raw value of a property, if present.
    pub fn property(&self, id: &PropertyId) -> Option<&str> {
        self.properties.get(id).map(String::as_str)
    }

    /// Raw value of a property, treating the empty string as absent.
    pub fn non_empty_property(&self, id: &PropertyId) -> Option<&str> {
        self.property(id).filter(|v| !v.is_empty())
    }

    /// Set a property value, returning the previous one.
    pub fn set_property(&mut self, id: PropertyId, value: impl Into<String>) -> Option<String> {
        self.properties.insert(id, value.into())
    }

    /// Remove a property value entirely, returning the previous one.
    ///
    /// Removal is distinct from setting the empty string: the key disappears.
    pub fn clear_property(&mut self, id: &PropertyId) -> Option<String> {
        self.properties.remove(id)
    }

    /// Display string: title if present, otherwise the short ID.
    pub fn display_name(&self) -> String {
        self.id.display_or(Some(self.title.as_str()))
    }
}

// ============================================================================
// Tests
// ============================================================================
