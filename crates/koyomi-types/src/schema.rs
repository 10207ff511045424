//! Board schema: ordered property templates.
//!
//! The schema is dynamic. Which property carries the date range and which one
//! carries the grouping label is discovered at runtime by searching the
//! template list, so lookups here are predicate-based rather than fixed fields.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::ids::PropertyId;

/// Type tag of a property template.
///
/// Tags deserialize through [`PropertyType::from_tag`]: matching ignores case,
/// and unknown tags become [`PropertyType::Unknown`] instead of failing, so a
/// schema from a newer store still loads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "camelCase", from = "String")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum PropertyType {
    #[default]
    Text,
    Number,
    Select,
    MultiSelect,
    /// Holds an encoded [`DateRange`](crate::DateRange).
    Date,
    Person,
    File,
    Checkbox,
    Url,
    Email,
    Phone,
    CreatedTime,
    CreatedBy,
    UpdatedTime,
    UpdatedBy,
    Unknown,
}

impl From<String> for PropertyType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl PropertyType {
    /// Parse a type tag (case-insensitive). Unrecognized tags map to `Unknown`.
    pub fn from_tag(s: &str) -> Self {
        <Self as FromStr>::from_str(s).unwrap_or(PropertyType::Unknown)
    }

    /// Convert to the wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Text => "text",
            PropertyType::Number => "number",
            PropertyType::Select => "select",
            PropertyType::MultiSelect => "multiSelect",
            PropertyType::Date => "date",
            PropertyType::Person => "person",
            PropertyType::File => "file",
            PropertyType::Checkbox => "checkbox",
            PropertyType::Url => "url",
            PropertyType::Email => "email",
            PropertyType::Phone => "phone",
            PropertyType::CreatedTime => "createdTime",
            PropertyType::CreatedBy => "createdBy",
            PropertyType::UpdatedTime => "updatedTime",
            PropertyType::UpdatedBy => "updatedBy",
            PropertyType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed field definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyTemplate {
    pub id: PropertyId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
}

impl PropertyTemplate {
    pub fn new(id: impl Into<PropertyId>, name: impl Into<String>, kind: PropertyType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// Ordered sequence of property templates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    properties: Vec<PropertyTemplate>,
}

impl Schema {
    pub fn new(properties: Vec<PropertyTemplate>) -> Self {
        Self { properties }
    }

    /// First template matching `predicate`, in schema order.
    pub fn find_by<P>(&self, predicate: P) -> Option<&PropertyTemplate>
    where
        P: Fn(&PropertyTemplate) -> bool,
    {
        self.properties.iter().find(|p| predicate(p))
    }

    /// First template of the given type.
    pub fn first_of_type(&self, kind: PropertyType) -> Option<&PropertyTemplate> {
        self.find_by(|p| p.kind == kind)
    }

    /// First template whose name equals `name` exactly (case-sensitive).
    pub fn named(&self, name: &str) -> Option<&PropertyTemplate> {
        self.find_by(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyTemplate> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl FromIterator<PropertyTemplate> for Schema {
    fn from_iter<I: IntoIterator<Item = PropertyTemplate>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn board_schema() -> Schema {
        Schema::new(vec![
            PropertyTemplate::new("p-status", "Status", PropertyType::Select),
            PropertyTemplate::new("p-when", "When", PropertyType::Date),
            PropertyTemplate::new("p-due", "Due", PropertyType::Date),
            PropertyTemplate::new("p-group", "group", PropertyType::Select),
            PropertyTemplate::new("p-group2", "group", PropertyType::Text),
        ])
    }

    #[test]
    fn test_first_date_wins() {
        let schema = board_schema();
        let date = schema.first_of_type(PropertyType::Date).unwrap();
        assert_eq!(date.id, PropertyId::from("p-when"));
    }

    #[test]
    fn test_first_named_wins() {
        let schema = board_schema();
        let group = schema.named("group").unwrap();
        assert_eq!(group.id, PropertyId::from("p-group"));
    }

    #[test]
    fn test_named_is_case_sensitive() {
        let schema = board_schema();
        assert!(schema.named("Group").is_none());
    }

    #[test]
    fn test_find_by_absent() {
        let schema = Schema::new(vec![PropertyTemplate::new("p", "Name", PropertyType::Text)]);
        assert!(schema.first_of_type(PropertyType::Date).is_none());
    }

    #[test]
    fn test_type_tags_roundtrip() {
        for kind in [
            PropertyType::Text,
            PropertyType::MultiSelect,
            PropertyType::Date,
            PropertyType::CreatedTime,
            PropertyType::UpdatedBy,
        ] {
            assert_eq!(PropertyType::from_tag(kind.as_str()), kind);
        }
    }

    #[test]
    fn test_type_tag_case_insensitive() {
        assert_eq!(PropertyType::from_tag("DATE"), PropertyType::Date);
        assert_eq!(PropertyType::from_tag("multiselect"), PropertyType::MultiSelect);
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(PropertyType::from_tag("rollup"), PropertyType::Unknown);
        let t: PropertyTemplate =
            serde_json::from_str(r#"{"id":"p","name":"Rollup","type":"rollup"}"#).unwrap();
        assert_eq!(t.kind, PropertyType::Unknown);
    }

    #[test]
    fn test_template_type_ignores_case() {
        let t: PropertyTemplate =
            serde_json::from_str(r#"{"id":"p","name":"When","type":"Date"}"#).unwrap();
        assert_eq!(t.kind, PropertyType::Date);
        assert_eq!(serde_json::to_string(&t.kind).unwrap(), r#""date""#);
    }

    #[test]
    fn test_schema_json_is_plain_array() {
        let json = r#"[{"id":"p-when","name":"When","type":"date"}]"#;
        let schema: Schema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.iter().next().unwrap().kind, PropertyType::Date);
    }
}
