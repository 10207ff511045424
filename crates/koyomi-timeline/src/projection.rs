//! Schema-driven projection of records onto timeline entries.
//!
//! A [`Projection`] is resolved from a schema once (which property is the date,
//! which one is the group) and then maps records to [`TimelineEntry`] values.
//! Records that cannot be placed on a time axis are filtered out silently:
//! a missing, empty, incomplete, or malformed date value is a normal state for
//! a record, not an error.
//!
//! The reverse direction, [`Projection::patch_record`], turns an edited entry
//! back into a record copy suitable for an update intent.

use std::sync::Arc;

use koyomi_types::{DateRange, PropertyTemplate, PropertyType, Properties, Record, RecordId, Schema};
use tracing::debug;

use crate::groups::normalize_group;

/// Schema property name that marks the grouping field.
pub const DEFAULT_GROUP_PROPERTY: &str = "group";

/// Display-ready projection of a single record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineEntry {
    /// Same as the source record's ID.
    pub id: RecordId,
    pub title: String,
    pub range: DateRange,
    /// Group label; `None` means unassigned.
    pub group: Option<String>,
    /// The record this entry was projected from.
    pub record: Record,
}

impl TimelineEntry {
    /// Copy with a new date range.
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    /// Copy with a new group label (empty or sentinel labels clear the group).
    pub fn with_group(mut self, group: Option<&str>) -> Self {
        self.group = normalize_group(group);
        self
    }
}

/// Find the property that carries the date range (first `date` template).
pub fn find_date_property(schema: &Schema) -> Option<&PropertyTemplate> {
    schema.first_of_type(PropertyType::Date)
}

/// Find the property that carries the group label (first template named `name`).
pub fn find_group_property<'a>(schema: &'a Schema, name: &str) -> Option<&'a PropertyTemplate> {
    schema.named(name)
}

/// Resolved date/group properties for one schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    date_property: PropertyTemplate,
    group_property: Option<PropertyTemplate>,
}

impl Projection {
    /// Resolve against a schema using the default group property name.
    ///
    /// Returns `None` when the schema has no date property; nothing is
    /// displayable in that case.
    pub fn from_schema(schema: &Schema) -> Option<Self> {
        Self::with_group_name(schema, DEFAULT_GROUP_PROPERTY)
    }

    /// Resolve against a schema with a custom group property name.
    pub fn with_group_name(schema: &Schema, group_name: &str) -> Option<Self> {
        let date_property = find_date_property(schema)?.clone();
        let group_property = find_group_property(schema, group_name).cloned();
        Some(Self {
            date_property,
            group_property,
        })
    }

    pub fn date_property(&self) -> &PropertyTemplate {
        &self.date_property
    }

    pub fn group_property(&self) -> Option<&PropertyTemplate> {
        self.group_property.as_ref()
    }

    /// Decode a record's date range, if it has a complete one.
    pub fn record_range(&self, record: &Record) -> Option<DateRange> {
        let raw = record.non_empty_property(&self.date_property.id)?;
        match DateRange::decode(raw) {
            Ok(range) => Some(range),
            Err(e) => {
                debug!(record = %record.id, "excluding record from timeline: {e}");
                None
            }
        }
    }

    /// Read a record's group label. Always `None` when grouping is disabled.
    pub fn record_group(&self, record: &Record) -> Option<String> {
        let group_property = self.group_property.as_ref()?;
        normalize_group(record.property(&group_property.id))
    }

    /// Project one record, or `None` if it is not displayable.
    pub fn project_record(&self, record: &Record) -> Option<TimelineEntry> {
        let range = self.record_range(record)?;
        Some(TimelineEntry {
            id: record.id.clone(),
            title: record.title.clone(),
            range,
            group: self.record_group(record),
            record: record.clone(),
        })
    }

    /// Project a record set, preserving input order.
    pub fn project(&self, records: &[Record]) -> Vec<TimelineEntry> {
        records
            .iter()
            .filter_map(|record| self.project_record(record))
            .collect()
    }

    /// Build the record copy that reflects an edited entry.
    ///
    /// The date property is always rewritten. With grouping enabled, a
    /// labelled entry sets the group property and an unlabelled one removes
    /// the key entirely (not the same as storing an empty label).
    pub fn patch_record(&self, entry: &TimelineEntry) -> Record {
        let mut record = entry.record.clone();
        record.set_property(self.date_property.id.clone(), entry.range.encode());
        if let Some(group_property) = &self.group_property {
            match normalize_group(entry.group.as_deref()) {
                Some(label) => {
                    record.set_property(group_property.id.clone(), label);
                }
                None => {
                    record.clear_property(&group_property.id);
                }
            }
        }
        record
    }

    /// Initial properties for a record created from the timeline.
    pub fn create_properties(&self, range: DateRange, group: Option<&str>) -> Properties {
        let mut properties = Properties::new();
        properties.insert(self.date_property.id.clone(), range.encode());
        if let (Some(group_property), Some(label)) = (&self.group_property, normalize_group(group)) {
            properties.insert(group_property.id.clone(), label);
        }
        properties
    }
}

// ============================================================================
// Memoization
// ============================================================================

/// Projection result for one (schema, record set) pair.
#[derive(Debug)]
pub struct ProjectedSet {
    pub projection: Projection,
    pub entries: Vec<TimelineEntry>,
}

/// Caches the last projection, keyed by schema and record-set identity.
///
/// Identity is `Arc` pointer identity: handing in the same `Arc` again is a
/// cache hit even if the caller could have mutated an equal copy elsewhere.
/// The memo holds its keys, so a freed allocation can never alias a new one.
#[derive(Debug)]
pub struct ProjectionMemo {
    group_property: String,
    key: Option<(Arc<Schema>, Arc<[Record]>)>,
    value: Option<ProjectedSet>,
    computations: u64,
}

impl ProjectionMemo {
    pub fn new(group_property: impl Into<String>) -> Self {
        Self {
            group_property: group_property.into(),
            key: None,
            value: None,
            computations: 0,
        }
    }

    /// Project, reusing the cached result when both identities match.
    ///
    /// `None` means the schema has no date property.
    pub fn project(
        &mut self,
        schema: &Arc<Schema>,
        records: &Arc<[Record]>,
    ) -> Option<&ProjectedSet> {
        let hit = matches!(
            &self.key,
            Some((s, r)) if Arc::ptr_eq(s, schema) && Arc::ptr_eq(r, records)
        );
        if !hit {
            self.computations += 1;
            self.value = Projection::with_group_name(schema, &self.group_property).map(|projection| {
                let entries = projection.project(records);
                ProjectedSet {
                    projection,
                    entries,
                }
            });
            self.key = Some((Arc::clone(schema), Arc::clone(records)));
        }
        self.value.as_ref()
    }

    /// The most recent result without recomputing.
    pub fn current(&self) -> Option<&ProjectedSet> {
        self.value.as_ref()
    }

    /// How many times a projection was actually computed.
    pub fn computations(&self) -> u64 {
        self.computations
    }
}

impl Default for ProjectionMemo {
    fn default() -> Self {
        Self::new(DEFAULT_GROUP_PROPERTY)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use koyomi_types::PropertyId;

    use super::*;
    use crate::UNASSIGNED_GROUP;

    fn schema(with_group: bool) -> Schema {
        let mut props = vec![
            PropertyTemplate::new("p-status", "Status", PropertyType::Select),
            PropertyTemplate::new("p-when", "When", PropertyType::Date),
        ];
        if with_group {
            props.push(PropertyTemplate::new("p-group", "group", PropertyType::Select));
        }
        Schema::new(props)
    }

    fn dated(id: &str, from: i64, to: i64) -> Record {
        Record::new(id, format!("Card {id}")).with_property("p-when", DateRange::new(from, to).encode())
    }

    #[test]
    fn test_no_date_property() {
        let s = Schema::new(vec![PropertyTemplate::new("p", "group", PropertyType::Text)]);
        assert!(Projection::from_schema(&s).is_none());
    }

    #[test]
    fn test_group_disabled_without_group_property() {
        let p = Projection::from_schema(&schema(false)).unwrap();
        assert!(p.group_property().is_none());
        let r = dated("a", 100, 200).with_property("p-group", "Team1");
        let entry = p.project_record(&r).unwrap();
        assert_eq!(entry.group, None);
    }

    #[test]
    fn test_project_complete_record() {
        let p = Projection::from_schema(&schema(true)).unwrap();
        let r = dated("a", 100, 200).with_property("p-group", "Team1");
        let entry = p.project_record(&r).unwrap();
        assert_eq!(entry.id, RecordId::from("a"));
        assert_eq!(entry.title, "Card a");
        assert_eq!(entry.range, DateRange::new(100, 200));
        assert_eq!(entry.group.as_deref(), Some("Team1"));
        assert_eq!(entry.record, r);
    }

    #[test]
    fn test_excludes_missing_empty_incomplete_and_malformed() {
        let p = Projection::from_schema(&schema(true)).unwrap();
        let records = vec![
            Record::new("missing", "x"),
            Record::new("empty", "x").with_property("p-when", ""),
            Record::new("half", "x").with_property("p-when", r#"{"from":1}"#),
            Record::new("junk", "x").with_property("p-when", "{{"),
            dated("ok", 1, 2),
        ];
        let entries = p.project(&records);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, RecordId::from("ok"));
    }

    #[test]
    fn test_preserves_input_order() {
        let p = Projection::from_schema(&schema(false)).unwrap();
        let records = vec![dated("c", 300, 400), dated("a", 100, 200), dated("b", 0, 1)];
        let ids: Vec<_> = p.project(&records).into_iter().map(|e| e.id.to_string()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_empty_group_is_unassigned() {
        let p = Projection::from_schema(&schema(true)).unwrap();
        let r = dated("a", 1, 2).with_property("p-group", "");
        assert_eq!(p.project_record(&r).unwrap().group, None);
    }

    #[test]
    fn test_patch_sets_date_and_group() {
        let p = Projection::from_schema(&schema(true)).unwrap();
        let entry = p.project_record(&dated("b", 1, 2)).unwrap();
        let patched = p.patch_record(&entry.with_range(DateRange::new(500, 900)).with_group(Some("Team1")));

        assert_eq!(
            patched.property(&PropertyId::from("p-when")),
            Some(r#"{"from":500,"to":900}"#)
        );
        assert_eq!(patched.property(&PropertyId::from("p-group")), Some("Team1"));
    }

    #[test]
    fn test_patch_removes_cleared_group() {
        let p = Projection::from_schema(&schema(true)).unwrap();
        let r = dated("b", 1, 2).with_property("p-group", "Team1");
        let entry = p.project_record(&r).unwrap();

        for cleared in [None, Some(""), Some(UNASSIGNED_GROUP)] {
            let patched = p.patch_record(&entry.clone().with_group(cleared));
            assert!(!patched.properties.contains_key(&PropertyId::from("p-group")));
        }
    }

    #[test]
    fn test_patch_leaves_group_untouched_when_disabled() {
        let p = Projection::from_schema(&schema(false)).unwrap();
        let r = dated("b", 1, 2).with_property("p-group", "kept");
        let entry = p.project_record(&r).unwrap().with_group(Some("Team1"));
        let patched = p.patch_record(&entry);
        assert_eq!(patched.property(&PropertyId::from("p-group")), Some("kept"));
    }

    #[test]
    fn test_round_trip_is_stable() {
        let p = Projection::from_schema(&schema(true)).unwrap();
        let original = p.project_record(&dated("r", 10, 20)).unwrap();
        let edited = original
            .with_range(DateRange::new(1_000, 2_000).with_include_time(true))
            .with_group(Some("Ops"));
        let reprojected = p.project_record(&p.patch_record(&edited)).unwrap();

        assert_eq!(reprojected.range, edited.range);
        assert_eq!(reprojected.group, edited.group);
        assert_eq!(reprojected.id, edited.id);
    }

    #[test]
    fn test_create_properties() {
        let p = Projection::from_schema(&schema(true)).unwrap();
        let props = p.create_properties(DateRange::new(5, 6), Some("Team2"));
        assert_eq!(props.len(), 2);
        assert_eq!(props[&PropertyId::from("p-group")], "Team2");

        let ungrouped = p.create_properties(DateRange::new(5, 6), Some(UNASSIGNED_GROUP));
        assert_eq!(ungrouped.len(), 1);
        assert_eq!(ungrouped[&PropertyId::from("p-when")], r#"{"from":5,"to":6}"#);
    }

    #[test]
    fn test_custom_group_property_name() {
        let s = Schema::new(vec![
            PropertyTemplate::new("p-when", "When", PropertyType::Date),
            PropertyTemplate::new("p-team", "Team", PropertyType::Select),
        ]);
        let p = Projection::with_group_name(&s, "Team").unwrap();
        assert_eq!(p.group_property().unwrap().id, PropertyId::from("p-team"));
    }

    // ── Memo ────────────────────────────────────────────────────────────

    #[test]
    fn test_memo_hits_on_same_identity() {
        let s = Arc::new(schema(false));
        let records: Arc<[Record]> = vec![dated("a", 1, 2)].into();
        let mut memo = ProjectionMemo::default();

        assert_eq!(memo.project(&s, &records).unwrap().entries.len(), 1);
        memo.project(&s, &records);
        assert_eq!(memo.computations(), 1);
    }

    #[test]
    fn test_memo_recomputes_on_new_identity() {
        let s = Arc::new(schema(false));
        let first: Arc<[Record]> = vec![dated("a", 1, 2)].into();
        let second: Arc<[Record]> = vec![dated("a", 1, 2), dated("b", 3, 4)].into();
        let mut memo = ProjectionMemo::default();

        memo.project(&s, &first);
        assert_eq!(memo.project(&s, &second).unwrap().entries.len(), 2);
        memo.project(&Arc::new(schema(false)), &second);
        assert_eq!(memo.computations(), 3);
    }

    #[test]
    fn test_memo_caches_missing_date_property() {
        let s = Arc::new(Schema::default());
        let records: Arc<[Record]> = Vec::<Record>::new().into();
        let mut memo = ProjectionMemo::default();
        assert!(memo.project(&s, &records).is_none());
        assert!(memo.project(&s, &records).is_none());
        assert_eq!(memo.computations(), 1);
        assert!(memo.current().is_none());
    }
}
