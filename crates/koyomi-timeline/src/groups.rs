//! Group derivation for the timeline's swim lanes.
//!
//! Groups are not declared anywhere; they are whatever labels the current
//! dataset carries, in encounter order, followed by the unassigned lane. The
//! unassigned lane is always last and always present so there is a drop target
//! for "no group" even when every item has one.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::UNASSIGNED_GROUP;
use crate::dataset::VisualDataset;

/// Display name of the unassigned lane.
pub const DEFAULT_UNASSIGNED_LABEL: &str = "Unassigned";

/// A swim lane on the timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group key as carried by dataset items.
    pub id: String,
    /// Lane label.
    pub content: String,
}

impl Group {
    /// A lane for a user-visible label (key and label are the same).
    pub fn labelled(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: label.clone(),
            content: label,
        }
    }

    /// The unassigned lane.
    pub fn unassigned(label: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_GROUP.to_string(),
            content: label.into(),
        }
    }

    pub fn is_unassigned(&self) -> bool {
        self.id == UNASSIGNED_GROUP
    }
}

/// Normalize a group label: absent, empty, and the sentinel all mean "none".
pub fn normalize_group(label: Option<&str>) -> Option<String> {
    match label {
        Some(l) if !l.is_empty() && l != UNASSIGNED_GROUP => Some(l.to_string()),
        _ => None,
    }
}

/// Dataset key for a group label (sentinel when unassigned).
pub fn group_key(label: Option<&str>) -> String {
    normalize_group(label).unwrap_or_else(|| UNASSIGNED_GROUP.to_string())
}

/// Group label for a dataset key (`None` for the sentinel).
pub fn group_from_key(key: &str) -> Option<String> {
    normalize_group(Some(key))
}

/// Collect lanes from the dataset: distinct labels in encounter order, then
/// the unassigned lane.
pub fn derive_groups(dataset: &VisualDataset, unassigned_label: &str) -> Vec<Group> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut groups = Vec::new();
    for item in dataset.iter() {
        if item.group == UNASSIGNED_GROUP {
            continue;
        }
        if seen.insert(item.group.as_str()) {
            groups.push(Group::labelled(item.group.as_str()));
        }
    }
    groups.push(Group::unassigned(unassigned_label));
    groups
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use koyomi_types::{DateRange, Record};

    use super::*;
    use crate::projection::TimelineEntry;

    fn entry(id: &str, group: Option<&str>) -> TimelineEntry {
        TimelineEntry {
            id: id.into(),
            title: id.to_string(),
            range: DateRange::new(0, 1),
            group: group.map(str::to_string),
            record: Record::new(id, id),
        }
    }

    #[test]
    fn test_normalize_group() {
        assert_eq!(normalize_group(None), None);
        assert_eq!(normalize_group(Some("")), None);
        assert_eq!(normalize_group(Some(UNASSIGNED_GROUP)), None);
        assert_eq!(normalize_group(Some("Team1")).as_deref(), Some("Team1"));
    }

    #[test]
    fn test_group_key_round_trip() {
        assert_eq!(group_key(None), UNASSIGNED_GROUP);
        assert_eq!(group_from_key(&group_key(Some("Ops"))).as_deref(), Some("Ops"));
        assert_eq!(group_from_key(UNASSIGNED_GROUP), None);
    }

    #[test]
    fn test_empty_dataset_still_has_unassigned() {
        let groups = derive_groups(&VisualDataset::new(), DEFAULT_UNASSIGNED_LABEL);
        assert_eq!(groups, vec![Group::unassigned("Unassigned")]);
    }

    #[test]
    fn test_encounter_order_then_unassigned() {
        let mut ds = VisualDataset::new();
        ds.sync(&[
            entry("a", Some("Zeta")),
            entry("b", None),
            entry("c", Some("Alpha")),
            entry("d", Some("Zeta")),
        ]);
        let ids: Vec<_> = derive_groups(&ds, "None").into_iter().map(|g| g.id).collect();
        assert_eq!(ids, vec!["Zeta", "Alpha", UNASSIGNED_GROUP]);
    }

    #[test]
    fn test_unassigned_present_when_all_grouped() {
        let mut ds = VisualDataset::new();
        ds.sync(&[entry("a", Some("Team1")), entry("b", Some("Team2"))]);
        let groups = derive_groups(&ds, "Unassigned");
        let last = groups.last().unwrap();
        assert!(last.is_unassigned());
        assert_eq!(last.content, "Unassigned");
        assert_eq!(groups.len(), 3);
    }
}
