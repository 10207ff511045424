//! Visual dataset: the indexed item collection the widget renders from.
//!
//! The dataset persists across render cycles and is patched in place, never
//! rebuilt: the widget keeps scroll, zoom, and selection state keyed on item
//! identity, and a rebuild would throw that away.
//!
//! ## Sync
//!
//! ```text
//! next entries ──► next_ids (HashSet)
//!                     │
//! dataset ── retain(next_ids) ──► removed
//!         ── upsert(each entry) ─► added / updated / unchanged
//! ```
//!
//! One order-preserving retain pass plus one upsert per entry keeps a cycle
//! O(n). Identical rows are skipped, so the reported changes scale with what
//! actually changed, not with the size of the record set.

use std::collections::HashSet;

use indexmap::IndexMap;
use indexmap::map::Entry;
use koyomi_types::{DateRange, Record, RecordId};
use tracing::warn;

use crate::groups::{group_from_key, group_key};
use crate::projection::TimelineEntry;

/// One row of the dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisualItem {
    pub id: RecordId,
    /// Fallback label text (the record title).
    pub content: String,
    /// Start instant, Unix millis.
    pub start: i64,
    /// End instant, Unix millis.
    pub end: i64,
    /// Group key; the unassigned sentinel when the entry has no group.
    pub group: String,
    /// Back-reference to the source record. Widgets may see items without it.
    pub record: Option<Record>,
}

impl VisualItem {
    pub fn from_entry(entry: &TimelineEntry) -> Self {
        Self {
            id: entry.id.clone(),
            content: entry.title.clone(),
            start: entry.range.from,
            end: entry.range.to,
            group: group_key(entry.group.as_deref()),
            record: Some(entry.record.clone()),
        }
    }

    /// Group label (`None` for the unassigned lane).
    pub fn group_label(&self) -> Option<String> {
        group_from_key(&self.group)
    }

    /// The item's span as a date range.
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }
}

/// Result of a single upsert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upsert {
    Added,
    Updated,
    Unchanged,
}

/// Identifiers touched by one sync, per operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DatasetChanges {
    pub added: Vec<RecordId>,
    pub updated: Vec<RecordId>,
    pub removed: Vec<RecordId>,
}

impl DatasetChanges {
    /// Total number of dataset operations performed.
    pub fn len(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered, ID-indexed item collection.
#[derive(Debug, Default)]
pub struct VisualDataset {
    items: IndexMap<RecordId, VisualItem>,
}

impl VisualDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&VisualItem> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.items.contains_key(id)
    }

    /// IDs in dataset order.
    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.items.keys()
    }

    /// Items in dataset order (insertion order of first appearance).
    pub fn iter(&self) -> impl Iterator<Item = &VisualItem> {
        self.items.values()
    }

    /// Insert or fully replace an item. Stale fields never survive.
    pub fn upsert(&mut self, item: VisualItem) -> Upsert {
        match self.items.entry(item.id.clone()) {
            Entry::Occupied(mut slot) => {
                if *slot.get() == item {
                    Upsert::Unchanged
                } else {
                    slot.insert(item);
                    Upsert::Updated
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(item);
                Upsert::Added
            }
        }
    }

    /// Remove everything, reporting the removed IDs.
    pub fn clear(&mut self) -> DatasetChanges {
        let removed = self.items.drain(..).map(|(id, _)| id).collect();
        DatasetChanges {
            removed,
            ..DatasetChanges::default()
        }
    }

    /// Patch the dataset so its ID set equals the entries' ID set.
    ///
    /// If an ID repeats within `entries`, the last occurrence wins.
    pub fn sync(&mut self, entries: &[TimelineEntry]) -> DatasetChanges {
        let next_ids: HashSet<&RecordId> = entries.iter().map(|e| &e.id).collect();
        if next_ids.len() != entries.len() {
            warn!(
                entries = entries.len(),
                distinct = next_ids.len(),
                "duplicate record ids in timeline entries; last occurrence wins"
            );
        }

        let mut changes = DatasetChanges::default();
        self.items.retain(|id, _| {
            let keep = next_ids.contains(id);
            if !keep {
                changes.removed.push(id.clone());
            }
            keep
        });

        // A repeated id is reported under its first non-trivial outcome only.
        let mut reported: HashSet<&RecordId> = HashSet::new();
        for entry in entries {
            let outcome = self.upsert(VisualItem::from_entry(entry));
            if outcome == Upsert::Unchanged || !reported.insert(&entry.id) {
                continue;
            }
            match outcome {
                Upsert::Added => changes.added.push(entry.id.clone()),
                Upsert::Updated => changes.updated.push(entry.id.clone()),
                Upsert::Unchanged => {}
            }
        }
        changes
    }
}

// ============================================================================
// Tests
// ============================================================================
