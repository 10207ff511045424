//! Translating widget events into domain intents.
//!
//! Every translator is a pure function of the event payload and the state the
//! host supplies at dispatch time: the current [`Projection`] and the current
//! [`KnownRecords`]. Nothing here captures records from an earlier render, and
//! nothing here touches the dataset. An emitted intent only shows up on the
//! timeline once the store hands back a new record set.

use std::collections::HashMap;
use std::sync::Arc;

use koyomi_types::{DateRange, Mutation, Record, RecordId};
use tracing::debug;

use crate::dataset::VisualItem;
use crate::groups::group_from_key;
use crate::projection::{Projection, TimelineEntry};

/// Reason string attached to update intents produced by a move.
pub const MOVE_REASON: &str = "update";

/// Where a click landed on the widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    Item,
    Background,
    Axis,
    GroupLabel,
    CustomTime,
    CurrentTime,
}

/// The raw pointer interaction behind a click, passed through untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    /// Instant under the pointer, Unix millis, if the widget reports one.
    pub time: Option<i64>,
}

/// An item after direct manipulation: its new span and group key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovedItem {
    pub id: RecordId,
    pub start: i64,
    pub end: i64,
    /// Group key; empty or the sentinel means unassigned.
    pub group: String,
    /// The item's back-reference, if the widget carried it.
    pub record: Option<Record>,
}

impl MovedItem {
    /// Describe `item` dragged to a new span and group key.
    pub fn from_item(item: &VisualItem, start: i64, end: i64, group: impl Into<String>) -> Self {
        Self {
            id: item.id.clone(),
            start,
            end,
            group: group.into(),
            record: item.record.clone(),
        }
    }
}

/// A tentative item drawn in empty space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposedItem {
    pub start: i64,
    pub end: i64,
    /// Group key of the lane it was drawn in, if any.
    pub group: Option<String>,
}

/// A double-click on the widget.
#[derive(Clone, Debug, PartialEq)]
pub struct ClickEvent {
    pub target: Option<ClickTarget>,
    pub item: Option<RecordId>,
    pub pointer: PointerEvent,
}

/// Events a widget delivers to the engine.
///
/// `Add` never lets the widget keep its tentative item: the dataset is owned
/// by the engine, and the real row arrives with the next record set once the
/// store confirms the create.
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetEvent {
    Move(MovedItem),
    Remove { id: RecordId },
    Add(ProposedItem),
    DoubleClick(ClickEvent),
}

impl WidgetEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetEvent::Move(_) => "move",
            WidgetEvent::Remove { .. } => "remove",
            WidgetEvent::Add(_) => "add",
            WidgetEvent::DoubleClick(_) => "double_click",
        }
    }

    /// Whether this event edits records (and so requires `editable`).
    pub fn is_edit(&self) -> bool {
        !matches!(self, WidgetEvent::DoubleClick(_))
    }
}

/// Answer to the widget's own tentative insert after an `Add`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddDecision {
    /// Drop the tentative item; the real one arrives with the next render.
    Reject,
}

/// A record was opened from the timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct CardActivation {
    pub pointer: PointerEvent,
    pub record: Record,
}

/// What an event asks the host to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    Mutation(Mutation),
    CardActivated(CardActivation),
}

// ============================================================================
// Known records
// ============================================================================

/// The record set of the latest render, indexed by ID.
#[derive(Debug, Clone)]
pub struct KnownRecords {
    records: Arc<[Record]>,
    index: HashMap<RecordId, usize>,
}

impl KnownRecords {
    pub fn new(records: Arc<[Record]>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        Self { records, index }
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether `records` is the very set this index was built from.
    pub fn is_same_set(&self, records: &Arc<[Record]>) -> bool {
        Arc::ptr_eq(&self.records, records)
    }
}

impl Default for KnownRecords {
    fn default() -> Self {
        Self::new(Arc::from(Vec::<Record>::new()))
    }
}

// ============================================================================
// Translators
// ============================================================================

/// Move → exactly one update intent carrying the original record merged with
/// the new span and group.
///
/// The record comes from the moved item's back-reference, falling back to the
/// known set. `includeTime` on the stored range is preserved.
pub fn translate_move(
    projection: &Projection,
    known: &KnownRecords,
    moved: &MovedItem,
) -> Option<Mutation> {
    let Some(original) = moved.record.as_ref().or_else(|| known.get(&moved.id)) else {
        debug!(id = %moved.id, "move for unknown record ignored");
        return None;
    };
    let include_time = projection
        .record_range(original)
        .is_some_and(|range| range.include_time);

    let entry = TimelineEntry {
        id: original.id.clone(),
        title: original.title.clone(),
        range: DateRange::new(moved.start, moved.end).with_include_time(include_time),
        group: group_from_key(&moved.group),
        record: original.clone(),
    };
    let new = projection.patch_record(&entry);
    debug!(
        id = %entry.id,
        from = entry.range.from,
        to = entry.range.to,
        group = ?entry.group,
        "timeline item moved"
    );
    Some(Mutation::Update {
        new,
        old: original.clone(),
        reason: MOVE_REASON.to_string(),
    })
}

/// Remove → delete intent, or nothing if the record is no longer known.
pub fn translate_remove(known: &KnownRecords, id: &RecordId) -> Option<Mutation> {
    match known.get(id) {
        Some(record) => Some(Mutation::Delete {
            record: record.clone(),
        }),
        None => {
            debug!(%id, "remove for unknown record ignored");
            None
        }
    }
}

/// Add → create intent with the proposed range and group. The new record is
/// opened once the store confirms it.
pub fn translate_add(projection: &Projection, proposed: &ProposedItem) -> Mutation {
    let group = proposed.group.as_deref().and_then(group_from_key);
    let range = DateRange::new(proposed.start, proposed.end);
    Mutation::Create {
        properties: projection.create_properties(range, group.as_deref()),
        show: true,
    }
}

/// Double-click → card activation when an item of a known record was hit.
pub fn translate_double_click(known: &KnownRecords, click: &ClickEvent) -> Option<CardActivation> {
    if click.target != Some(ClickTarget::Item) {
        return None;
    }
    let record = known.get(click.item.as_ref()?)?;
    Some(CardActivation {
        pointer: click.pointer.clone(),
        record: record.clone(),
    })
}

// ============================================================================
// Tests
// ============================================================================
