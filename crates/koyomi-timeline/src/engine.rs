//! The timeline view: projection, dataset sync, and event dispatch in one owner.
//!
//! ```text
//!            render(schema, records)
//!                     │
//!          ProjectionMemo (Arc identity)
//!             │               │
//!      NoDateProperty     entries ──► VisualDataset::sync ──► items_changed
//!                                            │
//!                                      derive_groups ──────► set_groups
//!
//!            handle_event(event)
//!                     │
//!      (projection, known records of the latest render) ──► Intent
//! ```
//!
//! The view is the only writer of the dataset. Event handling never touches
//! it; mutations go out as intents and come back as a new record set.

use std::sync::Arc;

use koyomi_types::{MutationSink, Record, Schema};
use tracing::{debug, info};

use crate::Result;
use crate::config::TimelineConfig;
use crate::dataset::{DatasetChanges, VisualDataset};
use crate::error::TimelineError;
use crate::events::{
    AddDecision, CardActivation, Intent, KnownRecords, WidgetEvent, translate_add,
    translate_double_click, translate_move, translate_remove,
};
use crate::groups::{Group, derive_groups};
use crate::projection::{Projection, ProjectionMemo};
use crate::widget::{TimelineOptions, TimelineWidget, WidgetHandle};

/// What one render cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub changes: DatasetChanges,
    /// Lanes pushed to the widget.
    pub groups: Vec<Group>,
    /// Number of displayable entries.
    pub entries: usize,
}

/// Result of [`TimelineView::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The schema has no date property; show the fallback instead of a timeline.
    NoDateProperty,
    /// The dataset now mirrors the displayable entries.
    Synced(SyncReport),
}

impl RenderOutcome {
    pub fn is_displayable(&self) -> bool {
        matches!(self, RenderOutcome::Synced(_))
    }
}

/// Result of [`TimelineView::handle_event`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventOutcome {
    pub intent: Option<Intent>,
    /// Set for `Add` events: what the widget does with its tentative item.
    pub add_decision: Option<AddDecision>,
}

/// A mounted timeline bound to one widget instance.
pub struct TimelineView<W: TimelineWidget> {
    handle: WidgetHandle<W>,
    dataset: VisualDataset,
    memo: ProjectionMemo,
    known: KnownRecords,
    config: TimelineConfig,
}

impl<W: TimelineWidget> TimelineView<W> {
    /// Acquire the widget and prepare an empty view.
    pub fn mount<F, E>(factory: F, config: TimelineConfig) -> Result<Self>
    where
        F: FnOnce(&TimelineOptions) -> std::result::Result<W, E>,
        E: std::fmt::Display,
    {
        let handle = WidgetHandle::acquire(factory, &config.options)?;
        info!(group_property = %config.group_property, "timeline view mounted");
        Ok(Self {
            handle,
            dataset: VisualDataset::new(),
            memo: ProjectionMemo::new(config.group_property.clone()),
            known: KnownRecords::default(),
            config,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn dataset(&self) -> &VisualDataset {
        &self.dataset
    }

    pub fn widget(&self) -> Option<&W> {
        self.handle.widget()
    }

    /// Projection of the latest render, if the schema had a date property.
    pub fn projection(&self) -> Option<&Projection> {
        self.memo.current().map(|set| &set.projection)
    }

    /// Records of the latest render.
    pub fn known_records(&self) -> &KnownRecords {
        &self.known
    }

    /// How many projections were actually computed (cache misses).
    pub fn projections_computed(&self) -> u64 {
        self.memo.computations()
    }

    // ========================================================================
    // Render
    // ========================================================================

    /// Project `records` under `schema` and patch the dataset to match.
    ///
    /// Handing in the same `Arc`s as the previous render reuses the cached
    /// projection.
    pub fn render(
        &mut self,
        schema: &Arc<Schema>,
        records: &Arc<[Record]>,
    ) -> Result<RenderOutcome> {
        if !self.handle.is_live() {
            return Err(TimelineError::Released);
        }
        if !self.known.is_same_set(records) {
            self.known = KnownRecords::new(Arc::clone(records));
        }

        let Some(set) = self.memo.project(schema, records) else {
            let changes = self.dataset.clear();
            let groups = derive_groups(&self.dataset, &self.config.unassigned_label);
            let widget = self.handle.widget_mut().ok_or(TimelineError::Released)?;
            if !changes.is_empty() {
                widget.items_changed(&changes, &self.dataset);
            }
            widget.set_groups(&groups);
            info!(records = records.len(), "no date property in schema, timeline not displayable");
            return Ok(RenderOutcome::NoDateProperty);
        };

        let entries = set.entries.len();
        let changes = self.dataset.sync(&set.entries);
        let groups = derive_groups(&self.dataset, &self.config.unassigned_label);

        let widget = self.handle.widget_mut().ok_or(TimelineError::Released)?;
        if !changes.is_empty() {
            widget.items_changed(&changes, &self.dataset);
        }
        widget.set_groups(&groups);

        info!(
            records = records.len(),
            entries,
            added = changes.added.len(),
            updated = changes.updated.len(),
            removed = changes.removed.len(),
            groups = groups.len(),
            "timeline synced"
        );
        Ok(RenderOutcome::Synced(SyncReport {
            changes,
            groups,
            entries,
        }))
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Translate a widget event against the latest render.
    pub fn handle_event(&self, event: &WidgetEvent) -> EventOutcome {
        let add_decision = matches!(event, WidgetEvent::Add(_)).then_some(AddDecision::Reject);

        if event.is_edit() && !self.config.options.editable {
            debug!(event = event.as_str(), "timeline is read-only, event ignored");
            return EventOutcome {
                intent: None,
                add_decision,
            };
        }

        let intent = match event {
            WidgetEvent::Move(moved) => self
                .projection()
                .and_then(|p| translate_move(p, &self.known, moved))
                .map(Intent::Mutation),
            WidgetEvent::Remove { id } => translate_remove(&self.known, id).map(Intent::Mutation),
            WidgetEvent::Add(proposed) => self
                .projection()
                .map(|p| Intent::Mutation(translate_add(p, proposed))),
            WidgetEvent::DoubleClick(click) => {
                translate_double_click(&self.known, click).map(Intent::CardActivated)
            }
        };

        EventOutcome {
            intent,
            add_decision,
        }
    }

    /// Handle an event and forward any mutation to `sink`.
    ///
    /// A card activation is handed back to the caller. Tentative adds are
    /// always rejected, so there is no decision to return.
    pub fn dispatch<S: MutationSink + ?Sized>(
        &self,
        event: &WidgetEvent,
        sink: &mut S,
    ) -> Option<CardActivation> {
        match self.handle_event(event).intent? {
            Intent::Mutation(mutation) => {
                debug!(action = mutation.as_str(), record = ?mutation.record_id(), "forwarding mutation");
                mutation.apply_to(sink);
                None
            }
            Intent::CardActivated(activation) => Some(activation),
        }
    }

    /// Tear down the widget and return it.
    pub fn unmount(mut self) -> Option<W> {
        let widget = self.handle.release();
        info!(items = self.dataset.len(), "timeline view unmounted");
        widget
    }
}

// ============================================================================
// Tests
// ============================================================================
