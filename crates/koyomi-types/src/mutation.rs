//! Mutation intents and the store contract that receives them.
//!
//! A [`Mutation`] is a *proposal*. Nothing in this workspace applies it to the
//! authoritative record set; a [`MutationSink`] forwards it to whatever store
//! owns the records, and the effect becomes visible only when that store hands
//! back a new record set.

use serde::{Deserialize, Serialize};

use crate::ids::RecordId;
use crate::record::{Properties, Record};

/// A proposed create/update/delete against the record store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Mutation {
    /// Replace `old` with `new`.
    Update {
        new: Record,
        old: Record,
        reason: String,
    },
    /// Delete an existing record.
    Delete { record: Record },
    /// Create a new record with the given initial properties. With `show`,
    /// the host opens the record once the store confirms it.
    Create {
        properties: Properties,
        #[serde(default)]
        show: bool,
    },
}

impl Mutation {
    /// Short action name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mutation::Update { .. } => "update",
            Mutation::Delete { .. } => "delete",
            Mutation::Create { .. } => "create",
        }
    }

    /// The record this mutation targets (None for creates).
    pub fn record_id(&self) -> Option<&RecordId> {
        match self {
            Mutation::Update { old, .. } => Some(&old.id),
            Mutation::Delete { record } => Some(&record.id),
            Mutation::Create { .. } => None,
        }
    }

    /// Route this intent into a sink.
    pub fn apply_to<S: MutationSink + ?Sized>(self, sink: &mut S) {
        match self {
            Mutation::Update { new, old, reason } => sink.update(new, old, &reason),
            Mutation::Delete { record } => sink.delete(record),
            Mutation::Create { properties, show } => sink.create(properties, show),
        }
    }
}

/// Fire-and-forget mutation API of the record store.
///
/// Implementations must not assume the caller waits for, or observes, the
/// outcome.
pub trait MutationSink {
    fn update(&mut self, new: Record, old: Record, reason: &str);
    fn delete(&mut self, record: Record);
    fn create(&mut self, properties: Properties, show: bool);
}

/// Collecting sink, handy for hosts that batch intents.
impl MutationSink for Vec<Mutation> {
    fn update(&mut self, new: Record, old: Record, reason: &str) {
        self.push(Mutation::Update {
            new,
            old,
            reason: reason.to_string(),
        });
    }

    fn delete(&mut self, record: Record) {
        self.push(Mutation::Delete { record });
    }

    fn create(&mut self, properties: Properties, show: bool) {
        self.push(Mutation::Create { properties, show });
    }
}

/// Broadcast action a store emits after applying a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateAction {
    AddBlock,
    UpdateBlock,
    DeleteBlock,
}

/// Change notification sent to subscribers after a record changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMsg {
    pub action: UpdateAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<Record>,
}

impl UpdateMsg {
    pub fn new(action: UpdateAction, block: Record) -> Self {
        Self {
            action,
            block: Some(block),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
