//! Board files and the in-memory record store behind the CLI.
//!
//! A board file is the JSON shape a board export uses:
//!
//! ```json
//! { "cardProperties": [ { "id": "p1", "name": "When", "type": "date" } ],
//!   "cards": [ { "id": "c1", "title": "Launch", "properties": { "p1": "{\"from\":0,\"to\":1}" } } ] }
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use koyomi_types::{
    MutationSink, Properties, Record, RecordId, Schema, UpdateAction, UpdateMsg,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// On-disk board: a schema plus its cards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[serde(default)]
    pub card_properties: Schema,
    #[serde(default)]
    pub cards: Vec<Record>,
}

impl Board {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading board {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing board {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).with_context(|| format!("writing board {}", path.display()))
    }
}

/// Authoritative record store for one CLI run.
///
/// Applies mutations immediately and records the change broadcasts it would
/// send to other subscribers.
#[derive(Debug)]
pub struct MemoryBoard {
    schema: Arc<Schema>,
    cards: Vec<Record>,
    broadcasts: Vec<UpdateMsg>,
    /// Card the last create asked to open.
    opened: Option<RecordId>,
}

impl MemoryBoard {
    pub fn new(board: Board) -> Self {
        Self {
            schema: Arc::new(board.card_properties),
            cards: board.cards,
            broadcasts: Vec::new(),
            opened: None,
        }
    }

    /// Fresh snapshot for the next render. Every call is a new identity.
    pub fn snapshot(&self) -> (Arc<Schema>, Arc<[Record]>) {
        (Arc::clone(&self.schema), self.cards.clone().into())
    }

    pub fn cards(&self) -> &[Record] {
        &self.cards
    }

    pub fn broadcasts(&self) -> &[UpdateMsg] {
        &self.broadcasts
    }

    /// The created card to open, once the store has confirmed it.
    pub fn opened(&self) -> Option<&Record> {
        let id = self.opened.as_ref()?;
        self.cards.iter().find(|c| &c.id == id)
    }

    pub fn is_dirty(&self) -> bool {
        !self.broadcasts.is_empty()
    }

    pub fn into_board(self) -> Board {
        Board {
            card_properties: Arc::unwrap_or_clone(self.schema),
            cards: self.cards,
        }
    }

    fn broadcast(&mut self, action: UpdateAction, record: Record) {
        info!(action = ?action, card = %record.id, name = %record.display_name(), "board changed");
        self.broadcasts.push(UpdateMsg::new(action, record));
    }
}

impl MutationSink for MemoryBoard {
    fn update(&mut self, new: Record, old: Record, reason: &str) {
        let Some(slot) = self.cards.iter_mut().find(|c| c.id == old.id) else {
            warn!(card = %old.id, reason, "update for a card no longer on the board");
            return;
        };
        *slot = new.clone();
        self.broadcast(UpdateAction::UpdateBlock, new);
    }

    fn delete(&mut self, record: Record) {
        let before = self.cards.len();
        self.cards.retain(|c| c.id != record.id);
        if self.cards.len() == before {
            warn!(card = %record.id, "delete for a card no longer on the board");
            return;
        }
        self.broadcast(UpdateAction::DeleteBlock, record);
    }

    fn create(&mut self, properties: Properties, show: bool) {
        let mut record = Record::new(RecordId::new(), "");
        record.properties = properties;
        if show {
            self.opened = Some(record.id.clone());
        }
        self.cards.push(record.clone());
        self.broadcast(UpdateAction::AddBlock, record);
    }
}
