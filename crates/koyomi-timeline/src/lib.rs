//! Timeline projection and sync engine for Koyomi.
//!
//! Records in, widget calls out, mutation intents back:
//!
//! ```text
//! (Schema, [Record]) ──► Projection ──► [TimelineEntry]
//!                                            │
//!                              VisualDataset::sync (incremental)
//!                                            │
//!                         TimelineWidget (items_changed, set_groups)
//!                                            │
//!                                       WidgetEvent
//!                                            │
//!                             events::translate_* ──► Intent ──► MutationSink
//! ```
//!
//! The record store stays authoritative. A move or delete on the widget is
//! only a proposal until the store hands back a record set that reflects it.
//!
//! # Modules
//!
//! |---------------|--------------------------------------------------|
//! | Module        | Purpose                                          |
//! |---------------|--------------------------------------------------|
//! | `projection`  | Schema lookup, record → entry, entry → record     |
//! | `dataset`     | Ordered item collection with incremental sync    |
//! | `groups`      | Swim lanes from the dataset                      |
//! | `widget`      | Widget trait and the RAII handle                 |
//! | `events`      | Pure event → intent translators                  |
//! | `template`    | Item label markup                                |
//! | `engine`      | `TimelineView`, tying it all together            |
//! | `config`      | RON view config                                  |
//! | `headless`    | Recording widget for CLI and tests               |
//! |---------------|--------------------------------------------------|

pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod events;
pub mod groups;
pub mod headless;
pub mod projection;
pub mod template;
pub mod widget;

/// Group key for entries with no group label. Never shown to users.
pub const UNASSIGNED_GROUP: &str = "___unassigned";

pub use config::{
    ConfigError, TimelineConfig, config_file_path, load_config, load_config_from,
    load_config_or_default,
};
pub use dataset::{DatasetChanges, VisualDataset, VisualItem};
pub use engine::{EventOutcome, RenderOutcome, SyncReport, TimelineView};
pub use error::TimelineError;
pub use events::{
    AddDecision, CardActivation, ClickEvent, ClickTarget, Intent, KnownRecords, MovedItem,
    PointerEvent, ProposedItem, WidgetEvent,
};
pub use groups::{DEFAULT_UNASSIGNED_LABEL, Group, derive_groups};
pub use headless::HeadlessWidget;
pub use projection::{DEFAULT_GROUP_PROPERTY, Projection, ProjectionMemo, TimelineEntry};
pub use template::render_label;
pub use widget::{SecondaryEvent, TimelineOptions, TimelineWidget, WidgetHandle};

pub type Result<T> = std::result::Result<T, TimelineError>;
