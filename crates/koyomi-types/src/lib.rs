//! Shared record, schema, and mutation types for Koyomi.
//!
//! This crate is the data model the timeline projects from: records with
//! schema-typed properties, the date range codec, and the mutation intents
//! handed back to the record store. It has **no internal koyomi
//! dependencies**; it is a leaf crate that other crates build on.
//!
//! # Overview
//!
//! ```text
//! Schema (ordered PropertyTemplate list)
//!     └── PropertyTemplate { id, name, type }
//!           └── type == date  → value is an encoded DateRange
//!           └── name == group → value is a grouping label
//!
//! Record (RecordId) ← a card on a board, owned by the store
//!     └── title, icon
//!     └── properties: PropertyId → String
//!
//! Mutation ← proposal handed to a MutationSink
//!     └── Update { new, old, reason } | Delete { record } | Create { properties, show }
//! ```
//!
//! # Key Types
//!
//! |--------------------|---------------------------------------------|
//! | Type               | Purpose                                     |
//! |--------------------|---------------------------------------------|
//! | [`RecordId`]       | Which record                                |
//! | [`PropertyId`]     | Which property template                     |
//! | [`Record`]         | Title, icon, raw property values            |
//! | [`Schema`]         | Ordered property templates                  |
//! | [`DateRange`]      | `{from, to}` in Unix millis, JSON-encoded   |
//! | [`Mutation`]       | Proposed store change                       |
//! | [`MutationSink`]   | Store-side contract for proposals           |
//! |--------------------|---------------------------------------------|

pub mod date_range;
pub mod ids;
pub mod mutation;
pub mod record;
pub mod schema;

// Re-export primary types at crate root for convenience.
pub use date_range::{DateRange, DateRangeError};
pub use ids::{IdError, PrefixError, PropertyId, RecordId, resolve_record_prefix};
pub use mutation::{Mutation, MutationSink, UpdateAction, UpdateMsg};
pub use record::{Properties, Record};
pub use schema::{PropertyTemplate, PropertyType, Schema};
