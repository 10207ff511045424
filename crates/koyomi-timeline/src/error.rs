//! Error types for the timeline engine.
//!
//! Only the edges fail loudly. Undisplayable records, stale events, and
//! malformed date values are filtered inside the engine and never reach here.

use thiserror::Error;

/// Errors surfaced to the host.
#[derive(Error, Debug)]
pub enum TimelineError {
    /// The widget factory failed; the host decides what to show instead.
    #[error("timeline widget construction failed: {0}")]
    Widget(String),

    /// The widget was already released (after unmount).
    #[error("timeline widget already released")]
    Released,
}
