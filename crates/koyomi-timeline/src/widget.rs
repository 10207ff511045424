//! Widget contract and the scoped handle that owns a widget instance.
//!
//! The timeline widget (layout, drag physics, drawing) lives outside this
//! crate. The engine only needs the calls below, and it only ever talks to
//! the widget through a [`WidgetHandle`], which guarantees the instance is
//! torn down exactly once.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Result;
use crate::dataset::{DatasetChanges, VisualDataset};
use crate::error::TimelineError;
use crate::groups::Group;

/// Options the widget is constructed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineOptions {
    /// Enables drag, delete, and create interactions.
    pub editable: bool,
    /// Calendar granularity hint: show week numbers on the axis.
    pub show_week_scale: bool,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            editable: true,
            show_week_scale: true,
        }
    }
}

/// Secondary widget events delivered through a generic subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SecondaryEvent {
    DoubleClick,
}

/// Operations the engine performs on a widget.
///
/// Item labels come from [`render_label`](crate::template::render_label); a
/// widget calls it when it (re)draws an item.
pub trait TimelineWidget {
    /// Start delivering a secondary event type.
    fn subscribe(&mut self, event: SecondaryEvent);

    /// Replace the lane list.
    fn set_groups(&mut self, groups: &[Group]);

    /// The dataset changed; `changes` lists the touched IDs.
    fn items_changed(&mut self, changes: &DatasetChanges, dataset: &VisualDataset);

    /// Tear down the instance. Called exactly once.
    fn destroy(&mut self);
}

/// Owned widget instance with guaranteed teardown.
///
/// Acquired when the view mounts; [`release`](Self::release) or drop destroys
/// the widget, whichever comes first.
pub struct WidgetHandle<W: TimelineWidget> {
    widget: Option<W>,
}

impl<W: TimelineWidget> WidgetHandle<W> {
    /// Construct the widget and register the once-per-instance subscriptions.
    pub fn acquire<F, E>(factory: F, options: &TimelineOptions) -> Result<Self>
    where
        F: FnOnce(&TimelineOptions) -> std::result::Result<W, E>,
        E: std::fmt::Display,
    {
        let mut widget = factory(options).map_err(|e| TimelineError::Widget(e.to_string()))?;
        widget.subscribe(SecondaryEvent::DoubleClick);
        info!(
            editable = options.editable,
            show_week_scale = options.show_week_scale,
            "timeline widget acquired"
        );
        Ok(Self {
            widget: Some(widget),
        })
    }

    /// Whether the widget is still alive.
    pub fn is_live(&self) -> bool {
        self.widget.is_some()
    }

    pub fn widget(&self) -> Option<&W> {
        self.widget.as_ref()
    }

    pub fn widget_mut(&mut self) -> Option<&mut W> {
        self.widget.as_mut()
    }

    /// Destroy the widget now and hand back the dead instance.
    ///
    /// Subsequent calls (and the eventual drop) are no-ops.
    pub fn release(&mut self) -> Option<W> {
        let mut widget = self.widget.take()?;
        widget.destroy();
        debug!("timeline widget released");
        Some(widget)
    }
}

impl<W: TimelineWidget> Drop for WidgetHandle<W> {
    fn drop(&mut self) {
        self.release();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::headless::HeadlessWidget;

    /// Counts destroys through a shared cell so drops can be observed.
    struct Tracked {
        destroyed: Rc<Cell<u32>>,
    }

    impl TimelineWidget for Tracked {
        fn subscribe(&mut self, _event: SecondaryEvent) {}
        fn set_groups(&mut self, _groups: &[Group]) {}
        fn items_changed(&mut self, _changes: &DatasetChanges, _dataset: &VisualDataset) {}
        fn destroy(&mut self) {
            self.destroyed.set(self.destroyed.get() + 1);
        }
    }

    #[test]
    fn test_acquire_subscribes_once() {
        let handle = WidgetHandle::acquire(HeadlessWidget::factory, &TimelineOptions::default()).unwrap();
        let widget = handle.widget().unwrap();
        assert_eq!(widget.subscriptions(), &[SecondaryEvent::DoubleClick]);
    }

    #[test]
    fn test_factory_failure_propagates() {
        let result = WidgetHandle::<HeadlessWidget>::acquire(
            |_| Err::<HeadlessWidget, _>("no container element"),
            &TimelineOptions::default(),
        );
        match result {
            Err(TimelineError::Widget(msg)) => assert!(msg.contains("no container")),
            _ => panic!("expected widget error"),
        }
    }

    #[test]
    fn test_release_destroys_once() {
        let mut handle =
            WidgetHandle::acquire(HeadlessWidget::factory, &TimelineOptions::default()).unwrap();
        let widget = handle.release().unwrap();
        assert_eq!(widget.destroy_count(), 1);
        assert!(!handle.is_live());
        assert!(handle.release().is_none());
    }

    #[test]
    fn test_drop_destroys() {
        let destroyed = Rc::new(Cell::new(0));
        {
            let tracked = Tracked {
                destroyed: Rc::clone(&destroyed),
            };
            let _handle = WidgetHandle::acquire(
                |_| Ok::<_, std::convert::Infallible>(tracked),
                &TimelineOptions::default(),
            )
            .unwrap();
        }
        assert_eq!(destroyed.get(), 1);
    }

    #[test]
    fn test_release_then_drop_does_not_double_destroy() {
        let destroyed = Rc::new(Cell::new(0));
        let tracked = Tracked {
            destroyed: Rc::clone(&destroyed),
        };
        let mut handle =
            WidgetHandle::acquire(|_| Ok::<_, std::convert::Infallible>(tracked), &TimelineOptions::default())
                .unwrap();
        handle.release();
        drop(handle);
        assert_eq!(destroyed.get(), 1);
    }

    #[test]
    fn test_options_ron_defaults() {
        let opts: TimelineOptions = ron::from_str("(editable: false)").unwrap();
        assert!(!opts.editable);
        assert!(opts.show_week_scale);
    }
}
