//! A widget with no screen.
//!
//! [`HeadlessWidget`] keeps a mirror of everything the engine pushed to it:
//! the lanes, the rendered labels, and a log of change notifications. The CLI
//! prints from it, and tests assert against it.

use std::convert::Infallible;

use indexmap::IndexMap;
use koyomi_types::RecordId;

use crate::dataset::{DatasetChanges, VisualDataset};
use crate::groups::Group;
use crate::template::render_label;
use crate::widget::{SecondaryEvent, TimelineOptions, TimelineWidget};

/// A drawn item as the headless widget last saw it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawnItem {
    pub label: String,
    pub start: i64,
    pub end: i64,
    pub group: String,
}

/// Recording widget implementation.
#[derive(Debug, Default)]
pub struct HeadlessWidget {
    options: TimelineOptions,
    subscriptions: Vec<SecondaryEvent>,
    groups: Vec<Group>,
    group_pushes: usize,
    notifications: Vec<DatasetChanges>,
    drawn: IndexMap<RecordId, DrawnItem>,
    destroyed: u32,
}

impl HeadlessWidget {
    pub fn new(options: TimelineOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Factory signature accepted by [`WidgetHandle::acquire`](crate::WidgetHandle::acquire).
    pub fn factory(options: &TimelineOptions) -> Result<Self, Infallible> {
        Ok(Self::new(*options))
    }

    pub fn options(&self) -> &TimelineOptions {
        &self.options
    }

    pub fn subscriptions(&self) -> &[SecondaryEvent] {
        &self.subscriptions
    }

    /// Lanes from the latest `set_groups`.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// How many times the lane list was replaced.
    pub fn group_pushes(&self) -> usize {
        self.group_pushes
    }

    /// Every change notification received, oldest first.
    pub fn notifications(&self) -> &[DatasetChanges] {
        &self.notifications
    }

    pub fn drawn(&self, id: &RecordId) -> Option<&DrawnItem> {
        self.drawn.get(id)
    }

    /// Drawn items in the order they first appeared.
    pub fn drawn_items(&self) -> impl Iterator<Item = (&RecordId, &DrawnItem)> {
        self.drawn.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.drawn.values().map(|d| d.label.as_str()).collect()
    }

    pub fn destroy_count(&self) -> u32 {
        self.destroyed
    }
}

impl TimelineWidget for HeadlessWidget {
    fn subscribe(&mut self, event: SecondaryEvent) {
        self.subscriptions.push(event);
    }

    fn set_groups(&mut self, groups: &[Group]) {
        self.groups = groups.to_vec();
        self.group_pushes += 1;
    }

    fn items_changed(&mut self, changes: &DatasetChanges, dataset: &VisualDataset) {
        for id in &changes.removed {
            self.drawn.shift_remove(id);
        }
        for id in changes.added.iter().chain(&changes.updated) {
            let Some(item) = dataset.get(id) else {
                continue;
            };
            self.drawn.insert(
                id.clone(),
                DrawnItem {
                    label: render_label(Some(item)),
                    start: item.start,
                    end: item.end,
                    group: item.group.clone(),
                },
            );
        }
        self.notifications.push(changes.clone());
    }

    fn destroy(&mut self) {
        self.destroyed += 1;
    }
}

#[cfg(test)]
mod tests {
    use koyomi_types::{DateRange, Record};

    use super::*;
    use crate::projection::TimelineEntry;

    fn entry(id: &str, title: &str) -> TimelineEntry {
        TimelineEntry {
            id: id.into(),
            title: title.to_string(),
            range: DateRange::new(0, 10),
            group: None,
            record: Record::new(id, title),
        }
    }

    #[test]
    fn test_mirrors_dataset_changes() {
        let mut widget = HeadlessWidget::default();
        let mut ds = VisualDataset::new();

        let changes = ds.sync(&[entry("a", "Alpha"), entry("b", "Beta")]);
        widget.items_changed(&changes, &ds);
        assert_eq!(widget.labels(), vec!["<span>Alpha</span>", "<span>Beta</span>"]);

        let changes = ds.sync(&[entry("b", "Beta 2")]);
        widget.items_changed(&changes, &ds);
        assert_eq!(widget.labels(), vec!["<span>Beta 2</span>"]);
        assert_eq!(widget.notifications().len(), 2);
    }

    #[test]
    fn test_set_groups_replaces() {
        let mut widget = HeadlessWidget::default();
        widget.set_groups(&[Group::labelled("A")]);
        widget.set_groups(&[Group::unassigned("Unassigned")]);
        assert_eq!(widget.groups().len(), 1);
        assert_eq!(widget.group_pushes(), 2);
    }
}
