//! Page selection state.
//!
//! Tracks the selected global page indices and the active anchor. All
//! mutations notify observers with the new selection, and document
//! removal purges affected indices synchronously with the collection's
//! delete notification.

use std::collections::BTreeSet;
use std::ops::Range;

use crate::events::{SubscriptionId, Subscribers};

/// How a select/deselect call combines with the existing selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMode {
    /// Replace the selection with the single index.
    SelectOne,
    /// Extend between the active anchor and the index, inclusive.
    SelectRange,
    /// Add the index, keeping the rest.
    SelectAppend,
}

/// Notification payload: the new selection, sorted ascending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionChanged {
    pub selected: Vec<usize>,
}

#[derive(Default)]
pub struct SelectionModel {
    active: Option<usize>,
    selected: BTreeSet<usize>,
    observers: Subscribers<SelectionChanged>,
}

impl SelectionModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The anchor index range operations extend from.
    #[must_use]
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn set_active(&mut self, index: Option<usize>) {
        self.active = index;
    }

    #[must_use]
    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    #[must_use]
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Selected global page indices, sorted ascending.
    #[must_use]
    pub fn selected_pages(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&SelectionChanged) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn select(&mut self, index: usize, mode: SelectionMode) {
        match mode {
            SelectionMode::SelectOne => self.select_one_active(index),
            SelectionMode::SelectRange => match self.active {
                None => self.select_one_active(index),
                Some(anchor) => {
                    let (lo, hi) = (anchor.min(index), anchor.max(index));
                    self.selected.extend(lo..=hi);
                }
            },
            SelectionMode::SelectAppend => match self.active {
                None => self.select_one_active(index),
                Some(_) => {
                    self.selected.insert(index);
                }
            },
        }
        self.notify();
    }

    /// Mirrors [`select`](Self::select) mode semantics, removing instead
    /// of adding.
    ///
    /// `SelectOne` clears the entire selection regardless of `index`;
    /// long-standing behavior that callers rely on as "deselect all".
    pub fn deselect(&mut self, index: usize, mode: SelectionMode) {
        if self.selected.is_empty() {
            return;
        }
        match mode {
            SelectionMode::SelectOne => {
                self.clear();
                return;
            }
            SelectionMode::SelectRange => match self.active {
                None => {
                    self.clear();
                    return;
                }
                Some(anchor) => {
                    let (lo, hi) = (anchor.min(index), anchor.max(index));
                    for i in lo..=hi {
                        self.selected.remove(&i);
                    }
                }
            },
            SelectionMode::SelectAppend => match self.active {
                None => {
                    self.clear();
                    return;
                }
                Some(_) => {
                    self.selected.remove(&index);
                }
            },
        }
        self.notify();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.active = None;
        self.notify();
    }

    /// Reacts to a document deletion: indices inside the removed global
    /// range are purged, higher ones shift down by the removed count so
    /// they keep denoting the same pages. The anchor follows the same
    /// rules; it resets whenever the selection empties.
    pub fn on_pages_removed(&mut self, removed: Range<usize>) {
        if self.selected.is_empty() {
            return;
        }
        let count = removed.end - removed.start;
        self.selected = self
            .selected
            .iter()
            .filter_map(|&index| {
                if removed.contains(&index) {
                    None
                } else if index >= removed.end {
                    Some(index - count)
                } else {
                    Some(index)
                }
            })
            .collect();
        self.active = self.active.and_then(|index| {
            if removed.contains(&index) {
                None
            } else if index >= removed.end {
                Some(index - count)
            } else {
                Some(index)
            }
        });
        if self.selected.is_empty() {
            self.active = None;
        }
        self.notify();
    }

    fn select_one_active(&mut self, index: usize) {
        self.selected.clear();
        self.selected.insert(index);
        self.active = Some(index);
    }

    fn notify(&mut self) {
        let event = SelectionChanged {
            selected: self.selected.iter().copied().collect(),
        };
        self.observers.emit(&event);
    }
}
