//! Keyboard selection over an ordered list of items.
//!
//! Used by both the completion popup and the command palette. The controller
//! is the only thing that mutates its state; a listener is told every time the
//! highlighted item changes.
//!
//! Navigation and commit while `Empty` or `Dismissed` are no-ops: `move_by`
//! does nothing and `commit` returns `None`. Nothing here panics.

use std::fmt;

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// No items to choose from.
    Empty,
    /// Items present, exactly one highlighted.
    Active { index: usize },
    /// The interaction was cancelled. `set_items` starts a new one.
    Dismissed,
}

type Listener<T> = Box<dyn FnMut(Option<&T>)>;

pub struct SelectionController<T> {
    items: Vec<T>,
    state: SelectionState,
    listener: Option<Listener<T>>,
}

impl<T> SelectionController<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            state: SelectionState::Empty,
            listener: None,
        }
    }

    /// Install the highlight-change listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: impl FnMut(Option<&T>) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Move the highlight by `delta`, clamped to the list bounds. Never wraps.
    pub fn move_by(&mut self, delta: isize) {
        let SelectionState::Active { index } = self.state else {
            return;
        };
        let last = self.items.len().saturating_sub(1);
        let target = if delta.is_negative() {
            index.saturating_sub(delta.unsigned_abs())
        } else {
            index.saturating_add(delta as usize).min(last)
        };
        self.set_index(index, target);
    }

    /// Jump to `index`, clamped to the list bounds.
    pub fn move_to(&mut self, index: usize) {
        let SelectionState::Active { index: current } = self.state else {
            return;
        };
        let target = index.min(self.items.len().saturating_sub(1));
        self.set_index(current, target);
    }

    pub fn move_to_first(&mut self) {
        self.move_to(0);
    }

    pub fn move_to_last(&mut self) {
        self.move_to(usize::MAX);
    }

    /// The highlighted item. Leaves state untouched; the caller decides
    /// whether the interaction ends.
    pub fn commit(&self) -> Option<&T> {
        self.highlighted()
    }

    /// End the interaction without choosing anything.
    pub fn cancel(&mut self) {
        let had_highlight = self.highlighted_index().is_some();
        self.items.clear();
        self.state = SelectionState::Dismissed;
        if had_highlight {
            self.notify();
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_dismissed(&self) -> bool {
        self.state == SelectionState::Dismissed
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        match self.state {
            SelectionState::Active { index } => Some(index),
            _ => None,
        }
    }

    pub fn highlighted(&self) -> Option<&T> {
        self.highlighted_index().and_then(|i| self.items.get(i))
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn set_index(&mut self, current: usize, target: usize) {
        if target != current {
            self.state = SelectionState::Active { index: target };
            self.notify();
        }
    }

    fn notify(&mut self) {
        let highlighted = match self.state {
            SelectionState::Active { index } => self.items.get(index),
            _ => None,
        };
        if let Some(listener) = self.listener.as_mut() {
            listener(highlighted);
        }
    }
}

impl<T: PartialEq> SelectionController<T> {
    /// Replace the item list. Highlights the first item, if any. The
    /// listener hears about it only when the highlighted item differs from
    /// the one shown before.
    pub fn set_items(&mut self, items: Vec<T>) {
        let changed = match (self.highlighted(), items.first()) {
            (Some(old), Some(new)) => old != new,
            (None, None) => false,
            _ => true,
        };
        self.items = items;
        self.state = if self.items.is_empty() {
            SelectionState::Empty
        } else {
            SelectionState::Active { index: 0 }
        };

        if changed {
            self.notify();
        }
    }
}

impl<T> Default for SelectionController<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for SelectionController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionController")
            .field("items", &self.items)
            .field("state", &self.state)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
