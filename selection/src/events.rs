//! Notifications emitted by selections, and the results of their operations.
//!
//! Listeners are synchronous callbacks registered on a selection with
//! [`crate::controller::Selection::subscribe`]. `Show` and `Hide` are
//! cancelable: a listener returning [`Verdict::Veto`] stops the transition.
//! The veto of any other kind is ignored.

use std::sync::Arc;

use crate::controller::SelectionId;

/// Which notification is being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// The dropdown is about to open. Cancelable.
    Show,
    /// The dropdown opened.
    Shown,
    /// The dropdown is about to be closed by a registry sweep. Cancelable.
    Hide,
    /// The dropdown closed.
    Hidden,
    /// An item was toggled.
    Change,
}

impl NotificationKind {
    pub fn is_cancelable(&self) -> bool {
        matches!(self, NotificationKind::Show | NotificationKind::Hide)
    }
}

/// A notification together with the selection that emitted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub selection: SelectionId,
}

impl Notification {
    pub fn new(kind: NotificationKind, selection: SelectionId) -> Self {
        Self { kind, selection }
    }
}

/// A listener's answer to a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verdict {
    #[default]
    Proceed,
    Veto,
}

/// Listener callback.
pub type Listener = Arc<dyn Fn(&Notification) -> Verdict + Send + Sync>;

/// Result of an open/close style operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Outcome {
    /// The visibility transition happened.
    Proceeded,
    /// A listener vetoed the transition; state is unchanged.
    Vetoed,
    /// Nothing to transition (disabled, disposed, already in the target state).
    #[default]
    Skipped,
}

impl Outcome {
    pub fn proceeded(&self) -> bool {
        matches!(self, Outcome::Proceeded)
    }
}

/// Result of routing an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, the host should handle it.
    Ignored,
    /// Event was consumed, stop propagation.
    Consumed,
}

impl EventResult {
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

/// Where the host should move input focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusTarget {
    /// The toggle handle.
    Toggle,
    /// The lower range endpoint input.
    MinInput,
    /// The upper range endpoint input.
    MaxInput,
    /// An item row.
    Item(crate::item::ItemId),
}
