//! Dropdown selection state machine.
//!
//! A [`Selection`](controller::Selection) owns a list of items and the rules
//! for picking among them: one item, several items, or a `from`/`to` range.
//! It keeps a filter over the list, a caption summarising what is checked,
//! hidden form fields mirroring the committed value, and a memory of the
//! state at open time that `reset` rolls back to. A [`Registry`](registry::Registry)
//! keeps at most one dropdown open; a [`KeyboardRouter`](router::KeyboardRouter)
//! turns host input into operations.
//!
//! Rendering is left to the host: every operation updates the state, raises a
//! dirty flag, and the host redraws from [`Selection::view`](controller::Selection::view).

pub mod caption;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod filter;
pub mod form;
pub mod item;
pub mod keys;
pub mod mode;
pub mod registry;
pub mod router;

pub use controller::{Selection, SelectionBuilder, SelectionId};
pub use error::SelectionError;
pub use registry::Registry;

pub mod prelude {
    pub use crate::caption::{Caption, Tag};
    pub use crate::config::{ConfigError, SelectionConfig};
    pub use crate::controller::{
        Direction, ItemView, Method, Selection, SelectionBuilder, SelectionId, SelectionView,
    };
    pub use crate::error::SelectionError;
    pub use crate::events::{
        EventResult, FocusTarget, Notification, NotificationKind, Outcome, Verdict,
    };
    pub use crate::filter::{FuzzyMatch, MatchPredicate, RegexMatch};
    pub use crate::form::FormField;
    pub use crate::item::{Item, ItemId, SelectionItem};
    pub use crate::keys::{EventTarget, InputEvent, Key, KeyCombo, Modifiers, MouseButton, TargetKind};
    pub use crate::mode::{Memory, Mode, RangeEndpoints, RangeFocus};
    pub use crate::registry::{Registry, SweepReport};
    pub use crate::router::{KeyboardRouter, keydown_route};
}
