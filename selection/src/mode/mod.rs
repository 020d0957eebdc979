//! Selection modes.
//!
//! Each mode is its own type implementing [`ModeBehavior`]; the controller
//! holds a [`ModeState`] and dispatches through it instead of matching on
//! the mode at every call site. Only range mode carries extra state.

mod multiple;
mod range;
mod single;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::caption::{CaptionStyle, Tag};
use crate::form::FormField;
use crate::item::{Item, ItemId};

pub use multiple::MultipleMode;
pub use range::{RangeMode, compare_endpoints};
pub use single::SingleMode;

/// Selection mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One item at a time; picking an item closes the dropdown.
    #[default]
    Single,
    /// Any number of items; the dropdown stays open while toggling.
    Multiple,
    /// A lower and an upper endpoint picked in two clicks.
    Range,
}

/// Which range endpoint the next item click sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum RangeFocus {
    #[default]
    Min,
    Max,
}

/// Raw endpoint values of a range selection.
///
/// These are what the user typed or picked and may differ from the texts of
/// the endpoint items while the user is typing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RangeEndpoints {
    pub min: Option<String>,
    pub max: Option<String>,
}

impl RangeEndpoints {
    pub fn new(min: Option<&str>, max: Option<&str>) -> Self {
        Self {
            min: min.map(str::to_string),
            max: max.map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn get(&self, focus: RangeFocus) -> Option<&str> {
        match focus {
            RangeFocus::Min => self.min.as_deref(),
            RangeFocus::Max => self.max.as_deref(),
        }
    }

    /// Set one endpoint; an empty value clears it.
    pub fn set(&mut self, focus: RangeFocus, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        match focus {
            RangeFocus::Min => self.min = value,
            RangeFocus::Max => self.max = value,
        }
    }
}

/// The last committed state, restored by `reset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Memory {
    /// Checked item ids (single and multiple modes).
    Checked(HashSet<ItemId>),
    /// Endpoint values (range mode).
    Range(RangeEndpoints),
}

/// What the controller does after a mode has toggled an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep the dropdown open.
    Stay,
    /// Keep it open and move focus to the upper endpoint input.
    FocusMax,
    /// The selection is complete; close the dropdown.
    Commit,
}

/// Mode-specific selection rules.
pub trait ModeBehavior {
    fn mode(&self) -> Mode;

    /// Apply a click on `items[index]`.
    fn toggle(&mut self, items: &mut [Item], index: usize) -> Step;

    /// Capture the state `restore` rolls back to.
    fn save(&self, items: &[Item]) -> Memory;

    /// Roll back to a saved state. Memory saved by another mode is ignored.
    fn restore(&mut self, items: &mut [Item], memory: &Memory);

    /// Caption tags for the current state; empty means "label only".
    fn caption_tags(&self, items: &[Item], style: &CaptionStyle) -> Vec<Tag>;

    /// Hidden form fields for the current state.
    fn form_fields(&self, items: &[Item], name: &str) -> Vec<FormField>;

    /// Bring item flags back in line with mode state after a caption pass.
    fn repair(&mut self, _items: &mut [Item]) {}

    /// Forget everything selected.
    fn clear(&mut self, items: &mut [Item]) {
        uncheck_all(items);
    }

    /// Re-resolve references into `items` after they were replaced.
    fn relink(&mut self, _items: &[Item]) {}
}

/// Mode state owned by a selection.
#[derive(Debug, Clone)]
pub enum ModeState {
    Single(SingleMode),
    Multiple(MultipleMode),
    Range(RangeMode),
}

impl ModeState {
    pub fn new(mode: Mode) -> Self {
        match mode {
            Mode::Single => ModeState::Single(SingleMode),
            Mode::Multiple => ModeState::Multiple(MultipleMode),
            Mode::Range => ModeState::Range(RangeMode::default()),
        }
    }

    pub fn behavior(&self) -> &dyn ModeBehavior {
        match self {
            ModeState::Single(m) => m,
            ModeState::Multiple(m) => m,
            ModeState::Range(m) => m,
        }
    }

    pub fn behavior_mut(&mut self) -> &mut dyn ModeBehavior {
        match self {
            ModeState::Single(m) => m,
            ModeState::Multiple(m) => m,
            ModeState::Range(m) => m,
        }
    }

    pub fn mode(&self) -> Mode {
        self.behavior().mode()
    }

    pub fn range(&self) -> Option<&RangeMode> {
        match self {
            ModeState::Range(m) => Some(m),
            _ => None,
        }
    }

    pub fn range_mut(&mut self) -> Option<&mut RangeMode> {
        match self {
            ModeState::Range(m) => Some(m),
            _ => None,
        }
    }
}

pub(crate) fn uncheck_all(items: &mut [Item]) {
    for item in items.iter_mut() {
        item.set_checked(false);
    }
}

pub(crate) fn checked_ids(items: &[Item]) -> HashSet<ItemId> {
    items
        .iter()
        .filter(|i| i.is_checked())
        .map(|i| i.id().clone())
        .collect()
}

/// Uncheck everything, then check exactly the remembered ids.
pub(crate) fn restore_checked(items: &mut [Item], memory: &Memory) {
    let Memory::Checked(ids) = memory else {
        return;
    };
    for item in items.iter_mut() {
        let checked = ids.contains(item.id());
        item.set_checked(checked);
    }
}

pub(crate) fn checked_fields(items: &[Item], name: &str) -> Vec<FormField> {
    items
        .iter()
        .filter(|i| i.is_checked())
        .map(|i| FormField::new(name, i.value()))
        .collect()
}
