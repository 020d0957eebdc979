//! Routes raw host input to selections.
//!
//! Clicks on a selection's own controls are handled by that selection.
//! Any other click, and Tab key-ups, sweep open selections closed through
//! the registry. Key-downs go to the selection that owns the target, or to
//! the one that last received focus.

use crate::controller::{Direction, Selection};
use crate::events::{EventResult, FocusTarget};
use crate::keys::{EventTarget, InputEvent, Key, KeyCombo, MouseButton, TargetKind};
use crate::registry::{Registry, SweepReport};

/// Input router over a registry.
#[derive(Debug, Clone)]
pub struct KeyboardRouter {
    registry: Registry,
}

impl KeyboardRouter {
    /// Create a router over `registry`.
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Get the registry this router sweeps.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Route a click.
    ///
    /// Returns `Consumed` when a selection handled the click itself, and
    /// `Ignored` after a document-level sweep.
    pub fn handle_click(&self, button: MouseButton, target: EventTarget) -> EventResult {
        if button == MouseButton::Left
            && let Some(selection) = target.owner.and_then(|id| self.registry.get(id))
            && route_click(&selection, &target.kind)
        {
            return EventResult::Consumed;
        }

        self.registry
            .close_all_except(None, Some(&InputEvent::Click { button, target }));
        EventResult::Ignored
    }

    /// Route a key-up. Only Tab can close selections.
    pub fn handle_keyup(&self, key: Key, target: EventTarget) -> SweepReport {
        self.registry
            .close_all_except(None, Some(&InputEvent::KeyUp { key, target }))
    }

    /// Route a key-down to the selection owning the target, falling back to
    /// the focused one.
    pub fn handle_keydown(&self, key: impl Into<KeyCombo>, target: &EventTarget) -> EventResult {
        let owner = target.owner.or_else(|| self.registry.focused());
        let Some(selection) = owner.and_then(|id| self.registry.get(id)) else {
            return EventResult::Ignored;
        };
        keydown_route(key.into(), target, &selection)
    }
}

/// Clicks on a selection's own controls. Returns false for targets that fall
/// through to the document sweep.
fn route_click(selection: &Selection, kind: &TargetKind) -> bool {
    match kind {
        TargetKind::Toggle => {
            selection.toggle();
            true
        }
        TargetKind::Item(id) => {
            if let Err(e) = selection.toggle_item(id) {
                log::warn!("KeyboardRouter: click ignored: {}", e);
            }
            true
        }
        TargetKind::CleanButton => {
            selection.clear();
            true
        }
        TargetKind::ResetButton => {
            selection.reset();
            true
        }
        TargetKind::TextField | TargetKind::Button | TargetKind::Other => false,
    }
}

/// Handle a key-down aimed at `selection`.
///
/// Only Escape, Space and the vertical arrows are handled, and never while a
/// text field has focus. A closed selection opens on any of them. An open
/// one closes on Escape (returning focus to the toggle handle) or Space, and
/// moves focus among visible items on the arrows.
pub fn keydown_route(combo: KeyCombo, target: &EventTarget, selection: &Selection) -> EventResult {
    // Ignore keys with ctrl/alt modifiers
    if combo.modifiers.ctrl || combo.modifiers.alt {
        return EventResult::Ignored;
    }

    let key = combo.key;
    if !key.is_tracked() || target.is_text_field() {
        return EventResult::Ignored;
    }
    // Buttons activate themselves on Space.
    if key == Key::Space && target.kind == TargetKind::Button {
        return EventResult::Ignored;
    }

    if selection.is_disabled() || selection.is_disposed() {
        return EventResult::Consumed;
    }

    if !selection.is_open() {
        selection.toggle();
        return EventResult::Consumed;
    }

    match key {
        Key::Escape => {
            selection.toggle();
            selection.request_focus(FocusTarget::Toggle);
        }
        Key::Space => {
            selection.toggle();
        }
        Key::Up | Key::Down => {
            let direction = if key == Key::Up {
                Direction::Up
            } else {
                Direction::Down
            };
            let from = match &target.kind {
                TargetKind::Item(id) => Some(id),
                _ => None,
            };
            selection.move_focus(direction, from);
        }
        _ => return EventResult::Ignored,
    }
    EventResult::Consumed
}
