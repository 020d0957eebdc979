//! Keys, pointer buttons and event targets forwarded by the host.

use crate::controller::SelectionId;
use crate::item::ItemId;

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Control key held
    pub ctrl: bool,
    /// Shift key held
    pub shift: bool,
    /// Alt key held
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
    };
}

/// Key codes the selection reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Character key
    Char(char),
    Enter,
    Escape,
    Tab,
    Space,
    Up,
    Down,
}

impl Key {
    /// Keys the keydown router acts on.
    pub fn is_tracked(&self) -> bool {
        matches!(self, Key::Escape | Key::Up | Key::Down | Key::Space)
    }
}

/// A key combination (key + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    /// Create a new key combo
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Create a key combo without modifiers
    pub const fn key(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// Add ctrl modifier
    pub const fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    /// Add alt modifier
    pub const fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }
}

impl From<Key> for KeyCombo {
    fn from(key: Key) -> Self {
        Self::key(key)
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

/// What part of the surface an input event landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    /// The toggle handle that opens and closes the dropdown.
    Toggle,
    /// An item row in the dropdown list.
    Item(ItemId),
    /// A text field: the search box or a range endpoint input.
    TextField,
    /// The clear button.
    CleanButton,
    /// The reset button.
    ResetButton,
    /// Any other button (accept, create new).
    Button,
    /// Anything else.
    Other,
}

/// Target of an input event: which selection's surface (if any) contains it
/// and what kind of element it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTarget {
    pub owner: Option<SelectionId>,
    pub kind: TargetKind,
}

impl EventTarget {
    /// A target inside the given selection's surface.
    pub fn inside(owner: SelectionId, kind: TargetKind) -> Self {
        Self {
            owner: Some(owner),
            kind,
        }
    }

    /// A target outside every selection.
    pub fn outside() -> Self {
        Self {
            owner: None,
            kind: TargetKind::Other,
        }
    }

    pub fn is_text_field(&self) -> bool {
        self.kind == TargetKind::TextField
    }

    /// True when the target lies inside the given selection's surface.
    pub fn is_inside(&self, id: SelectionId) -> bool {
        self.owner == Some(id)
    }
}

/// A document-level input event that may close open selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Click {
        button: MouseButton,
        target: EventTarget,
    },
    KeyUp {
        key: Key,
        target: EventTarget,
    },
}

impl InputEvent {
    pub fn target(&self) -> &EventTarget {
        match self {
            InputEvent::Click { target, .. } | InputEvent::KeyUp { target, .. } => target,
        }
    }
}
