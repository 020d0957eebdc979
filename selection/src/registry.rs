//! Registry of live selections.
//!
//! The registry enforces the "one open dropdown at a time" policy: opening a
//! selection sweeps every other open one closed. Selections register when
//! built and unregister when disposed; the list is read on every open and
//! close, so it sits behind a lock.

use std::sync::{Arc, RwLock, Weak};

use crate::controller::{Selection, SelectionId};
use crate::events::Outcome;
use crate::keys::{InputEvent, Key, MouseButton, TargetKind};

#[derive(Debug, Default)]
struct RegistryInner {
    /// Registered selections, in registration order.
    selections: Vec<Selection>,
    /// Selection that last received keyboard focus.
    focused: Option<SelectionId>,
}

/// Shared registry handle. Clones refer to the same registry.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    inner: Arc<RwLock<RegistryInner>>,
}

/// Non-owning registry handle held by each selection.
#[derive(Debug, Clone, Default)]
pub(crate) struct WeakRegistry(Weak<RwLock<RegistryInner>>);

impl WeakRegistry {
    pub(crate) fn upgrade(&self) -> Option<Registry> {
        self.0.upgrade().map(|inner| Registry { inner })
    }
}

/// What a sweep did to each open selection it visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub closed: Vec<SelectionId>,
    /// A `Hide` listener kept these open.
    pub vetoed: Vec<SelectionId>,
    /// Left open because the event came from inside their own surface.
    pub spared: Vec<SelectionId>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn downgrade(&self) -> WeakRegistry {
        WeakRegistry(Arc::downgrade(&self.inner))
    }

    /// Track a selection. Registering twice is a no-op.
    pub fn register(&self, selection: &Selection) {
        if let Ok(mut guard) = self.inner.write()
            && !guard.selections.iter().any(|s| s.id() == selection.id())
        {
            guard.selections.push(selection.clone());
        }
    }

    /// Stop tracking a selection. Returns true if it was registered.
    pub fn unregister(&self, id: SelectionId) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        let before = guard.selections.len();
        guard.selections.retain(|s| s.id() != id);
        if guard.focused == Some(id) {
            guard.focused = None;
        }
        guard.selections.len() != before
    }

    /// Get a registered selection.
    pub fn get(&self, id: SelectionId) -> Option<Selection> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.selections.iter().find(|s| s.id() == id).cloned())
    }

    /// All registered selections, in registration order.
    pub fn selections(&self) -> Vec<Selection> {
        self.inner
            .read()
            .map(|guard| guard.selections.clone())
            .unwrap_or_default()
    }

    /// Ids of the selections whose dropdown is open.
    pub fn open_selections(&self) -> Vec<SelectionId> {
        self.selections()
            .iter()
            .filter(|s| s.is_open())
            .map(Selection::id)
            .collect()
    }

    /// Get total number of registered selections.
    pub fn len(&self) -> usize {
        self.inner.read().map(|guard| guard.selections.len()).unwrap_or(0)
    }

    /// Check if no selection is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The selection that last received keyboard focus.
    pub fn focused(&self) -> Option<SelectionId> {
        self.inner.read().ok().and_then(|guard| guard.focused)
    }

    /// Record which selection has keyboard focus. Unknown ids are ignored.
    pub fn set_focused(&self, id: SelectionId) {
        if let Ok(mut guard) = self.inner.write()
            && guard.selections.iter().any(|s| s.id() == id)
        {
            guard.focused = Some(id);
        }
    }

    /// Close every open selection except `exclude`.
    ///
    /// Each closure is announced with a cancelable `Hide`; a veto leaves that
    /// selection open. When `origin` is given:
    /// - a right click closes nothing,
    /// - a key-up other than Tab closes nothing,
    /// - a click on a text field, or a Tab key-up, inside a selection's own
    ///   surface spares that selection.
    pub fn close_all_except(
        &self,
        exclude: Option<SelectionId>,
        origin: Option<&InputEvent>,
    ) -> SweepReport {
        let mut report = SweepReport::default();

        match origin {
            Some(InputEvent::Click {
                button: MouseButton::Right,
                ..
            }) => return report,
            Some(InputEvent::KeyUp { key, .. }) if *key != Key::Tab => return report,
            _ => {}
        }

        // Snapshot so no registry lock is held while listeners run.
        for selection in self.selections() {
            let id = selection.id();
            if exclude == Some(id) || !selection.is_open() {
                continue;
            }
            if origin.is_some_and(|event| spares(event, id)) {
                report.spared.push(id);
                continue;
            }
            match selection.sweep() {
                Outcome::Proceeded => report.closed.push(id),
                Outcome::Vetoed => report.vetoed.push(id),
                Outcome::Skipped => {}
            }
        }

        if !report.closed.is_empty() || !report.vetoed.is_empty() {
            log::debug!(
                "Registry::close_all_except closed={} vetoed={} spared={}",
                report.closed.len(),
                report.vetoed.len(),
                report.spared.len()
            );
        }
        report
    }
}

/// Events that originate inside a selection's own text field (typing in its
/// search box, tabbing between its inputs) must not close it.
fn spares(event: &InputEvent, id: SelectionId) -> bool {
    let target = event.target();
    if !target.is_inside(id) {
        return false;
    }
    match event {
        InputEvent::Click { .. } => target.kind == TargetKind::TextField,
        InputEvent::KeyUp { key, .. } => *key == Key::Tab,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectionConfig;
    use crate::item::Item;
    use crate::keys::EventTarget;
    use crate::mode::Mode;

    fn selection(registry: &Registry) -> Selection {
        Selection::builder(SelectionConfig::new(Mode::Single, "f"))
            .items(["A", "B"].into_iter().map(Item::labeled))
            .build(registry)
            .unwrap()
    }

    #[test]
    fn test_build_registers() {
        let registry = Registry::new();
        let a = selection(&registry);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(a.id()).is_some());
    }

    #[test]
    fn test_register_twice_is_noop() {
        let registry = Registry::new();
        let a = selection(&registry);
        registry.register(&a);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister_clears_focus() {
        let registry = Registry::new();
        let a = selection(&registry);
        registry.set_focused(a.id());
        assert!(registry.unregister(a.id()));
        assert_eq!(registry.focused(), None);
        assert!(!registry.unregister(a.id()));
    }

    #[test]
    fn test_right_click_closes_nothing() {
        let registry = Registry::new();
        let a = selection(&registry);
        a.open();
        let event = InputEvent::Click {
            button: MouseButton::Right,
            target: EventTarget::outside(),
        };
        let report = registry.close_all_except(None, Some(&event));
        assert!(report.closed.is_empty());
        assert!(a.is_open());
    }

    #[test]
    fn test_text_field_click_spares_owner() {
        let registry = Registry::new();
        let a = selection(&registry);
        a.open();
        let event = InputEvent::Click {
            button: MouseButton::Left,
            target: EventTarget::inside(a.id(), TargetKind::TextField),
        };
        let report = registry.close_all_except(None, Some(&event));
        assert_eq!(report.spared, vec![a.id()]);
        assert!(a.is_open());
    }
}
