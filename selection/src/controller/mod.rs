//! The selection controller.
//!
//! A [`Selection`] is a cheap, clonable handle: clones share the same state,
//! so the registry, the keyboard router and the host can all hold one.
//! Every operation runs to completion before returning; listeners are called
//! without any internal lock held, so they may query the selection.

mod method;
mod state;
mod view;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use crate::caption::Caption;
use crate::config::SelectionConfig;
use crate::error::SelectionError;
use crate::events::{FocusTarget, Listener, Notification, NotificationKind, Outcome, Verdict};
use crate::filter::{MatchPredicate, RegexMatch};
use crate::form::FormField;
use crate::item::{Item, ItemId, SelectionItem};
use crate::mode::{Memory, Mode, RangeEndpoints, RangeFocus, RangeMode, Step};
use crate::registry::{Registry, WeakRegistry};

pub use method::Method;
pub use view::{ItemView, SelectionView};

use state::SelectionInner;

/// Unique identifier for a selection instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectionId(Uuid);

impl SelectionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for SelectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__selection_{}", self.0)
    }
}

/// Direction of keyboard navigation through visible items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Builder for a [`Selection`].
///
/// # Example
///
/// ```
/// use selection::prelude::*;
///
/// let registry = Registry::new();
/// let city = Selection::builder(SelectionConfig::new(Mode::Single, "city").label("City"))
///     .sources(&["Berlin", "Paris", "Rome"])
///     .build(&registry)
///     .unwrap();
///
/// city.open();
/// city.toggle_item(&ItemId::from("Paris")).unwrap();
/// assert!(!city.is_open());
/// assert_eq!(city.caption().to_string(), "City Paris");
/// ```
pub struct SelectionBuilder {
    config: SelectionConfig,
    items: Vec<Item>,
    matcher: Option<Arc<dyn MatchPredicate>>,
}

impl SelectionBuilder {
    /// Append items.
    pub fn items(mut self, items: impl IntoIterator<Item = Item>) -> Self {
        self.items.extend(items);
        self
    }

    /// Append items built from host data.
    pub fn sources<S: SelectionItem>(mut self, sources: &[S]) -> Self {
        self.items.extend(sources.iter().map(Item::from_source));
        self
    }

    /// Replace the default [`RegexMatch`] predicate.
    pub fn matcher(mut self, matcher: impl MatchPredicate + 'static) -> Self {
        self.matcher = Some(Arc::new(matcher));
        self
    }

    /// Build the selection and register it with `registry`.
    pub fn build(self, registry: &Registry) -> Result<Selection, SelectionError> {
        self.config.validate()?;
        let inner = SelectionInner::new(self.config, self.items)?;
        let selection = Selection {
            id: SelectionId::new(),
            inner: Arc::new(RwLock::new(inner)),
            listeners: Arc::new(RwLock::new(Vec::new())),
            matcher: self.matcher.unwrap_or_else(|| Arc::new(RegexMatch::new())),
            registry: registry.downgrade(),
            is_open: Arc::new(AtomicBool::new(false)),
            dirty: Arc::new(AtomicBool::new(true)),
        };
        registry.register(&selection);
        log::debug!(
            "Selection::build id={} mode={:?}",
            selection.id,
            selection.mode()
        );
        Ok(selection)
    }
}

/// A dropdown selection: single choice, multiple choice or a range.
#[derive(Clone)]
pub struct Selection {
    id: SelectionId,
    inner: Arc<RwLock<SelectionInner>>,
    listeners: Arc<RwLock<Vec<Listener>>>,
    matcher: Arc<dyn MatchPredicate>,
    registry: WeakRegistry,
    /// Whether the dropdown is open
    is_open: Arc<AtomicBool>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
}

impl std::fmt::Debug for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selection")
            .field("id", &self.id)
            .field("mode", &self.mode())
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

impl Selection {
    /// Start building a selection.
    pub fn builder(config: SelectionConfig) -> SelectionBuilder {
        SelectionBuilder {
            config,
            items: Vec::new(),
            matcher: None,
        }
    }

    /// Get the unique identifier of this selection.
    pub fn id(&self) -> SelectionId {
        self.id
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    fn read<R: Default>(&self, f: impl FnOnce(&SelectionInner) -> R) -> R {
        self.inner.read().map(|guard| f(&guard)).unwrap_or_default()
    }

    fn write<R: Default>(&self, f: impl FnOnce(&mut SelectionInner) -> R) -> R {
        match self.inner.write() {
            Ok(mut guard) => {
                let result = f(&mut guard);
                self.dirty.store(true, Ordering::SeqCst);
                result
            }
            Err(_) => R::default(),
        }
    }

    /// Deliver a notification to every listener. Returns `Veto` only for
    /// cancelable kinds.
    pub(crate) fn notify(&self, kind: NotificationKind) -> Verdict {
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default();
        let notification = Notification::new(kind, self.id);

        let mut verdict = Verdict::Proceed;
        for listener in &listeners {
            if listener(&notification) == Verdict::Veto && kind.is_cancelable() {
                verdict = Verdict::Veto;
            }
        }
        verdict
    }

    pub(crate) fn request_focus(&self, target: FocusTarget) {
        self.write(|inner| inner.focus_request = Some(target));
    }

    /// Refresh the parts of the view a close recomputes, without closing.
    pub fn refresh(&self) {
        self.write(|inner| {
            inner.refresh_caption();
            inner.refresh_form();
            inner.refresh_clean_button();
        });
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Register a listener for this selection's notifications.
    pub fn subscribe(&self, listener: impl Fn(&Notification) -> Verdict + Send + Sync + 'static) {
        if let Ok(mut guard) = self.listeners.write() {
            guard.push(Arc::new(listener));
        }
    }

    // -------------------------------------------------------------------------
    // Open/close state
    // -------------------------------------------------------------------------

    /// Check if the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.is_open.load(Ordering::SeqCst)
    }

    /// Check if the selection is disabled.
    pub fn is_disabled(&self) -> bool {
        self.read(|inner| inner.config.disabled)
    }

    /// Enable or disable the selection. A disabled selection never opens.
    pub fn set_disabled(&self, disabled: bool) {
        self.write(|inner| inner.config.disabled = disabled);
    }

    /// Check if [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.read(|inner| inner.disposed)
    }

    fn accepts_input(&self) -> bool {
        self.read(|inner| !inner.disposed && !inner.config.disabled)
    }

    /// The open/close entry point.
    ///
    /// Sweeps every open selection in the registry closed (this one
    /// included, each subject to a `Hide` veto). If this selection was open
    /// that is all; otherwise it opens.
    pub fn toggle(&self) -> Outcome {
        if !self.accepts_input() {
            return Outcome::Skipped;
        }

        let was_open = self.is_open();
        self.write(|inner| {
            inner.refresh_clean_button();
            inner.refresh_form();
        });

        match self.registry.upgrade() {
            Some(registry) => {
                registry.close_all_except(None, None);
            }
            None if was_open => {
                self.sweep();
            }
            None => {}
        }

        if was_open {
            return if self.is_open() {
                Outcome::Vetoed
            } else {
                Outcome::Proceeded
            };
        }
        self.show()
    }

    /// Open the dropdown, closing every other open selection first.
    ///
    /// Re-entrant: on an already open selection only the clean button and
    /// form fields are refreshed.
    pub fn open(&self) -> Outcome {
        if !self.accepts_input() {
            return Outcome::Skipped;
        }

        if let Some(registry) = self.registry.upgrade() {
            registry.close_all_except(Some(self.id), None);
        }

        if self.is_open() {
            self.write(|inner| {
                inner.refresh_clean_button();
                inner.refresh_form();
            });
            return Outcome::Skipped;
        }
        self.show()
    }

    fn show(&self) -> Outcome {
        if self.notify(NotificationKind::Show) == Verdict::Veto {
            log::debug!("Selection::show id={} vetoed", self.id);
            return Outcome::Vetoed;
        }

        self.is_open.store(true, Ordering::SeqCst);
        self.write(|inner| {
            inner.focus_request = Some(FocusTarget::Toggle);
            if let Some(range) = inner.mode.range_mut() {
                range.begin();
                inner.focus_request = Some(FocusTarget::MinInput);
            }
        });
        if let Some(registry) = self.registry.upgrade() {
            registry.set_focused(self.id);
        }
        log::debug!("Selection::show id={} opened", self.id);

        self.notify(NotificationKind::Shown);
        self.save_memory();
        Outcome::Proceeded
    }

    /// Close the dropdown, committing the current selection as the state
    /// `reset` restores.
    ///
    /// Always recomputes the caption, form fields and clean button, so
    /// calling it on a closed selection re-syncs the view.
    pub fn close(&self) -> Outcome {
        self.hide(true)
    }

    /// Close without touching the saved memory when `commit` is false.
    fn hide(&self, commit: bool) -> Outcome {
        let was_open = self.is_open.swap(false, Ordering::SeqCst);
        self.refresh();

        if !was_open {
            return Outcome::Skipped;
        }
        if commit {
            self.save_memory();
        }
        log::debug!("Selection::close id={} commit={}", self.id, commit);
        self.notify(NotificationKind::Hidden);
        Outcome::Proceeded
    }

    /// Close as part of a registry sweep: a `Hide` listener may veto.
    pub(crate) fn sweep(&self) -> Outcome {
        if !self.is_open() {
            return Outcome::Skipped;
        }
        if self.notify(NotificationKind::Hide) == Verdict::Veto {
            log::debug!("Selection::sweep id={} vetoed", self.id);
            return Outcome::Vetoed;
        }
        self.close()
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Apply a click on an item, following the selection mode.
    ///
    /// Single mode checks the item and closes. Multiple mode flips it. Range
    /// mode sets the focused endpoint; setting the minimum moves focus to the
    /// maximum, setting the maximum closes.
    pub fn toggle_item(&self, id: &ItemId) -> Result<(), SelectionError> {
        if self.is_disposed() {
            return Ok(());
        }

        let step = {
            let Ok(mut inner) = self.inner.write() else {
                return Ok(());
            };
            let index = inner
                .position(id)
                .ok_or_else(|| SelectionError::UnknownItem(id.clone()))?;
            let step = inner.toggle(index);
            inner.refresh_form();
            step
        };
        self.dirty.store(true, Ordering::SeqCst);
        log::debug!("Selection::toggle_item id={} item={} step={:?}", self.id, id, step);

        self.notify(NotificationKind::Change);
        match step {
            Step::Commit => {
                self.close();
            }
            Step::FocusMax => self.request_focus(FocusTarget::MaxInput),
            Step::Stay => {}
        }

        self.write(|inner| {
            inner.refresh_clean_button();
            inner.refresh_caption();
        });
        Ok(())
    }

    /// Roll back to the last committed state, then close without committing.
    pub fn reset(&self) -> Outcome {
        if self.is_disposed() {
            return Outcome::Skipped;
        }
        self.write(|inner| inner.restore_memory());
        log::debug!("Selection::reset id={}", self.id);
        self.hide(false)
    }

    /// Uncheck everything and clear the filter (and, in range mode, both
    /// endpoints).
    ///
    /// This is a direct mutation, not a rollback: the saved memory is left as
    /// it was, so a later [`reset`](Self::reset) restores the state from
    /// before the clear.
    pub fn clear(&self) -> Outcome {
        if self.is_disposed() {
            return Outcome::Skipped;
        }

        self.write(|inner| {
            inner.clear_selection();
            inner.refresh_caption();
            inner.refresh_clean_button();
        });
        let outcome = if self.is_open() {
            self.hide(false)
        } else {
            Outcome::Skipped
        };
        self.write(|inner| inner.refresh_form());
        log::debug!("Selection::clear id={}", self.id);
        outcome
    }

    /// Capture the current selection as the state `reset` restores.
    pub fn save_memory(&self) {
        self.write(|inner| inner.save_memory());
    }

    /// The saved memory.
    pub fn memory(&self) -> Option<Memory> {
        self.inner.read().ok().map(|guard| guard.memory.clone())
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Show only items matching `term`. Never changes what is checked.
    ///
    /// No-op in range mode, where the text fields hold endpoint values.
    /// Returns the number of visible items.
    pub fn apply_filter(&self, term: &str) -> usize {
        let matcher = Arc::clone(&self.matcher);
        self.write(|inner| {
            if inner.config.mode == Mode::Range {
                return inner.items.iter().filter(|i| i.is_visible()).count();
            }
            let visible = inner.apply_filter(term, matcher.as_ref());
            inner.refresh_clean_button();
            log::debug!("Selection::apply_filter term={:?} visible={}", term, visible);
            visible
        })
    }

    /// Current search term.
    pub fn filter_term(&self) -> String {
        self.read(|inner| inner.filter.clone())
    }

    /// Whether the "create new" affordance is shown.
    pub fn is_create_new_visible(&self) -> bool {
        self.read(|inner| inner.create_new_visible)
    }

    // -------------------------------------------------------------------------
    // Range endpoints
    // -------------------------------------------------------------------------

    /// The user focused one of the endpoint inputs. No-op outside range mode.
    pub fn focus_range_input(&self, focus: RangeFocus) {
        self.write(|inner| {
            let SelectionInner { mode, items, .. } = inner;
            if let Some(range) = mode.range_mut() {
                range.focus_input(items, focus);
            }
        });
    }

    /// The user typed into one of the endpoint inputs. The typed value may
    /// differ from every item text. No-op outside range mode.
    pub fn type_range_endpoint(&self, focus: RangeFocus, value: &str) {
        self.write(|inner| {
            if let Some(range) = inner.mode.range_mut() {
                range.type_endpoint(focus, value);
            }
        });
    }

    /// Endpoint values, or `None` outside range mode.
    pub fn range_endpoints(&self) -> Option<RangeEndpoints> {
        self.read(|inner| inner.mode.range().map(|r| r.endpoints().clone()))
    }

    /// Endpoint the next item click sets, or `None` outside range mode.
    pub fn range_focus(&self) -> Option<RangeFocus> {
        self.read(|inner| inner.mode.range().map(RangeMode::focus))
    }

    /// Range state including the endpoint items.
    pub fn range_state(&self) -> Option<RangeMode> {
        self.read(|inner| inner.mode.range().cloned())
    }

    // -------------------------------------------------------------------------
    // Keyboard navigation
    // -------------------------------------------------------------------------

    /// Move focus among visible items, starting from `from` (or from before
    /// the first item). Clamped to the visible range, no wraparound.
    pub fn move_focus(&self, direction: Direction, from: Option<&ItemId>) -> Option<ItemId> {
        let visible = self.read(|inner| inner.visible_ids());
        if visible.is_empty() {
            return None;
        }

        let current = from.and_then(|id| visible.iter().position(|v| v == id));
        let index = match (direction, current) {
            (Direction::Up, Some(i)) => i.saturating_sub(1),
            (Direction::Down, Some(i)) => (i + 1).min(visible.len() - 1),
            (_, None) => 0,
        };

        let target = visible[index].clone();
        self.request_focus(FocusTarget::Item(target.clone()));
        Some(target)
    }

    // -------------------------------------------------------------------------
    // Items
    // -------------------------------------------------------------------------

    /// Replace every item. Endpoint items are re-resolved by text and the
    /// current filter is applied to the new items.
    pub fn set_items(&self, items: impl IntoIterator<Item = Item>) -> Result<(), SelectionError> {
        let items: Vec<Item> = items.into_iter().collect();
        let matcher = Arc::clone(&self.matcher);
        match self.inner.write() {
            Ok(mut guard) => guard.replace_items(items, matcher.as_ref())?,
            Err(_) => return Ok(()),
        }
        self.dirty.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Get all items, in display order.
    pub fn items(&self) -> Vec<Item> {
        self.read(|inner| inner.items.clone())
    }

    /// Ids of checked items, in display order.
    pub fn checked(&self) -> Vec<ItemId> {
        self.read(|inner| {
            inner
                .items
                .iter()
                .filter(|i| i.is_checked())
                .map(|i| i.id().clone())
                .collect()
        })
    }

    /// Check if the item with `id` is checked.
    pub fn is_checked(&self, id: &ItemId) -> bool {
        self.read(|inner| inner.items.iter().any(|i| i.id() == id && i.is_checked()))
    }

    // -------------------------------------------------------------------------
    // Derived view state
    // -------------------------------------------------------------------------

    /// Get the selection mode.
    pub fn mode(&self) -> Mode {
        self.read(|inner| inner.config.mode)
    }

    /// Get a copy of the configuration.
    pub fn config(&self) -> SelectionConfig {
        self.read(|inner| inner.config.clone())
    }

    /// Caption as of the last refresh.
    pub fn caption(&self) -> Caption {
        self.read(|inner| inner.caption.clone())
    }

    /// Caption computed from the current state, without storing it.
    pub fn compute_caption(&self) -> Caption {
        self.read(|inner| inner.compute_caption())
    }

    /// Hidden form fields as of the last commit.
    pub fn form_values(&self) -> Vec<FormField> {
        self.read(|inner| inner.form.clone())
    }

    /// Whether the clear button is shown.
    pub fn is_clean_button_visible(&self) -> bool {
        self.read(|inner| inner.clean_visible)
    }

    /// Take the pending focus move, if any (called by the host).
    pub fn take_focus_request(&self) -> Option<FocusTarget> {
        self.inner
            .write()
            .ok()
            .and_then(|mut guard| guard.focus_request.take())
    }

    /// Snapshot of everything the host needs to render.
    pub fn view(&self) -> SelectionView {
        let open = self.is_open();
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        SelectionView::from_inner(self.id, open, &guard)
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the selection changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Detach from the registry and drop listeners. A disposed selection
    /// ignores further input.
    pub fn dispose(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unregister(self.id);
        }
        self.is_open.store(false, Ordering::SeqCst);
        self.write(|inner| inner.disposed = true);
        if let Ok(mut guard) = self.listeners.write() {
            guard.clear();
        }
        log::debug!("Selection::dispose id={}", self.id);
    }

    /// Invoke an operation by name.
    ///
    /// ```
    /// use selection::prelude::*;
    ///
    /// let registry = Registry::new();
    /// let s = Selection::builder(SelectionConfig::default())
    ///     .build(&registry)
    ///     .unwrap();
    /// assert!(s.invoke("close").is_ok());
    /// assert!(matches!(s.invoke("explode"), Err(SelectionError::InvalidMethod(_))));
    /// ```
    pub fn invoke(&self, method: &str) -> Result<Outcome, SelectionError> {
        let method: Method = method.parse()?;
        Ok(self.call(method))
    }

    /// Invoke a parsed operation.
    pub fn call(&self, method: Method) -> Outcome {
        match method {
            Method::Toggle => self.toggle(),
            Method::Open => self.open(),
            Method::Close => self.close(),
            Method::Reset => self.reset(),
            Method::Clear => self.clear(),
            Method::Dispose => {
                self.dispose();
                Outcome::Proceeded
            }
            Method::Refresh => {
                self.refresh();
                Outcome::Proceeded
            }
        }
    }
}
