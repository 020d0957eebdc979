//! Authoritative selection state behind the controller handle.

use std::collections::HashSet;

use crate::caption::Caption;
use crate::config::SelectionConfig;
use crate::error::SelectionError;
use crate::events::FocusTarget;
use crate::filter::MatchPredicate;
use crate::form::FormField;
use crate::item::{Item, ItemId};
use crate::mode::{Memory, ModeState, Step};

#[derive(Debug)]
pub(crate) struct SelectionInner {
    pub config: SelectionConfig,
    pub items: Vec<Item>,
    pub mode: ModeState,
    /// Last committed state, restored by `reset`
    pub memory: Memory,
    /// Current search term
    pub filter: String,
    pub caption: Caption,
    /// Hidden form fields as of the last refresh
    pub form: Vec<FormField>,
    pub clean_visible: bool,
    /// Shown when the filter leaves no item visible
    pub create_new_visible: bool,
    /// Pending focus move for the host
    pub focus_request: Option<FocusTarget>,
    pub disposed: bool,
}

impl SelectionInner {
    pub fn new(config: SelectionConfig, items: Vec<Item>) -> Result<Self, SelectionError> {
        ensure_unique(&items)?;
        let mode = ModeState::new(config.mode);
        let memory = mode.behavior().save(&items);
        let mut inner = Self {
            caption: Caption::label_only(config.label.clone()),
            config,
            items,
            mode,
            memory,
            filter: String::new(),
            form: Vec::new(),
            clean_visible: false,
            create_new_visible: false,
            focus_request: None,
            disposed: false,
        };
        inner.refresh_caption();
        inner.refresh_clean_button();
        Ok(inner)
    }

    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.id() == id)
    }

    pub fn toggle(&mut self, index: usize) -> Step {
        self.mode.behavior_mut().toggle(&mut self.items, index)
    }

    pub fn compute_caption(&self) -> Caption {
        let style = self.config.caption_style();
        let tags = self.mode.behavior().caption_tags(&self.items, &style);
        Caption::with_tags(self.config.label.clone(), tags)
    }

    /// Recompute the caption, then let the mode repair item flags that no
    /// longer agree with it (a range with no endpoints keeps nothing checked).
    pub fn refresh_caption(&mut self) {
        self.caption = self.compute_caption();
        if self.caption.is_label_only() {
            self.mode.behavior_mut().repair(&mut self.items);
            self.refresh_clean_button();
        }
    }

    pub fn refresh_form(&mut self) {
        self.form = self
            .mode
            .behavior()
            .form_fields(&self.items, &self.config.name);
    }

    pub fn refresh_clean_button(&mut self) {
        if !self.config.cleanable {
            return;
        }
        self.clean_visible = self.items.iter().any(|i| i.is_checked()) || !self.filter.is_empty();
    }

    pub fn save_memory(&mut self) {
        self.memory = self.mode.behavior().save(&self.items);
    }

    pub fn restore_memory(&mut self) {
        let memory = self.memory.clone();
        self.mode.behavior_mut().restore(&mut self.items, &memory);
    }

    /// Set `visible` on every item. Returns the number of visible items.
    pub fn apply_filter(&mut self, term: &str, matcher: &dyn MatchPredicate) -> usize {
        self.filter = term.to_string();
        let mut visible = 0;
        for item in self.items.iter_mut() {
            let matched = matcher.matches(item.text(), term);
            item.set_visible(matched);
            if matched {
                visible += 1;
            }
        }
        self.create_new_visible = visible == 0;
        visible
    }

    pub fn clear_selection(&mut self) {
        self.mode.behavior_mut().clear(&mut self.items);
        self.filter.clear();
        for item in self.items.iter_mut() {
            item.set_visible(true);
        }
        self.create_new_visible = false;
    }

    pub fn replace_items(
        &mut self,
        items: Vec<Item>,
        matcher: &dyn MatchPredicate,
    ) -> Result<(), SelectionError> {
        ensure_unique(&items)?;
        self.items = items;
        self.mode.behavior_mut().relink(&self.items);
        let term = std::mem::take(&mut self.filter);
        self.apply_filter(&term, matcher);
        self.refresh_caption();
        self.refresh_clean_button();
        Ok(())
    }

    pub fn visible_ids(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|i| i.is_visible())
            .map(|i| i.id().clone())
            .collect()
    }
}

fn ensure_unique(items: &[Item]) -> Result<(), SelectionError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id()) {
            return Err(SelectionError::DuplicateItem(item.id().clone()));
        }
    }
    Ok(())
}
