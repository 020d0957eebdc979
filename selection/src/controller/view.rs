use serde::Serialize;

use crate::caption::Caption;
use crate::form::FormField;
use crate::item::ItemId;
use crate::mode::{Mode, RangeEndpoints, RangeFocus};

use super::SelectionId;
use super::state::SelectionInner;

/// One item as the host renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub id: ItemId,
    pub text: String,
    pub checked: bool,
    pub visible: bool,
}

/// Everything a render sink needs to redraw one selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionView {
    #[serde(skip)]
    pub id: SelectionId,
    pub mode: Mode,
    /// Expanded flag of the toggle handle
    pub open: bool,
    pub disabled: bool,
    pub caption: Caption,
    pub items: Vec<ItemView>,
    pub filter: String,
    pub clean_button: bool,
    pub create_new: bool,
    pub range: Option<RangeEndpoints>,
    pub range_focus: Option<RangeFocus>,
    pub form: Vec<FormField>,
}

impl SelectionView {
    pub(crate) fn from_inner(id: SelectionId, open: bool, inner: &SelectionInner) -> Self {
        let range = inner.mode.range();
        Self {
            id,
            mode: inner.config.mode,
            open,
            disabled: inner.config.disabled,
            caption: inner.caption.clone(),
            items: inner
                .items
                .iter()
                .map(|i| ItemView {
                    id: i.id().clone(),
                    text: i.text().to_string(),
                    checked: i.is_checked(),
                    visible: i.is_visible(),
                })
                .collect(),
            filter: inner.filter.clone(),
            clean_button: inner.clean_visible,
            create_new: inner.create_new_visible,
            range: range.map(|r| r.endpoints().clone()),
            range_focus: range.map(|r| r.focus()),
            form: inner.form.clone(),
        }
    }

    /// Visible items, in display order.
    pub fn visible_items(&self) -> impl Iterator<Item = &ItemView> {
        self.items.iter().filter(|i| i.visible)
    }
}
