use crate::caption::{CaptionStyle, Tag};
use crate::form::FormField;
use crate::item::Item;

use super::{Memory, Mode, ModeBehavior, Step, checked_fields, checked_ids, restore_checked, uncheck_all};

/// Exactly one item may be checked; a click commits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleMode;

impl ModeBehavior for SingleMode {
    fn mode(&self) -> Mode {
        Mode::Single
    }

    fn toggle(&mut self, items: &mut [Item], index: usize) -> Step {
        uncheck_all(items);
        items[index].set_checked(true);
        Step::Commit
    }

    fn save(&self, items: &[Item]) -> Memory {
        Memory::Checked(checked_ids(items))
    }

    fn restore(&mut self, items: &mut [Item], memory: &Memory) {
        restore_checked(items, memory);
    }

    fn caption_tags(&self, items: &[Item], _style: &CaptionStyle) -> Vec<Tag> {
        items
            .iter()
            .find(|i| i.is_checked())
            .map(|i| vec![Tag::Text(i.text().to_string())])
            .unwrap_or_default()
    }

    fn form_fields(&self, items: &[Item], name: &str) -> Vec<FormField> {
        checked_fields(items, name)
    }
}
