use crate::caption::{CaptionStyle, Tag};
use crate::form::FormField;
use crate::item::Item;

use super::{Memory, Mode, ModeBehavior, Step, checked_fields, checked_ids, restore_checked};

/// Any number of items; clicks flip one item and keep the dropdown open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultipleMode;

impl ModeBehavior for MultipleMode {
    fn mode(&self) -> Mode {
        Mode::Multiple
    }

    fn toggle(&mut self, items: &mut [Item], index: usize) -> Step {
        let item = &mut items[index];
        item.set_checked(!item.is_checked());
        Step::Stay
    }

    fn save(&self, items: &[Item]) -> Memory {
        Memory::Checked(checked_ids(items))
    }

    fn restore(&mut self, items: &mut [Item], memory: &Memory) {
        restore_checked(items, memory);
    }

    fn caption_tags(&self, items: &[Item], style: &CaptionStyle) -> Vec<Tag> {
        let checked: Vec<&Item> = items.iter().filter(|i| i.is_checked()).collect();
        let mut tags: Vec<Tag> = checked
            .iter()
            .take(style.overflow_limit)
            .map(|i| Tag::Text(i.text().to_string()))
            .collect();
        if checked.len() > style.overflow_limit {
            tags.push(Tag::Overflow(checked.len() - style.overflow_limit));
        }
        tags
    }

    fn form_fields(&self, items: &[Item], name: &str) -> Vec<FormField> {
        checked_fields(items, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(limit: usize) -> CaptionStyle {
        CaptionStyle {
            overflow_limit: limit,
            from_marker: "from".into(),
            to_marker: "to".into(),
        }
    }

    #[test]
    fn test_toggle_flips() {
        let mut items: Vec<Item> = ["A", "B"].into_iter().map(Item::labeled).collect();
        let mut mode = MultipleMode;
        assert_eq!(mode.toggle(&mut items, 0), Step::Stay);
        mode.toggle(&mut items, 1);
        assert!(items[0].is_checked() && items[1].is_checked());
        mode.toggle(&mut items, 0);
        assert!(!items[0].is_checked());
    }

    #[test]
    fn test_caption_overflow() {
        let items: Vec<Item> = ["A", "B", "C", "D", "E"]
            .into_iter()
            .map(|t| Item::labeled(t).checked(true))
            .collect();
        let tags = MultipleMode.caption_tags(&items, &style(3));
        assert_eq!(
            tags,
            vec![
                Tag::Text("A".into()),
                Tag::Text("B".into()),
                Tag::Text("C".into()),
                Tag::Overflow(2),
            ]
        );
    }

    #[test]
    fn test_caption_at_limit_has_no_overflow() {
        let items: Vec<Item> = ["A", "B", "C"]
            .into_iter()
            .map(|t| Item::labeled(t).checked(true))
            .collect();
        let tags = MultipleMode.caption_tags(&items, &style(3));
        assert_eq!(tags.len(), 3);
    }
}
