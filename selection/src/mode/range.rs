use std::cmp::Ordering;

use crate::caption::{CaptionStyle, Tag};
use crate::form::{FormField, max_field_name, min_field_name};
use crate::item::{Item, ItemId};

use super::{Memory, Mode, ModeBehavior, RangeEndpoints, RangeFocus, Step, uncheck_all};

/// Two endpoints picked with two clicks: the first sets the minimum, the
/// second sets the maximum and commits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeMode {
    endpoints: RangeEndpoints,
    focus: RangeFocus,
    min_item: Option<ItemId>,
    max_item: Option<ItemId>,
}

impl RangeMode {
    pub fn endpoints(&self) -> &RangeEndpoints {
        &self.endpoints
    }

    pub fn focus(&self) -> RangeFocus {
        self.focus
    }

    pub fn min_item(&self) -> Option<&ItemId> {
        self.min_item.as_ref()
    }

    pub fn max_item(&self) -> Option<&ItemId> {
        self.max_item.as_ref()
    }

    /// Called when the dropdown opens.
    pub(crate) fn begin(&mut self) {
        self.focus = RangeFocus::Min;
    }

    /// Switch the endpoint the next click targets, as when the user focuses
    /// one of the endpoint inputs. The endpoint item is re-checked only if its
    /// text still equals the typed value.
    pub(crate) fn focus_input(&mut self, items: &mut [Item], focus: RangeFocus) {
        self.focus = focus;
        uncheck_all(items);

        let pointer = match focus {
            RangeFocus::Min => self.min_item.as_ref(),
            RangeFocus::Max => self.max_item.as_ref(),
        };
        let Some(id) = pointer else {
            return;
        };
        let typed = self.endpoints.get(focus);
        if let Some(item) = items.iter_mut().find(|i| i.id() == id)
            && typed == Some(item.text())
        {
            item.set_checked(true);
        }
    }

    /// Store a typed endpoint value without touching the endpoint items.
    pub(crate) fn type_endpoint(&mut self, focus: RangeFocus, value: &str) {
        self.endpoints.set(focus, Some(value.to_string()));
    }

    /// Swap the endpoints when both are set and out of order.
    fn order(&mut self) {
        let out_of_order = match (&self.endpoints.min, &self.endpoints.max) {
            (Some(min), Some(max)) => compare_endpoints(min, max) == Ordering::Greater,
            _ => false,
        };
        if out_of_order {
            std::mem::swap(&mut self.endpoints.min, &mut self.endpoints.max);
            std::mem::swap(&mut self.min_item, &mut self.max_item);
        }
    }
}

/// Numeric comparison when both values parse as numbers, lexical otherwise.
pub fn compare_endpoints(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    }
}

/// First item whose text equals `text`.
fn find_by_text(items: &[Item], text: Option<&str>) -> Option<ItemId> {
    let text = text?;
    items
        .iter()
        .find(|i| i.text() == text)
        .map(|i| i.id().clone())
}

impl ModeBehavior for RangeMode {
    fn mode(&self) -> Mode {
        Mode::Range
    }

    fn toggle(&mut self, items: &mut [Item], index: usize) -> Step {
        uncheck_all(items);
        let item = &mut items[index];
        item.set_checked(true);
        let text = item.text().to_string();
        let id = item.id().clone();

        match self.focus {
            RangeFocus::Min => {
                // a new lower endpoint starts a new range
                self.endpoints.min = Some(text);
                self.min_item = Some(id);
                self.endpoints.max = None;
                self.max_item = None;
                self.focus = RangeFocus::Max;
                Step::FocusMax
            }
            RangeFocus::Max => {
                self.endpoints.max = Some(text);
                self.max_item = Some(id);
                self.order();
                Step::Commit
            }
        }
    }

    fn save(&self, _items: &[Item]) -> Memory {
        Memory::Range(self.endpoints.clone())
    }

    fn restore(&mut self, items: &mut [Item], memory: &Memory) {
        let Memory::Range(endpoints) = memory else {
            return;
        };
        self.endpoints = endpoints.clone();
        self.min_item = find_by_text(items, self.endpoints.min.as_deref());
        self.max_item = find_by_text(items, self.endpoints.max.as_deref());

        // only the restored endpoint items may stay checked
        for item in items.iter_mut() {
            let keep = item.is_checked()
                && (self.min_item.as_ref() == Some(item.id())
                    || self.max_item.as_ref() == Some(item.id()));
            item.set_checked(keep);
        }
    }

    fn caption_tags(&self, _items: &[Item], style: &CaptionStyle) -> Vec<Tag> {
        let mut tags = Vec::new();
        if let Some(min) = &self.endpoints.min {
            tags.push(Tag::Marker(style.from_marker.clone()));
            tags.push(Tag::Text(min.clone()));
        }
        if let Some(max) = &self.endpoints.max {
            tags.push(Tag::Marker(style.to_marker.clone()));
            tags.push(Tag::Text(max.clone()));
        }
        tags
    }

    fn form_fields(&self, _items: &[Item], name: &str) -> Vec<FormField> {
        let mut fields = Vec::new();
        if let Some(min) = &self.endpoints.min {
            fields.push(FormField::new(min_field_name(name), min.clone()));
        }
        if let Some(max) = &self.endpoints.max {
            fields.push(FormField::new(max_field_name(name), max.clone()));
        }
        fields
    }

    fn repair(&mut self, items: &mut [Item]) {
        if self.endpoints.is_empty() {
            uncheck_all(items);
        }
    }

    fn clear(&mut self, items: &mut [Item]) {
        uncheck_all(items);
        *self = Self::default();
    }

    fn relink(&mut self, items: &[Item]) {
        self.min_item = find_by_text(items, self.endpoints.min.as_deref());
        self.max_item = find_by_text(items, self.endpoints.max.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<Item> {
        ["10", "20", "30", "40"].into_iter().map(Item::labeled).collect()
    }

    #[test]
    fn test_two_clicks_set_both_endpoints() {
        let mut items = items();
        let mut mode = RangeMode::default();
        assert_eq!(mode.toggle(&mut items, 1), Step::FocusMax);
        assert_eq!(mode.focus(), RangeFocus::Max);
        assert_eq!(mode.toggle(&mut items, 3), Step::Commit);
        assert_eq!(mode.endpoints(), &RangeEndpoints::new(Some("20"), Some("40")));
        // only the last click stays checked
        assert_eq!(items.iter().filter(|i| i.is_checked()).count(), 1);
    }

    #[test]
    fn test_reversed_clicks_are_ordered() {
        let mut items = items();
        let mut mode = RangeMode::default();
        mode.toggle(&mut items, 3);
        mode.toggle(&mut items, 0);
        assert_eq!(mode.endpoints(), &RangeEndpoints::new(Some("10"), Some("40")));
        assert_eq!(mode.min_item(), Some(&ItemId::from("10")));
        assert_eq!(mode.max_item(), Some(&ItemId::from("40")));
    }

    #[test]
    fn test_min_click_drops_previous_max() {
        let mut items = items();
        let mut mode = RangeMode::default();
        mode.toggle(&mut items, 0);
        mode.toggle(&mut items, 2);

        mode.begin();
        mode.toggle(&mut items, 3);
        assert_eq!(mode.endpoints(), &RangeEndpoints::new(Some("40"), None));
        assert_eq!(mode.min_item(), Some(&ItemId::from("40")));
        assert_eq!(mode.max_item(), None);
    }

    #[test]
    fn test_compare_numeric_then_lexical() {
        assert_eq!(compare_endpoints("9", "10"), Ordering::Less);
        assert_eq!(compare_endpoints("b", "a"), Ordering::Greater);
        assert_eq!(compare_endpoints("20", "20"), Ordering::Equal);
    }

    #[test]
    fn test_restore_first_text_match_wins() {
        let mut items = vec![
            Item::new("x", "1", "20"),
            Item::new("y", "2", "20"),
            Item::new("z", "3", "30"),
        ];
        let mut mode = RangeMode::default();
        let memory = Memory::Range(RangeEndpoints::new(Some("20"), Some("99")));
        mode.restore(&mut items, &memory);
        assert_eq!(mode.min_item(), Some(&ItemId::from("x")));
        assert_eq!(mode.max_item(), None);
        assert_eq!(mode.endpoints().max.as_deref(), Some("99"));
    }

    #[test]
    fn test_focus_input_rechecks_matching_endpoint() {
        let mut items = items();
        let mut mode = RangeMode::default();
        mode.toggle(&mut items, 0);
        mode.toggle(&mut items, 2);

        mode.focus_input(&mut items, RangeFocus::Min);
        assert!(items[0].is_checked());
        assert!(!items[2].is_checked());

        mode.type_endpoint(RangeFocus::Max, "35");
        mode.focus_input(&mut items, RangeFocus::Max);
        assert!(items.iter().all(|i| !i.is_checked()));
    }

    #[test]
    fn test_caption_tags() {
        let style = CaptionStyle {
            overflow_limit: 3,
            from_marker: "from".into(),
            to_marker: "to".into(),
        };
        let mut items = items();
        let mut mode = RangeMode::default();
        mode.toggle(&mut items, 1);
        let tags = mode.caption_tags(&items, &style);
        assert_eq!(tags, vec![Tag::Marker("from".into()), Tag::Text("20".into())]);
    }
}
