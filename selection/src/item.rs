//! Selectable items and the trait for turning host data into them.

use serde::{Deserialize, Serialize};

/// Stable identifier of an item within one selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    /// Create a new item id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One selectable option.
///
/// `checked` and `visible` are owned by the selection: hosts read them
/// through [`crate::controller::SelectionView`] and change them only by
/// calling controller operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    value: String,
    text: String,
    checked: bool,
    visible: bool,
}

impl Item {
    /// Create a visible, unchecked item.
    pub fn new(id: impl Into<ItemId>, value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            text: text.into(),
            checked: false,
            visible: true,
        }
    }

    /// Create an item whose id, value and text are all the same string.
    pub fn labeled(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text.clone(), text)
    }

    /// Build an item from anything implementing [`SelectionItem`].
    pub fn from_source<S: SelectionItem + ?Sized>(source: &S) -> Self {
        Self::new(
            source.selection_id(),
            source.selection_value(),
            source.selection_text(),
        )
    }

    /// Mark the item as initially checked.
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Payload submitted with the host form.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Display and match text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Result of the most recent filter pass.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// Trait for host data that can be offered as selection items.
///
/// # Example
///
/// ```
/// use selection::item::{Item, SelectionItem};
///
/// struct City {
///     code: u32,
///     name: String,
/// }
///
/// impl SelectionItem for City {
///     fn selection_id(&self) -> String {
///         self.code.to_string()
///     }
///
///     fn selection_text(&self) -> String {
///         self.name.clone()
///     }
/// }
///
/// let item = Item::from_source(&City { code: 21, name: "Tehran".into() });
/// assert_eq!(item.value(), "21");
/// assert_eq!(item.text(), "Tehran");
/// ```
pub trait SelectionItem {
    /// Unique identifier for this item.
    fn selection_id(&self) -> String;

    /// Value submitted with the form. Defaults to the id.
    fn selection_value(&self) -> String {
        self.selection_id()
    }

    /// Text shown in the dropdown and matched by the filter.
    fn selection_text(&self) -> String;
}

impl SelectionItem for String {
    fn selection_id(&self) -> String {
        self.clone()
    }

    fn selection_text(&self) -> String {
        self.clone()
    }
}

impl SelectionItem for &str {
    fn selection_id(&self) -> String {
        (*self).to_string()
    }

    fn selection_text(&self) -> String {
        (*self).to_string()
    }
}

// (id, text) pairs
impl<S1, S2> SelectionItem for (S1, S2)
where
    S1: AsRef<str>,
    S2: AsRef<str>,
{
    fn selection_id(&self) -> String {
        self.0.as_ref().to_string()
    }

    fn selection_text(&self) -> String {
        self.1.as_ref().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_is_visible_and_unchecked() {
        let item = Item::new("a", "1", "Alpha");
        assert!(item.is_visible());
        assert!(!item.is_checked());
        assert_eq!(item.id().as_str(), "a");
    }

    #[test]
    fn test_tuple_source() {
        let item = Item::from_source(&("us", "United States"));
        assert_eq!(item.id(), &ItemId::from("us"));
        assert_eq!(item.value(), "us");
        assert_eq!(item.text(), "United States");
    }
}
