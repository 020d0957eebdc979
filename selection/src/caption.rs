//! Caption shown on the closed selection.

use serde::Serialize;

/// One segment following the label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Tag {
    /// Text of a checked item or a range endpoint.
    Text(String),
    /// Count of checked items beyond the display limit.
    Overflow(usize),
    /// Range marker such as "from" or "to".
    Marker(String),
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tag::Text(text) | Tag::Marker(text) => f.write_str(text),
            Tag::Overflow(count) => write!(f, "+{}", count),
        }
    }
}

/// Summary of the current selection: a static label plus tags.
///
/// A caption without tags is the "nothing selected" state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Caption {
    pub label: String,
    pub tags: Vec<Tag>,
}

impl Caption {
    /// A caption showing only the label.
    pub fn label_only(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags(label: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            label: label.into(),
            tags,
        }
    }

    /// True when no selection is being described.
    pub fn is_label_only(&self) -> bool {
        self.tags.is_empty()
    }

    /// Texts of the [`Tag::Text`] segments, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.tags
            .iter()
            .filter_map(|tag| match tag {
                Tag::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The overflow count, if the caption carries one.
    pub fn overflow(&self) -> Option<usize> {
        self.tags.iter().find_map(|tag| match tag {
            Tag::Overflow(count) => Some(*count),
            _ => None,
        })
    }
}

/// Space-joined rendering; an empty label is skipped.
impl std::fmt::Display for Caption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        if !self.label.is_empty() {
            f.write_str(&self.label)?;
            first = false;
        }
        for tag in &self.tags {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}", tag)?;
            first = false;
        }
        Ok(())
    }
}

/// Formatting knobs taken from the selection config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionStyle {
    pub overflow_limit: usize,
    pub from_marker: String,
    pub to_marker: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_skips_empty_label() {
        let caption = Caption::with_tags("", vec![Tag::Text("B".into())]);
        assert_eq!(caption.to_string(), "B");
    }

    #[test]
    fn test_display_with_overflow() {
        let caption = Caption::with_tags(
            "Fruit",
            vec![
                Tag::Text("A".into()),
                Tag::Text("B".into()),
                Tag::Overflow(2),
            ],
        );
        assert_eq!(caption.to_string(), "Fruit A B +2");
        assert_eq!(caption.overflow(), Some(2));
        assert_eq!(caption.texts(), vec!["A", "B"]);
    }

    #[test]
    fn test_label_only() {
        let caption = Caption::label_only("Pick one");
        assert!(caption.is_label_only());
        assert_eq!(caption.to_string(), "Pick one");
    }
}
