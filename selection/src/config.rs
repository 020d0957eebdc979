//! Per-selection configuration.

use serde::Deserialize;
use thiserror::Error;

use crate::caption::CaptionStyle;
use crate::mode::Mode;

/// Configuration of one selection widget.
///
/// Mirrors the attributes a host attaches to a mounted widget, so it can be
/// deserialized straight from them:
///
/// ```
/// use selection::config::SelectionConfig;
/// use selection::mode::Mode;
///
/// let config = SelectionConfig::from_json(
///     r#"{ "mode": "range", "name": "price", "label": "Price", "cleanable": true }"#,
/// )
/// .unwrap();
/// assert_eq!(config.mode, Mode::Range);
/// assert_eq!(config.overflow_limit, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Selection mode. Cannot change after the selection is built.
    pub mode: Mode,

    /// Base name of the hidden form fields.
    pub name: String,

    /// Fallback caption shown when nothing is selected.
    pub label: String,

    /// Whether a clear button is offered.
    pub cleanable: bool,

    /// Disabled selections never open.
    pub disabled: bool,

    /// Checked items listed in a multiple-mode caption before "+N".
    pub overflow_limit: usize,

    /// Marker placed before the lower range endpoint.
    pub from_marker: String,

    /// Marker placed before the upper range endpoint.
    pub to_marker: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Single,
            name: String::new(),
            label: String::new(),
            cleanable: false,
            disabled: false,
            overflow_limit: 3,
            from_marker: "from".into(),
            to_marker: "to".into(),
        }
    }
}

impl SelectionConfig {
    /// Create a config for the given mode and field name.
    pub fn new(mode: Mode, name: impl Into<String>) -> Self {
        Self {
            mode,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse a config from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the fallback caption.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Offer a clear button.
    pub fn cleanable(mut self) -> Self {
        self.cleanable = true;
        self
    }

    /// Start disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Set how many checked items a multiple-mode caption lists.
    pub fn overflow_limit(mut self, limit: usize) -> Self {
        self.overflow_limit = limit;
        self
    }

    /// Set the range caption markers.
    pub fn range_markers(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.from_marker = from.into();
        self.to_marker = to.into();
        self
    }

    /// Check values serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mode == Mode::Multiple && self.overflow_limit == 0 {
            return Err(ConfigError::ZeroOverflowLimit);
        }
        Ok(())
    }

    pub(crate) fn caption_style(&self) -> CaptionStyle {
        CaptionStyle {
            overflow_limit: self.overflow_limit,
            from_marker: self.from_marker.clone(),
            to_marker: self.to_marker.clone(),
        }
    }
}

/// Errors raised while loading a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid selection config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("overflow_limit must be at least 1 in multiple mode")]
    ZeroOverflowLimit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config = SelectionConfig::from_json(r#"{ "name": "city" }"#).unwrap();
        assert_eq!(config.mode, Mode::Single);
        assert_eq!(config.name, "city");
        assert!(!config.cleanable);
        assert_eq!(config.from_marker, "from");
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let err = SelectionConfig::from_json(r#"{ "mode": "tree" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_overflow_limit_rejected() {
        let err = SelectionConfig::from_json(r#"{ "mode": "multiple", "overflow_limit": 0 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroOverflowLimit));
    }

    #[test]
    fn test_builder() {
        let config = SelectionConfig::new(Mode::Multiple, "tags")
            .label("Tags")
            .cleanable()
            .overflow_limit(2);
        assert_eq!(config.label, "Tags");
        assert!(config.cleanable);
        assert_eq!(config.caption_style().overflow_limit, 2);
    }
}
