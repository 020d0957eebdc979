//! Hidden form fields mirroring the committed selection.

use serde::Serialize;

/// One `(name, value)` pair submitted with the host form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Field name used for the lower range endpoint.
pub fn min_field_name(name: &str) -> String {
    format!("{}_min", name)
}

/// Field name used for the upper range endpoint.
pub fn max_field_name(name: &str) -> String {
    format!("{}_max", name)
}
