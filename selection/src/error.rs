//! Selection error types.

use thiserror::Error;

use crate::config::ConfigError;
use crate::item::ItemId;

/// Errors returned by selection operations.
///
/// Empty item lists, unmatched filters and missing range endpoints are
/// valid states, not errors. Opening a disabled selection is a silent no-op.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// An operation name passed to [`crate::controller::Selection::invoke`]
    /// is not recognized.
    #[error("No method named \"{0}\"")]
    InvalidMethod(String),

    /// The item id does not belong to this selection.
    #[error("unknown item '{0}'")]
    UnknownItem(ItemId),

    /// Two items share an id.
    #[error("duplicate item id '{0}'")]
    DuplicateItem(ItemId),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
