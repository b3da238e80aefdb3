//! Error type shared by the form crates.

use thiserror::Error;

/// Form errors.
#[derive(Debug, Error)]
pub enum FormError {
    /// The form store was used without a mounted provider.
    #[error("form store accessed outside of a mounted form provider")]
    OutsideProvider,
    /// The store is already borrowed, e.g. a subscriber tried to mutate it.
    #[error("form store is already borrowed")]
    StoreBusy,
    #[error("duplicate field name: {0}")]
    DuplicateField(String),
    #[error("layout index {index} out of range ({count} children)")]
    LayoutIndex { index: usize, count: usize },
    #[error("no child at index {0}")]
    UnknownChild(usize),
    #[error("invalid color {value:?}: {reason}")]
    InvalidColor { value: String, reason: String },
    #[error("invalid form configuration: {0}")]
    InvalidConfig(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for form operations.
pub type FormResult<T> = Result<T, FormError>;
