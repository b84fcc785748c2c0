//! Error types for structural editing operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    /// An operation precondition was not met. The document is left
    /// unmodified; never retried automatically.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The selection could not be resolved to a semantic node by any
    /// strategy. The document is left unmodified.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Unknown operation id passed to the executor
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Document model error: {0}")]
    DocModel(#[from] manuscript_model::DocModelError),
}

pub type Result<T> = std::result::Result<T, EditError>;
