//! Error types for document model operations

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),

    #[error("Tree structure error: {0}")]
    TreeStructure(String),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),
}

pub type Result<T> = std::result::Result<T, DocModelError>;
