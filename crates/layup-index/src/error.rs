//! Error types for layup-index

use layup_model::{EntityId, ModelError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LayupError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayupError {
    /// No corner-node or spot-count rule for the element
    #[error("Unsupported element {element_id}: {reason}")]
    UnsupportedElement { element_id: EntityId, reason: String },

    /// Layer metadata of the element fails its consistency checks
    #[error("Malformed lay-up data for element {element_id}: {detail}")]
    MalformedLayupData { element_id: EntityId, detail: String },

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Analysis ply is not available: {name}. Available analysis plies: {available:?}")]
    PlyNotFound { name: String, available: Vec<String> },

    #[error("Analysis ply '{ply}' is not part of element {element_id}")]
    PlyNotInElement { ply: String, element_id: EntityId },

    /// Missing mesh field or invalid field data
    #[error(transparent)]
    Model(#[from] ModelError),
}
