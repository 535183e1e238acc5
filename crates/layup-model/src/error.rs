//! Error types for layup-model

use thiserror::Error;

use crate::scoping::EntityId;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Duplicate id {id} in scoping (positions {first} and {second})")]
    DuplicateId {
        id: EntityId,
        first: usize,
        second: usize,
    },

    #[error("Field data holds {data} entities but its scoping holds {scoping} ids")]
    LengthMismatch { data: usize, scoping: usize },

    #[error("Invalid ragged offsets: {0}")]
    InvalidOffsets(String),

    #[error("Invalid field data: {0}")]
    InvalidFieldData(String),

    #[error("Missing property field in mesh: '{0}'")]
    MissingField(String),
}
