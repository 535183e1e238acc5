//! Data model for layered-element postprocessing.
//!
//! This crate provides:
//! - **Entity scopings**: ordered sets of unique element ids
//! - **Property fields**: fixed-width and ragged per-entity data
//! - **Mesh metadata** (`LayupMesh`) as fetched in bulk from the engine
//! - **Element topologies** and the corner-node table

pub mod error;
pub mod field;
pub mod mesh;
pub mod scoping;
pub mod shape;

pub use error::{ModelError, Result};
pub use field::{FieldData, FloatField, IntField, PropertyField, RaggedArray};
pub use mesh::{ANALYSIS_PLY_PREFIX, LayupMesh, MeshSummary, NamedField, field_names};
pub use scoping::{EntityId, EntityScoping};
pub use shape::{CornerNodeTable, ElementShape};
