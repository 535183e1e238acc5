//! Layer indexing for layered finite elements.
//!
//! Result data of a layered element comes as one flat block per element.
//! This crate locates values in that block:
//!
//! - [`IdIndex`]: O(1) id → position lookup over sparse engine ids
//! - [`FieldIndexer`]: id → data slice for fixed-width and ragged fields
//! - [`ElementInfoProvider`]: per-element [`ElementInfo`] (layers, nodes,
//!   spots, materials) from the mesh metadata
//! - [`select_indices`]: offsets of a layer/node/spot [`Selection`]
//! - [`AnalysisPlyInfoProvider`] and material lookups that turn a ply name or
//!   material id into a selection
//! - [`LayupContext`]: all of the above, built once per mesh
//!
//! # Example
//!
//! ```ignore
//! use layup_index::{IndexerConfig, LayupContext, Selection, Spot};
//!
//! let ctx = LayupContext::new(&mesh, IndexerConfig::default())?;
//! if let Some(info) = ctx.element_info(7)? {
//!     let selection = Selection::all().with_layers(vec![2]).with_spots(vec![Spot::Top]);
//!     let offsets = layup_index::select_indices(&info, &selection)?;
//! }
//! ```

pub mod config;
pub mod context;
pub mod element_info;
pub mod error;
pub mod id_index;
pub mod indexer;
pub mod layup_properties;
pub mod ply;
pub mod reduce;
pub mod select;
pub mod spot;

#[cfg(test)]
mod test_mesh;

pub use config::{DEFAULT_MAX_SPARSITY, IdIndexStrategy, IndexerConfig};
pub use context::LayupContext;
pub use element_info::{ElementFamily, ElementInfo, ElementInfoProvider, LayerIndexRecord};
pub use error::{LayupError, Result};
pub use id_index::{DenseIdIndex, HashedIdIndex, IdIndex, IdLookup, NOT_FOUND};
pub use indexer::{BoundsCheck, FieldIndexer};
pub use layup_properties::LayupPropertiesProvider;
pub use ply::{
    AnalysisPlyInfoProvider, all_ply_names, analysis_ply_index_to_name,
    material_id_by_analysis_ply,
};
pub use reduce::{ReductionStrategy, reduce_layer};
pub use select::{
    Selection, material_id_to_layer_indices, select_by_analysis_ply, select_by_material_ids,
    select_indices,
};
pub use spot::Spot;
