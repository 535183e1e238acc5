//! Analysis ply lookups.
//!
//! Each analysis ply is a property field named `"AnalysisPly:" + name`
//! mapping every element that contains the ply to the ply's layer index in
//! that element.

use std::collections::BTreeMap;

use layup_model::{EntityId, LayupMesh, field_names};

use crate::config::IdIndexStrategy;
use crate::context::LayupContext;
use crate::error::{LayupError, Result};
use crate::indexer::FieldIndexer;

/// Names of all analysis plies, in engine order (not sorted)
pub fn all_ply_names(mesh: &LayupMesh) -> Vec<&str> {
    mesh.analysis_ply_names()
}

/// Layer index lookup for one analysis ply
#[derive(Debug, Clone)]
pub struct AnalysisPlyInfoProvider<'m> {
    name: String,
    layers: FieldIndexer<'m, i64>,
}

impl<'m> AnalysisPlyInfoProvider<'m> {
    pub fn new(mesh: &'m LayupMesh, name: &str) -> Result<Self> {
        Self::with_strategy(mesh, name, IdIndexStrategy::default())
    }

    pub fn with_strategy(
        mesh: &'m LayupMesh,
        name: &str,
        strategy: IdIndexStrategy,
    ) -> Result<Self> {
        let field = mesh
            .analysis_ply_field(name)
            .ok_or_else(|| LayupError::PlyNotFound {
                name: name.to_string(),
                available: mesh
                    .analysis_ply_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })?;
        Ok(Self {
            name: name.to_string(),
            layers: FieldIndexer::checked(field, strategy),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Layer of the ply in `element_id`, `None` if the element does not
    /// contain the ply
    pub fn layer_index(&self, element_id: EntityId) -> Option<usize> {
        self.layers
            .value_by_id(element_id)
            .and_then(|&layer| usize::try_from(layer).ok())
    }

    /// Elements containing the ply
    pub fn element_ids(&self) -> &'m [EntityId] {
        self.layers.ids()
    }
}

/// Material id of every analysis ply.
///
/// The material is taken from the first element of the ply that is part of
/// the mesh and has an [`crate::ElementInfo`]. Plies without such an element
/// (e.g. all their elements were suppressed) are left out.
pub fn material_id_by_analysis_ply(ctx: &LayupContext<'_>) -> Result<BTreeMap<String, i64>> {
    let mut materials = BTreeMap::new();
    for name in ctx.all_ply_names() {
        let ply = ctx.analysis_ply(name)?;
        for &element_id in ply.element_ids() {
            if !ctx.contains_element(element_id) {
                continue;
            }
            let Some(info) = ctx.element_info(element_id)? else {
                continue;
            };
            let layer = ply
                .layer_index(element_id)
                .ok_or_else(|| LayupError::MalformedLayupData {
                    element_id,
                    detail: format!("negative layer index for analysis ply '{name}'"),
                })?;
            let material = info.material_ids.get(layer).copied().ok_or_else(|| {
                LayupError::MalformedLayupData {
                    element_id,
                    detail: format!(
                        "analysis ply '{name}' on layer {layer} of {} layers",
                        info.material_ids.len()
                    ),
                }
            })?;
            materials.insert(name.to_string(), material);
            break;
        }
        if !materials.contains_key(name) {
            log::debug!("Analysis ply {name} has no element in the mesh");
        }
    }
    Ok(materials)
}

/// Map from the analysis ply indices of the `layer_to_analysis_ply` field to
/// ply names
pub fn analysis_ply_index_to_name(mesh: &LayupMesh) -> Result<BTreeMap<i64, String>> {
    let field = mesh.require_property_field(field_names::LAYER_TO_ANALYSIS_PLY)?;
    let plies_by_layer = FieldIndexer::checked(field, IdIndexStrategy::default());

    let mut names = BTreeMap::new();
    for name in mesh.analysis_ply_names() {
        let Some(ply_field) = mesh.analysis_ply_field(name) else {
            continue;
        };
        let (Some(first_element), Some(&[layer, ..])) =
            (ply_field.scoping().id(0), ply_field.entity_data(0))
        else {
            continue;
        };
        let ply_index = plies_by_layer
            .by_id(first_element)
            .zip(usize::try_from(layer).ok())
            .and_then(|(indices, layer)| indices.get(layer));
        match ply_index {
            Some(&index) => {
                names.insert(index, name.to_string());
            }
            None => log::debug!("No analysis ply index for {name} in element {first_element}"),
        }
    }
    Ok(names)
}
