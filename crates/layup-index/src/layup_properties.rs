//! Per-layer lay-up properties: angles, thicknesses, shear angles, laminate
//! offsets and the analysis plies of each layer.

use std::collections::BTreeMap;

use layup_model::{EntityId, LayupMesh, field_names};

use crate::config::IndexerConfig;
use crate::error::{LayupError, Result};
use crate::indexer::FieldIndexer;
use crate::ply::analysis_ply_index_to_name;

#[derive(Debug, Clone)]
pub struct LayupPropertiesProvider<'m> {
    angles: FieldIndexer<'m, f64>,
    thicknesses: FieldIndexer<'m, f64>,
    shear_angles: FieldIndexer<'m, f64>,
    offsets: FieldIndexer<'m, f64>,
    analysis_plies: FieldIndexer<'m, i64>,
    ply_names: BTreeMap<i64, String>,
}

impl<'m> LayupPropertiesProvider<'m> {
    /// Index the lay-up fields of `mesh`.
    ///
    /// These fields only cover layered elements, so lookups are always
    /// bounds checked.
    pub fn new(mesh: &'m LayupMesh, config: &IndexerConfig) -> Result<Self> {
        let strategy = config.id_index;
        let indexer = move |name: &str| -> Result<FieldIndexer<'m, f64>> {
            let field = mesh.require_layup_field(name)?;
            Ok(FieldIndexer::checked(field, strategy))
        };

        Ok(Self {
            angles: indexer(field_names::ANGLE)?,
            thicknesses: indexer(field_names::THICKNESS)?,
            shear_angles: indexer(field_names::SHEAR_ANGLE)?,
            offsets: indexer(field_names::LAMINATE_OFFSET)?,
            analysis_plies: FieldIndexer::checked(
                mesh.require_property_field(field_names::LAYER_TO_ANALYSIS_PLY)?,
                strategy,
            ),
            ply_names: analysis_ply_index_to_name(mesh)?,
        })
    }

    /// Ply angle of every layer, `None` for non-layered elements
    pub fn layer_angles(&self, element_id: EntityId) -> Option<&'m [f64]> {
        self.angles.by_id(element_id)
    }

    /// Thickness of every layer, `None` for non-layered elements
    pub fn layer_thicknesses(&self, element_id: EntityId) -> Option<&'m [f64]> {
        self.thicknesses.by_id(element_id)
    }

    /// Shear angle of every layer, `None` for non-layered elements
    pub fn layer_shear_angles(&self, element_id: EntityId) -> Option<&'m [f64]> {
        self.shear_angles.by_id(element_id)
    }

    /// Laminate offset of the element, `None` for non-layered elements
    pub fn laminate_offset(&self, element_id: EntityId) -> Option<f64> {
        self.offsets.value_by_id(element_id).copied()
    }

    /// Total thickness of the element's lay-up
    pub fn total_thickness(&self, element_id: EntityId) -> Option<f64> {
        self.layer_thicknesses(element_id)
            .map(|thicknesses| thicknesses.iter().sum())
    }

    /// Analysis ply name of every layer, bottom to top
    pub fn analysis_plies(&self, element_id: EntityId) -> Result<Option<Vec<&str>>> {
        let Some(indices) = self.analysis_plies.by_id(element_id) else {
            return Ok(None);
        };
        indices
            .iter()
            .map(|index| {
                self.ply_names
                    .get(index)
                    .map(String::as_str)
                    .ok_or_else(|| LayupError::MalformedLayupData {
                        element_id,
                        detail: format!("unknown analysis ply index {index}"),
                    })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}
