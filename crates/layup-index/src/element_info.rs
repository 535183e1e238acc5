//! Per-element lay-up descriptors.
//!
//! [`ElementInfoProvider`] composes the indexed metadata fields of a mesh
//! (solver element type, topology code, keyopts, layer indices and layered
//! material ids) into an [`ElementInfo`] per element id. Elements whose
//! solver type is not a supported layered family resolve to `None`;
//! inconsistent metadata of a supported element is an error.

use serde::{Deserialize, Serialize};

use layup_model::{CornerNodeTable, EntityId, LayupMesh, field_names};

use crate::config::IndexerConfig;
use crate::error::{LayupError, Result};
use crate::indexer::{BoundsCheck, FieldIndexer};
use crate::spot::Spot;

/// Parsed entry of the layer-index field.
///
/// The engine stores `[count, layer indices...]` per element; the record
/// keeps the count apart from the values and only exists if
/// `count + 1 == raw.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerIndexRecord<'a> {
    pub count: usize,
    pub values: &'a [i64],
}

impl<'a> LayerIndexRecord<'a> {
    pub fn parse(element_id: EntityId, raw: &'a [i64]) -> Result<Self> {
        let malformed = |detail: String| LayupError::MalformedLayupData { element_id, detail };

        let (&first, values) = raw
            .split_first()
            .ok_or_else(|| malformed("empty layer index data".to_string()))?;
        let count = usize::try_from(first)
            .map_err(|_| malformed(format!("negative layer count {first}")))?;
        if count == 0 {
            return Err(malformed("layer count is zero".to_string()));
        }
        if count != values.len() {
            return Err(malformed(format!(
                "layer count {count} does not match {} layer indices",
                values.len()
            )));
        }
        Ok(Self { count, values })
    }
}

/// Supported solver element families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementFamily {
    /// 4-node layered shell
    Shell181,
    /// 8-node layered shell
    Shell281,
    /// 8-node solid
    Solid185,
    /// 20-node solid
    Solid186,
    /// 10-node tetrahedral solid
    Solid187,
    /// 8-node solid shell
    SolidShell190,
}

impl ElementFamily {
    pub fn from_solver_type(element_type: i64) -> Option<Self> {
        match element_type {
            181 => Some(ElementFamily::Shell181),
            281 => Some(ElementFamily::Shell281),
            185 => Some(ElementFamily::Solid185),
            186 => Some(ElementFamily::Solid186),
            187 => Some(ElementFamily::Solid187),
            190 => Some(ElementFamily::SolidShell190),
            _ => None,
        }
    }

    pub fn solver_type(self) -> i64 {
        match self {
            ElementFamily::Shell181 => 181,
            ElementFamily::Shell281 => 281,
            ElementFamily::Solid185 => 185,
            ElementFamily::Solid186 => 186,
            ElementFamily::Solid187 => 187,
            ElementFamily::SolidShell190 => 190,
        }
    }

    pub fn is_shell(self) -> bool {
        matches!(self, ElementFamily::Shell181 | ElementFamily::Shell281)
    }

    /// Spots per layer for a keyopt combination, `None` if unsupported.
    ///
    /// Keyopt 8 selects the layer output; 185 and 186 with keyopt 3 == 0
    /// are homogeneous solids without spots.
    pub fn n_spots(self, keyopt_8: i64, keyopt_3: Option<i64>) -> Option<usize> {
        if keyopt_3 == Some(0)
            && matches!(self, ElementFamily::Solid185 | ElementFamily::Solid186)
        {
            return Some(0);
        }
        match (self, keyopt_8) {
            (_, 0) => Some(0),
            (ElementFamily::Shell181 | ElementFamily::Shell281, 1) => Some(2),
            (ElementFamily::Shell181 | ElementFamily::Shell281, 2) => Some(3),
            (
                ElementFamily::Solid185 | ElementFamily::Solid186 | ElementFamily::SolidShell190,
                1,
            ) => Some(2),
            _ => None,
        }
    }
}

/// Lay-up descriptor of one element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementInfo {
    pub id: EntityId,
    /// Number of layers, 1 for non-layered elements
    pub n_layers: usize,
    /// Corner nodes of the topology, midside nodes excluded
    pub n_corner_nodes: usize,
    /// Spots per layer, 0 for non-layered elements
    pub n_spots: usize,
    pub is_layered: bool,
    pub is_shell: bool,
    /// Solver element type (e.g. 181)
    pub element_type: i64,
    /// Material id per layer, bottom to top; empty for non-layered elements
    pub material_ids: Vec<i64>,
}

impl ElementInfo {
    /// Nodes per spot plane.
    ///
    /// Layered solids report their bottom and top faces as separate spot
    /// planes, so each plane holds half of the corner nodes.
    pub fn nodes_per_spot_plane(&self) -> usize {
        if self.is_layered && !self.is_shell {
            self.n_corner_nodes / 2
        } else {
            self.n_corner_nodes
        }
    }

    /// Length of the spot axis in the result block (at least 1)
    pub fn effective_spots(&self) -> usize {
        self.n_spots.max(1)
    }

    /// Number of values per result component in the element's block
    pub fn block_len(&self) -> usize {
        self.n_layers * self.nodes_per_spot_plane() * self.effective_spots()
    }

    /// Spots present in each layer, in buffer order
    pub fn spots(&self) -> &'static [Spot] {
        Spot::available(self.n_spots)
    }

    pub fn family(&self) -> Option<ElementFamily> {
        ElementFamily::from_solver_type(self.element_type)
    }
}

/// Builds [`ElementInfo`]s from the metadata fields of one mesh
#[derive(Debug, Clone)]
pub struct ElementInfoProvider<'m> {
    solver_types: FieldIndexer<'m, i64>,
    shapes: FieldIndexer<'m, i64>,
    keyopt_8: FieldIndexer<'m, i64>,
    keyopt_3: Option<FieldIndexer<'m, i64>>,
    layer_indices: FieldIndexer<'m, i64>,
    layer_materials: FieldIndexer<'m, i64>,
    corner_nodes: CornerNodeTable,
}

impl<'m> ElementInfoProvider<'m> {
    /// Index the metadata fields of `mesh`.
    ///
    /// Solver element type, element shape, keyopt 8, layer indices and
    /// layered material ids are required; keyopt 3 is optional.
    pub fn new(mesh: &'m LayupMesh, config: &IndexerConfig) -> Result<Self> {
        let strategy = config.id_index;
        let bounds = config.bounds_check();
        let indexer = move |name: &str, bounds: BoundsCheck| -> Result<FieldIndexer<'m, i64>> {
            let field = mesh.require_property_field(name)?;
            Ok(FieldIndexer::new(field, strategy, bounds))
        };

        // Queried ids are arbitrary, so the solver-type lookup gates every
        // other one with a bounds check
        let solver_types = indexer(field_names::SOLVER_ELEMENT_TYPE, BoundsCheck::Checked)?;
        let max_element_id = solver_types.max_id();
        let spanning = |name: &str| -> Result<FieldIndexer<'m, i64>> {
            let field = indexer(name, bounds)?;
            if field.max_id() >= max_element_id {
                return Ok(field);
            }
            if bounds == BoundsCheck::Unchecked {
                log::debug!("Field '{name}' does not span the solver-typed ids, keeping bounds checks");
            }
            Ok(field.with_bounds(BoundsCheck::Checked))
        };

        let provider = Self {
            shapes: spanning(field_names::ELEMENT_SHAPE)?,
            keyopt_8: spanning(field_names::KEYOPT_8)?,
            // Optional and may cover only part of the mesh
            keyopt_3: mesh
                .property_field(field_names::KEYOPT_3)
                .map(|field| FieldIndexer::checked(field, strategy)),
            solver_types,
            // Layer fields only cover layered elements
            layer_indices: indexer(field_names::LAYER_INDICES, BoundsCheck::Checked)?,
            layer_materials: indexer(field_names::LAYERED_MATERIAL_IDS, BoundsCheck::Checked)?,
            corner_nodes: CornerNodeTable::standard(),
        };

        log::debug!(
            "Element info provider over {} elements ({} layered)",
            provider.solver_types.ids().len(),
            provider.layer_indices.ids().len()
        );
        Ok(provider)
    }

    /// Replace the corner-node table
    pub fn with_corner_nodes(mut self, table: CornerNodeTable) -> Self {
        self.corner_nodes = table;
        self
    }

    /// Descriptor of `element_id`.
    ///
    /// `Ok(None)` if the element has no solver type or keyopt 8 entry, or its
    /// solver type is not a supported family.
    pub fn element_info(&self, element_id: EntityId) -> Result<Option<ElementInfo>> {
        let Some(&element_type) = self.solver_types.value_by_id(element_id) else {
            log::trace!("Element {element_id} has no solver element type");
            return Ok(None);
        };
        let Some(family) = ElementFamily::from_solver_type(element_type) else {
            log::trace!("Element {element_id} of type {element_type} is not a layered family");
            return Ok(None);
        };
        let Some(&keyopt_8) = self.keyopt_8.value_by_id(element_id) else {
            log::trace!("Element {element_id} has no keyopt 8");
            return Ok(None);
        };
        let keyopt_3 = self
            .keyopt_3
            .as_ref()
            .and_then(|indexer| indexer.value_by_id(element_id))
            .copied();

        let spots_per_layer =
            family
                .n_spots(keyopt_8, keyopt_3)
                .ok_or_else(|| LayupError::UnsupportedElement {
                    element_id,
                    reason: format!(
                        "element type {element_type} with keyopt 8 = {keyopt_8} has no spot rule"
                    ),
                })?;

        let (n_layers, is_layered, material_ids, n_spots) =
            match self.layer_indices.by_id(element_id) {
                Some(raw) => {
                    let record = LayerIndexRecord::parse(element_id, raw)?;
                    let materials = self.layer_materials.by_id(element_id).ok_or_else(|| {
                        LayupError::MalformedLayupData {
                            element_id,
                            detail: "layered element without material ids".to_string(),
                        }
                    })?;
                    if materials.len() != record.count {
                        return Err(LayupError::MalformedLayupData {
                            element_id,
                            detail: format!(
                                "{} material ids for {} layers",
                                materials.len(),
                                record.count
                            ),
                        });
                    }
                    (record.count, true, materials.to_vec(), spots_per_layer)
                }
                None => (1, false, Vec::new(), 0),
            };

        let shape = self.shapes.value_by_id(element_id).copied().ok_or_else(|| {
            LayupError::UnsupportedElement {
                element_id,
                reason: "no element shape".to_string(),
            }
        })?;
        let n_corner_nodes =
            self.corner_nodes
                .corner_nodes(shape)
                .ok_or_else(|| LayupError::UnsupportedElement {
                    element_id,
                    reason: format!("no corner-node count for shape code {shape}"),
                })?;

        Ok(Some(ElementInfo {
            id: element_id,
            n_layers,
            n_corner_nodes,
            n_spots,
            is_layered,
            is_shell: family.is_shell(),
            element_type,
            material_ids,
        }))
    }

    /// Ids of all elements with a solver element type
    pub fn element_ids(&self) -> &'m [EntityId] {
        self.solver_types.ids()
    }

    /// Ids of all layered elements
    pub fn layered_element_ids(&self) -> &'m [EntityId] {
        self.layer_indices.ids()
    }
}
