//! Mesh metadata as fetched from the engine in bulk.
//!
//! A [`LayupMesh`] holds the element scoping plus named property fields in
//! the order the engine enumerates them. Field names follow the engine's
//! conventions (see [`field_names`]); analysis plies are stored as one
//! property field each, named `"AnalysisPly:" + ply name`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::field::{FieldData, FloatField, IntField, PropertyField};
use crate::scoping::EntityScoping;

/// Prefix of analysis ply property field names
pub const ANALYSIS_PLY_PREFIX: &str = "AnalysisPly:";

/// Well-known property field names
pub mod field_names {
    /// Solver element type per element (e.g. 181 for a layered shell)
    pub const SOLVER_ELEMENT_TYPE: &str = "apdl_element_type";
    /// Engine topology code per element
    pub const ELEMENT_SHAPE: &str = "element_shape";
    /// Keyopt 3 per element
    pub const KEYOPT_3: &str = "keyopt_3";
    /// Keyopt 8 per element
    pub const KEYOPT_8: &str = "keyopt_8";
    /// Ragged `[layer_count, layer indices...]` per layered element
    pub const LAYER_INDICES: &str = "element_layer_indices";
    /// Ragged material id per layer, parallel to [`LAYER_INDICES`]
    pub const LAYERED_MATERIAL_IDS: &str = "element_layered_material_ids";
    /// Ragged analysis ply index per layer
    pub const LAYER_TO_ANALYSIS_PLY: &str = "layer_to_analysis_ply";

    /// Ply angle per layer
    pub const ANGLE: &str = "angle";
    /// Shear angle per layer
    pub const SHEAR_ANGLE: &str = "shear_angle";
    /// Thickness per layer
    pub const THICKNESS: &str = "thickness";
    /// Laminate offset per element
    pub const LAMINATE_OFFSET: &str = "laminate_offset";
}

/// A field together with its engine name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedField<T> {
    pub name: String,
    pub field: PropertyField<T>,
}

/// Element scoping and metadata fields of one mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayupMesh {
    /// All element ids of the mesh
    pub element_ids: EntityScoping,
    /// Integer property fields, in engine enumeration order
    #[serde(default)]
    pub property_fields: Vec<NamedField<i64>>,
    /// Float lay-up fields (angles, thicknesses, offsets)
    #[serde(default)]
    pub layup_fields: Vec<NamedField<f64>>,
}

impl LayupMesh {
    /// Create a mesh without any fields
    pub fn new(element_ids: EntityScoping) -> Self {
        Self {
            element_ids,
            property_fields: Vec::new(),
            layup_fields: Vec::new(),
        }
    }

    /// Add or replace a property field; new names go last
    pub fn add_property_field(&mut self, name: impl Into<String>, field: IntField) {
        upsert(&mut self.property_fields, name.into(), field);
    }

    /// Add or replace a lay-up field
    pub fn add_layup_field(&mut self, name: impl Into<String>, field: FloatField) {
        upsert(&mut self.layup_fields, name.into(), field);
    }

    /// Add the property field of an analysis ply
    pub fn add_analysis_ply(&mut self, ply_name: &str, field: IntField) {
        self.add_property_field(format!("{ANALYSIS_PLY_PREFIX}{ply_name}"), field);
    }

    pub fn property_field(&self, name: &str) -> Option<&IntField> {
        self.property_fields
            .iter()
            .find(|named| named.name == name)
            .map(|named| &named.field)
    }

    /// Property field that must be present
    pub fn require_property_field(&self, name: &str) -> Result<&IntField> {
        self.property_field(name)
            .ok_or_else(|| ModelError::MissingField(name.to_string()))
    }

    pub fn layup_field(&self, name: &str) -> Option<&FloatField> {
        self.layup_fields
            .iter()
            .find(|named| named.name == name)
            .map(|named| &named.field)
    }

    /// Lay-up field that must be present
    pub fn require_layup_field(&self, name: &str) -> Result<&FloatField> {
        self.layup_field(name)
            .ok_or_else(|| ModelError::MissingField(name.to_string()))
    }

    /// Names of all property fields, in engine order
    pub fn available_property_fields(&self) -> impl Iterator<Item = &str> {
        self.property_fields.iter().map(|named| named.name.as_str())
    }

    /// Names of all analysis plies, in engine order (not sorted)
    pub fn analysis_ply_names(&self) -> Vec<&str> {
        self.available_property_fields()
            .filter_map(|name| name.strip_prefix(ANALYSIS_PLY_PREFIX))
            .collect()
    }

    /// Property field of the analysis ply `ply_name`
    pub fn analysis_ply_field(&self, ply_name: &str) -> Option<&IntField> {
        self.property_fields
            .iter()
            .find(|named| {
                named
                    .name
                    .strip_prefix(ANALYSIS_PLY_PREFIX)
                    .is_some_and(|name| name == ply_name)
            })
            .map(|named| &named.field)
    }

    /// Validate the element scoping and every field
    pub fn validate(&self) -> Result<()> {
        self.element_ids.validate()?;
        for named in &self.property_fields {
            named.field.validate()?;
        }
        for named in &self.layup_fields {
            named.field.validate()?;
        }
        Ok(())
    }

    /// Summary for reporting
    pub fn summary(&self) -> MeshSummary {
        let mut layered_elements = 0;
        let mut layers_by_count = BTreeMap::new();
        if let Some(field) = self.property_field(field_names::LAYER_INDICES) {
            layered_elements = field.scoping().len();
            if let FieldData::Ragged(array) = field.data() {
                for position in 0..array.len() {
                    if let Some(&count) = array.slice(position).and_then(|s| s.first()) {
                        *layers_by_count.entry(count).or_insert(0) += 1;
                    }
                }
            }
        }

        MeshSummary {
            num_elements: self.element_ids.len(),
            num_property_fields: self.property_fields.len(),
            num_layup_fields: self.layup_fields.len(),
            layered_elements,
            analysis_plies: self
                .analysis_ply_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            layers_by_count,
        }
    }
}

fn upsert<T>(fields: &mut Vec<NamedField<T>>, name: String, field: PropertyField<T>) {
    match fields.iter_mut().find(|named| named.name == name) {
        Some(existing) => existing.field = field,
        None => fields.push(NamedField { name, field }),
    }
}

/// Mesh summary for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshSummary {
    pub num_elements: usize,
    pub num_property_fields: usize,
    pub num_layup_fields: usize,
    /// Elements present in the layer-index field
    pub layered_elements: usize,
    pub analysis_plies: Vec<String>,
    /// Number of layered elements per layer count
    pub layers_by_count: BTreeMap<i64, usize>,
}

impl MeshSummary {
    /// Format as a human-readable string
    pub fn format(&self) -> String {
        let mut lines = vec![
            format!("Elements: {}", self.num_elements),
            format!("Layered elements: {}", self.layered_elements),
            format!("Property fields: {}", self.num_property_fields),
            format!("Lay-up fields: {}", self.num_layup_fields),
            format!("Analysis plies: {}", self.analysis_plies.len()),
        ];

        if !self.layers_by_count.is_empty() {
            lines.push("Layer counts:".to_string());
            for (layers, count) in &self.layers_by_count {
                lines.push(format!("  {layers} layers: {count}"));
            }
        }

        lines.join("\n")
    }
}
