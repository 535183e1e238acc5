//! Property fields: per-entity values defined over a scoping.
//!
//! Two storage layouts are supported:
//! - **Fixed**: every entity holds `width` values (`width == 1` for scalars)
//! - **Ragged**: every entity holds a slice of its own length, located via an
//!   offsets array (`offsets[i]..offsets[i + 1]`)

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::scoping::{EntityId, EntityScoping};

/// Flat value array plus per-entity offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaggedArray<T> {
    /// `len() + 1` offsets into `values`, starting at 0 and ending at `values.len()`
    offsets: Vec<usize>,
    values: Vec<T>,
}

impl<T> RaggedArray<T> {
    /// Create a ragged array from raw offsets and values
    pub fn new(offsets: Vec<usize>, values: Vec<T>) -> Result<Self> {
        let array = Self { offsets, values };
        array.validate()?;
        Ok(array)
    }

    /// Build a ragged array from one slice per entity
    pub fn from_slices<I, S>(slices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = T>,
    {
        let mut offsets = vec![0];
        let mut values = Vec::new();
        for slice in slices {
            values.extend(slice);
            offsets.push(values.len());
        }
        Self { offsets, values }
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slice of the entity at `position`
    pub fn slice(&self, position: usize) -> Option<&[T]> {
        let start = *self.offsets.get(position)?;
        let end = *self.offsets.get(position + 1)?;
        self.values.get(start..end)
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn validate(&self) -> Result<()> {
        match (self.offsets.first(), self.offsets.last()) {
            (Some(&0), Some(&last)) if last == self.values.len() => {}
            (None, _) => {
                return Err(ModelError::InvalidOffsets(
                    "offsets must hold at least one entry".to_string(),
                ));
            }
            _ => {
                return Err(ModelError::InvalidOffsets(format!(
                    "offsets must start at 0 and end at {} (the value count)",
                    self.values.len()
                )));
            }
        }

        if let Some(pos) = self.offsets.windows(2).position(|w| w[1] < w[0]) {
            return Err(ModelError::InvalidOffsets(format!(
                "offsets decrease at entity {pos} ({} > {})",
                self.offsets[pos],
                self.offsets[pos + 1]
            )));
        }
        Ok(())
    }
}

/// Storage layout of a property field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldData<T> {
    /// `width` consecutive values per entity
    Fixed { width: usize, values: Vec<T> },
    /// One slice per entity
    Ragged(RaggedArray<T>),
}

impl<T> FieldData<T> {
    /// Number of entities described by the data
    pub fn entity_count(&self) -> usize {
        match self {
            FieldData::Fixed { width, values } if *width > 0 => values.len() / width,
            FieldData::Fixed { .. } => 0,
            FieldData::Ragged(array) => array.len(),
        }
    }

    /// Values of the entity at `position`
    pub fn entity_data(&self, position: usize) -> Option<&[T]> {
        match self {
            FieldData::Fixed { width, values } => {
                let start = position.checked_mul(*width)?;
                values.get(start..start + width)
            }
            FieldData::Ragged(array) => array.slice(position),
        }
    }

    pub fn is_ragged(&self) -> bool {
        matches!(self, FieldData::Ragged(_))
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            FieldData::Fixed { width: 0, .. } => Err(ModelError::InvalidFieldData(
                "fixed-width field has width 0".to_string(),
            )),
            FieldData::Fixed { width, values } if values.len() % width != 0 => {
                Err(ModelError::InvalidFieldData(format!(
                    "fixed-width field holds {} values, not a multiple of width {width}",
                    values.len()
                )))
            }
            FieldData::Fixed { .. } => Ok(()),
            FieldData::Ragged(array) => array.validate(),
        }
    }
}

/// Per-entity data over an [`EntityScoping`].
///
/// Integer property fields carry element types, keyopts, layer indices and
/// material ids; float fields carry lay-up properties such as ply angles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyField<T> {
    scoping: EntityScoping,
    data: FieldData<T>,
}

/// Integer-valued property field
pub type IntField = PropertyField<i64>;
/// Float-valued field
pub type FloatField = PropertyField<f64>;

impl<T> PropertyField<T> {
    /// Create a field, checking data against the scoping
    pub fn new(scoping: EntityScoping, data: FieldData<T>) -> Result<Self> {
        let field = Self { scoping, data };
        field.validate()?;
        Ok(field)
    }

    /// One value per id
    pub fn scalar(ids: Vec<EntityId>, values: Vec<T>) -> Result<Self> {
        Self::new(
            EntityScoping::new(ids)?,
            FieldData::Fixed { width: 1, values },
        )
    }

    /// `width` values per id
    pub fn fixed(ids: Vec<EntityId>, width: usize, values: Vec<T>) -> Result<Self> {
        Self::new(EntityScoping::new(ids)?, FieldData::Fixed { width, values })
    }

    /// One slice per id
    pub fn ragged(ids: Vec<EntityId>, array: RaggedArray<T>) -> Result<Self> {
        Self::new(EntityScoping::new(ids)?, FieldData::Ragged(array))
    }

    pub fn scoping(&self) -> &EntityScoping {
        &self.scoping
    }

    pub fn data(&self) -> &FieldData<T> {
        &self.data
    }

    /// Values of the entity at scoping `position`
    pub fn entity_data(&self, position: usize) -> Option<&[T]> {
        self.data.entity_data(position)
    }

    pub fn validate(&self) -> Result<()> {
        self.scoping.validate()?;
        self.data.validate()?;
        let entities = self.data.entity_count();
        if entities != self.scoping.len() {
            return Err(ModelError::LengthMismatch {
                data: entities,
                scoping: self.scoping.len(),
            });
        }
        Ok(())
    }
}
