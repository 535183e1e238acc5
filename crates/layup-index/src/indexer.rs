//! Generic property-field indexer.
//!
//! One indexer type covers fixed-width and ragged fields (through
//! [`FieldData`]) with or without bounds checks (through [`BoundsCheck`]).

use layup_model::{EntityId, FieldData, PropertyField};

use crate::config::IdIndexStrategy;
use crate::id_index::{IdIndex, IdLookup, NOT_FOUND};

/// Whether id lookups guard against ids above the indexed range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsCheck {
    #[default]
    Checked,
    /// Caller guarantees every queried id is within the indexed range
    Unchecked,
}

/// Resolves element ids to their data slice in one property field
#[derive(Debug, Clone)]
pub struct FieldIndexer<'f, T> {
    field: &'f PropertyField<T>,
    index: IdIndex,
    bounds: BoundsCheck,
}

impl<'f, T> FieldIndexer<'f, T> {
    pub fn new(field: &'f PropertyField<T>, strategy: IdIndexStrategy, bounds: BoundsCheck) -> Self {
        let index = IdIndex::build(field.scoping().ids(), strategy);
        Self {
            field,
            index,
            bounds,
        }
    }

    /// Indexer with bounds checks
    pub fn checked(field: &'f PropertyField<T>, strategy: IdIndexStrategy) -> Self {
        Self::new(field, strategy, BoundsCheck::Checked)
    }

    /// Position of `id` in the field
    pub fn position(&self, id: EntityId) -> Option<usize> {
        let position = match self.bounds {
            BoundsCheck::Checked => self.index.lookup(id),
            BoundsCheck::Unchecked => self.index.lookup_unchecked(id),
        };
        (position != NOT_FOUND).then_some(position)
    }

    /// Data of `id`, `None` if the field has no entry for it
    pub fn by_id(&self, id: EntityId) -> Option<&'f [T]> {
        let position = self.position(id)?;
        self.field.entity_data(position)
    }

    /// First value of `id`, for one-value-per-entity fields
    pub fn value_by_id(&self, id: EntityId) -> Option<&'f T> {
        self.by_id(id).and_then(|data| data.first())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index.position(id).is_some()
    }

    pub fn field(&self) -> &'f PropertyField<T> {
        self.field
    }

    pub fn ids(&self) -> &'f [EntityId] {
        self.field.scoping().ids()
    }

    pub fn is_ragged(&self) -> bool {
        matches!(self.field.data(), FieldData::Ragged(_))
    }

    pub fn bounds_check(&self) -> BoundsCheck {
        self.bounds
    }

    pub fn with_bounds(mut self, bounds: BoundsCheck) -> Self {
        self.bounds = bounds;
        self
    }

    /// Largest indexed id, `None` for an empty field
    pub fn max_id(&self) -> Option<EntityId> {
        self.index.max_id()
    }
}
