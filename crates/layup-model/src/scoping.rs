//! Entity scopings: ordered sets of unique entity ids.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Element (or other entity) id as reported by the engine.
pub type EntityId = u32;

/// Ordered set of distinct entity ids.
///
/// The position of an id in the scoping is the position of its data in any
/// field defined over the scoping. Ids are arbitrary and usually not
/// contiguous.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityScoping {
    ids: Vec<EntityId>,
}

impl EntityScoping {
    /// Create a scoping, rejecting duplicate ids
    pub fn new(ids: Vec<EntityId>) -> Result<Self> {
        let scoping = Self { ids };
        scoping.validate()?;
        Ok(scoping)
    }

    /// Ids in scoping order
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Id stored at `position`
    pub fn id(&self, position: usize) -> Option<EntityId> {
        self.ids.get(position).copied()
    }

    /// Largest id in the scoping
    pub fn max_id(&self) -> Option<EntityId> {
        self.ids.iter().copied().max()
    }

    /// Check that ids are unique.
    ///
    /// Deserialized scopings skip the check in [`EntityScoping::new`], so
    /// loaders call this explicitly.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashMap::with_capacity(self.ids.len());
        for (position, &id) in self.ids.iter().enumerate() {
            if let Some(first) = seen.insert(id, position) {
                return Err(ModelError::DuplicateId {
                    id,
                    first,
                    second: position,
                });
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<EntityId>> for EntityScoping {
    type Error = ModelError;

    fn try_from(ids: Vec<EntityId>) -> Result<Self> {
        Self::new(ids)
    }
}
