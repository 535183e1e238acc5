//! Id → position lookup over sparse entity ids.
//!
//! Engine scopings hold arbitrary, non-contiguous ids. An [`IdIndex`] is built
//! once per scoping and answers "at which position of the scoping's arrays is
//! id N" in O(1). Positions follow the input order: for ids `[3, 500000, 7]`
//! the index resolves 3 → 0, 500000 → 1 and 7 → 2.
//!
//! The dense variant costs O(max_id) memory, which is wasteful when a few
//! ids are spread over a large range. The hashed variant trades a hash per
//! lookup for memory proportional to the number of ids.

use std::collections::HashMap;

use layup_model::EntityId;

use crate::config::{DEFAULT_MAX_SPARSITY, IdIndexStrategy};

/// Sentinel returned for ids that are not part of the index
pub const NOT_FOUND: usize = usize::MAX;

/// Dense indices above this many slots are reported when they are sparse
const SPARSE_WARNING_SLOTS: usize = 1 << 20;

/// Read-only id → position lookup
pub trait IdLookup {
    /// Position of `id`, or [`NOT_FOUND`]
    fn lookup(&self, id: EntityId) -> usize;

    /// Position of an id the caller knows to be within the indexed range.
    ///
    /// May panic for ids above [`IdLookup::max_id`].
    fn lookup_unchecked(&self, id: EntityId) -> usize;

    /// Number of indexed ids
    fn len(&self) -> usize;

    /// Largest indexed id
    fn max_id(&self) -> Option<EntityId>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of `id` as an option
    fn position(&self, id: EntityId) -> Option<usize> {
        match self.lookup(id) {
            NOT_FOUND => None,
            position => Some(position),
        }
    }
}

/// Dense array sized `max_id + 1`, unset slots hold [`NOT_FOUND`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DenseIdIndex {
    positions: Vec<usize>,
    len: usize,
}

impl DenseIdIndex {
    /// Build from unique ids.
    ///
    /// If an id repeats, its last position wins.
    pub fn build(ids: &[EntityId]) -> Self {
        let size = ids.iter().max().map_or(0, |&max| max as usize + 1);
        let mut positions = vec![NOT_FOUND; size];
        for (position, &id) in ids.iter().enumerate() {
            positions[id as usize] = position;
        }
        Self {
            positions,
            len: ids.len(),
        }
    }

    /// Number of slots (`max_id + 1`)
    pub fn capacity(&self) -> usize {
        self.positions.len()
    }
}

impl IdLookup for DenseIdIndex {
    fn lookup(&self, id: EntityId) -> usize {
        self.positions
            .get(id as usize)
            .copied()
            .unwrap_or(NOT_FOUND)
    }

    fn lookup_unchecked(&self, id: EntityId) -> usize {
        self.positions[id as usize]
    }

    fn len(&self) -> usize {
        self.len
    }

    fn max_id(&self) -> Option<EntityId> {
        self.positions.len().checked_sub(1).map(|max| max as EntityId)
    }
}

/// Hash map keyed by id
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HashedIdIndex {
    positions: HashMap<EntityId, usize>,
    max_id: Option<EntityId>,
}

impl HashedIdIndex {
    pub fn build(ids: &[EntityId]) -> Self {
        let positions = ids
            .iter()
            .enumerate()
            .map(|(position, &id)| (id, position))
            .collect();
        Self {
            positions,
            max_id: ids.iter().max().copied(),
        }
    }
}

impl IdLookup for HashedIdIndex {
    fn lookup(&self, id: EntityId) -> usize {
        self.positions.get(&id).copied().unwrap_or(NOT_FOUND)
    }

    fn lookup_unchecked(&self, id: EntityId) -> usize {
        self.lookup(id)
    }

    fn len(&self) -> usize {
        self.positions.len()
    }

    fn max_id(&self) -> Option<EntityId> {
        self.max_id
    }
}

/// Id index with the storage chosen by an [`IdIndexStrategy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdIndex {
    Dense(DenseIdIndex),
    Hashed(HashedIdIndex),
}

impl IdIndex {
    /// Build an index over `ids`; an empty input gives an index where every
    /// lookup is [`NOT_FOUND`]
    pub fn build(ids: &[EntityId], strategy: IdIndexStrategy) -> Self {
        let sparsity = sparsity(ids);
        let use_hash = match strategy {
            IdIndexStrategy::Dense => false,
            IdIndexStrategy::Hashed => true,
            IdIndexStrategy::Auto { max_sparsity } => sparsity > max_sparsity,
        };

        if use_hash {
            log::debug!(
                "Building hashed id index over {} ids (sparsity {:.1})",
                ids.len(),
                sparsity
            );
            return IdIndex::Hashed(HashedIdIndex::build(ids));
        }

        let index = DenseIdIndex::build(ids);
        if index.capacity() > SPARSE_WARNING_SLOTS && sparsity > DEFAULT_MAX_SPARSITY {
            log::warn!(
                "Dense id index allocates {} slots for {} ids; consider the hashed strategy",
                index.capacity(),
                ids.len()
            );
        }
        IdIndex::Dense(index)
    }

    pub fn is_dense(&self) -> bool {
        matches!(self, IdIndex::Dense(_))
    }
}

impl IdLookup for IdIndex {
    fn lookup(&self, id: EntityId) -> usize {
        match self {
            IdIndex::Dense(index) => index.lookup(id),
            IdIndex::Hashed(index) => index.lookup(id),
        }
    }

    fn lookup_unchecked(&self, id: EntityId) -> usize {
        match self {
            IdIndex::Dense(index) => index.lookup_unchecked(id),
            IdIndex::Hashed(index) => index.lookup_unchecked(id),
        }
    }

    fn len(&self) -> usize {
        match self {
            IdIndex::Dense(index) => index.len(),
            IdIndex::Hashed(index) => index.len(),
        }
    }

    fn max_id(&self) -> Option<EntityId> {
        match self {
            IdIndex::Dense(index) => index.max_id(),
            IdIndex::Hashed(index) => index.max_id(),
        }
    }
}

/// Ratio of dense slots to ids
fn sparsity(ids: &[EntityId]) -> f64 {
    match ids.iter().max() {
        Some(&max) => (max as f64 + 1.0) / ids.len() as f64,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPARSE_IDS: [EntityId; 3] = [3, 500_000, 7];

    fn check_positions(index: &impl IdLookup) {
        assert_eq!(index.lookup(3), 0);
        assert_eq!(index.lookup(500_000), 1);
        assert_eq!(index.lookup(7), 2);
        assert_eq!(index.len(), 3);
        assert_eq!(index.max_id(), Some(500_000));
    }

    #[test]
    fn dense_index_resolves_input_positions() {
        let index = DenseIdIndex::build(&SPARSE_IDS);
        check_positions(&index);
        assert_eq!(index.capacity(), 500_001);
    }

    #[test]
    fn hashed_index_resolves_input_positions() {
        check_positions(&HashedIdIndex::build(&SPARSE_IDS));
    }

    #[test]
    fn ids_in_range_but_not_indexed_are_not_found() {
        let dense = DenseIdIndex::build(&SPARSE_IDS);
        let hashed = HashedIdIndex::build(&SPARSE_IDS);
        for id in [0, 4, 8, 499_999] {
            assert_eq!(dense.lookup(id), NOT_FOUND);
            assert_eq!(hashed.lookup(id), NOT_FOUND);
            assert_eq!(dense.position(id), None);
        }
    }

    #[test]
    fn ids_above_range_are_not_found() {
        let index = DenseIdIndex::build(&[1, 2, 5]);
        assert_eq!(index.lookup(6), NOT_FOUND);
        assert_eq!(index.lookup(EntityId::MAX), NOT_FOUND);
    }

    #[test]
    fn unchecked_lookup_matches_checked_in_range() {
        let index = DenseIdIndex::build(&[9, 2, 4]);
        for id in 0..=9 {
            assert_eq!(index.lookup_unchecked(id), index.lookup(id));
        }
    }

    #[test]
    #[should_panic]
    fn unchecked_lookup_panics_above_range() {
        let index = DenseIdIndex::build(&[1, 2]);
        index.lookup_unchecked(3);
    }

    #[test]
    fn empty_input_builds_an_empty_index() {
        for strategy in [
            IdIndexStrategy::Dense,
            IdIndexStrategy::Hashed,
            IdIndexStrategy::default(),
        ] {
            let index = IdIndex::build(&[], strategy);
            assert!(index.is_empty());
            assert_eq!(index.max_id(), None);
            assert_eq!(index.lookup(0), NOT_FOUND);
            assert_eq!(index.lookup(17), NOT_FOUND);
        }
    }

    #[test]
    fn auto_strategy_switches_on_sparsity() {
        let strategy = IdIndexStrategy::Auto { max_sparsity: 64.0 };
        assert!(IdIndex::build(&[1, 2, 3, 4], strategy).is_dense());
        assert!(!IdIndex::build(&SPARSE_IDS, strategy).is_dense());
        check_positions(&IdIndex::build(&SPARSE_IDS, strategy));
    }

    #[test]
    fn explicit_strategies_are_honored() {
        assert!(IdIndex::build(&SPARSE_IDS, IdIndexStrategy::Dense).is_dense());
        assert!(!IdIndex::build(&[0, 1], IdIndexStrategy::Hashed).is_dense());
    }
}
