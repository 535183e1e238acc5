//! Indexer configuration.

use serde::{Deserialize, Serialize};

use crate::indexer::BoundsCheck;

/// Default ratio of id-space size to id count above which `Auto` switches to
/// a hashed index
pub const DEFAULT_MAX_SPARSITY: f64 = 64.0;

/// How id → position lookups are stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum IdIndexStrategy {
    /// Dense array sized `max_id + 1`
    Dense,
    /// Hash map keyed by id
    Hashed,
    /// Dense unless `(max_id + 1) / len` exceeds `max_sparsity`
    Auto { max_sparsity: f64 },
}

impl Default for IdIndexStrategy {
    fn default() -> Self {
        IdIndexStrategy::Auto {
            max_sparsity: DEFAULT_MAX_SPARSITY,
        }
    }
}

/// Configuration shared by all indexers of a [`crate::LayupContext`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Guard lookups against ids above the indexed range.
    ///
    /// Disabling the checks is faster but an id outside the range panics.
    /// The layer-index field stays checked regardless, since it only covers
    /// layered elements.
    pub bounds_checks: bool,
    /// Id index storage
    pub id_index: IdIndexStrategy,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            bounds_checks: true,
            id_index: IdIndexStrategy::default(),
        }
    }
}

impl IndexerConfig {
    /// Configuration without bounds checks
    pub fn unchecked() -> Self {
        Self {
            bounds_checks: false,
            ..Default::default()
        }
    }

    pub fn bounds_check(&self) -> BoundsCheck {
        if self.bounds_checks {
            BoundsCheck::Checked
        } else {
            BoundsCheck::Unchecked
        }
    }
}
