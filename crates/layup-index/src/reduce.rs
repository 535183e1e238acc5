//! Ply-wise reduction of spot values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::element_info::ElementInfo;
use crate::error::{LayupError, Result};
use crate::select::{Selection, select_indices};
use crate::spot::Spot;

/// How the spot values of a layer reduce to one value per node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReductionStrategy {
    Min,
    Max,
    #[default]
    Avg,
    Bot,
    Mid,
    Top,
}

impl ReductionStrategy {
    /// The single spot this strategy picks, if any
    pub fn spot(self) -> Option<Spot> {
        match self {
            ReductionStrategy::Bot => Some(Spot::Bottom),
            ReductionStrategy::Mid => Some(Spot::Middle),
            ReductionStrategy::Top => Some(Spot::Top),
            ReductionStrategy::Min | ReductionStrategy::Max | ReductionStrategy::Avg => None,
        }
    }

    /// `values` holds the selected spots of one node and is never empty
    fn combine(self, values: &[f64]) -> f64 {
        match self {
            ReductionStrategy::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            ReductionStrategy::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            ReductionStrategy::Avg => values.iter().sum::<f64>() / values.len() as f64,
            // only the picked spot is selected
            ReductionStrategy::Bot | ReductionStrategy::Mid | ReductionStrategy::Top => values[0],
        }
    }
}

impl fmt::Display for ReductionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReductionStrategy::Min => "MIN",
            ReductionStrategy::Max => "MAX",
            ReductionStrategy::Avg => "AVG",
            ReductionStrategy::Bot => "BOT",
            ReductionStrategy::Mid => "MID",
            ReductionStrategy::Top => "TOP",
        };
        f.write_str(name)
    }
}

impl FromStr for ReductionStrategy {
    type Err = LayupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MIN" => Ok(ReductionStrategy::Min),
            "MAX" => Ok(ReductionStrategy::Max),
            "AVG" => Ok(ReductionStrategy::Avg),
            "BOT" => Ok(ReductionStrategy::Bot),
            "MID" => Ok(ReductionStrategy::Mid),
            "TOP" => Ok(ReductionStrategy::Top),
            other => Err(LayupError::InvalidSelection(format!(
                "unknown reduction strategy '{other}'"
            ))),
        }
    }
}

/// One value per node of `layer`, reduced over the layer's spots.
///
/// `values` is the element's result block for one component.
pub fn reduce_layer(
    info: &ElementInfo,
    values: &[f64],
    layer: usize,
    strategy: ReductionStrategy,
) -> Result<Vec<f64>> {
    if values.len() != info.block_len() {
        return Err(LayupError::InvalidSelection(format!(
            "element {} expects {} values per component, got {}",
            info.id,
            info.block_len(),
            values.len()
        )));
    }

    let mut selection = Selection::all().with_layers(vec![layer]);
    if let Some(spot) = strategy.spot() {
        selection = selection.with_spots(vec![spot]);
    }
    let offsets = select_indices(info, &selection)?;

    // offsets are node-major, so each node owns a contiguous run
    let spots_per_node = offsets.len() / info.nodes_per_spot_plane().max(1);
    if spots_per_node == 0 {
        return Ok(Vec::new());
    }
    Ok(offsets
        .chunks(spots_per_node)
        .map(|node_offsets| {
            let node_values: Vec<f64> = node_offsets.iter().map(|&offset| values[offset]).collect();
            strategy.combine(&node_values)
        })
        .collect())
}
