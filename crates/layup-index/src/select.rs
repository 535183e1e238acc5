//! Offsets into the per-element result block.
//!
//! The result block of an element is a `[layer][node][spot]` array
//! flattened with the layer outermost and the spot innermost:
//!
//! ```text
//! offset = ((layer * nodes_per_spot_plane) + node) * effective_spots + spot.buffer_position()
//! ```
//!
//! Non-layered elements have no spot axis and the node is innermost.
//! Layered elements without spots have no indexable results.

use serde::{Deserialize, Serialize};

use crate::element_info::ElementInfo;
use crate::error::{LayupError, Result};
use crate::ply::AnalysisPlyInfoProvider;
use crate::spot::Spot;

/// Filter over the layer, node and spot axes.
///
/// `None` selects the whole axis; an empty list selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub layers: Option<Vec<usize>>,
    pub nodes: Option<Vec<usize>>,
    pub spots: Option<Vec<Spot>>,
}

impl Selection {
    /// Everything
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_layers(mut self, layers: Vec<usize>) -> Self {
        self.layers = Some(layers);
        self
    }

    pub fn with_nodes(mut self, nodes: Vec<usize>) -> Self {
        self.nodes = Some(nodes);
        self
    }

    pub fn with_spots(mut self, spots: Vec<Spot>) -> Self {
        self.spots = Some(spots);
        self
    }
}

/// Sorted, deduplicated offsets of the selection within the element's
/// result block
pub fn select_indices(info: &ElementInfo, selection: &Selection) -> Result<Vec<usize>> {
    // The solver writes layered results per spot; without spots there is
    // no per-layer data to index
    if info.is_layered && info.n_spots == 0 {
        return Err(LayupError::InvalidSelection(format!(
            "element {} is layered but has no spots, its results cannot be indexed",
            info.id
        )));
    }
    let n_nodes = info.nodes_per_spot_plane();

    let layers = axis(selection.layers.as_deref(), info.n_layers, "layer", info)?;
    let nodes = axis(selection.nodes.as_deref(), n_nodes, "node", info)?;
    let spots = spot_positions(selection.spots.as_deref(), info)?;

    let n_spots = info.effective_spots();
    let mut offsets = Vec::with_capacity(layers.len() * nodes.len() * spots.len());
    for &layer in &layers {
        for &node in &nodes {
            let base = (layer * n_nodes + node) * n_spots;
            offsets.extend(spots.iter().map(|&spot| base + spot));
        }
    }
    Ok(offsets)
}

/// Indices of all layers made of `material_id`, empty if none is
pub fn material_id_to_layer_indices(info: &ElementInfo, material_id: i64) -> Vec<usize> {
    info.material_ids
        .iter()
        .enumerate()
        .filter(|&(_, &id)| id == material_id)
        .map(|(layer, _)| layer)
        .collect()
}

/// Offsets of all layers whose material is one of `material_ids`
pub fn select_by_material_ids(info: &ElementInfo, material_ids: &[i64]) -> Result<Vec<usize>> {
    let layers: Vec<usize> = info
        .material_ids
        .iter()
        .enumerate()
        .filter(|&(_, id)| material_ids.contains(id))
        .map(|(layer, _)| layer)
        .collect();
    select_indices(info, &Selection::all().with_layers(layers))
}

/// Offsets of the layer the analysis ply occupies in the element
pub fn select_by_analysis_ply(
    ply: &AnalysisPlyInfoProvider<'_>,
    info: &ElementInfo,
) -> Result<Vec<usize>> {
    let layer = ply
        .layer_index(info.id)
        .ok_or_else(|| LayupError::PlyNotInElement {
            ply: ply.name().to_string(),
            element_id: info.id,
        })?;
    select_indices(info, &Selection::all().with_layers(vec![layer]))
}

fn axis(
    requested: Option<&[usize]>,
    len: usize,
    label: &str,
    info: &ElementInfo,
) -> Result<Vec<usize>> {
    let Some(requested) = requested else {
        return Ok((0..len).collect());
    };
    if let Some(&bad) = requested.iter().find(|&&index| index >= len) {
        return Err(LayupError::InvalidSelection(format!(
            "{label} index {bad} is out of range for element {} with {len} {label}s",
            info.id
        )));
    }
    let mut indices = requested.to_vec();
    indices.sort_unstable();
    indices.dedup();
    Ok(indices)
}

fn spot_positions(requested: Option<&[Spot]>, info: &ElementInfo) -> Result<Vec<usize>> {
    let available = info.spots();
    let Some(requested) = requested else {
        return Ok(if available.is_empty() {
            vec![0]
        } else {
            available.iter().map(|spot| spot.buffer_position()).collect()
        });
    };
    if !requested.is_empty() && available.is_empty() {
        return Err(LayupError::InvalidSelection(format!(
            "element {} has no spots",
            info.id
        )));
    }
    if let Some(bad) = requested.iter().find(|&&spot| !available.contains(&spot)) {
        return Err(LayupError::InvalidSelection(format!(
            "spot {bad} is not available in element {} with {} spots",
            info.id, info.n_spots
        )));
    }
    let mut positions: Vec<usize> = requested.iter().map(|spot| spot.buffer_position()).collect();
    positions.sort_unstable();
    positions.dedup();
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info7() -> ElementInfo {
        ElementInfo {
            id: 7,
            n_layers: 4,
            n_corner_nodes: 4,
            n_spots: 3,
            is_layered: true,
            is_shell: true,
            element_type: 181,
            material_ids: vec![10, 10, 20, 10],
        }
    }

    fn non_layered() -> ElementInfo {
        ElementInfo {
            id: 3,
            n_layers: 1,
            n_corner_nodes: 4,
            n_spots: 0,
            is_layered: false,
            is_shell: true,
            element_type: 181,
            material_ids: Vec::new(),
        }
    }

    #[test]
    fn single_layer_block() {
        let offsets = select_indices(&info7(), &Selection::all().with_layers(vec![2]))
            .expect("valid selection");
        assert_eq!(offsets, (24..36).collect::<Vec<_>>());
    }

    #[test]
    fn full_selection_covers_block_without_gaps() {
        let info = info7();
        let offsets = select_indices(&info, &Selection::all()).expect("valid selection");
        assert_eq!(offsets.len(), 4 * 4 * 3);
        assert_eq!(offsets, (0..info.block_len()).collect::<Vec<_>>());
    }

    #[test]
    fn layered_solid_uses_nodes_per_spot_plane() {
        let info = ElementInfo {
            id: 20,
            n_layers: 2,
            n_corner_nodes: 8,
            n_spots: 2,
            is_layered: true,
            is_shell: false,
            element_type: 185,
            material_ids: vec![10, 20],
        };
        let offsets = select_indices(&info, &Selection::all()).expect("valid selection");
        assert_eq!(offsets, (0..16).collect::<Vec<_>>());
        let err = select_indices(&info, &Selection::all().with_nodes(vec![4])).unwrap_err();
        assert!(matches!(err, LayupError::InvalidSelection(_)));
    }

    #[test]
    fn spots_follow_buffer_order() {
        let selection = Selection::all()
            .with_layers(vec![1])
            .with_nodes(vec![2])
            .with_spots(vec![Spot::Middle, Spot::Bottom]);
        let offsets = select_indices(&info7(), &selection).expect("valid selection");
        // layer 1, node 2 starts at (1 * 4 + 2) * 3 = 18
        assert_eq!(offsets, vec![18, 20]);
    }

    #[test]
    fn unsorted_duplicate_axes_give_increasing_offsets() {
        let selection = Selection::all()
            .with_layers(vec![3, 0, 3])
            .with_nodes(vec![1, 0]);
        let offsets = select_indices(&info7(), &selection).expect("valid selection");
        assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(offsets.len(), 2 * 2 * 3);
    }

    #[test]
    fn selection_is_idempotent() {
        let selection = Selection::all().with_layers(vec![0, 2]).with_spots(vec![Spot::Top]);
        let first = select_indices(&info7(), &selection).expect("valid selection");
        let second = select_indices(&info7(), &selection).expect("valid selection");
        assert_eq!(first, second);
    }

    #[test]
    fn empty_axis_selects_nothing() {
        let info = info7();
        for selection in [
            Selection::all().with_layers(Vec::<usize>::new()),
            Selection::all().with_nodes(Vec::<usize>::new()),
            Selection::all().with_spots(Vec::<Spot>::new()),
        ] {
            assert!(select_indices(&info, &selection).expect("valid selection").is_empty());
        }
    }

    #[test]
    fn out_of_range_axes_are_rejected() {
        let info = info7();
        for selection in [
            Selection::all().with_layers(vec![4]),
            Selection::all().with_nodes(vec![0, 4]),
        ] {
            let err = select_indices(&info, &selection).unwrap_err();
            assert!(matches!(err, LayupError::InvalidSelection(_)));
        }

        let two_spots = ElementInfo {
            n_spots: 2,
            ..info7()
        };
        let err = select_indices(&two_spots, &Selection::all().with_spots(vec![Spot::Middle]))
            .unwrap_err();
        assert!(matches!(err, LayupError::InvalidSelection(_)));
    }

    #[test]
    fn non_layered_element_has_no_spot_axis() {
        let info = non_layered();
        let offsets = select_indices(&info, &Selection::all()).expect("valid selection");
        assert_eq!(offsets, vec![0, 1, 2, 3]);

        for spot in Spot::ALL {
            let err = select_indices(&info, &Selection::all().with_spots(vec![spot])).unwrap_err();
            assert!(matches!(err, LayupError::InvalidSelection(_)));
        }
    }

    #[test]
    fn layered_element_without_spots_is_rejected() {
        let info = ElementInfo {
            n_spots: 0,
            ..info7()
        };
        for selection in [Selection::all(), Selection::all().with_layers(vec![1])] {
            assert!(matches!(
                select_indices(&info, &selection),
                Err(LayupError::InvalidSelection(_))
            ));
        }
        assert!(matches!(
            select_by_material_ids(&info, &[20]),
            Err(LayupError::InvalidSelection(_))
        ));
        assert_eq!(material_id_to_layer_indices(&info, 20), vec![2]);
    }

    #[test]
    fn material_lookup() {
        let info = info7();
        assert_eq!(material_id_to_layer_indices(&info, 10), vec![0, 1, 3]);
        assert_eq!(material_id_to_layer_indices(&info, 20), vec![2]);
        assert!(material_id_to_layer_indices(&info, 99).is_empty());
        assert!(material_id_to_layer_indices(&non_layered(), 10).is_empty());

        for (layer, &material) in info.material_ids.iter().enumerate() {
            assert!(material_id_to_layer_indices(&info, material).contains(&layer));
        }
    }

    #[test]
    fn select_by_material_ids_merges_layers() {
        let info = info7();
        let offsets = select_by_material_ids(&info, &[20]).expect("valid selection");
        assert_eq!(offsets, (24..36).collect::<Vec<_>>());

        let offsets = select_by_material_ids(&info, &[10, 20]).expect("valid selection");
        assert_eq!(offsets.len(), info.block_len());

        assert!(select_by_material_ids(&info, &[99]).expect("valid").is_empty());
        assert!(select_by_material_ids(&info, &[]).expect("valid").is_empty());
    }
}
