//! Per-mesh lookup context.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use rayon::prelude::*;

use layup_model::{EntityId, LayupMesh};

use crate::config::IndexerConfig;
use crate::element_info::{ElementInfo, ElementInfoProvider};
use crate::error::{LayupError, Result};
use crate::id_index::{IdIndex, IdLookup};
use crate::layup_properties::LayupPropertiesProvider;
use crate::ply::AnalysisPlyInfoProvider;
use crate::select::{Selection, select_by_analysis_ply, select_indices};

/// Indices over one mesh, built once and shared by all lookups.
///
/// Analysis ply and lay-up property providers are built on first use. The
/// context only reads the mesh, so it can be shared across threads.
#[derive(Debug)]
pub struct LayupContext<'m> {
    mesh: &'m LayupMesh,
    config: IndexerConfig,
    elements: IdIndex,
    element_infos: ElementInfoProvider<'m>,
    plies: BTreeMap<&'m str, OnceLock<AnalysisPlyInfoProvider<'m>>>,
    layup_properties: OnceLock<LayupPropertiesProvider<'m>>,
}

impl<'m> LayupContext<'m> {
    pub fn new(mesh: &'m LayupMesh, config: IndexerConfig) -> Result<Self> {
        let elements = IdIndex::build(mesh.element_ids.ids(), config.id_index);
        let element_infos = ElementInfoProvider::new(mesh, &config)?;
        let plies = mesh
            .analysis_ply_names()
            .into_iter()
            .map(|name| (name, OnceLock::new()))
            .collect::<BTreeMap<_, _>>();

        log::debug!(
            "Lay-up context: {} elements, {} analysis plies",
            elements.len(),
            plies.len()
        );

        Ok(Self {
            mesh,
            config,
            elements,
            element_infos,
            plies,
            layup_properties: OnceLock::new(),
        })
    }

    pub fn mesh(&self) -> &'m LayupMesh {
        self.mesh
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Whether `element_id` is part of the mesh
    pub fn contains_element(&self, element_id: EntityId) -> bool {
        self.elements.position(element_id).is_some()
    }

    pub fn element_info(&self, element_id: EntityId) -> Result<Option<ElementInfo>> {
        self.element_infos.element_info(element_id)
    }

    /// Element infos of many elements, evaluated in parallel and returned in
    /// input order
    pub fn element_infos(&self, element_ids: &[EntityId]) -> Vec<Result<Option<ElementInfo>>> {
        element_ids
            .par_iter()
            .map(|&element_id| self.element_info(element_id))
            .collect()
    }

    /// Analysis ply names in engine order
    pub fn all_ply_names(&self) -> Vec<&'m str> {
        self.mesh.analysis_ply_names()
    }

    pub fn analysis_ply(&self, name: &str) -> Result<&AnalysisPlyInfoProvider<'m>> {
        let Some(cell) = self.plies.get(name) else {
            return Err(LayupError::PlyNotFound {
                name: name.to_string(),
                available: self.plies.keys().map(|name| name.to_string()).collect(),
            });
        };
        if let Some(ply) = cell.get() {
            return Ok(ply);
        }
        let ply = AnalysisPlyInfoProvider::with_strategy(self.mesh, name, self.config.id_index)?;
        Ok(cell.get_or_init(|| ply))
    }

    /// Layer of the analysis ply in the element, `None` if the element does
    /// not contain it
    pub fn ply_to_layer_index(&self, name: &str, element_id: EntityId) -> Result<Option<usize>> {
        Ok(self.analysis_ply(name)?.layer_index(element_id))
    }

    /// Offsets of `selection` in the element, `None` if the element has no
    /// [`ElementInfo`]
    pub fn select(&self, element_id: EntityId, selection: &Selection) -> Result<Option<Vec<usize>>> {
        match self.element_info(element_id)? {
            Some(info) => select_indices(&info, selection).map(Some),
            None => Ok(None),
        }
    }

    /// Offsets of the analysis ply's layer in the element
    pub fn select_ply(&self, name: &str, element_id: EntityId) -> Result<Option<Vec<usize>>> {
        let ply = self.analysis_ply(name)?;
        match self.element_info(element_id)? {
            Some(info) => select_by_analysis_ply(ply, &info).map(Some),
            None => Ok(None),
        }
    }

    pub fn layup_properties(&self) -> Result<&LayupPropertiesProvider<'m>> {
        if let Some(provider) = self.layup_properties.get() {
            return Ok(provider);
        }
        let provider = LayupPropertiesProvider::new(self.mesh, &self.config)?;
        Ok(self.layup_properties.get_or_init(|| provider))
    }
}
