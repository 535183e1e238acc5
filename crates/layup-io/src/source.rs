//! Sources of bulk mesh metadata.

use std::path::{Path, PathBuf};

use layup_model::LayupMesh;

use crate::error::Result;
use crate::snapshot::load_snapshot;

/// Delivers the mesh metadata in one bulk fetch
pub trait MetadataSource {
    fn fetch(&self) -> Result<LayupMesh>;

    /// Short description for log messages
    fn describe(&self) -> String;
}

/// Metadata stored as a snapshot file
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MetadataSource for SnapshotFile {
    fn fetch(&self) -> Result<LayupMesh> {
        Ok(load_snapshot(&self.path)?.mesh)
    }

    fn describe(&self) -> String {
        format!("snapshot {}", self.path.display())
    }
}

/// Metadata that is already in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    mesh: LayupMesh,
}

impl InMemorySource {
    pub fn new(mesh: LayupMesh) -> Self {
        Self { mesh }
    }
}

impl MetadataSource for InMemorySource {
    fn fetch(&self) -> Result<LayupMesh> {
        self.mesh.validate()?;
        Ok(self.mesh.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory mesh with {} elements", self.mesh.element_ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{LayupSnapshot, save_snapshot};
    use layup_model::{EntityScoping, PropertyField, field_names};

    fn mesh() -> LayupMesh {
        let mut mesh = LayupMesh::new(EntityScoping::new(vec![1, 2, 3]).expect("ids"));
        mesh.add_property_field(
            field_names::SOLVER_ELEMENT_TYPE,
            PropertyField::scalar(vec![1, 2, 3], vec![181, 181, 188]).expect("field"),
        );
        mesh
    }

    #[test]
    fn in_memory_source_returns_its_mesh() {
        let source = InMemorySource::new(mesh());
        assert_eq!(source.fetch().expect("valid mesh"), mesh());
        assert!(source.describe().contains("3 elements"));
    }

    #[test]
    fn snapshot_file_source_loads_mesh() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("mesh.json");
        save_snapshot(&path, &LayupSnapshot::new(mesh())).expect("save should succeed");

        let source = SnapshotFile::new(&path);
        assert_eq!(source.path(), path.as_path());
        assert_eq!(source.fetch().expect("valid snapshot"), mesh());
    }

    #[test]
    fn sources_are_usable_as_trait_objects() {
        let sources: Vec<Box<dyn MetadataSource>> = vec![
            Box::new(InMemorySource::new(mesh())),
            Box::new(InMemorySource::default()),
        ];
        let counts: Vec<usize> = sources
            .iter()
            .map(|source| source.fetch().expect("valid mesh").element_ids.len())
            .collect();
        assert_eq!(counts, vec![3, 0]);
    }
}
