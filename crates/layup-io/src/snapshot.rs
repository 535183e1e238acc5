use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use layup_model::LayupMesh;

use crate::error::{IoError, Result};

/// Current snapshot schema
pub const SCHEMA_VERSION: u32 = 1;

/// Bulk-fetched mesh metadata as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayupSnapshot {
    pub schema_version: u32,
    pub mesh: LayupMesh,
}

impl LayupSnapshot {
    pub fn new(mesh: LayupMesh) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            mesh,
        }
    }

    /// Check the schema version and every field of the mesh
    pub fn validate(&self) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(IoError::UnsupportedSchema {
                found: self.schema_version,
                supported: SCHEMA_VERSION,
            });
        }
        self.mesh.validate()?;
        Ok(())
    }
}

pub fn save_snapshot(path: impl AsRef<Path>, snapshot: &LayupSnapshot) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let bytes = serde_json::to_vec_pretty(snapshot)?;
    fs::write(path, bytes)?;
    log::debug!("Wrote snapshot {}", path.display());
    Ok(())
}

pub fn load_snapshot(path: impl AsRef<Path>) -> Result<LayupSnapshot> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let snapshot: LayupSnapshot = serde_json::from_slice(&bytes)?;
    snapshot.validate()?;
    log::debug!(
        "Loaded snapshot {} with {} elements",
        path.display(),
        snapshot.mesh.element_ids.len()
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use layup_model::{EntityScoping, PropertyField, RaggedArray, field_names};
    use std::io;

    fn small_mesh() -> LayupMesh {
        let mut mesh = LayupMesh::new(EntityScoping::new(vec![4, 9]).expect("ids"));
        mesh.add_property_field(
            field_names::LAYER_INDICES,
            PropertyField::ragged(vec![4], RaggedArray::from_slices(vec![vec![2_i64, 0, 1]]))
                .expect("field"),
        );
        mesh.add_layup_field(
            field_names::THICKNESS,
            PropertyField::ragged(vec![4], RaggedArray::from_slices(vec![vec![0.25, 0.5]]))
                .expect("field"),
        );
        mesh
    }

    #[test]
    fn snapshot_roundtrip_preserves_mesh() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("snapshot.json");
        let snapshot = LayupSnapshot::new(small_mesh());

        save_snapshot(&path, &snapshot).expect("save should succeed");
        let loaded = load_snapshot(&path).expect("load should succeed");
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn load_snapshot_fails_for_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_snapshot(dir.path().join("missing.json")).expect_err("missing file should fail");
        match err {
            IoError::Io(err) => assert_eq!(err.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_unknown_schema_version() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("future.json");
        let snapshot = LayupSnapshot {
            schema_version: 7,
            mesh: small_mesh(),
        };
        save_snapshot(&path, &snapshot).expect("save should succeed");

        let err = load_snapshot(&path).expect_err("schema 7 is unsupported");
        assert!(matches!(
            err,
            IoError::UnsupportedSchema {
                found: 7,
                supported: 1
            }
        ));
    }

    #[test]
    fn rejects_inconsistent_fields() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.json");
        let json = r#"{
            "schema_version": 1,
            "mesh": {
                "element_ids": [1, 2],
                "property_fields": [{
                    "name": "element_layer_indices",
                    "field": {"scoping": [1], "data": {"ragged": {"offsets": [0, 5], "values": [1, 0]}}}
                }]
            }
        }"#;
        fs::write(&path, json).expect("write fixture");

        let err = load_snapshot(&path).expect_err("offsets exceed values");
        assert!(matches!(err, IoError::Model(_)));
    }
}
