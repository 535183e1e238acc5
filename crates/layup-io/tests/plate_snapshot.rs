//! Lay-up lookups over the plate snapshot fixture.

use std::path::PathBuf;

use layup_index::{
    IndexerConfig, LayupContext, Selection, Spot, material_id_by_analysis_ply,
    material_id_to_layer_indices, select_indices,
};
use layup_io::{LayupSnapshot, MetadataSource, SnapshotFile, load_snapshot, save_snapshot};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/plate.json")
}

#[test]
fn fixture_loads_and_validates() {
    let snapshot = load_snapshot(fixture()).expect("fixture is valid");
    assert_eq!(snapshot.schema_version, 1);
    assert_eq!(snapshot.mesh.element_ids.ids(), &[7, 3, 12, 20, 21]);

    let summary = snapshot.mesh.summary();
    assert_eq!(summary.layered_elements, 2);
    assert_eq!(summary.analysis_plies.len(), 4);
}

#[test]
fn layered_shell_offsets_from_snapshot() {
    let mesh = SnapshotFile::new(fixture()).fetch().expect("fixture is valid");
    let ctx = LayupContext::new(&mesh, IndexerConfig::default()).expect("context");

    let info = ctx
        .element_info(7)
        .expect("valid metadata")
        .expect("layered shell");
    assert_eq!(info.material_ids, vec![10, 10, 20, 10]);
    assert_eq!(material_id_to_layer_indices(&info, 10), vec![0, 1, 3]);
    assert!(material_id_to_layer_indices(&info, 99).is_empty());

    let layer_two = select_indices(&info, &Selection::all().with_layers(vec![2]))
        .expect("valid selection");
    assert_eq!(layer_two, (24..36).collect::<Vec<_>>());

    let top_of_node_zero = select_indices(
        &info,
        &Selection::all()
            .with_layers(vec![0])
            .with_nodes(vec![0])
            .with_spots(vec![Spot::Top]),
    )
    .expect("valid selection");
    assert_eq!(top_of_node_zero, vec![1]);
}

#[test]
fn ply_material_map_from_snapshot() {
    let mesh = load_snapshot(fixture()).expect("fixture is valid").mesh;
    let ctx = LayupContext::new(&mesh, IndexerConfig::default()).expect("context");
    let materials = material_id_by_analysis_ply(&ctx).expect("valid lay-up");
    assert_eq!(materials.get("P1L1__ply.3"), Some(&20));
    assert_eq!(materials.len(), 4);

    let properties = ctx.layup_properties().expect("lay-up fields present");
    assert_eq!(
        properties.analysis_plies(20).expect("known plies"),
        Some(vec!["P1L1__ply.1", "P1L1__ply.2"])
    );
}

#[test]
fn resaved_snapshot_is_identical() {
    let snapshot = load_snapshot(fixture()).expect("fixture is valid");
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("copy.json");

    save_snapshot(&path, &snapshot).expect("save should succeed");
    let reloaded: LayupSnapshot = load_snapshot(&path).expect("load should succeed");
    assert_eq!(reloaded, snapshot);
}
