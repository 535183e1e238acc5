//! Small lay-up mesh shared by the unit tests.

use layup_model::{
    EntityId, EntityScoping, LayupMesh, PropertyField, RaggedArray, field_names,
};

/// Plate with a layered shell (7), a non-layered shell (3), a beam (12),
/// a layered solid (20) and a homogeneous solid (21).
///
/// Element 7 has four layers with materials `[10, 10, 20, 10]`, element 20
/// two layers with `[10, 20]`. Analysis plies are listed out of name order;
/// `P1L1__ply.suppressed` only covers element 99, which is not in the mesh.
pub fn plate() -> LayupMesh {
    let ids = vec![7, 3, 12, 20, 21];
    let mut mesh = LayupMesh::new(EntityScoping::new(ids.clone()).expect("ids"));

    let scalar = |values: Vec<i64>| PropertyField::scalar(ids.clone(), values).expect("field");
    mesh.add_property_field(field_names::SOLVER_ELEMENT_TYPE, scalar(vec![181, 181, 188, 185, 185]));
    mesh.add_property_field(field_names::ELEMENT_SHAPE, scalar(vec![17, 17, 18, 11, 11]));
    mesh.add_property_field(field_names::KEYOPT_8, scalar(vec![2, 2, 0, 1, 0]));
    mesh.add_property_field(field_names::KEYOPT_3, scalar(vec![0, 0, 0, 1, 0]));

    let layered = vec![7, 20];
    let ragged = |slices: Vec<Vec<i64>>| {
        PropertyField::ragged(layered.clone(), RaggedArray::from_slices(slices)).expect("field")
    };
    mesh.add_property_field(
        field_names::LAYER_INDICES,
        ragged(vec![vec![4, 0, 1, 2, 3], vec![2, 0, 1]]),
    );
    mesh.add_property_field(
        field_names::LAYERED_MATERIAL_IDS,
        ragged(vec![vec![10, 10, 20, 10], vec![10, 20]]),
    );
    mesh.add_property_field(
        field_names::LAYER_TO_ANALYSIS_PLY,
        ragged(vec![vec![0, 1, 2, 3], vec![0, 1]]),
    );

    let ply = |ids: Vec<EntityId>, layers: Vec<i64>| PropertyField::scalar(ids, layers).expect("field");
    mesh.add_analysis_ply("P1L1__ply.2", ply(vec![7, 20], vec![1, 1]));
    mesh.add_analysis_ply("P1L1__ply.1", ply(vec![20, 7], vec![0, 0]));
    mesh.add_analysis_ply("P1L1__ply.3", ply(vec![7], vec![2]));
    mesh.add_analysis_ply("P1L1__ply.4", ply(vec![7], vec![3]));
    mesh.add_analysis_ply("P1L1__ply.suppressed", ply(vec![99], vec![0]));

    let float_ragged = |slices: Vec<Vec<f64>>| {
        PropertyField::ragged(layered.clone(), RaggedArray::from_slices(slices)).expect("field")
    };
    mesh.add_layup_field(
        field_names::ANGLE,
        float_ragged(vec![vec![0.0, 45.0, -45.0, 90.0], vec![0.0, 90.0]]),
    );
    mesh.add_layup_field(
        field_names::THICKNESS,
        float_ragged(vec![vec![0.1, 0.2, 0.2, 0.1], vec![0.5, 0.5]]),
    );
    mesh.add_layup_field(
        field_names::SHEAR_ANGLE,
        float_ragged(vec![vec![0.0, 0.0, 5.0, 0.0], vec![0.0, 0.0]]),
    );
    mesh.add_layup_field(
        field_names::LAMINATE_OFFSET,
        PropertyField::scalar(layered.clone(), vec![0.0, -0.25]).expect("field"),
    );

    mesh
}

/// Overwrite the value of `id` in a one-value-per-element property field
pub fn set_scalar(mesh: &mut LayupMesh, name: &str, id: EntityId, value: i64) {
    let field = mesh.property_field(name).expect("field exists");
    let ids = field.scoping().ids().to_vec();
    let values = ids
        .iter()
        .enumerate()
        .map(|(position, &entity)| {
            if entity == id {
                value
            } else {
                field.entity_data(position).expect("entity data")[0]
            }
        })
        .collect();
    mesh.add_property_field(name, PropertyField::scalar(ids, values).expect("field"));
}
