//! End-to-end scenario regressions across the whole stack, run against the
//! deterministic kernel.

use camber_model::TextOptions;
use camber_types::{vec3, MetaValue, META_INFILL_DENSITY};
use kernel_bridge::KernelIntrospect;
use mesh_export::{shape_meshes, shape_to_stl, write_3mf, Assembly, WELD_TOLERANCE};
use pattern_engine::{CutPattern, PatternOptions, PatternShape};
use test_harness::{assert_bbox, ModelBench, RecordingWriter};

// ── Scenario: named faces survive a union ───────────────────────────────

#[test]
fn union_of_separated_boxes_keeps_resolvable_names() {
    let m = ModelBench::mock();
    let a = m.bench.cuboid(10.0, 10.0, 10.0);
    let b = m.bench.cuboid(10.0, 10.0, 10.0).translate(20.0, 0.0, 0.0);
    let c = a.union(&b);

    let top = c.face("top").unwrap();
    assert!((top.centroid[2] - 10.0).abs() < 1e-6);

    let front = c.faces("front").selected_faces().unwrap();
    assert_eq!(front.len(), 1);
    let normal = m.kernel.borrow().face_info(front[0]).unwrap().normal;
    assert!(vec3::dot(normal, [0.0, 1.0, 0.0]) > 0.99);

    // Every retained name corresponds to a live face with close normal and
    // nearby centroid.
    let geometry = c.geometry().unwrap();
    let diagonal = vec3::bbox_diagonal(m.kernel.borrow().bounding_box(&geometry).unwrap());
    for (name, face_ref) in c.named_faces() {
        let sel = c.faces(&name).selected_faces().unwrap();
        assert_eq!(sel.len(), 1, "{} must resolve", name);
        let live = m.kernel.borrow().face_info(sel[0]).unwrap();
        assert!(vec3::dot(live.normal, face_ref.normal) >= 0.9);
        assert!(vec3::distance(live.centroid, face_ref.centroid) <= 0.1 * diagonal);
    }
}

// ── Scenario: boss extruded on a named face ─────────────────────────────

#[test]
fn boss_on_front_face_extends_y_to_eight() {
    let m = ModelBench::mock();
    let shape = m.bench.cuboid(10.0, 10.0, 10.0).extrude_on("front", 4.0, 4.0, 3.0);
    assert_bbox(&shape, [-5.0, -5.0, 0.0, 5.0, 8.0, 10.0], 1e-9, "boss").unwrap();
    assert!(m.bench.last_error().is_none());
}

// ── Scenario: hexagon pattern, batched cut, clean meshing ───────────────

#[test]
fn hexagon_pattern_batches_and_meshes() {
    let m = ModelBench::mock();
    let plate = m.bench.cuboid(50.0, 50.0, 10.0);
    let before = plate.bounding_box().unwrap();

    let out = plate.faces(">z").cut_pattern(PatternOptions {
        shape: PatternShape::Hexagon,
        width: 5.0,
        wall_thickness: Some(0.6),
        stagger: true,
        depth: None,
        ..Default::default()
    });

    assert_eq!(out.bounding_box().unwrap(), before);
    assert_eq!(m.kernel.borrow().batched_cut_count(), 1);
    // Layout formula: floor(46 / 5.6) = 8 cells per axis.
    assert_eq!(m.kernel.borrow().last_batched_tools().len(), 64);

    let meshes = shape_meshes(&out).unwrap();
    assert!(!meshes[0].vertices.is_empty());
    assert!(meshes[0].indices.len() % 3 == 0);
}

// ── Scenario: grooved +X face ───────────────────────────────────────────

#[test]
fn groove_pattern_runs_along_z_on_the_x_face() {
    let m = ModelBench::mock();
    let out = m
        .bench
        .cuboid(50.0, 20.0, 30.0)
        .faces(">x")
        .cut_pattern(PatternOptions {
            shape: PatternShape::Line,
            width: 1.0,
            spacing: Some(2.0),
            depth: Some(0.4),
            angle: 90.0,
            ..Default::default()
        });
    assert!(out.has_geometry());

    for tool in m.kernel.borrow().last_batched_tools() {
        let bbox = m.kernel.borrow().bounding_box(&tool).unwrap();
        assert!(bbox[5] - bbox[2] > bbox[4] - bbox[1], "groove along z");
        assert!(bbox[3] <= 26.0 + 1e-9, "stops just past the +x face");
    }
}

// ── Scenario: 3MF with a modifier volume ────────────────────────────────

#[test]
fn threemf_export_with_modifier_and_infill() {
    let m = ModelBench::mock();
    let part = m
        .bench
        .cuboid(20.0, 20.0, 20.0)
        .color("#ff0000")
        .infill_density(5)
        .part_name("main")
        .with_modifier(m.bench.sphere(5.0).color("#ffffff"));

    let mut writer = RecordingWriter::default();
    let bytes = write_3mf(&[part], &mut writer).unwrap();
    assert!(!bytes.is_empty());
    assert_eq!(writer.calls, 1);

    let bundle = &writer.parts[0];
    assert_eq!(bundle.name, "main");
    assert_eq!(bundle.modifiers.len(), 1);
    assert_eq!(
        bundle.meta.get(META_INFILL_DENSITY),
        Some(&MetaValue::Int(5))
    );

    let mut cells = std::collections::HashSet::new();
    for v in bundle.mesh.vertices.chunks_exact(3) {
        let key = (
            (v[0] as f64 / WELD_TOLERANCE).round() as i64,
            (v[1] as f64 / WELD_TOLERANCE).round() as i64,
            (v[2] as f64 / WELD_TOLERANCE).round() as i64,
        );
        assert!(cells.insert(key), "welded mesh has duplicate vertices");
    }
}

// ── Scenario: failing op leaves the chain alive ─────────────────────────

#[test]
fn fillet_failure_recovers_and_chain_continues() {
    let m = ModelBench::mock();
    let shape = m.bench.cuboid(10.0, 10.0, 10.0);
    let after = shape.fillet(-1.0);

    let err = m.bench.last_error().unwrap();
    assert_eq!(err.operation, "fillet");
    assert!(err.message.contains("-1"));
    assert_eq!(
        after.geometry().unwrap().id(),
        shape.geometry().unwrap().id()
    );

    let top = after.faces(">z").selected_faces().unwrap();
    assert_eq!(top.len(), 1);

    m.bench.clear_last_error();
    assert!(m.bench.last_error().is_none());
}

// ── Scenario: immutability across a long chain ──────────────────────────

#[test]
fn receiver_state_is_identical_after_a_chain() {
    let m = ModelBench::mock();
    let s = m.bench.cuboid(10.0, 10.0, 10.0).color("#336699").name("seed");
    let geometry = s.geometry().unwrap().id();
    let names = s.named_faces();
    let metadata = s.metadata().clone();

    let _ = s
        .translate(5.0, 0.0, 0.0)
        .rotate(0.0, 0.0, 1.0, 30.0)
        .union(&m.bench.cuboid(3.0, 3.0, 3.0))
        .faces(">z")
        .cut_pattern(PatternOptions {
            shape: PatternShape::Circle,
            width: 2.0,
            ..Default::default()
        })
        .fillet(0.5);

    assert_eq!(s.geometry().unwrap().id(), geometry);
    assert_eq!(s.named_faces(), names);
    assert_eq!(s.metadata(), &metadata);
    assert_eq!(s.color_hex(), Some("#336699"));
    assert_eq!(s.shape_name(), Some("seed"));
}

// ── Scenario: text part into an assembly ────────────────────────────────

#[test]
fn text_label_joins_an_assembly_export() {
    let m = ModelBench::mock_with_font();
    let base = m.bench.cuboid(40.0, 20.0, 5.0).part_name("base");
    let label = m
        .bench
        .text("ok", 8.0, TextOptions::default())
        .translate(0.0, 0.0, 5.0)
        .part_name("label");
    assert!(label.has_geometry());

    let mut assembly = Assembly::new();
    assembly.add(base);
    assembly.add(label);

    let stl = assembly.to_stl().unwrap();
    let text = String::from_utf8(stl).unwrap();
    assert!(text.starts_with("solid assembly"));
    assert!(text.matches("facet normal").count() > 12);

    let (bundles, transform) = assembly.to_bundles().unwrap();
    assert_eq!(bundles.len(), 2);
    assert_eq!(bundles[0].name, "base");
    assert_eq!(bundles[1].name, "label");
    // Plate-centered: the combined footprint is centered at the origin.
    assert!(transform.offset[2].abs() < 1e-6, "base already sits at z=0");
}

// ── Scenario: single-part STL round trip ────────────────────────────────

#[test]
fn stl_export_counts_match_tessellation() {
    let m = ModelBench::mock();
    let shape = m.bench.cuboid(10.0, 10.0, 10.0).part_name("plate");
    let meshes = shape_meshes(&shape).unwrap();
    let triangle_count: usize = meshes.iter().map(|mesh| mesh.indices.len() / 3).sum();

    let stl = String::from_utf8(shape_to_stl(&shape).unwrap()).unwrap();
    assert_eq!(stl.matches("facet normal").count(), triangle_count);
    assert_eq!(stl.matches("endfacet").count(), triangle_count);
}
