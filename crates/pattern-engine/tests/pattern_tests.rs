//! Pattern scenarios against the deterministic kernel: batched-cut
//! accounting, cell counts and cutter placement.

use camber_model::Workbench;
use kernel_bridge::{KernelIntrospect, MockKernel};
use pattern_engine::{CutPattern, PatternOptions, PatternShape};
use std::cell::RefCell;
use std::rc::Rc;

fn shared_bench() -> (Rc<RefCell<MockKernel>>, Workbench) {
    let mock = Rc::new(RefCell::new(MockKernel::new()));
    let wb = Workbench::from_shared(mock.clone());
    (mock, wb)
}

#[test]
fn hexagon_pattern_cuts_once_with_the_full_grid() {
    let (mock, wb) = shared_bench();
    let plate = wb.cuboid(50.0, 50.0, 10.0);
    let before = plate.bounding_box().unwrap();

    let out = plate.faces(">z").cut_pattern(PatternOptions {
        shape: PatternShape::Hexagon,
        width: 5.0,
        wall_thickness: Some(0.6),
        stagger: true,
        depth: None,
        ..Default::default()
    });

    // Pitch 5.6 over a 46-unit usable square: 8 x 8 cells, all kept.
    assert_eq!(mock.borrow().batched_cut_count(), 1, "exactly one batched cut");
    assert_eq!(mock.borrow().last_batched_tools().len(), 64);

    assert!(out.has_geometry());
    assert_eq!(out.bounding_box().unwrap(), before, "bbox unchanged");
    assert!(wb.last_error().is_none());

    // Through-cut: cutters pierce both z extents.
    for tool in mock.borrow().last_batched_tools() {
        let bbox = mock.borrow().bounding_box(&tool).unwrap();
        assert!(bbox[2] < 0.0, "cutter bottom below the plate");
        assert!(bbox[5] > 10.0, "cutter top above the plate");
    }
}

#[test]
fn line_pattern_on_x_face_runs_along_z() {
    let (mock, wb) = shared_bench();
    let block = wb.cuboid(50.0, 20.0, 30.0);

    let out = block.faces(">x").cut_pattern(PatternOptions {
        shape: PatternShape::Line,
        width: 1.0,
        spacing: Some(2.0),
        depth: Some(0.4),
        angle: 90.0,
        ..Default::default()
    });
    assert!(out.has_geometry());
    assert_eq!(mock.borrow().batched_cut_count(), 1);

    let tools = mock.borrow().last_batched_tools();
    // Perpendicular extent is the 20-unit u (=y) span: usable 16, pitch 3
    // fits 5 lines.
    assert_eq!(tools.len(), 5);
    for tool in tools {
        let bbox = mock.borrow().bounding_box(&tool).unwrap();
        let y_span = bbox[4] - bbox[1];
        let z_span = bbox[5] - bbox[2];
        assert!(
            z_span > y_span,
            "grooves run along z (z span {} vs y span {})",
            z_span,
            y_span
        );
        // Cut enters the +X face by the requested depth.
        assert!((bbox[3] - 25.0 - 1.0).abs() < 1e-9, "pierces 1 beyond the face");
        assert!((bbox[0] - (25.0 - 0.4)).abs() < 1e-9);
    }
}

#[test]
fn bottom_face_pattern_cuts_upward() {
    let (mock, wb) = shared_bench();
    let plate = wb.cuboid(30.0, 30.0, 8.0);

    let out = plate.faces("<z").cut_pattern(PatternOptions {
        shape: PatternShape::Circle,
        width: 3.0,
        spacing: Some(5.0),
        depth: Some(2.0),
        ..Default::default()
    });
    assert!(out.has_geometry());

    for tool in mock.borrow().last_batched_tools() {
        let bbox = mock.borrow().bounding_box(&tool).unwrap();
        assert!((bbox[2] + 1.0).abs() < 1e-9, "starts 1 below the bottom face");
        assert!((bbox[5] - 2.0).abs() < 1e-9, "reaches the cut depth");
    }
}

#[test]
fn columns_and_rows_group_the_cells() {
    let (mock, wb) = shared_bench();
    let plate = wb.cuboid(50.0, 50.0, 5.0);

    let out = plate.faces(">z").cut_pattern(PatternOptions {
        shape: PatternShape::Square,
        width: 2.0,
        spacing: Some(1.0),
        columns: 2,
        rows: 2,
        column_gap: 4.0,
        ..Default::default()
    });
    assert!(out.has_geometry());

    // usable 46; sub-region (46-4)/2 = 21; pitch 3 -> 7 cells per axis per
    // region; 4 regions.
    assert_eq!(mock.borrow().last_batched_tools().len(), 4 * 49);
}

#[test]
fn unselected_pattern_defaults_to_the_top_face() {
    let (mock, wb) = shared_bench();
    let plate = wb.cuboid(20.0, 20.0, 4.0);

    let out = plate.cut_pattern(PatternOptions {
        shape: PatternShape::Circle,
        width: 2.0,
        spacing: Some(2.0),
        depth: Some(1.0),
        ..Default::default()
    });
    assert!(out.has_geometry());
    assert_eq!(mock.borrow().batched_cut_count(), 1);

    for tool in mock.borrow().last_batched_tools() {
        let bbox = mock.borrow().bounding_box(&tool).unwrap();
        assert!((bbox[2] - 3.0).abs() < 1e-9, "enters from z = 4 down 1");
    }
}

#[test]
fn names_survive_a_pattern_cut() {
    let (_, wb) = shared_bench();
    let plate = wb.cuboid(50.0, 50.0, 10.0);
    let out = plate.faces(">z").cut_pattern(PatternOptions {
        shape: PatternShape::Hexagon,
        width: 5.0,
        wall_thickness: Some(0.6),
        ..Default::default()
    });

    let top = out.face("top").unwrap();
    assert!((top.centroid[2] - 10.0).abs() < 1e-9);
    assert_eq!(out.named_faces().len(), 6);
}

#[test]
fn per_shape_rotation_spins_rect_cutters() {
    let (mock, wb) = shared_bench();
    let plate = wb.cuboid(40.0, 40.0, 5.0);

    let _ = plate.faces(">z").cut_pattern(PatternOptions {
        shape: PatternShape::Rect,
        width: 6.0,
        height: Some(2.0),
        spacing: Some(6.0),
        rotation: 90.0,
        depth: Some(1.0),
        ..Default::default()
    });

    for tool in mock.borrow().last_batched_tools() {
        let bbox = mock.borrow().bounding_box(&tool).unwrap();
        let x_span = bbox[3] - bbox[0];
        let y_span = bbox[4] - bbox[1];
        assert!(
            y_span > x_span,
            "rect rotated 90: long axis now y ({} vs {})",
            y_span,
            x_span
        );
    }
}
