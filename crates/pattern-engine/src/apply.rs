//! Pattern application: frame the face, lay out cells, place cutters and
//! subtract them in one batched cut.

use camber_model::Shape;
use camber_types::META_MIN_CUT_Z;
use kernel_bridge::{Kernel, KernelBundle, KernelError, SolidHandle};

use crate::cutter;
use crate::frame::{self, FaceFrame};
use crate::layout;
use crate::options::{PatternOptions, PatternShape};

/// Fluent pattern cutting for shapes.
pub trait CutPattern {
    /// Cut a parametric grid of shapes into the selected face (or the top
    /// face when nothing is selected). One batched boolean removes all
    /// cutters at once.
    fn cut_pattern(&self, options: PatternOptions) -> Shape;
}

impl CutPattern for Shape {
    fn cut_pattern(&self, options: PatternOptions) -> Shape {
        let Some(geometry) = self.geometry() else {
            return self.clone();
        };

        let width = options.width;
        let height = options.height_or_width();
        if !width.is_finite() || width <= 0.0 {
            self.errors().record(
                "cutPattern",
                format!("width must be positive, got {}", width),
                None,
            );
            return self.clone();
        }
        if !height.is_finite() || height <= 0.0 {
            self.errors().record(
                "cutPattern",
                format!("height must be positive, got {}", height),
                None,
            );
            return self.clone();
        }

        let kernel = self.kernel();

        // Face frame: selected face if present and axis-aligned, else the
        // top face.
        let face_frame = {
            let kb = kernel.borrow();
            let selected = self
                .selected_faces()
                .and_then(|faces| faces.first().copied());
            match selected {
                Some(face) => match frame::face_frame(kb.as_introspect(), face) {
                    Some(f) => Some(f),
                    None => {
                        self.errors().record(
                            "cutPattern",
                            "selected face is not axis-aligned; using the top face",
                            None,
                        );
                        frame::top_face_frame(kb.as_introspect(), &geometry)
                    }
                },
                None => frame::top_face_frame(kb.as_introspect(), &geometry),
            }
        };
        let Some(face) = face_frame else {
            self.errors()
                .record("cutPattern", "shape has no face to pattern", None);
            return self.clone();
        };

        // Depth: explicit, else larger than any bbox dimension to guarantee
        // a through-cut. The legacy minCutZ floor clamps top-face patterns.
        let mut depth = match options.depth {
            Some(d) if d.is_finite() && d > 0.0 => d,
            _ => {
                let bbox = self.bounding_box().unwrap_or([0.0; 6]);
                let dims = [bbox[3] - bbox[0], bbox[4] - bbox[1], bbox[5] - bbox[2]];
                dims.iter().cloned().fold(0.0, f64::max) + 2.0
            }
        };
        if face.axis == 2 && face.sign > 0.0 {
            if let Some(floor) = self.metadata_number(META_MIN_CUT_Z) {
                let max_depth = face.plane - floor;
                if max_depth > 0.0 && max_depth < depth {
                    depth = max_depth;
                }
            }
        }

        let angle = options.effective_angle().to_radians();

        // Layout in face-local coordinates.
        let (centers, line_length) = if options.shape == PatternShape::Line {
            let line = layout::line_centers(
                face.u_size,
                face.v_size,
                options.border_u(),
                options.border_v(),
                width,
                options.gap_u(),
                angle,
                options.length,
            );
            (line.centers, line.length)
        } else {
            let grid = layout::grid_centers(&layout::GridParams {
                u_size: face.u_size,
                v_size: face.v_size,
                pitch_u: width + options.gap_u(),
                pitch_v: height + options.gap_v(),
                border_u: options.border_u(),
                border_v: options.border_v(),
                columns: options.columns,
                rows: options.rows,
                column_gap: options.column_gap,
                row_gap: options.row_gap_or_column_gap(),
                stagger: options.stagger,
                stagger_amount: options.stagger_amount,
                angle,
            });
            let margin = width.max(height) / 2.0;
            let kept: Vec<[f64; 2]> = grid
                .iter()
                .copied()
                .filter(|c| layout::within_face(*c, face.u_size, face.v_size, margin))
                .collect();
            log::debug!(
                "pattern grid: {} cells, {} culled",
                grid.len(),
                grid.len() - kept.len()
            );
            (kept, 0.0)
        };

        if centers.is_empty() {
            self.errors()
                .record("cutPattern", "no cutters fit the face", None);
            return self.clone();
        }

        let cut = place_and_cut(
            &kernel,
            &geometry,
            &face,
            &options,
            depth,
            angle,
            line_length,
            &centers,
        );
        match cut {
            Ok(new_geometry) => self.rebuilt_after_cut(new_geometry),
            Err(e) => {
                self.errors().record("cutPattern", e.to_string(), None);
                self.clone()
            }
        }
    }
}

/// Orientation taking a +Z cutter into the face: rotation axis and angle per
/// dominant-axis/sign, applied before translation.
fn face_rotation(face: &FaceFrame) -> Option<([f64; 3], f64)> {
    use std::f64::consts::{FRAC_PI_2, PI};
    match (face.axis, face.sign > 0.0) {
        (2, true) => None,
        (2, false) => Some(([1.0, 0.0, 0.0], PI)),
        (0, true) => Some(([0.0, 1.0, 0.0], FRAC_PI_2)),
        (0, false) => Some(([0.0, 1.0, 0.0], -FRAC_PI_2)),
        (1, true) => Some(([1.0, 0.0, 0.0], -FRAC_PI_2)),
        _ => Some(([1.0, 0.0, 0.0], FRAC_PI_2)),
    }
}

#[allow(clippy::too_many_arguments)]
fn place_and_cut(
    kernel: &std::rc::Rc<std::cell::RefCell<dyn kernel_bridge::KernelBundle>>,
    geometry: &SolidHandle,
    face: &FaceFrame,
    options: &PatternOptions,
    depth: f64,
    angle: f64,
    line_length: f64,
    centers: &[[f64; 2]],
) -> Result<SolidHandle, KernelError> {
    let mut kb = kernel.borrow_mut();

    // One prototype; copies only differ by placement.
    let mut prototype = cutter::build_prototype(&mut *kb, options, depth, line_length)?;

    let spin = if options.shape == PatternShape::Line {
        // The +X/-X placement rotation maps the prototype's in-plane axes
        // onto (v, u) rather than (u, v); the extra quarter turn keeps the
        // line direction true to `angle` in face coordinates.
        if face.axis == 0 {
            angle + std::f64::consts::FRAC_PI_2
        } else {
            angle
        }
    } else {
        options.rotation.to_radians()
    };
    if spin != 0.0 {
        prototype = kb.rotate_solid(&prototype, [0.0, 0.0, 1.0], spin)?;
    }
    if let Some((axis, turn)) = face_rotation(face) {
        prototype = kb.rotate_solid(&prototype, axis, turn)?;
    }

    let mut tools = Vec::with_capacity(centers.len());
    for center in centers {
        let mut t = [0.0; 3];
        t[face.u_axis] = face.center_u + center[0];
        t[face.v_axis] = face.center_v + center[1];
        t[face.axis] = face.plane - face.sign * depth;
        tools.push(kb.translate_solid(&prototype, t)?);
    }

    kb.cut_many(geometry, &tools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camber_model::Workbench;
    use kernel_bridge::{KernelIntrospect, MockKernel};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn shared_bench() -> (Rc<RefCell<MockKernel>>, Workbench) {
        let mock = Rc::new(RefCell::new(MockKernel::new()));
        let wb = Workbench::from_shared(mock.clone());
        (mock, wb)
    }

    #[test]
    fn pattern_without_geometry_is_a_no_op() {
        let (_, wb) = shared_bench();
        let bad = wb.cuboid(-1.0, 1.0, 1.0);
        let out = bad.cut_pattern(PatternOptions::default());
        assert!(!out.has_geometry());
    }

    #[test]
    fn invalid_width_records_and_returns_receiver() {
        let (_, wb) = shared_bench();
        let plate = wb.cuboid(50.0, 50.0, 10.0);
        let out = plate.cut_pattern(PatternOptions {
            width: 0.0,
            ..Default::default()
        });
        assert_eq!(
            out.geometry().unwrap().id(),
            plate.geometry().unwrap().id()
        );
        assert_eq!(wb.last_error().unwrap().operation, "cutPattern");
    }

    #[test]
    fn min_cut_z_clamps_top_face_depth() {
        let (mock, wb) = shared_bench();
        let plate = wb.cuboid(50.0, 50.0, 10.0).min_cut_z(6.0);
        let out = plate.faces(">z").cut_pattern(PatternOptions {
            shape: PatternShape::Circle,
            width: 4.0,
            spacing: Some(8.0),
            ..Default::default()
        });
        assert!(out.has_geometry());

        let tools = mock.borrow().last_batched_tools();
        assert!(!tools.is_empty());
        for tool in tools {
            let bbox = mock.borrow().bounding_box(&tool).unwrap();
            // Cutter bottom respects the floor: z = 10 - depth = 6.
            assert!((bbox[2] - 6.0).abs() < 1e-9);
        }
    }
}
