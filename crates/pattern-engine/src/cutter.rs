//! Cutter solid builders. Every cutter is built centered in xy, extruded
//! z = 0..depth+1, then oriented and placed by the apply step.

use kernel_bridge::{Kernel, KernelBundle, KernelError, SolidHandle};

use crate::options::{PatternOptions, PatternShape};

/// Build the cutter prototype for one pattern. `line_length` comes from the
/// line layout when the shape is a line.
pub fn build_prototype(
    kb: &mut dyn KernelBundle,
    opts: &PatternOptions,
    depth: f64,
    line_length: f64,
) -> Result<SolidHandle, KernelError> {
    let h = depth + 1.0;
    let width = opts.width;
    let height = opts.height_or_width();

    match opts.shape {
        PatternShape::Line => build_line(kb, line_length, width, h, opts.round_ends),
        PatternShape::Rect => build_rect(kb, width, height, h, opts.fillet, opts.shear),
        PatternShape::Square => build_rect(kb, width, width, h, opts.fillet, opts.shear),
        PatternShape::Circle => kb.make_cylinder(width / 2.0, h),
        PatternShape::Hexagon
        | PatternShape::Octagon
        | PatternShape::Triangle
        | PatternShape::Ngon(_) => {
            let sides = opts.shape.sides().unwrap_or(6);
            kb.make_prism(sides, width, h)
        }
    }
}

/// Plain box, or a stadium (box plus two end-cap cylinders) for round ends.
fn build_line(
    kb: &mut dyn KernelBundle,
    length: f64,
    width: f64,
    h: f64,
    round_ends: bool,
) -> Result<SolidHandle, KernelError> {
    let body = kb.make_box(length, width, h)?;
    if !round_ends || length <= width {
        return Ok(body);
    }
    let cap_offset = (length - width) / 2.0;
    let mut acc = body;
    for x in [-cap_offset, cap_offset] {
        let cap = kb.make_cylinder(width / 2.0, h)?;
        let placed = kb.translate_solid(&cap, [x, 0.0, 0.0])?;
        acc = kb.boolean_union(&acc, &placed)?;
    }
    Ok(acc)
}

fn build_rect(
    kb: &mut dyn KernelBundle,
    width: f64,
    height: f64,
    h: f64,
    fillet: f64,
    shear_deg: f64,
) -> Result<SolidHandle, KernelError> {
    if shear_deg != 0.0 {
        // Parallelogram wire, extruded.
        let offset = height * shear_deg.to_radians().tan();
        let ring = vec![
            [-width / 2.0, -height / 2.0],
            [width / 2.0, -height / 2.0],
            [width / 2.0 + offset, height / 2.0],
            [-width / 2.0 + offset, height / 2.0],
        ];
        return kb.extrude_polygon(&ring, &[], h);
    }

    if fillet > 0.0 && fillet < width / 2.0 && fillet < height / 2.0 {
        // Rounded rectangle: two overlapping thinner boxes plus four corner
        // cylinders.
        let mut acc = kb.make_box(width - 2.0 * fillet, height, h)?;
        let tall = kb.make_box(width, height - 2.0 * fillet, h)?;
        acc = kb.boolean_union(&acc, &tall)?;
        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                let corner = kb.make_cylinder(fillet, h)?;
                let placed = kb.translate_solid(
                    &corner,
                    [
                        sx * (width / 2.0 - fillet),
                        sy * (height / 2.0 - fillet),
                        0.0,
                    ],
                )?;
                acc = kb.boolean_union(&acc, &placed)?;
            }
        }
        return Ok(acc);
    }

    kb.make_box(width, height, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel_bridge::{KernelIntrospect, MockKernel};

    #[test]
    fn line_cutter_spans_its_length_and_depth() {
        let mut kernel = MockKernel::new();
        let opts = PatternOptions {
            width: 2.0,
            ..Default::default()
        };
        let cutter = build_prototype(&mut kernel, &opts, 5.0, 30.0).unwrap();
        let bbox = kernel.bounding_box(&cutter).unwrap();
        assert_eq!(bbox, [-15.0, -1.0, 0.0, 15.0, 1.0, 6.0]);
    }

    #[test]
    fn stadium_adds_end_caps() {
        let mut kernel = MockKernel::new();
        let opts = PatternOptions {
            width: 2.0,
            round_ends: true,
            ..Default::default()
        };
        let cutter = build_prototype(&mut kernel, &opts, 5.0, 10.0).unwrap();
        let bbox = kernel.bounding_box(&cutter).unwrap();
        // Caps sit at +-4, radius 1: the x extent stays 10.
        assert_eq!(bbox[0], -5.0);
        assert_eq!(bbox[3], 5.0);
    }

    #[test]
    fn hexagon_cutter_is_a_six_sided_prism() {
        let mut kernel = MockKernel::new();
        let opts = PatternOptions {
            shape: PatternShape::Hexagon,
            width: 5.0,
            ..Default::default()
        };
        let cutter = build_prototype(&mut kernel, &opts, 10.0, 0.0).unwrap();
        assert_eq!(kernel.list_faces(&cutter).len(), 8);
        let bbox = kernel.bounding_box(&cutter).unwrap();
        assert!((bbox[4] - 2.5).abs() < 1e-9, "across-flats 5 means flat at 2.5");
    }

    #[test]
    fn sheared_rect_is_a_parallelogram() {
        let mut kernel = MockKernel::new();
        let opts = PatternOptions {
            shape: PatternShape::Rect,
            width: 4.0,
            height: Some(2.0),
            shear: 45.0,
            ..Default::default()
        };
        let cutter = build_prototype(&mut kernel, &opts, 3.0, 0.0).unwrap();
        let bbox = kernel.bounding_box(&cutter).unwrap();
        // Top edge shifts by height * tan(45) = 2.
        assert!((bbox[3] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn rounded_rect_unions_boxes_and_corners() {
        let mut kernel = MockKernel::new();
        let opts = PatternOptions {
            shape: PatternShape::Rect,
            width: 6.0,
            height: Some(4.0),
            fillet: 1.0,
            ..Default::default()
        };
        let cutter = build_prototype(&mut kernel, &opts, 3.0, 0.0).unwrap();
        let bbox = kernel.bounding_box(&cutter).unwrap();
        assert_eq!(bbox[0], -3.0);
        assert_eq!(bbox[4], 2.0);
    }
}
