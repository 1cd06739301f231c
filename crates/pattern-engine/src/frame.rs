//! Face-local coordinate frames for pattern layout.
//!
//! A face is classified by the largest |normal| component; the two remaining
//! world axes become u/v. Oblique faces (no dominant component) are not
//! supported and degrade to the top face.

use kernel_bridge::{FaceId, KernelIntrospect, SolidHandle};

/// Minimum |normal| component along the dominant axis.
const DOMINANT_TOL: f64 = 0.9;

/// A pattern-ready local frame on a planar, axis-aligned face.
#[derive(Debug, Clone, Copy)]
pub struct FaceFrame {
    /// Dominant world axis index (0 = x, 1 = y, 2 = z).
    pub axis: usize,
    /// Sign of the outward normal along the dominant axis.
    pub sign: f64,
    /// World axis serving as pattern u.
    pub u_axis: usize,
    /// World axis serving as pattern v.
    pub v_axis: usize,
    pub u_size: f64,
    pub v_size: f64,
    /// Face bbox center along u / v (world coordinates).
    pub center_u: f64,
    pub center_v: f64,
    /// Face position along the dominant axis.
    pub plane: f64,
}

/// u/v axis assignment per dominant axis: x-faces pattern over (y, z),
/// y-faces over (x, z), z-faces over (x, y).
fn uv_axes(axis: usize) -> (usize, usize) {
    match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}

/// Frame for a selected face, or `None` when the face is oblique or
/// unqueryable.
pub fn face_frame(kb: &dyn KernelIntrospect, face: FaceId) -> Option<FaceFrame> {
    let info = kb.face_info(face)?;
    let n = info.normal;
    let axis = (0..3).max_by(|&a, &b| {
        n[a].abs()
            .partial_cmp(&n[b].abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    })?;
    if n[axis].abs() < DOMINANT_TOL {
        return None;
    }
    let (u_axis, v_axis) = uv_axes(axis);
    let bbox = kb.face_bounding_box(face)?;

    Some(FaceFrame {
        axis,
        sign: n[axis].signum(),
        u_axis,
        v_axis,
        u_size: bbox[u_axis + 3] - bbox[u_axis],
        v_size: bbox[v_axis + 3] - bbox[v_axis],
        center_u: (bbox[u_axis] + bbox[u_axis + 3]) / 2.0,
        center_v: (bbox[v_axis] + bbox[v_axis + 3]) / 2.0,
        plane: info.centroid[axis],
    })
}

/// Fallback frame: the shape's top (max-z) face inferred from its bounding
/// box.
pub fn top_face_frame(kb: &dyn KernelIntrospect, solid: &SolidHandle) -> Option<FaceFrame> {
    let bbox = kb.bounding_box(solid)?;
    Some(FaceFrame {
        axis: 2,
        sign: 1.0,
        u_axis: 0,
        v_axis: 1,
        u_size: bbox[3] - bbox[0],
        v_size: bbox[4] - bbox[1],
        center_u: (bbox[0] + bbox[3]) / 2.0,
        center_v: (bbox[1] + bbox[4]) / 2.0,
        plane: bbox[5],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel_bridge::{Kernel, KernelIntrospect, MockKernel};

    #[test]
    fn top_face_frame_spans_xy() {
        let mut kernel = MockKernel::new();
        let solid = kernel.make_box(50.0, 20.0, 30.0).unwrap();
        let frame = top_face_frame(&kernel, &solid).unwrap();
        assert_eq!((frame.axis, frame.u_axis, frame.v_axis), (2, 0, 1));
        assert_eq!(frame.u_size, 50.0);
        assert_eq!(frame.v_size, 20.0);
        assert_eq!(frame.plane, 30.0);
    }

    #[test]
    fn x_face_frame_patterns_over_y_and_z() {
        let mut kernel = MockKernel::new();
        let solid = kernel.make_box(50.0, 20.0, 30.0).unwrap();
        let face = kernel
            .list_faces(&solid)
            .into_iter()
            .find(|f| kernel.face_info(*f).unwrap().normal == [1.0, 0.0, 0.0])
            .unwrap();

        let frame = face_frame(&kernel, face).unwrap();
        assert_eq!((frame.axis, frame.u_axis, frame.v_axis), (0, 1, 2));
        assert_eq!(frame.sign, 1.0);
        assert_eq!(frame.u_size, 20.0);
        assert_eq!(frame.v_size, 30.0);
        assert_eq!(frame.plane, 25.0);
    }

    #[test]
    fn curved_faces_have_no_frame() {
        let mut kernel = MockKernel::new();
        let solid = kernel.make_cylinder(5.0, 10.0).unwrap();
        let side = kernel
            .list_faces(&solid)
            .into_iter()
            .find(|f| !kernel.face_info(*f).unwrap().is_planar)
            .unwrap();
        assert!(face_frame(&kernel, side).is_none());
    }
}
