//! Operations positioned relative to a named face: bosses, pockets,
//! centering, alignment and attachment.

use camber_types::{vec3, FaceRef};
use kernel_bridge::{Kernel, KernelError, SolidHandle};

use crate::shape::Shape;

/// Rotation taking +Z onto `normal`: `None` for identity, otherwise
/// (axis, angle). An opposite normal flips 180° about X.
fn rotation_from_z(normal: [f64; 3]) -> Option<([f64; 3], f64)> {
    let n = vec3::normalize(normal);
    let dot = n[2];
    if dot > 0.999 {
        None
    } else if dot < -0.999 {
        Some(([1.0, 0.0, 0.0], std::f64::consts::PI))
    } else {
        let axis = vec3::normalize(vec3::cross([0.0, 0.0, 1.0], n));
        Some((axis, dot.clamp(-1.0, 1.0).acos()))
    }
}

impl Shape {
    fn named_face_or_record(&self, operation: &str, name: &str) -> Option<FaceRef> {
        match self.face(name) {
            Some(face_ref) => Some(face_ref),
            None => {
                self.errors().record(
                    operation,
                    format!("no face named {:?}", name),
                    None,
                );
                None
            }
        }
    }

    /// Build a centered (w, h, d) box oriented along the face normal, seated
    /// on the named face, pushed outward by d/2.
    fn oriented_box_on(
        &self,
        face_ref: &FaceRef,
        w: f64,
        h: f64,
        d: f64,
        inward: bool,
    ) -> Result<SolidHandle, KernelError> {
        let n = vec3::normalize(face_ref.normal);
        let offset = if inward {
            vec3::sub(face_ref.centroid, vec3::scale(n, d / 2.0))
        } else {
            vec3::add(face_ref.centroid, vec3::scale(n, d / 2.0))
        };

        let kernel = self.kernel();
        let mut kb = kernel.borrow_mut();
        let boss = kb.make_box(w, h, d)?;
        // make_box sits on z=0; center it before orienting.
        let centered = kb.translate_solid(&boss, [0.0, 0.0, -d / 2.0])?;
        let oriented = match rotation_from_z(n) {
            None => centered,
            Some((axis, angle)) => kb.rotate_solid(&centered, axis, angle)?,
        };
        kb.translate_solid(&oriented, offset)
    }

    /// Union a (w, h, d) boss onto the named face.
    pub fn extrude_on(&self, name: &str, w: f64, h: f64, d: f64) -> Shape {
        for (label, value) in [("width", w), ("height", h), ("depth", d)] {
            if !value.is_finite() || value <= 0.0 {
                self.errors().record(
                    "extrudeOn",
                    format!("{} must be positive, got {}", label, value),
                    None,
                );
                return self.clone();
            }
        }
        let Some(face_ref) = self.named_face_or_record("extrudeOn", name) else {
            return self.clone();
        };
        match self.oriented_box_on(&face_ref, w, h, d, false) {
            Ok(boss) => {
                let boss = Shape::from_handle(self.kernel(), self.errors(), boss);
                self.union(&boss)
            }
            Err(e) => {
                self.errors().record("extrudeOn", e.to_string(), None);
                self.clone()
            }
        }
    }

    /// Union another shape centered on the named face.
    pub fn extrude_shape_on(&self, name: &str, other: &Shape) -> Shape {
        let Some(face_ref) = self.named_face_or_record("extrudeOn", name) else {
            return self.clone();
        };
        let Some(other_bbox) = other.bounding_box() else {
            self.errors()
                .record("extrudeOn", "shape to extrude has no geometry", None);
            return self.clone();
        };
        let shift = vec3::sub(face_ref.centroid, vec3::bbox_center(other_bbox));
        let moved = other.translate(shift[0], shift[1], shift[2]);
        self.union(&moved)
    }

    /// Cut a centered (w, h, d) pocket into the named face.
    pub fn cut_into(&self, name: &str, w: f64, h: f64, d: f64) -> Shape {
        for (label, value) in [("width", w), ("height", h), ("depth", d)] {
            if !value.is_finite() || value <= 0.0 {
                self.errors().record(
                    "cutInto",
                    format!("{} must be positive, got {}", label, value),
                    None,
                );
                return self.clone();
            }
        }
        let Some(face_ref) = self.named_face_or_record("cutInto", name) else {
            return self.clone();
        };
        match self.oriented_box_on(&face_ref, w, h, d, true) {
            Ok(pocket) => {
                let pocket = Shape::from_handle(self.kernel(), self.errors(), pocket);
                self.cut(&pocket)
            }
            Err(e) => {
                self.errors().record("cutInto", e.to_string(), None);
                self.clone()
            }
        }
    }

    /// Move this shape so its bounding-box center sits on the other shape's
    /// named face centroid.
    pub fn center_on(&self, other: &Shape, name: &str) -> Shape {
        let Some(face_ref) = other.named_face_or_record("centerOn", name) else {
            return self.clone();
        };
        let Some(bbox) = self.bounding_box() else {
            return self.clone();
        };
        let shift = vec3::sub(face_ref.centroid, vec3::bbox_center(bbox));
        self.translate(shift[0], shift[1], shift[2])
    }

    /// `center_on`, then push along the face normal by this shape's half
    /// extent projected on it, leaving the contact faces coplanar.
    pub fn align_to(&self, other: &Shape, name: &str) -> Shape {
        let Some(face_ref) = other.named_face_or_record("alignTo", name) else {
            return self.clone();
        };
        let centered = self.center_on(other, name);
        let Some(bbox) = centered.bounding_box() else {
            return centered;
        };
        let n = vec3::normalize(face_ref.normal);
        let half = [
            (bbox[3] - bbox[0]) / 2.0,
            (bbox[4] - bbox[1]) / 2.0,
            (bbox[5] - bbox[2]) / 2.0,
        ];
        let push = n[0].abs() * half[0] + n[1].abs() * half[1] + n[2].abs() * half[2];
        let offset = vec3::scale(n, push);
        centered.translate(offset[0], offset[1], offset[2])
    }

    /// Center this shape on the other's named face, then union into it.
    pub fn attach_to(&self, other: &Shape, name: &str) -> Shape {
        let centered = self.center_on(other, name);
        other.union(&centered)
    }
}
