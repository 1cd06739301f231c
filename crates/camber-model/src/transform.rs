//! Rigid transforms with symbolic tracking of the naming tables.
//!
//! Stored FaceRef/EdgeRef coordinates are transformed directly rather than
//! re-derived from geometry, so names survive without re-matching.

use camber_types::vec3;
use kernel_bridge::Kernel;

use crate::shape::{EdgeNames, Selection, Shape, SubPart};

impl Shape {
    /// Move the shape by (x, y, z).
    pub fn translate(&self, x: f64, y: f64, z: f64) -> Shape {
        for (name, value) in [("x", x), ("y", y), ("z", z)] {
            if !value.is_finite() {
                self.errors().record(
                    "translate",
                    format!("{} must be a number, got {}", name, value),
                    None,
                );
                return self.clone();
            }
        }
        let Some(geometry) = self.geometry() else {
            return self.clone();
        };

        let offset = [x, y, z];
        let moved = self
            .kernel()
            .borrow_mut()
            .translate_solid(&geometry, offset);
        let new_geometry = match moved {
            Ok(h) => h,
            Err(e) => {
                self.errors().record("translate", e.to_string(), None);
                return self.clone();
            }
        };

        let mut next = self.clone();
        next.set_geometry(Some(new_geometry));
        next.set_selection(Selection::None);
        {
            let mut tables = next.named.borrow_mut();
            for face_ref in tables.faces.values_mut() {
                *face_ref = face_ref.translated(offset);
            }
            if let EdgeNames::Computed(edges) = &mut tables.edges {
                for edge_ref in edges.values_mut() {
                    *edge_ref = edge_ref.translated(offset);
                }
            }
        }
        let sub_parts = next
            .sub_parts()
            .iter()
            .map(|(name, part)| {
                (
                    name.clone(),
                    SubPart {
                        faces: part
                            .faces
                            .iter()
                            .map(|(n, r)| (n.clone(), r.translated(offset)))
                            .collect(),
                        edges: part
                            .edges
                            .iter()
                            .map(|(n, r)| (n.clone(), r.translated(offset)))
                            .collect(),
                    },
                )
            })
            .collect();
        next.set_sub_parts(sub_parts);
        next
    }

    /// Rotate about the axis (ax, ay, az) through the origin by `angle_deg`
    /// degrees.
    pub fn rotate(&self, ax: f64, ay: f64, az: f64, angle_deg: f64) -> Shape {
        for (name, value) in [("ax", ax), ("ay", ay), ("az", az), ("angle", angle_deg)] {
            if !value.is_finite() {
                self.errors().record(
                    "rotate",
                    format!("{} must be a number, got {}", name, value),
                    None,
                );
                return self.clone();
            }
        }
        let axis = [ax, ay, az];
        if vec3::norm(axis) < 1e-12 {
            self.errors().record(
                "rotate",
                format!("rotation axis must be non-zero, got ({}, {}, {})", ax, ay, az),
                None,
            );
            return self.clone();
        }
        let Some(geometry) = self.geometry() else {
            return self.clone();
        };

        let angle = angle_deg.to_radians();
        let rotated = self
            .kernel()
            .borrow_mut()
            .rotate_solid(&geometry, axis, angle);
        let new_geometry = match rotated {
            Ok(h) => h,
            Err(e) => {
                self.errors().record("rotate", e.to_string(), None);
                return self.clone();
            }
        };

        let mut next = self.clone();
        next.set_geometry(Some(new_geometry));
        next.set_selection(Selection::None);
        {
            let mut tables = next.named.borrow_mut();
            for face_ref in tables.faces.values_mut() {
                *face_ref = face_ref.rotated(axis, angle);
            }
            if let EdgeNames::Computed(edges) = &mut tables.edges {
                for edge_ref in edges.values_mut() {
                    *edge_ref = edge_ref.rotated(axis, angle);
                }
            }
        }
        let sub_parts = next
            .sub_parts()
            .iter()
            .map(|(name, part)| {
                (
                    name.clone(),
                    SubPart {
                        faces: part
                            .faces
                            .iter()
                            .map(|(n, r)| (n.clone(), r.rotated(axis, angle)))
                            .collect(),
                        edges: part
                            .edges
                            .iter()
                            .map(|(n, r)| (n.clone(), r.rotated(axis, angle)))
                            .collect(),
                    },
                )
            })
            .collect();
        next.set_sub_parts(sub_parts);
        next
    }
}

#[cfg(test)]
mod tests {
    use crate::workbench::Workbench;
    use camber_types::vec3;
    use kernel_bridge::MockKernel;

    fn bench() -> Workbench {
        Workbench::new(MockKernel::new())
    }

    #[test]
    fn translate_shifts_centroids_and_keeps_normals() {
        let wb = bench();
        let a = wb.cuboid(10.0, 10.0, 10.0);
        let b = a.translate(3.0, -2.0, 7.0);

        let before = a.named_faces();
        let after = b.named_faces();
        for (name, face_ref) in &before {
            let moved = &after[name];
            assert_eq!(moved.normal, face_ref.normal, "{} normal unchanged", name);
            assert_eq!(
                moved.centroid,
                vec3::add(face_ref.centroid, [3.0, -2.0, 7.0]),
                "{} centroid shifted",
                name
            );
            assert_eq!(moved.area, face_ref.area);
        }
    }

    #[test]
    fn rotate_applies_rodrigues_to_stored_normals() {
        let wb = bench();
        let a = wb.cuboid(10.0, 10.0, 10.0);
        let b = a.rotate(0.0, 0.0, 1.0, 90.0);

        let before = a.named_faces();
        let after = b.named_faces();
        let angle = std::f64::consts::FRAC_PI_2;
        for (name, face_ref) in &before {
            let expected = vec3::rotate_about(face_ref.normal, [0.0, 0.0, 1.0], angle);
            let got = after[name].normal;
            for i in 0..3 {
                assert!(
                    (got[i] - expected[i]).abs() < 1e-9,
                    "{} normal component {}",
                    name,
                    i
                );
            }
        }
        // right (+X) becomes +Y after a quarter turn about Z.
        assert!((after["right"].normal[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rotate_tracks_computed_edge_midpoints() {
        let wb = bench();
        let a = wb.cuboid(4.0, 4.0, 4.0);
        let _ = a.named_edges();
        let b = a.rotate(0.0, 0.0, 1.0, 180.0);

        let before = a.named_edges();
        let after = b.named_edges();
        assert_eq!(before.len(), after.len());
        for (name, edge_ref) in &before {
            let rotated = &after[name];
            assert!((rotated.midpoint[0] + edge_ref.midpoint[0]).abs() < 1e-9);
            assert!((rotated.midpoint[1] + edge_ref.midpoint[1]).abs() < 1e-9);
            assert!((rotated.midpoint[2] - edge_ref.midpoint[2]).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_axis_rotation_records_and_returns_receiver() {
        let wb = bench();
        let a = wb.cuboid(2.0, 2.0, 2.0);
        let b = a.rotate(0.0, 0.0, 0.0, 45.0);
        assert_eq!(
            a.geometry().unwrap().id(),
            b.geometry().unwrap().id(),
            "geometry unchanged"
        );
        let err = wb.last_error().unwrap();
        assert_eq!(err.operation, "rotate");
        assert!(err.message.contains("(0, 0, 0)"));
    }

    #[test]
    fn receiver_is_never_mutated() {
        let wb = bench();
        let a = wb.cuboid(10.0, 10.0, 10.0);
        let before_geometry = a.geometry().unwrap().id();
        let before_names = a.named_faces();

        let _ = a.translate(5.0, 5.0, 5.0).rotate(1.0, 0.0, 0.0, 30.0);

        assert_eq!(a.geometry().unwrap().id(), before_geometry);
        assert_eq!(a.named_faces(), before_names);
    }
}
