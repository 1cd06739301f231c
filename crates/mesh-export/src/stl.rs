//! ASCII STL output at world coordinates.

use std::fmt::Write as _;

use camber_model::Shape;
use camber_types::META_PART_NAME;

use crate::mesh::{shape_meshes, ExportError, ShapeMesh};

/// Serialize main meshes (modifier volumes excluded) as one ASCII STL solid.
pub fn meshes_to_stl(name: &str, meshes: &[ShapeMesh]) -> Vec<u8> {
    let mut out = String::new();
    let _ = writeln!(out, "solid {}", name);

    for mesh in meshes.iter().filter(|m| !m.is_modifier) {
        for tri in mesh.indices.chunks_exact(3) {
            let v = |i: u32| {
                let b = i as usize * 3;
                [
                    mesh.vertices[b] as f64,
                    mesh.vertices[b + 1] as f64,
                    mesh.vertices[b + 2] as f64,
                ]
            };
            let (v0, v1, v2) = (v(tri[0]), v(tri[1]), v(tri[2]));

            let e1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
            let e2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
            let n = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            let n = if len > 1e-12 {
                [n[0] / len, n[1] / len, n[2] / len]
            } else {
                [0.0, 0.0, 0.0]
            };

            let _ = writeln!(out, "  facet normal {:e} {:e} {:e}", n[0], n[1], n[2]);
            let _ = writeln!(out, "    outer loop");
            for vert in [v0, v1, v2] {
                let _ = writeln!(out, "      vertex {:e} {:e} {:e}", vert[0], vert[1], vert[2]);
            }
            let _ = writeln!(out, "    endloop");
            let _ = writeln!(out, "  endfacet");
        }
    }

    let _ = writeln!(out, "endsolid {}", name);
    out.into_bytes()
}

/// Mesh a shape and serialize it as ASCII STL.
pub fn shape_to_stl(shape: &Shape) -> Result<Vec<u8>, ExportError> {
    let name = shape
        .metadata()
        .get(META_PART_NAME)
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "shape".to_string());
    let meshes = shape_meshes(shape)?;
    Ok(meshes_to_stl(&name, &meshes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camber_model::Workbench;
    use kernel_bridge::MockKernel;

    #[test]
    fn stl_structure_is_well_formed() {
        let wb = Workbench::new(MockKernel::new());
        let stl = shape_to_stl(&wb.cuboid(10.0, 10.0, 10.0).part_name("plate")).unwrap();
        let text = String::from_utf8(stl).unwrap();

        assert!(text.starts_with("solid plate\n"));
        assert!(text.trim_end().ends_with("endsolid plate"));

        let facets = text.matches("facet normal").count();
        let loops = text.matches("outer loop").count();
        let vertices = text.matches("vertex").count();
        // Mock tessellation: 2 triangles per face, 6 faces.
        assert_eq!(facets, 12);
        assert_eq!(loops, facets);
        assert_eq!(vertices, facets * 3);
    }

    #[test]
    fn modifier_meshes_stay_out_of_stl() {
        let wb = Workbench::new(MockKernel::new());
        let plain = shape_to_stl(&wb.cuboid(10.0, 10.0, 10.0)).unwrap();
        let with_modifier =
            shape_to_stl(&wb.cuboid(10.0, 10.0, 10.0).with_modifier(wb.sphere(2.0))).unwrap();
        let plain_facets = String::from_utf8(plain).unwrap().matches("facet").count();
        let modifier_facets = String::from_utf8(with_modifier)
            .unwrap()
            .matches("facet")
            .count();
        assert_eq!(plain_facets, modifier_facets);
    }

    #[test]
    fn default_solid_name() {
        let wb = Workbench::new(MockKernel::new());
        let stl = shape_to_stl(&wb.cuboid(1.0, 1.0, 1.0)).unwrap();
        assert!(String::from_utf8(stl).unwrap().starts_with("solid shape"));
    }
}
