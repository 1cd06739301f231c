//! Primitive solid builders on top of truck's sweep API.
//!
//! truck has no built-in box/cylinder/sphere — everything is successive
//! sweeps of lower-dimensional topology.

use std::f64::consts::PI;
use truck_modeling::builder;
use truck_modeling::topology::{Edge, Solid, Wire};
use truck_modeling::{EuclideanSpace, Point3, Rad, Vector3};

/// Box spanning [-l/2, l/2] x [-w/2, w/2] x [0, h]: three successive sweeps
/// starting from the (-l/2, -w/2, 0) corner.
pub fn make_box(length: f64, width: f64, height: f64) -> Solid {
    let v = builder::vertex(Point3::new(-length / 2.0, -width / 2.0, 0.0));
    let edge = builder::tsweep(&v, Vector3::new(length, 0.0, 0.0));
    let face = builder::tsweep(&edge, Vector3::new(0.0, width, 0.0));
    builder::tsweep(&face, Vector3::new(0.0, 0.0, height))
}

/// Cylinder on the z-axis, base at z=0: circle wire, planar cap, sweep +Z.
pub fn make_cylinder(radius: f64, height: f64) -> Result<Solid, String> {
    let v = builder::vertex(Point3::new(radius, 0.0, 0.0));
    let wire = builder::rsweep(&v, Point3::origin(), Vector3::unit_z(), Rad(2.0 * PI));
    let face = builder::try_attach_plane(&[wire])
        .map_err(|e| format!("failed to create circular face: {}", e))?;
    Ok(builder::tsweep(&face, Vector3::new(0.0, 0.0, height)))
}

/// Sphere resting on the build plate (center at (0, 0, r)): half-disc face
/// revolved a full turn.
pub fn make_sphere(radius: f64) -> Result<Solid, String> {
    let v_right = builder::vertex(Point3::new(radius, 0.0, 0.0));
    let arc_wire = builder::rsweep(&v_right, Point3::origin(), Vector3::unit_y(), Rad(PI));

    let v_left = builder::vertex(Point3::new(-radius, 0.0, 0.0));
    let line_edge: Edge = builder::tsweep(&v_left, Vector3::new(2.0 * radius, 0.0, 0.0));

    let mut edges: Vec<Edge> = Vec::new();
    for edge in arc_wire.edge_iter() {
        edges.push(edge.clone());
    }
    edges.push(line_edge);
    let closed_wire = Wire::from_iter(edges);

    let face = builder::try_attach_plane(&[closed_wire])
        .map_err(|e| format!("failed to create semicircle face: {}", e))?;

    let sphere = builder::rsweep(&face, Point3::origin(), Vector3::unit_z(), Rad(2.0 * PI));
    Ok(builder::translated(&sphere, Vector3::new(0.0, 0.0, radius)))
}

/// Vertex ring of a regular n-gon with one flat horizontal, sized by its
/// across-flats width.
pub fn prism_ring(sides: u32, flat_to_flat: f64) -> Vec<[f64; 2]> {
    let n = sides as usize;
    let inradius = flat_to_flat / 2.0;
    let circumradius = inradius / (PI / sides as f64).cos();
    let start = -PI / 2.0 + PI / sides as f64;
    (0..n)
        .map(|k| {
            let theta = start + 2.0 * PI * k as f64 / sides as f64;
            [circumradius * theta.cos(), circumradius * theta.sin()]
        })
        .collect()
}

/// Build a closed wire of straight edges through the given xy-plane points.
fn polygon_wire(ring: &[[f64; 2]]) -> Wire {
    let pts: Vec<Point3> = ring.iter().map(|p| Point3::new(p[0], p[1], 0.0)).collect();
    let n = pts.len();
    let vertices: Vec<_> = pts.iter().map(|&p| builder::vertex(p)).collect();
    let mut wire_edges: Vec<Edge> = Vec::new();
    for i in 0..n {
        let j = (i + 1) % n;
        let edge = Edge::new(
            &vertices[i],
            &vertices[j],
            truck_modeling::geometry::Curve::Line(truck_modeling::geometry::Line(pts[i], pts[j])),
        );
        wire_edges.push(edge);
    }
    Wire::from_iter(wire_edges)
}

/// Extrude an outer ring (with optional hole rings) from z=0 to z=depth.
pub fn extrude_polygon(
    outer: &[[f64; 2]],
    holes: &[Vec<[f64; 2]>],
    depth: f64,
) -> Result<Solid, String> {
    if outer.len() < 3 {
        return Err("outer contour has fewer than 3 points".to_string());
    }
    let mut wires = vec![polygon_wire(outer)];
    for hole in holes {
        if hole.len() < 3 {
            return Err("hole contour has fewer than 3 points".to_string());
        }
        wires.push(polygon_wire(hole));
    }
    let face = builder::try_attach_plane(&wires)
        .map_err(|e| format!("failed to create planar face: {}", e))?;
    Ok(builder::tsweep(&face, Vector3::new(0.0, 0.0, depth)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_bounds(solid: &Solid) -> ([f64; 3], [f64; 3]) {
        let mut min = [f64::MAX; 3];
        let mut max = [f64::MIN; 3];
        for shell in solid.boundaries().iter() {
            for v in shell.vertex_iter() {
                let p = v.point();
                for i in 0..3 {
                    min[i] = min[i].min(p[i]);
                    max[i] = max[i].max(p[i]);
                }
            }
        }
        (min, max)
    }

    #[test]
    fn box_topology_and_placement() {
        let solid = make_box(2.0, 4.0, 6.0);

        let boundaries = solid.boundaries();
        assert_eq!(boundaries.len(), 1, "box should have 1 shell");

        let shell = &boundaries[0];
        let faces: Vec<_> = shell.face_iter().collect();
        let mut edge_ids = std::collections::HashSet::new();
        for edge in shell.edge_iter() {
            edge_ids.insert(edge.id());
        }
        let mut vert_ids = std::collections::HashSet::new();
        for v in shell.vertex_iter() {
            vert_ids.insert(v.id());
        }

        assert_eq!(faces.len(), 6);
        assert_eq!(edge_ids.len(), 12);
        assert_eq!(vert_ids.len(), 8);
        // Euler's formula: V - E + F = 2
        assert_eq!(
            vert_ids.len() as i64 - edge_ids.len() as i64 + faces.len() as i64,
            2
        );

        let (min, max) = solid_bounds(&solid);
        let eps = 1e-10;
        assert!((min[0] + 1.0).abs() < eps && (max[0] - 1.0).abs() < eps);
        assert!((min[1] + 2.0).abs() < eps && (max[1] - 2.0).abs() < eps);
        assert!(min[2].abs() < eps && (max[2] - 6.0).abs() < eps);
    }

    #[test]
    fn cylinder_has_caps_and_side() {
        let solid = make_cylinder(1.0, 2.0).unwrap();
        let boundaries = solid.boundaries();
        assert_eq!(boundaries.len(), 1);
        let faces: Vec<_> = boundaries[0].face_iter().collect();
        assert!(faces.len() >= 3, "cylinder needs caps plus side faces");
    }

    #[test]
    fn prism_ring_is_flat_bottomed() {
        let ring = prism_ring(6, 10.0);
        assert_eq!(ring.len(), 6);
        let min_y = ring.iter().map(|p| p[1]).fold(f64::MAX, f64::min);
        // Across-flats 10 means the bottom flat sits at y = -5.
        assert!((min_y + 5.0).abs() < 1e-9);
        let bottom: Vec<_> = ring.iter().filter(|p| (p[1] - min_y).abs() < 1e-9).collect();
        assert_eq!(bottom.len(), 2, "exactly one flat on the bottom");
    }

    #[test]
    fn extruded_square_is_a_box() {
        let ring = vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]];
        let solid = extrude_polygon(&ring, &[], 3.0).unwrap();
        let faces: Vec<_> = solid.boundaries()[0].face_iter().cloned().collect();
        assert_eq!(faces.len(), 6);
        let (min, max) = solid_bounds(&solid);
        assert!((max[2] - min[2] - 3.0).abs() < 1e-10);
    }
}
