use serde::{Deserialize, Serialize};

use crate::vec3;

/// Persistent descriptor of a named face. Survives boolean operations by
/// geometric similarity matching rather than by kernel identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRef {
    /// Outward unit normal at the centroid.
    pub normal: [f64; 3],
    /// Face centroid in world coordinates.
    pub centroid: [f64; 3],
    /// Surface area.
    pub area: f64,
}

impl FaceRef {
    pub fn translated(&self, offset: [f64; 3]) -> FaceRef {
        FaceRef {
            normal: self.normal,
            centroid: vec3::add(self.centroid, offset),
            area: self.area,
        }
    }

    pub fn rotated(&self, axis: [f64; 3], angle: f64) -> FaceRef {
        FaceRef {
            normal: vec3::rotate_about(self.normal, axis, angle),
            centroid: vec3::rotate_about(self.centroid, axis, angle),
            area: self.area,
        }
    }
}

/// Persistent descriptor of a named edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRef {
    /// Curve midpoint (parameter midpoint, not chord midpoint).
    pub midpoint: [f64; 3],
    /// Unit direction from start to end; zero for closed or degenerate edges.
    pub direction: [f64; 3],
    /// Curve length.
    pub length: f64,
}

impl EdgeRef {
    pub fn translated(&self, offset: [f64; 3]) -> EdgeRef {
        EdgeRef {
            midpoint: vec3::add(self.midpoint, offset),
            direction: self.direction,
            length: self.length,
        }
    }

    pub fn rotated(&self, axis: [f64; 3], angle: f64) -> EdgeRef {
        EdgeRef {
            midpoint: vec3::rotate_about(self.midpoint, axis, angle),
            direction: vec3::rotate_about(self.direction, axis, angle),
            length: self.length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_ref_translate_moves_centroid_only() {
        let r = FaceRef {
            normal: [0.0, 0.0, 1.0],
            centroid: [1.0, 2.0, 3.0],
            area: 4.0,
        };
        let t = r.translated([10.0, 0.0, -1.0]);
        assert_eq!(t.normal, [0.0, 0.0, 1.0]);
        assert_eq!(t.centroid, [11.0, 2.0, 2.0]);
        assert_eq!(t.area, 4.0);
    }

    #[test]
    fn edge_ref_rotation_turns_direction() {
        let r = EdgeRef {
            midpoint: [1.0, 0.0, 0.0],
            direction: [1.0, 0.0, 0.0],
            length: 2.0,
        };
        let t = r.rotated([0.0, 0.0, 1.0], std::f64::consts::FRAC_PI_2);
        assert!((t.direction[1] - 1.0).abs() < 1e-12);
        assert!((t.midpoint[1] - 1.0).abs() < 1e-12);
        assert_eq!(t.length, 2.0);
    }
}
