//! TruckKernel — real geometry backend wrapping the truck B-Rep crates.

use crate::primitives;
use crate::tessellation;
use crate::traits::Kernel;
use crate::types::*;
use std::collections::HashMap;

use truck_modeling::builder;
use truck_modeling::topology::Solid;
use truck_modeling::{InnerSpace, Point3, Rad, Vector3};

/// Geometry kernel backed by the truck B-Rep library.
///
/// Fillet, chamfer, same-domain unification and compounds have no truck
/// counterpart and report `NotSupported`; the model layer degrades per its
/// error contract.
pub struct TruckKernel {
    next_handle: u64,
    solids: HashMap<u64, Solid>,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            solids: HashMap::new(),
        }
    }

    pub(crate) fn store_solid(&mut self, solid: Solid) -> SolidHandle {
        let handle = SolidHandle(self.next_handle);
        self.next_handle += 1;
        self.solids.insert(handle.id(), solid);
        handle
    }

    pub(crate) fn get_solid(&self, handle: &SolidHandle) -> Option<&Solid> {
        self.solids.get(&handle.id())
    }

    fn require(&self, handle: &SolidHandle) -> Result<Solid, KernelError> {
        self.solids
            .get(&handle.id())
            .cloned()
            .ok_or(KernelError::EntityNotFound { id: handle.id() })
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for TruckKernel {
    fn make_box(
        &mut self,
        length: f64,
        width: f64,
        height: f64,
    ) -> Result<SolidHandle, KernelError> {
        let solid = primitives::make_box(length, width, height);
        Ok(self.store_solid(solid))
    }

    fn make_cylinder(&mut self, radius: f64, height: f64) -> Result<SolidHandle, KernelError> {
        let solid = primitives::make_cylinder(radius, height)
            .map_err(|message| KernelError::Other { message })?;
        Ok(self.store_solid(solid))
    }

    fn make_sphere(&mut self, radius: f64) -> Result<SolidHandle, KernelError> {
        let solid =
            primitives::make_sphere(radius).map_err(|message| KernelError::Other { message })?;
        Ok(self.store_solid(solid))
    }

    fn make_prism(
        &mut self,
        sides: u32,
        flat_to_flat: f64,
        height: f64,
    ) -> Result<SolidHandle, KernelError> {
        if sides < 3 {
            return Err(KernelError::InvalidInput {
                message: format!("prism needs at least 3 sides, got {}", sides),
            });
        }
        let ring = primitives::prism_ring(sides, flat_to_flat);
        let solid = primitives::extrude_polygon(&ring, &[], height)
            .map_err(|message| KernelError::Other { message })?;
        Ok(self.store_solid(solid))
    }

    fn extrude_polygon(
        &mut self,
        outer: &[[f64; 2]],
        holes: &[Vec<[f64; 2]>],
        depth: f64,
    ) -> Result<SolidHandle, KernelError> {
        let solid = primitives::extrude_polygon(outer, holes, depth)
            .map_err(|message| KernelError::Other { message })?;
        Ok(self.store_solid(solid))
    }

    fn translate_solid(
        &mut self,
        solid: &SolidHandle,
        offset: [f64; 3],
    ) -> Result<SolidHandle, KernelError> {
        let truck_solid = self.require(solid)?;
        let moved = builder::translated(
            &truck_solid,
            Vector3::new(offset[0], offset[1], offset[2]),
        );
        Ok(self.store_solid(moved))
    }

    fn rotate_solid(
        &mut self,
        solid: &SolidHandle,
        axis: [f64; 3],
        angle: f64,
    ) -> Result<SolidHandle, KernelError> {
        let truck_solid = self.require(solid)?;
        let axis_v = Vector3::new(axis[0], axis[1], axis[2]);
        if axis_v.magnitude() < 1e-12 {
            return Err(KernelError::InvalidInput {
                message: "rotation axis has zero length".to_string(),
            });
        }
        let moved = builder::rotated(
            &truck_solid,
            Point3::new(0.0, 0.0, 0.0),
            axis_v.normalize(),
            Rad(angle),
        );
        Ok(self.store_solid(moved))
    }

    fn boolean_union(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        let solid_a = self.require(a)?;
        let solid_b = self.require(b)?;
        let result = truck_shapeops::or(&solid_a, &solid_b, 0.05).ok_or_else(|| {
            KernelError::BooleanFailed {
                reason: "fuse produced no solid".to_string(),
            }
        })?;
        Ok(self.store_solid(result))
    }

    fn boolean_subtract(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        let solid_a = self.require(a)?;
        let mut solid_b = self.require(b)?;

        // truck has no direct difference; intersect A with the flipped tool.
        solid_b.not();
        let result = truck_shapeops::and(&solid_a, &solid_b, 0.05).ok_or_else(|| {
            KernelError::BooleanFailed {
                reason: "difference produced no solid".to_string(),
            }
        })?;
        Ok(self.store_solid(result))
    }

    fn boolean_intersect(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        let solid_a = self.require(a)?;
        let solid_b = self.require(b)?;
        let result = truck_shapeops::and(&solid_a, &solid_b, 0.05).ok_or_else(|| {
            KernelError::BooleanFailed {
                reason: "intersection produced no solid".to_string(),
            }
        })?;
        Ok(self.store_solid(result))
    }

    fn cut_many(
        &mut self,
        a: &SolidHandle,
        tools: &[SolidHandle],
    ) -> Result<SolidHandle, KernelError> {
        // truck has no compound tool argument; fold the tool list behind the
        // single-call contract.
        let mut current = a.clone();
        for tool in tools {
            current = self.boolean_subtract(&current, tool)?;
        }
        Ok(current)
    }

    fn unify_same_domain(&mut self, _solid: &SolidHandle) -> Result<SolidHandle, KernelError> {
        Err(KernelError::NotSupported {
            operation: "unify_same_domain".to_string(),
        })
    }

    fn fillet_edges(
        &mut self,
        _solid: &SolidHandle,
        _edges: &[EdgeId],
        _radius: f64,
    ) -> Result<SolidHandle, KernelError> {
        Err(KernelError::NotSupported {
            operation: "fillet_edges".to_string(),
        })
    }

    fn chamfer_edges(
        &mut self,
        _solid: &SolidHandle,
        _edges: &[EdgeId],
        _distance: f64,
    ) -> Result<SolidHandle, KernelError> {
        Err(KernelError::NotSupported {
            operation: "chamfer_edges".to_string(),
        })
    }

    fn make_compound(&mut self, _parts: &[SolidHandle]) -> Result<SolidHandle, KernelError> {
        Err(KernelError::NotSupported {
            operation: "make_compound".to_string(),
        })
    }

    fn tessellate(
        &mut self,
        solid: &SolidHandle,
        linear_deflection: f64,
        _angular_deflection: f64,
    ) -> Result<RenderMesh, KernelError> {
        let truck_solid = self
            .solids
            .get(&solid.id())
            .ok_or(KernelError::EntityNotFound { id: solid.id() })?;
        tessellation::tessellate_solid(truck_solid, linear_deflection, solid.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::KernelIntrospect;

    #[test]
    fn box_construction_and_tessellation() {
        let mut kernel = TruckKernel::new();
        let handle = kernel.make_box(1.0, 1.0, 1.0).unwrap();

        let mesh = kernel.tessellate(&handle, 0.1, 0.5).unwrap();
        assert!(!mesh.vertices.is_empty());
        assert!(!mesh.indices.is_empty());
        assert_eq!(mesh.face_ranges.len(), 6, "box should have 6 face ranges");

        let total = mesh.indices.len() as u32;
        let covered: u32 = mesh
            .face_ranges
            .iter()
            .map(|r| r.end_index - r.start_index)
            .sum();
        assert_eq!(covered, total, "face ranges should cover all indices");
    }

    #[test]
    fn translation_returns_fresh_handle() {
        let mut kernel = TruckKernel::new();
        let a = kernel.make_box(2.0, 2.0, 2.0).unwrap();
        let b = kernel.translate_solid(&a, [5.0, 0.0, 0.0]).unwrap();
        assert_ne!(a.id(), b.id());

        let bbox_a = kernel.bounding_box(&a).unwrap();
        let bbox_b = kernel.bounding_box(&b).unwrap();
        assert!((bbox_a[0] + 1.0).abs() < 1e-6);
        assert!((bbox_b[0] - 4.0).abs() < 1e-6);
    }

    #[test]
    fn zero_axis_rotation_is_rejected() {
        let mut kernel = TruckKernel::new();
        let a = kernel.make_box(1.0, 1.0, 1.0).unwrap();
        let err = kernel.rotate_solid(&a, [0.0, 0.0, 0.0], 1.0).unwrap_err();
        assert!(matches!(err, KernelError::InvalidInput { .. }));
    }

    #[test]
    fn fillet_reports_not_supported() {
        let mut kernel = TruckKernel::new();
        let a = kernel.make_box(1.0, 1.0, 1.0).unwrap();
        let err = kernel.fillet_edges(&a, &[], 0.5).unwrap_err();
        assert!(matches!(err, KernelError::NotSupported { .. }));
    }
}
