//! Edge feature operations: fillet and chamfer.

use kernel_bridge::{EdgeId, Kernel, KernelIntrospect};

use crate::shape::Shape;

#[derive(Debug, Clone, Copy)]
enum FeatureKind {
    Fillet,
    Chamfer,
}

impl FeatureKind {
    fn tag(self) -> &'static str {
        match self {
            FeatureKind::Fillet => "fillet",
            FeatureKind::Chamfer => "chamfer",
        }
    }

    fn size_name(self) -> &'static str {
        match self {
            FeatureKind::Fillet => "radius",
            FeatureKind::Chamfer => "distance",
        }
    }
}

impl Shape {
    /// Round the selected edges (or all edges when nothing is selected).
    /// Unfeaturable edges are skipped by the kernel builder; on failure the
    /// pre-feature shape survives.
    pub fn fillet(&self, radius: f64) -> Shape {
        self.feature_op(FeatureKind::Fillet, radius)
    }

    /// Bevel the selected edges (or all edges when nothing is selected).
    pub fn chamfer(&self, distance: f64) -> Shape {
        self.feature_op(FeatureKind::Chamfer, distance)
    }

    fn feature_op(&self, kind: FeatureKind, size: f64) -> Shape {
        if !size.is_finite() || size <= 0.0 {
            self.errors().record(
                kind.tag(),
                format!("{} must be positive, got {}", kind.size_name(), size),
                None,
            );
            return self.clone();
        }
        let Some(geometry) = self.geometry() else {
            return self.clone();
        };

        let edges: Vec<EdgeId> = match self.selected_edges() {
            Some(edges) => edges,
            None => self.kernel().borrow().list_edges(&geometry),
        };
        if edges.is_empty() {
            self.errors().record(kind.tag(), "No edges were added", None);
            return self.clone();
        }

        let built = {
            let kernel = self.kernel();
            let mut kb = kernel.borrow_mut();
            match kind {
                FeatureKind::Fillet => kb.fillet_edges(&geometry, &edges, size),
                FeatureKind::Chamfer => kb.chamfer_edges(&geometry, &edges, size),
            }
        };

        match built {
            Ok(new_geometry) => self.rebuilt_after_cut(new_geometry),
            Err(e) => {
                self.errors().record(kind.tag(), e.to_string(), None);
                self.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::workbench::Workbench;
    use kernel_bridge::MockKernel;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn negative_radius_records_and_returns_original() {
        let wb = Workbench::new(MockKernel::new());
        let a = wb.cuboid(10.0, 10.0, 10.0);
        let b = a.fillet(-1.0);

        assert_eq!(b.geometry().unwrap().id(), a.geometry().unwrap().id());
        let err = wb.last_error().unwrap();
        assert_eq!(err.operation, "fillet");
        assert!(err.message.contains("-1"));

        // Selection still works afterwards.
        let top = b.faces(">z");
        assert_eq!(top.selected_faces().unwrap().len(), 1);
    }

    #[test]
    fn fillet_uses_edge_selection() {
        let wb = Workbench::new(MockKernel::new());
        let a = wb.cuboid(10.0, 10.0, 10.0);
        let b = a.faces(">z").edges("").fillet(1.0);
        assert!(b.has_geometry());
        assert_ne!(b.geometry().unwrap().id(), a.geometry().unwrap().id());
        assert!(wb.last_error().is_none());
    }

    #[test]
    fn fillet_without_selection_takes_all_edges() {
        let wb = Workbench::new(MockKernel::new());
        let a = wb.cuboid(10.0, 10.0, 10.0);
        let b = a.fillet(0.5);
        assert_ne!(b.geometry().unwrap().id(), a.geometry().unwrap().id());
    }

    #[test]
    fn empty_edge_selection_records_no_edges_added() {
        let wb = Workbench::new(MockKernel::new());
        let a = wb.cuboid(10.0, 10.0, 10.0);
        let b = a.filter_edges(|_| false).chamfer(1.0);
        assert_eq!(b.geometry().unwrap().id(), a.geometry().unwrap().id());
        let err = wb.last_error().unwrap();
        assert_eq!(err.operation, "chamfer");
        assert_eq!(err.message, "No edges were added");
    }

    #[test]
    fn kernel_refusing_every_edge_keeps_pre_feature_shape() {
        let mock = Rc::new(RefCell::new(MockKernel::new()));
        let wb = Workbench::from_shared(mock.clone());
        let a = wb.cuboid(10.0, 10.0, 10.0);

        let edges = a.faces(">z").edges("").selected_edges().unwrap();
        for edge in &edges {
            mock.borrow_mut().refuse_feature_edge(*edge);
        }

        let b = a.faces(">z").edges("").fillet(1.0);
        assert_eq!(b.geometry().unwrap().id(), a.geometry().unwrap().id());
        let err = wb.last_error().unwrap();
        assert_eq!(err.operation, "fillet");
        assert!(err.message.contains("No edges were added"));
    }
}
