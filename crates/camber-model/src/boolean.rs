//! Boolean operations and the drilled hole feature.

use kernel_bridge::{Kernel, KernelIntrospect, SolidHandle};

use crate::naming;
use crate::shape::{Selection, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BooleanKind {
    Union,
    Cut,
    Intersect,
}

impl BooleanKind {
    fn tag(self) -> &'static str {
        match self {
            BooleanKind::Union => "union",
            BooleanKind::Cut => "cut",
            BooleanKind::Intersect => "intersect",
        }
    }
}

impl Shape {
    /// Fuse with another shape. After a successful fuse the result is run
    /// through same-domain unification so later feature ops see merged
    /// coplanar faces; if unification fails the fused shape is kept.
    pub fn union(&self, other: &Shape) -> Shape {
        self.boolean_op(other, BooleanKind::Union)
    }

    /// Subtract another shape.
    pub fn cut(&self, other: &Shape) -> Shape {
        self.boolean_op(other, BooleanKind::Cut)
    }

    /// Keep the common volume with another shape.
    pub fn intersect(&self, other: &Shape) -> Shape {
        self.boolean_op(other, BooleanKind::Intersect)
    }

    fn boolean_op(&self, other: &Shape, kind: BooleanKind) -> Shape {
        let Some(a) = self.geometry() else {
            return self.clone();
        };
        let Some(b) = other.geometry() else {
            self.errors().record(
                kind.tag(),
                "right operand has no geometry",
                None,
            );
            return self.clone();
        };

        let kernel = self.kernel();
        let fused = {
            let mut kb = kernel.borrow_mut();
            match kind {
                BooleanKind::Union => kb.boolean_union(&a, &b),
                BooleanKind::Cut => kb.boolean_subtract(&a, &b),
                BooleanKind::Intersect => kb.boolean_intersect(&a, &b),
            }
        };
        let fused = match fused {
            Ok(h) => h,
            Err(e) => {
                self.errors().record(kind.tag(), e.to_string(), None);
                return self.clone();
            }
        };

        let final_geometry = if kind == BooleanKind::Union {
            self.unified_or_fused(fused)
        } else {
            fused
        };

        let (named_faces, sub_parts) = {
            let kb = kernel.borrow();
            naming::rematch_boolean(kb.as_introspect(), &final_geometry, self, other)
        };

        let mut next = self.clone();
        next.merge_display_from(other);
        next.set_geometry(Some(final_geometry));
        next.set_selection(Selection::None);
        next.set_named_faces(named_faces);
        next.set_pending_auto_name(None);
        next.invalidate_edge_names();
        next.set_sub_parts(sub_parts);
        next
    }

    /// Try same-domain unification; keep the fused shape when it fails or
    /// comes back empty.
    fn unified_or_fused(&self, fused: SolidHandle) -> SolidHandle {
        let kernel = self.kernel();
        let unified = kernel.borrow_mut().unify_same_domain(&fused);
        match unified {
            Ok(u) => {
                let has_faces = !kernel.borrow().list_faces(&u).is_empty();
                if has_faces {
                    u
                } else {
                    fused
                }
            }
            Err(_) => fused,
        }
    }

    /// Drill a circular hole along +Z through the bounding-box center in xy.
    /// Without a depth the drill passes through, exceeding the z-extent by 1
    /// on each side.
    pub fn hole(&self, diameter: f64, depth: Option<f64>) -> Shape {
        if !diameter.is_finite() || diameter <= 0.0 {
            self.errors().record(
                "hole",
                format!("diameter must be positive, got {}", diameter),
                None,
            );
            return self.clone();
        }
        if let Some(d) = depth {
            if !d.is_finite() || d <= 0.0 {
                self.errors().record(
                    "hole",
                    format!("depth must be positive, got {}", d),
                    None,
                );
                return self.clone();
            }
        }
        let Some(geometry) = self.geometry() else {
            return self.clone();
        };
        let Some(bbox) = self.bounding_box() else {
            self.errors()
                .record("hole", "shape has no bounding box", None);
            return self.clone();
        };

        let center_x = (bbox[0] + bbox[3]) / 2.0;
        let center_y = (bbox[1] + bbox[4]) / 2.0;
        let (drill_height, drill_base) = match depth {
            None => (bbox[5] - bbox[2] + 2.0, bbox[2] - 1.0),
            Some(d) => (d + 1.0, bbox[5] - d),
        };

        let kernel = self.kernel();
        let drilled = (|| {
            let mut kb = kernel.borrow_mut();
            let drill = kb.make_cylinder(diameter / 2.0, drill_height)?;
            let placed = kb.translate_solid(&drill, [center_x, center_y, drill_base])?;
            kb.boolean_subtract(&geometry, &placed)
        })();

        match drilled {
            Ok(new_geometry) => self.rebuilt_after_cut(new_geometry),
            Err(e) => {
                self.errors().record("hole", e.to_string(), None);
                self.clone()
            }
        }
    }
}
