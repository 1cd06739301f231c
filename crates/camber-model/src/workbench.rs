//! Session entry point: owns the kernel handle, the error registry and the
//! font registry, and builds primitive shapes.

use std::cell::RefCell;
use std::rc::Rc;

use kernel_bridge::{Kernel, KernelBundle};

use crate::error::{ErrorRegistry, RecordedError};
use crate::naming;
use crate::shape::{AutoName, Shape};
use crate::text::FontRegistry;

/// One modeling session. Shapes derived from it share the kernel and the
/// last-error slot; everything runs single-threaded and synchronous.
pub struct Workbench {
    kernel: Rc<RefCell<dyn KernelBundle>>,
    errors: ErrorRegistry,
    pub(crate) fonts: RefCell<FontRegistry>,
}

impl Workbench {
    pub fn new<K: KernelBundle + 'static>(kernel: K) -> Self {
        Self::from_shared(Rc::new(RefCell::new(kernel)))
    }

    /// Share an externally held kernel (tests keep their own handle to poke
    /// at mock state).
    pub fn from_shared(kernel: Rc<RefCell<dyn KernelBundle>>) -> Self {
        Workbench {
            kernel,
            errors: ErrorRegistry::new(),
            fonts: RefCell::new(FontRegistry::new()),
        }
    }

    pub fn kernel(&self) -> Rc<RefCell<dyn KernelBundle>> {
        Rc::clone(&self.kernel)
    }

    pub fn errors(&self) -> ErrorRegistry {
        self.errors.clone()
    }

    pub fn last_error(&self) -> Option<RecordedError> {
        self.errors.last()
    }

    pub fn clear_last_error(&self) {
        self.errors.clear()
    }

    fn empty_shape(&self) -> Shape {
        Shape::new_empty(self.kernel(), self.errors())
    }

    fn check_positive(&self, operation: &str, name: &str, value: f64) -> bool {
        if !value.is_finite() {
            self.errors.record(
                operation,
                format!("{} must be a number, got {}", name, value),
                None,
            );
            return false;
        }
        if value <= 0.0 {
            self.errors.record(
                operation,
                format!("{} must be positive, got {}", name, value),
                None,
            );
            return false;
        }
        true
    }

    /// Box spanning [-l/2, l/2] x [-w/2, w/2] x [0, h], faces auto-named.
    /// (`box` is a Rust keyword, hence the name.)
    pub fn cuboid(&self, length: f64, width: f64, height: f64) -> Shape {
        for (name, value) in [("length", length), ("width", width), ("height", height)] {
            if !self.check_positive("cuboid", name, value) {
                return self.empty_shape();
            }
        }
        let handle = match self.kernel.borrow_mut().make_box(length, width, height) {
            Ok(h) => h,
            Err(e) => {
                self.errors.record("cuboid", e.to_string(), None);
                return self.empty_shape();
            }
        };
        let faces = {
            let kb = self.kernel.borrow();
            naming::auto_name_faces(kb.as_introspect(), &handle, AutoName::Box)
        };
        let mut shape = Shape::from_handle(self.kernel(), self.errors(), handle);
        shape.set_named_faces(faces);
        shape
    }

    /// Cylinder on the z-axis, z = 0..h, caps and side auto-named.
    pub fn cylinder(&self, radius: f64, height: f64) -> Shape {
        for (name, value) in [("radius", radius), ("height", height)] {
            if !self.check_positive("cylinder", name, value) {
                return self.empty_shape();
            }
        }
        let handle = match self.kernel.borrow_mut().make_cylinder(radius, height) {
            Ok(h) => h,
            Err(e) => {
                self.errors.record("cylinder", e.to_string(), None);
                return self.empty_shape();
            }
        };
        let faces = {
            let kb = self.kernel.borrow();
            naming::auto_name_faces(kb.as_introspect(), &handle, AutoName::Cylinder)
        };
        let mut shape = Shape::from_handle(self.kernel(), self.errors(), handle);
        shape.set_named_faces(faces);
        shape
    }

    /// Sphere resting on the build plate (center (0, 0, r)).
    pub fn sphere(&self, radius: f64) -> Shape {
        if !self.check_positive("sphere", "radius", radius) {
            return self.empty_shape();
        }
        match self.kernel.borrow_mut().make_sphere(radius) {
            Ok(handle) => Shape::from_handle(self.kernel(), self.errors(), handle),
            Err(e) => {
                self.errors.record("sphere", e.to_string(), None);
                self.empty_shape()
            }
        }
    }

    /// Regular prism: n sides, across-flats width, extruded +Z.
    /// Face naming is deferred to first access.
    pub fn polygon_prism(&self, sides: u32, flat_to_flat: f64, height: f64) -> Shape {
        if sides < 3 {
            self.errors.record(
                "polygonPrism",
                format!("sides must be at least 3, got {}", sides),
                None,
            );
            return self.empty_shape();
        }
        for (name, value) in [("flatToFlat", flat_to_flat), ("height", height)] {
            if !self.check_positive("polygonPrism", name, value) {
                return self.empty_shape();
            }
        }
        match self
            .kernel
            .borrow_mut()
            .make_prism(sides, flat_to_flat, height)
        {
            Ok(handle) => {
                let mut shape = Shape::from_handle(self.kernel(), self.errors(), handle);
                shape.set_pending_auto_name(Some(AutoName::Box));
                shape
            }
            Err(e) => {
                self.errors.record("polygonPrism", e.to_string(), None);
                self.empty_shape()
            }
        }
    }
}
