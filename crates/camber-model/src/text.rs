//! Text solids built from font glyph outlines.
//!
//! The font parser is an external collaborator: anything implementing
//! `FontFace` can be registered. Glyph paths arrive as M/L/Q/C/Z commands,
//! are flattened to closed polylines, grouped into outer contours with their
//! holes, extruded and fused.

use std::rc::Rc;

use kernel_bridge::{Kernel, KernelError, KernelIntrospect, SolidHandle};

use crate::error::ModelError;
use crate::shape::{AutoName, Shape};
use crate::workbench::Workbench;

/// One glyph outline command, mirroring common font-path conventions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    QuadTo { x1: f64, y1: f64, x: f64, y: f64 },
    CurveTo { x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64 },
    Close,
}

/// Font provider seam: yields scaled outline commands for a string.
pub trait FontFace {
    fn units_per_em(&self) -> f64;
    fn glyph_path(&self, text: &str, size: f64) -> Vec<PathCommand>;
}

/// Registered fonts for one session. The first registered font is the
/// default.
pub struct FontRegistry {
    faces: Vec<(String, Rc<dyn FontFace>)>,
}

impl FontRegistry {
    pub fn new() -> Self {
        FontRegistry { faces: Vec::new() }
    }

    pub fn register(&mut self, name: &str, face: Rc<dyn FontFace>) {
        self.faces.push((name.to_string(), face));
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn FontFace>> {
        self.faces
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| Rc::clone(f))
    }

    pub fn default_face(&self) -> Option<Rc<dyn FontFace>> {
        self.faces.first().map(|(_, f)| Rc::clone(f))
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Optional text parameters.
#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    /// Extrusion depth; defaults to size / 5.
    pub depth: Option<f64>,
    /// Registered font name; defaults to the first registered font.
    pub font: Option<String>,
}

const QUAD_SEGMENTS: usize = 8;
const CUBIC_SEGMENTS: usize = 12;

/// Flatten a command stream into closed polyline contours.
fn flatten(commands: &[PathCommand]) -> Vec<Vec<[f64; 2]>> {
    let mut contours = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    let mut close_current = |current: &mut Vec<[f64; 2]>| {
        if current.len() >= 3 {
            contours.push(std::mem::take(current));
        } else {
            current.clear();
        }
    };

    for cmd in commands {
        match *cmd {
            PathCommand::MoveTo { x, y } => {
                close_current(&mut current);
                current.push([x, y]);
            }
            PathCommand::LineTo { x, y } => current.push([x, y]),
            PathCommand::QuadTo { x1, y1, x, y } => {
                let Some(&start) = current.last() else {
                    continue;
                };
                for i in 1..=QUAD_SEGMENTS {
                    let t = i as f64 / QUAD_SEGMENTS as f64;
                    let mt = 1.0 - t;
                    current.push([
                        mt * mt * start[0] + 2.0 * mt * t * x1 + t * t * x,
                        mt * mt * start[1] + 2.0 * mt * t * y1 + t * t * y,
                    ]);
                }
            }
            PathCommand::CurveTo { x1, y1, x2, y2, x, y } => {
                let Some(&start) = current.last() else {
                    continue;
                };
                for i in 1..=CUBIC_SEGMENTS {
                    let t = i as f64 / CUBIC_SEGMENTS as f64;
                    let mt = 1.0 - t;
                    current.push([
                        mt * mt * mt * start[0]
                            + 3.0 * mt * mt * t * x1
                            + 3.0 * mt * t * t * x2
                            + t * t * t * x,
                        mt * mt * mt * start[1]
                            + 3.0 * mt * mt * t * y1
                            + 3.0 * mt * t * t * y2
                            + t * t * t * y,
                    ]);
                }
            }
            PathCommand::Close => close_current(&mut current),
        }
    }
    close_current(&mut current);
    contours
}

fn contour_area(ring: &[[f64; 2]]) -> f64 {
    let n = ring.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += ring[i][0] * ring[j][1] - ring[j][0] * ring[i][1];
    }
    area / 2.0
}

fn contour_bbox(ring: &[[f64; 2]]) -> [f64; 4] {
    let mut bbox = [f64::MAX, f64::MAX, f64::MIN, f64::MIN];
    for p in ring {
        bbox[0] = bbox[0].min(p[0]);
        bbox[1] = bbox[1].min(p[1]);
        bbox[2] = bbox[2].max(p[0]);
        bbox[3] = bbox[3].max(p[1]);
    }
    bbox
}

fn bbox_contains(outer: [f64; 4], inner: [f64; 4]) -> bool {
    outer[0] <= inner[0] + 1e-9
        && outer[1] <= inner[1] + 1e-9
        && outer[2] >= inner[2] - 1e-9
        && outer[3] >= inner[3] - 1e-9
}

/// An outer contour plus the hole contours it encloses.
struct OutlineGroup {
    outer: Vec<[f64; 2]>,
    holes: Vec<Vec<[f64; 2]>>,
}

/// Split contours into outers and their holes by signed-area sign and
/// bounding-box containment.
fn group_contours(contours: Vec<Vec<[f64; 2]>>) -> Vec<OutlineGroup> {
    let mut measured: Vec<(Vec<[f64; 2]>, f64, [f64; 4])> = contours
        .into_iter()
        .map(|c| {
            let area = contour_area(&c);
            let bbox = contour_bbox(&c);
            (c, area, bbox)
        })
        .filter(|(_, area, _)| area.abs() > 1e-12)
        .collect();
    if measured.is_empty() {
        return Vec::new();
    }
    // The dominant winding belongs to outer contours.
    measured.sort_by(|a, b| {
        b.1.abs()
            .partial_cmp(&a.1.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let outer_sign = measured[0].1 > 0.0;

    let mut groups: Vec<(OutlineGroup, [f64; 4], f64)> = Vec::new();
    let mut holes: Vec<(Vec<[f64; 2]>, [f64; 4])> = Vec::new();
    for (contour, area, bbox) in measured {
        if (area > 0.0) == outer_sign {
            groups.push((
                OutlineGroup {
                    outer: contour,
                    holes: Vec::new(),
                },
                bbox,
                area.abs(),
            ));
        } else {
            holes.push((contour, bbox));
        }
    }

    for (hole, hole_bbox) in holes {
        // Smallest enclosing outer wins.
        let target = groups
            .iter_mut()
            .filter(|(_, bbox, _)| bbox_contains(*bbox, hole_bbox))
            .min_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));
        match target {
            Some((group, _, _)) => group.holes.push(hole),
            None => groups.push((
                // A hole with no enclosure is treated as its own outline.
                OutlineGroup {
                    outer: hole,
                    holes: Vec::new(),
                },
                hole_bbox,
                0.0,
            )),
        }
    }

    groups.into_iter().map(|(g, _, _)| g).collect()
}

impl Workbench {
    /// Register a font; the first one becomes the session default.
    pub fn register_font(&self, name: &str, face: Rc<dyn FontFace>) {
        self.fonts.borrow_mut().register(name, face);
    }

    /// Build an extruded text solid, centered in x/y with its bottom at z=0.
    pub fn text(&self, content: &str, size: f64, options: TextOptions) -> Shape {
        match self.build_text(content, size, &options) {
            Ok(handle) => {
                let mut shape = Shape::from_handle(self.kernel(), self.errors(), handle);
                shape.set_pending_auto_name(Some(AutoName::Box));
                shape
            }
            Err(e) => {
                self.errors().record_failure("text", &e);
                Shape::new_empty(self.kernel(), self.errors())
            }
        }
    }

    fn build_text(
        &self,
        content: &str,
        size: f64,
        options: &TextOptions,
    ) -> Result<SolidHandle, ModelError> {
        if content.is_empty() {
            return Err(ModelError::InvalidParameter {
                reason: "text must not be empty".to_string(),
            });
        }
        if !size.is_finite() || size <= 0.0 {
            return Err(ModelError::InvalidParameter {
                reason: format!("size must be positive, got {}", size),
            });
        }
        let depth = options.depth.unwrap_or(size / 5.0);
        if !depth.is_finite() || depth <= 0.0 {
            return Err(ModelError::InvalidParameter {
                reason: format!("depth must be positive, got {}", depth),
            });
        }

        let face = match &options.font {
            Some(name) => self.fonts.borrow().get(name).ok_or(ModelError::Font {
                reason: format!("no font registered under {:?}", name),
            })?,
            None => self.fonts.borrow().default_face().ok_or(ModelError::Font {
                reason: "no font loaded".to_string(),
            })?,
        };

        let contours = flatten(&face.glyph_path(content, size));
        let groups = group_contours(contours);
        if groups.is_empty() {
            return Err(ModelError::Font {
                reason: format!("text {:?} produced no outlines", content),
            });
        }

        let kernel = self.kernel();
        let mut kb = kernel.borrow_mut();
        let mut fused: Option<SolidHandle> = None;
        for group in &groups {
            let solid = kb.extrude_polygon(&group.outer, &group.holes, depth)?;
            fused = Some(match fused {
                None => solid,
                // Character solids are fused pairwise, in reading order.
                Some(acc) => kb.boolean_union(&acc, &solid)?,
            });
        }
        let fused = fused.ok_or(ModelError::Kernel(KernelError::Other {
            message: "no text solids produced".to_string(),
        }))?;

        let bbox = kb
            .bounding_box(&fused)
            .ok_or(ModelError::Kernel(KernelError::Other {
                message: "text solid has no bounds".to_string(),
            }))?;
        let center = camber_types::vec3::bbox_center(bbox);
        Ok(kb.translate_solid(&fused, [-center[0], -center[1], -bbox[2]])?)
    }
}
