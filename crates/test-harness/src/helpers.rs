//! Shared scenario plumbing: a mock-backed workbench with direct kernel
//! access, a block test font, and a recording 3MF writer.

use std::cell::RefCell;
use std::rc::Rc;

use camber_model::{FontFace, PathCommand, Shape, Workbench};
use kernel_bridge::MockKernel;
use mesh_export::{ExportError, PackageWriter, PartBundle};

/// Unified error type for harness assertions.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

/// A workbench over a shared mock kernel the test can inspect.
pub struct ModelBench {
    pub kernel: Rc<RefCell<MockKernel>>,
    pub bench: Workbench,
}

impl ModelBench {
    pub fn mock() -> Self {
        let kernel = Rc::new(RefCell::new(MockKernel::new()));
        let bench = Workbench::from_shared(kernel.clone());
        ModelBench { kernel, bench }
    }

    /// Mock workbench with the block test font pre-registered.
    pub fn mock_with_font() -> Self {
        let this = Self::mock();
        this.bench.register_font("block", Rc::new(BlockFont));
        this
    }
}

/// Assert a shape's bounding box within tolerance.
pub fn assert_bbox(
    shape: &Shape,
    expected: [f64; 6],
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let Some(actual) = shape.bounding_box() else {
        return Err(HarnessError::AssertionFailed {
            detail: format!("[{}] shape has no bounding box", ctx),
        });
    };
    for i in 0..6 {
        if (actual[i] - expected[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bbox[{}]: expected {:.3}, got {:.3} (tol={})",
                    ctx, i, expected[i], actual[i], tol
                ),
            });
        }
    }
    Ok(())
}

/// Fixed-pitch block "font": every character is a filled square; 'o' and 'O'
/// carry a counter wound the other way.
pub struct BlockFont;

impl FontFace for BlockFont {
    fn units_per_em(&self) -> f64 {
        1000.0
    }

    fn glyph_path(&self, text: &str, size: f64) -> Vec<PathCommand> {
        let mut commands = Vec::new();
        let advance = size * 0.8;
        for (i, ch) in text.chars().enumerate() {
            let x0 = i as f64 * advance;
            let w = size * 0.6;
            commands.extend([
                PathCommand::MoveTo { x: x0, y: 0.0 },
                PathCommand::LineTo { x: x0 + w, y: 0.0 },
                PathCommand::LineTo { x: x0 + w, y: size },
                PathCommand::LineTo { x: x0, y: size },
                PathCommand::Close,
            ]);
            if ch == 'o' || ch == 'O' {
                let inset = size * 0.2;
                commands.extend([
                    PathCommand::MoveTo {
                        x: x0 + inset,
                        y: inset,
                    },
                    PathCommand::LineTo {
                        x: x0 + inset,
                        y: size - inset,
                    },
                    PathCommand::LineTo {
                        x: x0 + w - inset,
                        y: size - inset,
                    },
                    PathCommand::LineTo {
                        x: x0 + w - inset,
                        y: inset,
                    },
                    PathCommand::Close,
                ]);
            }
        }
        commands
    }
}

/// 3MF writer double that records the bundles it receives.
#[derive(Default)]
pub struct RecordingWriter {
    pub parts: Vec<PartBundle>,
    pub calls: usize,
}

impl PackageWriter for RecordingWriter {
    fn write(&mut self, parts: &[PartBundle]) -> Result<Vec<u8>, ExportError> {
        self.parts = parts.to_vec();
        self.calls += 1;
        Ok(b"PK-3mf-package".to_vec())
    }
}
