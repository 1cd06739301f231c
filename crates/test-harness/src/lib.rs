//! Scenario test support for the camber workspace.

pub mod helpers;

pub use helpers::{assert_bbox, BlockFont, HarnessError, ModelBench, RecordingWriter};
