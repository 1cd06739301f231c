//! Last-error capture. The fluent API never throws; every failure lands here
//! and the chain continues with a best-effort shape.

use std::cell::RefCell;
use std::rc::Rc;

use kernel_bridge::KernelError;
use serde::{Deserialize, Serialize};

/// Internal operation failure, translated into a `RecordedError` at the
/// fluent-API boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("{reason}")]
    InvalidParameter { reason: String },

    #[error("{reason}")]
    Resolution { reason: String },

    #[error("{reason}")]
    Font { reason: String },
}

/// One captured failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedError {
    /// Operation tag, e.g. "fillet" or "cutPattern".
    pub operation: String,
    pub message: String,
    pub cause: Option<String>,
    /// ISO-8601 capture time.
    pub timestamp: String,
}

/// Single-slot, most-recent-wins error store shared by a session's shapes.
#[derive(Clone)]
pub struct ErrorRegistry {
    slot: Rc<RefCell<Option<RecordedError>>>,
}

impl ErrorRegistry {
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
        }
    }

    pub fn record(&self, operation: &str, message: impl Into<String>, cause: Option<String>) {
        let message = message.into();
        log::warn!("{}: {}", operation, message);
        *self.slot.borrow_mut() = Some(RecordedError {
            operation: operation.to_string(),
            message,
            cause,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
    }

    pub fn record_failure(&self, operation: &str, error: &ModelError) {
        let cause = match error {
            ModelError::Kernel(k) => Some(k.to_string()),
            _ => None,
        };
        self.record(operation, error.to_string(), cause);
    }

    pub fn last(&self) -> Option<RecordedError> {
        self.slot.borrow().clone()
    }

    pub fn clear(&self) {
        *self.slot.borrow_mut() = None;
    }
}

impl Default for ErrorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
