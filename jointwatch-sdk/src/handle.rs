//! Shared view of the running overall status.

use std::sync::Arc;

use jointwatch_types::{DiagnosticStatus, Level};
use parking_lot::RwLock;

use crate::summary::STATUS_NAME;

/// A cloneable, read-only handle on an aggregator's running status.
///
/// The aggregator is the only writer. Readers on other threads see the
/// status as of the last change, which includes the reset to `Ok` at the
/// start of every cycle.
///
/// # Example
///
/// ```rust
/// use jointwatch_sdk::{JointDiagnostics, MapMemory, Output};
///
/// let memory = MapMemory::new();
/// let diagnostics = JointDiagnostics::new(memory, Output::Stdout, ["HeadYaw"], 75.0);
///
/// let handle = diagnostics.status_handle();
/// assert_eq!(handle.message(), "OK");
/// ```
#[derive(Clone)]
pub struct StatusHandle {
    status: Arc<RwLock<DiagnosticStatus>>,
}

impl StatusHandle {
    pub(crate) fn new() -> Self {
        Self {
            status: Arc::new(RwLock::new(DiagnosticStatus::new(STATUS_NAME, "robot"))),
        }
    }

    pub fn level(&self) -> Level {
        self.status.read().level
    }

    pub fn message(&self) -> String {
        self.status.read().message.clone()
    }

    /// Copy of the whole running status.
    pub fn snapshot(&self) -> DiagnosticStatus {
        self.status.read().clone()
    }

    /// Back to `Ok` / `"OK"`.
    pub(crate) fn reset(&self) {
        self.status.write().set(Level::Ok, "OK");
    }

    /// Take over `status`'s level and message if its level is strictly higher.
    pub(crate) fn escalate(&self, status: &DiagnosticStatus) -> bool {
        let mut current = self.status.write();
        if status.level > current.level {
            current.set(status.level, status.message.clone());
            true
        } else {
            false
        }
    }
}

impl std::fmt::Debug for StatusHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.status.read();
        f.debug_struct("StatusHandle")
            .field("level", &status.level)
            .field("message", &status.message)
            .finish()
    }
}
