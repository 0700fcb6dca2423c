//! Robot memory backends for the CLI.
//!
//! The SDK only knows the [`Session`] and [`MemoryProxy`] traits; this module
//! provides the backends the binary can be pointed at:
//!
//! - [`FileSession`]: a JSON dump of robot memory, re-read every cycle
//! - [`SimulatedMemory`]: a deterministic synthetic robot for demos

mod file;
mod simulated;

pub use file::{FileMemory, FileSession};
pub use simulated::SimulatedMemory;

use jointwatch_sdk::{MemoryError, MemoryProxy, Session};

/// Boxed memory proxy handed out by [`MemorySource`].
pub type BoxedMemory = Box<dyn MemoryProxy + Send>;

/// The memory backend selected by configuration.
#[derive(Debug, Clone)]
pub enum MemorySource {
    File(FileSession),
    Simulated(SimulatedMemory),
}

impl MemorySource {
    /// Human-readable description, for log lines.
    pub fn description(&self) -> String {
        match self {
            MemorySource::File(session) => format!("file: {}", session.path().display()),
            MemorySource::Simulated(_) => "simulated robot".to_string(),
        }
    }
}

impl Session for MemorySource {
    type Memory = BoxedMemory;

    fn memory_service(&self) -> Result<BoxedMemory, MemoryError> {
        Ok(match self {
            MemorySource::File(session) => Box::new(session.memory_service()?),
            MemorySource::Simulated(memory) => Box::new(memory.memory_service()?),
        })
    }
}
