//! # jointwatch-sdk
//!
//! Joint health aggregation for robots that expose their sensors through a
//! key/value memory service.
//!
//! Each cycle [`JointDiagnostics::publish`] reads temperature, stiffness and
//! electric current for every joint in one bulk call, classifies each joint
//! from its temperature, summarizes the whole body, and publishes one
//! [`DiagnosticArray`] (one status per joint plus an aggregate status).
//!
//! ## Quick Start
//!
//! ```rust
//! use jointwatch_sdk::{JointDiagnostics, JointReading, MapMemory, Output};
//!
//! let memory = MapMemory::new();
//! memory.set_joint("HeadYaw", JointReading::new(41.0, 1.0, 0.12));
//!
//! let (output, mut rx) = Output::channel(16);
//! let mut diagnostics = JointDiagnostics::new(&memory, output, ["HeadYaw"], 75.0);
//!
//! match diagnostics.publish() {
//!     Ok(true) => println!("robot healthy: {}", diagnostics.status_msg()),
//!     Ok(false) => println!("joint overheating: {}", diagnostics.status_msg()),
//!     Err(e) => println!("cycle failed: {e}"),
//! }
//!
//! let array = rx.try_recv().unwrap();
//! assert_eq!(array.len(), 2);
//! ```
//!
//! ## Classification
//!
//! | temperature | level | message |
//! |-------------|-------|---------|
//! | below 68°C | `Ok` | `OK` |
//! | 68°C up to the error level | `Warn` | `Hot` |
//! | error level and above | `Error` | `HIGH JOINT TEMPERATURE: <joint>` |

mod classify;
mod diagnostics;
mod error;
mod handle;
mod keys;
mod output;
mod summary;

pub mod memory;

pub use classify::{Thresholds, TEMPERATURE_WARN_LEVEL};
pub use diagnostics::{JointDiagnostics, JOINT_STATUS_PREFIX};
pub use error::{DiagnosticsError, MemoryError, PublishError};
pub use handle::StatusHandle;
pub use keys::{JointKeys, JointReading, Metric};
pub use memory::{MapMemory, MemoryProxy, Session};
pub use output::{DiagnosticPublisher, Output};
pub use summary::{JointSummary, STATUS_NAME};

// Re-export types for convenience
pub use jointwatch_types::{DiagnosticArray, DiagnosticStatus, KeyValue, Level};
