//! # jointwatch-types
//!
//! Diagnostic status types for robot joint health reporting. These mirror the
//! shape of the usual robotics diagnostics message: a timestamped array of
//! named statuses, each carrying a severity level, a message and a list of
//! key/value fields.
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON/MessagePack/etc. serialization via serde
//! - `minicbor`: Compact binary serialization via CBOR
//! - `all`: Enable all serialization formats
//!
//! ## Example
//!
//! ```rust
//! use jointwatch_types::{DiagnosticArray, DiagnosticStatus, Level};
//!
//! let array = DiagnosticArray::builder()
//!     .status(
//!         DiagnosticStatus::builder("joints:HeadYaw", "HeadYaw")
//!             .level(Level::Warn)
//!             .message("Hot")
//!             .value("Temperature", 70.0_f32)
//!             .build(),
//!     )
//!     .build();
//!
//! assert_eq!(array.max_level(), Level::Warn);
//! assert_eq!(array.status[0].value("Temperature"), Some("70"));
//! ```
//!
//! ## Schema Version
//!
//! The current schema version is **1**. The version is included in serialized
//! arrays so consumers can handle format evolution.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod array;
mod level;
mod status;
mod version;

pub use array::*;
pub use level::*;
pub use status::*;
pub use version::*;

/// Current schema version.
///
/// Increment this when making breaking changes to the array format.
pub const SCHEMA_VERSION: u32 = 1;
