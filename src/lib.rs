//! # jointwatch
//!
//! A command-line joint health monitor for humanoid robots, built on
//! [`jointwatch_sdk`].
//!
//! The binary polls joint sensors on a timer, classifies every joint by
//! temperature and publishes one diagnostic array per cycle to stdout,
//! files or TCP endpoints.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐    ┌──────────────────┐    ┌──────────┐
//! │  source  │───▶│ JointDiagnostics │───▶│ outputs  │
//! │ (memory) │    │   (jointwatch-   │    │ stdout / │
//! └──────────┘    │       sdk)       │    │ file/tcp │
//!      ▲          └────────▲─────────┘    └──────────┘
//!      │                   │
//! ┌────┴───────────────────┴──┐
//! │ config + runner (timer)   │
//! └───────────────────────────┘
//! ```
//!
//! - **[`source`]**: memory backends, a JSON dump file or a simulated robot
//! - **[`config`]**: layered settings from defaults, a TOML file and the environment
//! - **[`runner`]**: the poll loop and per-cycle outcome
//! - **[`duration`]**: human-readable durations such as `500ms`
//!
//! ## Usage
//!
//! ```bash
//! # Simulated robot, JSON lines on stdout
//! jointwatch
//!
//! # Read a memory dump, write the latest array to a file
//! jointwatch --memory-file memory.json --output file:diagnostics.json
//!
//! # One cycle, exit code reports health
//! jointwatch --memory-file memory.json --once
//! ```

pub mod config;
pub mod duration;
pub mod runner;
pub mod source;

pub use config::{MemorySettings, OutputSettings, Settings};
pub use runner::{run_cycle, run_until, CycleOutcome};
pub use source::{FileMemory, FileSession, MemorySource, SimulatedMemory};
