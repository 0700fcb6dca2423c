//! Error types for memory access, publishing and publish cycles.

use thiserror::Error;

/// Errors from the robot memory service.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// No memory service was obtained when the aggregator was built.
    #[error("Not connected to the memory service")]
    NotConnected,

    /// The memory service could not be reached.
    #[error("Memory service unavailable: {0}")]
    Unavailable(String),

    /// A requested key does not exist in robot memory.
    #[error("Unknown memory key: {0}")]
    UnknownKey(String),

    /// A key holds something that is not a number.
    #[error("Value for {key} is not numeric: {value}")]
    InvalidValue { key: String, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse memory data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors from emitting a diagnostic array.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize diagnostics: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The channel receiver is not keeping up.
    #[error("Diagnostics channel is full")]
    ChannelFull,

    /// The channel receiver was dropped.
    #[error("Diagnostics channel is closed")]
    ChannelClosed,
}

/// Why a publish cycle did not complete.
///
/// A cycle that completes but finds a joint at `Error` is not an error:
/// it is reported as `Ok(false)` by [`JointDiagnostics::publish`].
///
/// [`JointDiagnostics::publish`]: crate::JointDiagnostics::publish
#[derive(Debug, Error)]
pub enum DiagnosticsError {
    /// The bulk read failed; nothing was published.
    #[error("Could not get joint data from the robot: {0}")]
    Query(#[from] MemoryError),

    /// The bulk read returned the wrong number of values; nothing was published.
    #[error("Memory service returned {actual} values, expected {expected}")]
    ResponseLength { expected: usize, actual: usize },

    /// The batch was built but could not be emitted.
    #[error("Failed to publish diagnostics: {0}")]
    Publish(#[from] PublishError),
}
