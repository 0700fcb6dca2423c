//! DiagnosticArray - one published batch of statuses.

use alloc::vec::Vec;

use crate::{DiagnosticStatus, Level, SchemaVersion};

/// A timestamped batch of diagnostic statuses.
///
/// This is the unit a publisher emits: every status produced in one cycle,
/// in the order they were produced.
///
/// # Example
///
/// ```rust
/// use jointwatch_types::{DiagnosticArray, DiagnosticStatus};
///
/// let array = DiagnosticArray::builder()
///     .timestamp_ms(1703160000000)
///     .status(DiagnosticStatus::new("joints:HeadYaw", "HeadYaw"))
///     .build();
///
/// // Serialize with serde (requires "serde" feature)
/// // let json = serde_json::to_string(&array)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct DiagnosticArray {
    /// Schema version for forward compatibility.
    #[cfg_attr(feature = "minicbor", n(0))]
    pub version: SchemaVersion,

    /// Unix timestamp in milliseconds when this batch was built.
    #[cfg_attr(feature = "minicbor", n(1))]
    pub timestamp_ms: u64,

    #[cfg_attr(feature = "minicbor", n(2))]
    pub status: Vec<DiagnosticStatus>,
}

impl DiagnosticArray {
    /// Create an empty array stamped with the current time.
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        Self::with_timestamp(current_timestamp_ms())
    }

    pub fn with_timestamp(timestamp_ms: u64) -> Self {
        Self {
            version: SchemaVersion::current(),
            timestamp_ms,
            status: Vec::new(),
        }
    }

    pub fn builder() -> DiagnosticArrayBuilder {
        DiagnosticArrayBuilder::new()
    }

    pub fn push(&mut self, status: DiagnosticStatus) {
        self.status.push(status);
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
    }

    pub fn len(&self) -> usize {
        self.status.len()
    }

    /// Find a status by name.
    pub fn get(&self, name: &str) -> Option<&DiagnosticStatus> {
        self.status.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticStatus> {
        self.status.iter()
    }

    /// Highest level in the batch, `Ok` when empty.
    pub fn max_level(&self) -> Level {
        self.status.iter().map(|s| s.level).max().unwrap_or_default()
    }
}

#[cfg(feature = "std")]
impl Default for DiagnosticArray {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing `DiagnosticArray` instances.
#[derive(Debug, Default)]
pub struct DiagnosticArrayBuilder {
    timestamp_ms: Option<u64>,
    status: Vec<DiagnosticStatus>,
}

impl DiagnosticArrayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a specific timestamp (milliseconds since Unix epoch).
    pub fn timestamp_ms(mut self, ts: u64) -> Self {
        self.timestamp_ms = Some(ts);
        self
    }

    pub fn status(mut self, status: DiagnosticStatus) -> Self {
        self.status.push(status);
        self
    }

    #[cfg(feature = "std")]
    pub fn build(self) -> DiagnosticArray {
        DiagnosticArray {
            version: SchemaVersion::current(),
            timestamp_ms: self.timestamp_ms.unwrap_or_else(current_timestamp_ms),
            status: self.status,
        }
    }

    /// Build with the timestamp given to the builder, or 0 (for no_std).
    #[cfg(not(feature = "std"))]
    pub fn build(self) -> DiagnosticArray {
        DiagnosticArray {
            version: SchemaVersion::current(),
            timestamp_ms: self.timestamp_ms.unwrap_or(0),
            status: self.status,
        }
    }
}

/// Get current timestamp in milliseconds since Unix epoch.
#[cfg(feature = "std")]
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DiagnosticArray {
        DiagnosticArray::builder()
            .timestamp_ms(1703160000000)
            .status(
                DiagnosticStatus::builder("joints:J1", "J1")
                    .level(Level::Warn)
                    .message("Hot")
                    .value("Temperature", 70.0_f32)
                    .build(),
            )
            .status(DiagnosticStatus::new("joints:J2", "J2"))
            .build()
    }

    #[test]
    fn builder_keeps_order_and_timestamp() {
        let array = sample();
        assert_eq!(array.timestamp_ms, 1703160000000);
        assert_eq!(array.len(), 2);
        assert_eq!(array.status[0].name, "joints:J1");
        assert_eq!(array.status[1].name, "joints:J2");
        assert!(array.version.is_compatible());
    }

    #[test]
    fn max_level_of_empty_is_ok() {
        assert_eq!(DiagnosticArray::with_timestamp(0).max_level(), Level::Ok);
        assert_eq!(sample().max_level(), Level::Warn);
    }

    #[test]
    fn get_by_name() {
        let array = sample();
        assert_eq!(array.get("joints:J1").map(|s| s.message.as_str()), Some("Hot"));
        assert!(array.get("joints:J3").is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let array = sample();
        let json = serde_json::to_string(&array).unwrap();
        let parsed: DiagnosticArray = serde_json::from_str(&json).unwrap();
        assert_eq!(array, parsed);
    }

    #[cfg(feature = "minicbor")]
    #[test]
    fn test_minicbor_roundtrip() {
        let array = sample();
        let bytes = minicbor::to_vec(&array).unwrap();
        let parsed: DiagnosticArray = minicbor::decode(&bytes).unwrap();
        assert_eq!(array, parsed);
    }
}
