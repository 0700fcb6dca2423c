//! A single named diagnostic status and its key/value fields.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Display;

use crate::Level;

/// One diagnostic field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct KeyValue {
    #[cfg_attr(feature = "minicbor", n(0))]
    pub key: String,

    #[cfg_attr(feature = "minicbor", n(1))]
    pub value: String,
}

impl KeyValue {
    /// Create a field, rendering the value with `Display`.
    pub fn new(key: impl Into<String>, value: impl Display) -> Self {
        Self {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

/// Status of one diagnosed component.
///
/// Fields keep insertion order so a consumer displays them the way the
/// producer listed them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct DiagnosticStatus {
    /// Component name, e.g. `joints:HeadYaw`.
    #[cfg_attr(feature = "minicbor", n(0))]
    pub name: String,

    /// Hardware the status refers to, e.g. `HeadYaw` or `robot`.
    #[cfg_attr(feature = "minicbor", n(1))]
    pub hardware_id: String,

    #[cfg_attr(feature = "minicbor", n(2))]
    pub level: Level,

    #[cfg_attr(feature = "minicbor", n(3))]
    pub message: String,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    #[cfg_attr(feature = "minicbor", n(4))]
    pub values: Vec<KeyValue>,
}

impl DiagnosticStatus {
    /// Create a status at `Ok` with an `"OK"` message and no fields.
    pub fn new(name: impl Into<String>, hardware_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hardware_id: hardware_id.into(),
            level: Level::Ok,
            message: String::from("OK"),
            values: Vec::new(),
        }
    }

    pub fn builder(name: impl Into<String>, hardware_id: impl Into<String>) -> DiagnosticStatusBuilder {
        DiagnosticStatusBuilder::new(name, hardware_id)
    }

    /// Append a field.
    pub fn add(&mut self, key: impl Into<String>, value: impl Display) {
        self.values.push(KeyValue::new(key, value));
    }

    /// Look up the first field with this key.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|kv| kv.key == key)
            .map(|kv| kv.value.as_str())
    }

    /// Set the level and message together.
    pub fn set(&mut self, level: Level, message: impl Into<String>) {
        self.level = level;
        self.message = message.into();
    }

    /// Set the level and derive the message from it (see [`Level::summary`]).
    pub fn set_summary(&mut self, level: Level) {
        self.set(level, level.summary());
    }
}

/// Builder for `DiagnosticStatus`.
#[derive(Debug)]
pub struct DiagnosticStatusBuilder {
    status: DiagnosticStatus,
}

impl DiagnosticStatusBuilder {
    pub fn new(name: impl Into<String>, hardware_id: impl Into<String>) -> Self {
        Self {
            status: DiagnosticStatus::new(name, hardware_id),
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.status.level = level;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.status.message = message.into();
        self
    }

    /// Append a field, rendered with `Display`.
    pub fn value(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.status.add(key, value);
        self
    }

    pub fn build(self) -> DiagnosticStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_status_defaults_to_ok() {
        let status = DiagnosticStatus::new("joints:Status", "robot");
        assert_eq!(status.level, Level::Ok);
        assert_eq!(status.message, "OK");
        assert!(status.values.is_empty());
    }

    #[test]
    fn float_values_render_like_display() {
        let status = DiagnosticStatus::builder("joints:LHand", "LHand")
            .value("Temperature", 70.0_f32)
            .value("Stiffness", 0.25_f32)
            .build();

        assert_eq!(status.value("Temperature"), Some("70"));
        assert_eq!(status.value("Stiffness"), Some("0.25"));
        assert_eq!(status.value("Missing"), None);
    }

    #[test]
    fn values_keep_insertion_order() {
        let mut status = DiagnosticStatus::new("a", "b");
        status.add("z", 1);
        status.add("a", 2);
        let keys: Vec<&str> = status.values.iter().map(|kv| kv.key.as_str()).collect();
        assert_eq!(keys, ["z", "a"]);
    }

    #[test]
    fn set_summary_derives_message() {
        let mut status = DiagnosticStatus::new("a", "b");
        status.set_summary(Level::Stale);
        assert_eq!(status.level, Level::Stale);
        assert_eq!(status.message, "ERROR");
    }
}
