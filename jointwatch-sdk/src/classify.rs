//! Per-joint temperature classification.

use jointwatch_types::Level;

/// Temperature (°C) from which a joint is reported as hot.
pub const TEMPERATURE_WARN_LEVEL: f32 = 68.0;

/// Temperature bounds for joint classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub warn: f32,
    pub error: f32,
}

impl Thresholds {
    /// Fixed warn level with the given error level.
    pub fn new(error: f32) -> Self {
        Self {
            warn: TEMPERATURE_WARN_LEVEL,
            error,
        }
    }

    /// Level and message for a joint at `temperature`.
    ///
    /// The warn bound is checked first, so an error level at or below the
    /// warn level turns every hot joint into an error.
    pub fn classify(&self, joint: &str, temperature: f32) -> (Level, String) {
        if temperature < self.warn {
            (Level::Ok, "OK".to_string())
        } else if temperature < self.error {
            (Level::Warn, "Hot".to_string())
        } else {
            (Level::Error, format!("HIGH JOINT TEMPERATURE: {joint}"))
        }
    }
}
