//! Cross-joint statistics for the aggregate status.

use std::fmt::Write;

use jointwatch_types::{DiagnosticStatus, Level};

use crate::keys::JointReading;

/// Name of the aggregate and running statuses.
pub const STATUS_NAME: &str = "joints:Status";

/// Running min/max over one cycle's joints.
///
/// Each statistic falls back to a neutral seed when no joint contributed to
/// it (max temperature 0, stiffness range 1..0, current range 10..0).
#[derive(Debug, Clone, Default)]
pub struct JointSummary {
    level: Level,
    max_temperature: Option<f32>,
    max_stiffness: Option<f32>,
    min_stiffness: Option<f32>,
    min_stiffness_wo_hands: Option<f32>,
    max_current: Option<f32>,
    min_current: Option<f32>,
    hot_joints: String,
}

fn max(acc: Option<f32>, v: f32) -> Option<f32> {
    Some(acc.map_or(v, |a| a.max(v)))
}

fn min(acc: Option<f32>, v: f32) -> Option<f32> {
    Some(acc.map_or(v, |a| a.min(v)))
}

impl JointSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one classified joint into the summary.
    pub fn record(&mut self, joint: &str, reading: &JointReading, level: Level) {
        self.level = self.level.max(level);
        self.max_temperature = max(self.max_temperature, reading.temperature);
        self.max_stiffness = max(self.max_stiffness, reading.stiffness);
        self.min_stiffness = min(self.min_stiffness, reading.stiffness);
        if !joint.contains("Hand") {
            self.min_stiffness_wo_hands = min(self.min_stiffness_wo_hands, reading.stiffness);
        }
        self.max_current = max(self.max_current, reading.current);
        self.min_current = min(self.min_current, reading.current);
        if level >= Level::Warn {
            // Infallible for String.
            let _ = write!(self.hot_joints, "\n{joint}: {}°C", reading.temperature);
        }
    }

    /// Highest joint level seen.
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn max_temperature(&self) -> f32 {
        self.max_temperature.unwrap_or(0.0)
    }

    pub fn max_stiffness(&self) -> f32 {
        self.max_stiffness.unwrap_or(0.0)
    }

    pub fn min_stiffness(&self) -> f32 {
        self.min_stiffness.unwrap_or(1.0)
    }

    /// Lowest stiffness among joints whose name does not contain `Hand`.
    pub fn min_stiffness_wo_hands(&self) -> f32 {
        self.min_stiffness_wo_hands.unwrap_or(1.0)
    }

    pub fn max_current(&self) -> f32 {
        self.max_current.unwrap_or(0.0)
    }

    pub fn min_current(&self) -> f32 {
        self.min_current.unwrap_or(10.0)
    }

    /// One `"\n<joint>: <temperature>°C"` entry per joint at `Warn` or above.
    pub fn hot_joints(&self) -> &str {
        &self.hot_joints
    }

    /// Build the aggregate status for this cycle.
    pub fn to_status(&self) -> DiagnosticStatus {
        let mut status = DiagnosticStatus::new(STATUS_NAME, "joints");
        status.set_summary(self.level);
        status.add("Highest Temperature", self.max_temperature());
        status.add("Highest Stiffness", self.max_stiffness());
        status.add("Lowest Stiffness", self.min_stiffness());
        status.add("Lowest Stiffness without Hands", self.min_stiffness_wo_hands());
        status.add("Highest Electric Current", self.max_current());
        status.add("Lowest Electric Current", self.min_current());
        status.add("Hot Joints", self.hot_joints());
        status
    }
}
