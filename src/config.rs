//! Runtime settings.
//!
//! Settings come from, in increasing priority: built-in defaults, an
//! optional TOML file, and `JOINTWATCH_*` environment variables (nested keys
//! separated by `__`, lists by `,`). Command-line flags are applied on top by
//! the binary.
//!
//! ```toml
//! joints = ["HeadYaw", "HeadPitch", "LHand"]
//! temperature_error_level = 75.0
//! interval = "1s"
//!
//! [memory]
//! type = "file"
//! path = "memory.json"
//!
//! [[outputs]]
//! type = "file"
//! path = "diagnostics.json"
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use config::{Config, Environment, File};
use jointwatch_sdk::Output;
use serde::Deserialize;

use crate::duration::parse_duration;
use crate::source::{FileSession, MemorySource, SimulatedMemory};

/// Body joints of a NAO robot, in memory order.
pub const DEFAULT_JOINTS: &[&str] = &[
    "HeadYaw",
    "HeadPitch",
    "LShoulderPitch",
    "LShoulderRoll",
    "LElbowYaw",
    "LElbowRoll",
    "LWristYaw",
    "LHand",
    "LHipYawPitch",
    "LHipRoll",
    "LHipPitch",
    "LKneePitch",
    "LAnklePitch",
    "LAnkleRoll",
    "RHipRoll",
    "RHipPitch",
    "RKneePitch",
    "RAnklePitch",
    "RAnkleRoll",
    "RShoulderPitch",
    "RShoulderRoll",
    "RElbowYaw",
    "RElbowRoll",
    "RWristYaw",
    "RHand",
];

pub const DEFAULT_TEMPERATURE_ERROR_LEVEL: f32 = 75.0;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "JOINTWATCH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub joints: Vec<String>,
    pub temperature_error_level: f32,
    /// Poll period, e.g. `"1s"` or `"500ms"`.
    pub interval: String,
    pub memory: MemorySettings,
    pub outputs: Vec<OutputSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            joints: DEFAULT_JOINTS.iter().map(|j| j.to_string()).collect(),
            temperature_error_level: DEFAULT_TEMPERATURE_ERROR_LEVEL,
            interval: "1s".to_string(),
            memory: MemorySettings::default(),
            outputs: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("joints")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn interval(&self) -> Result<Duration> {
        let interval = parse_duration(&self.interval)?;
        if interval.is_zero() {
            return Err(anyhow!("Poll interval must be greater than zero"));
        }
        Ok(interval)
    }

    /// Configured outputs, or stdout when none are configured.
    pub fn outputs(&self) -> Vec<Output> {
        if self.outputs.is_empty() {
            return vec![Output::Stdout];
        }
        self.outputs.iter().map(OutputSettings::to_output).collect()
    }
}

/// Where joint readings come from.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MemorySettings {
    /// A JSON dump of robot memory.
    File { path: PathBuf },
    /// A synthetic robot.
    #[default]
    Simulated,
}

impl MemorySettings {
    pub fn to_source(&self) -> MemorySource {
        match self {
            MemorySettings::File { path } => MemorySource::File(FileSession::new(path)),
            MemorySettings::Simulated => MemorySource::Simulated(SimulatedMemory::new()),
        }
    }
}

/// Where diagnostic arrays go.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputSettings {
    File { path: PathBuf },
    Tcp { addr: String },
    Stdout,
}

impl OutputSettings {
    pub fn to_output(&self) -> Output {
        match self {
            OutputSettings::File { path } => Output::file(path),
            OutputSettings::Tcp { addr } => Output::tcp(addr.clone()),
            OutputSettings::Stdout => Output::Stdout,
        }
    }
}

/// Parses `stdout`, `file:<path>` and `tcp:<host:port>`.
impl FromStr for OutputSettings {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "stdout" {
            return Ok(OutputSettings::Stdout);
        }
        match s.split_once(':') {
            Some(("file", path)) if !path.is_empty() => Ok(OutputSettings::File {
                path: PathBuf::from(path),
            }),
            Some(("tcp", addr)) if !addr.is_empty() => Ok(OutputSettings::Tcp {
                addr: addr.to_string(),
            }),
            _ => Err(anyhow!(
                "Invalid output '{}': expected stdout, file:<path> or tcp:<host:port>",
                s
            )),
        }
    }
}
