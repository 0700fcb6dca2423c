//! File-based robot memory.
//!
//! Reads a JSON object mapping memory keys to values, e.g. a dump taken
//! from the robot:
//!
//! ```json
//! {
//!     "Device/SubDeviceList/HeadYaw/Temperature/Sensor/Value": 41,
//!     "Device/SubDeviceList/HeadYaw/Hardness/Actuator/Value": 1.0,
//!     "Device/SubDeviceList/HeadYaw/ElectricCurrent/Sensor/Value": 0.12
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use jointwatch_sdk::memory::value_to_f32;
use jointwatch_sdk::{MemoryError, MemoryProxy, Session};
use serde_json::{Map, Value};

/// Opens a [`FileMemory`] if the dump file exists.
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Session for FileSession {
    type Memory = FileMemory;

    fn memory_service(&self) -> Result<FileMemory, MemoryError> {
        if !self.path.is_file() {
            return Err(MemoryError::Unavailable(format!(
                "memory file {} not found",
                self.path.display()
            )));
        }
        Ok(FileMemory {
            path: self.path.clone(),
        })
    }
}

/// Robot memory backed by a JSON file, re-read on every bulk read so that
/// whatever writes the dump can update it between cycles.
#[derive(Debug, Clone)]
pub struct FileMemory {
    path: PathBuf,
}

impl FileMemory {
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, MemoryError> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl MemoryProxy for FileMemory {
    fn get_list_data(&self, keys: &[String]) -> Result<Vec<f32>, MemoryError> {
        let values = self.load()?;
        keys.iter()
            .map(|key| {
                let value = values
                    .get(key)
                    .ok_or_else(|| MemoryError::UnknownKey(key.clone()))?;
                value_to_f32(key, value)
            })
            .collect()
    }
}
