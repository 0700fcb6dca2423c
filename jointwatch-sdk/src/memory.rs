//! Access to the robot memory service.
//!
//! The aggregator only needs one operation from the robot: a bulk read that
//! takes an ordered list of keys and answers with one number per key in the
//! same order. [`MemoryProxy`] is that operation; [`Session`] is whatever
//! hands out a proxy and may fail to do so.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::MemoryError;
use crate::keys::{JointReading, Metric};

/// Bulk key/value reads from robot memory.
pub trait MemoryProxy {
    /// Read every key in one call, returning values in key order.
    fn get_list_data(&self, keys: &[String]) -> Result<Vec<f32>, MemoryError>;
}

impl<T: MemoryProxy + ?Sized> MemoryProxy for &T {
    fn get_list_data(&self, keys: &[String]) -> Result<Vec<f32>, MemoryError> {
        (**self).get_list_data(keys)
    }
}

impl<T: MemoryProxy + ?Sized> MemoryProxy for Box<T> {
    fn get_list_data(&self, keys: &[String]) -> Result<Vec<f32>, MemoryError> {
        (**self).get_list_data(keys)
    }
}

impl<T: MemoryProxy + ?Sized> MemoryProxy for Arc<T> {
    fn get_list_data(&self, keys: &[String]) -> Result<Vec<f32>, MemoryError> {
        (**self).get_list_data(keys)
    }
}

/// A connection to the robot from which the memory service is obtained.
pub trait Session {
    type Memory: MemoryProxy;

    /// Look up the memory service. Fails when the robot is unreachable.
    fn memory_service(&self) -> Result<Self::Memory, MemoryError>;
}

/// Convert a loosely typed memory value to `f32`.
///
/// Robot memory answers with integers, floats or booleans depending on the
/// device; all of them are accepted. Anything else is rejected.
pub fn value_to_f32(key: &str, value: &Value) -> Result<f32, MemoryError> {
    match value {
        Value::Number(n) => n.as_f64().map(|v| v as f32).ok_or_else(|| invalid(key, value)),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        _ => Err(invalid(key, value)),
    }
}

fn invalid(key: &str, value: &Value) -> MemoryError {
    MemoryError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// In-process robot memory.
///
/// Clones share the same storage, so one clone can be handed to an
/// aggregator while another keeps updating readings.
#[derive(Debug, Clone, Default)]
pub struct MapMemory {
    values: Arc<RwLock<BTreeMap<String, f32>>>,
}

impl MapMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: f32) {
        self.values.write().insert(key.into(), value);
    }

    /// Store all three readings of `joint` under their memory keys.
    pub fn set_joint(&self, joint: &str, reading: JointReading) {
        let mut values = self.values.write();
        for metric in Metric::ALL {
            values.insert(metric.key_for(joint), reading.get(metric));
        }
    }

    pub fn remove(&self, key: &str) -> Option<f32> {
        self.values.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl MemoryProxy for MapMemory {
    fn get_list_data(&self, keys: &[String]) -> Result<Vec<f32>, MemoryError> {
        let values = self.values.read();
        keys.iter()
            .map(|key| {
                values
                    .get(key)
                    .copied()
                    .ok_or_else(|| MemoryError::UnknownKey(key.clone()))
            })
            .collect()
    }
}

impl Session for MapMemory {
    type Memory = MapMemory;

    fn memory_service(&self) -> Result<MapMemory, MemoryError> {
        Ok(self.clone())
    }
}
