//! Synthetic robot memory.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use jointwatch_sdk::{MemoryError, MemoryProxy, Metric, Session};

const KEY_PREFIX: &str = "Device/SubDeviceList/";

/// A pretend robot whose joints slowly heat up and cool down.
///
/// Every bulk read advances one tick. Each joint's temperature follows a sine
/// wave between 40°C and 76°C with a phase derived from its name, so some
/// joints cross the warn level and a few briefly reach a 75°C error level.
/// Values are deterministic for a given tick.
#[derive(Debug, Clone, Default)]
pub struct SimulatedMemory {
    tick: Arc<AtomicU64>,
}

impl SimulatedMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at a given tick.
    pub fn starting_at(tick: u64) -> Self {
        Self {
            tick: Arc::new(AtomicU64::new(tick)),
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick.load(Ordering::Relaxed)
    }

    /// Value of `metric` for `joint` at `tick`.
    pub fn value_at(joint: &str, metric: Metric, tick: u64) -> f32 {
        let phase = joint.bytes().map(u32::from).sum::<u32>() as f32 * 0.37;
        let wave = ((tick as f32) * 0.05 + phase).sin();
        let temperature = 58.0 + 18.0 * wave;
        match metric {
            Metric::Temperature => temperature,
            Metric::Stiffness if joint.contains("Hand") => 0.3,
            Metric::Stiffness => 1.0,
            Metric::ElectricCurrent => 0.05 + (temperature - 40.0) * 0.02,
        }
    }
}

/// Split a memory key into joint name and metric.
fn parse_key(key: &str) -> Option<(&str, Metric)> {
    let rest = key.strip_prefix(KEY_PREFIX)?;
    let (joint, _) = rest.split_once('/')?;
    Metric::ALL
        .into_iter()
        .find(|metric| metric.key_for(joint) == key)
        .map(|metric| (joint, metric))
}

impl MemoryProxy for SimulatedMemory {
    fn get_list_data(&self, keys: &[String]) -> Result<Vec<f32>, MemoryError> {
        let tick = self.tick.fetch_add(1, Ordering::Relaxed);
        keys.iter()
            .map(|key| {
                let (joint, metric) =
                    parse_key(key).ok_or_else(|| MemoryError::UnknownKey(key.clone()))?;
                Ok(Self::value_at(joint, metric, tick))
            })
            .collect()
    }
}

impl Session for SimulatedMemory {
    type Memory = SimulatedMemory;

    fn memory_service(&self) -> Result<SimulatedMemory, MemoryError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys() {
        assert_eq!(
            parse_key("Device/SubDeviceList/LHand/Hardness/Actuator/Value"),
            Some(("LHand", Metric::Stiffness))
        );
        assert_eq!(parse_key("Device/SubDeviceList/LHand/Position/Sensor/Value"), None);
        assert_eq!(parse_key("Motion/Walk"), None);
    }

    #[test]
    fn each_read_advances_one_tick() {
        let memory = SimulatedMemory::starting_at(10);
        let keys = vec![Metric::Temperature.key_for("HeadYaw")];

        let first = memory.get_list_data(&keys).unwrap();
        let second = memory.get_list_data(&keys).unwrap();

        assert_eq!(memory.tick(), 12);
        assert_eq!(first[0], SimulatedMemory::value_at("HeadYaw", Metric::Temperature, 10));
        assert_eq!(second[0], SimulatedMemory::value_at("HeadYaw", Metric::Temperature, 11));
    }

    #[test]
    fn temperatures_stay_in_band() {
        for tick in (0..2000).step_by(7) {
            let t = SimulatedMemory::value_at("RKneePitch", Metric::Temperature, tick);
            assert!((40.0..=76.0).contains(&t), "tick {tick}: {t}");
        }
    }

    #[test]
    fn hands_are_limp() {
        assert_eq!(SimulatedMemory::value_at("RHand", Metric::Stiffness, 0), 0.3);
        assert_eq!(SimulatedMemory::value_at("RElbowYaw", Metric::Stiffness, 0), 1.0);
    }

    #[test]
    fn unknown_key_fails_the_read() {
        let memory = SimulatedMemory::new();
        let err = memory.get_list_data(&["Motion/Walk".to_string()]).unwrap_err();
        assert!(matches!(err, MemoryError::UnknownKey(_)));
    }
}
