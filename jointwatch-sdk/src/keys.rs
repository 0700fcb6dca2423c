//! Memory key layout for joint sensor readings.

/// A per-joint measurement read from robot memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    Stiffness,
    ElectricCurrent,
}

impl Metric {
    /// Metrics in the order they are laid out for each joint.
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Stiffness, Metric::ElectricCurrent];

    /// Robot memory key holding this metric for `joint`.
    pub fn key_for(self, joint: &str) -> String {
        let suffix = match self {
            Metric::Temperature => "Temperature/Sensor/Value",
            Metric::Stiffness => "Hardness/Actuator/Value",
            Metric::ElectricCurrent => "ElectricCurrent/Sensor/Value",
        };
        format!("Device/SubDeviceList/{joint}/{suffix}")
    }

    /// Field name used in a joint's diagnostic status.
    pub fn field(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Stiffness => "Stiffness",
            Metric::ElectricCurrent => "ElectricCurrent",
        }
    }
}

/// One joint's readings from a single bulk read.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointReading {
    /// Degrees Celsius.
    pub temperature: f32,
    /// 0.0 (limp) to 1.0 (full stiffness).
    pub stiffness: f32,
    /// Amperes.
    pub current: f32,
}

impl JointReading {
    pub fn new(temperature: f32, stiffness: f32, current: f32) -> Self {
        Self {
            temperature,
            stiffness,
            current,
        }
    }

    pub fn get(&self, metric: Metric) -> f32 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Stiffness => self.stiffness,
            Metric::ElectricCurrent => self.current,
        }
    }
}

/// The ordered joint list and the flat key sequence derived from it.
///
/// Keys are interleaved per joint as temperature, stiffness, current, so a
/// bulk read of [`JointKeys::keys`] answers positionally: value `i` belongs
/// to [`JointKeys::locate`]`(i)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointKeys {
    joints: Vec<String>,
    keys: Vec<String>,
}

impl JointKeys {
    pub fn new<I, S>(joints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let joints: Vec<String> = joints.into_iter().map(Into::into).collect();
        let keys = joints
            .iter()
            .flat_map(|joint| Metric::ALL.into_iter().map(move |metric| metric.key_for(joint)))
            .collect();
        Self { joints, keys }
    }

    pub fn joints(&self) -> &[String] {
        &self.joints
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Joint index and metric for position `index` of the key sequence.
    pub fn locate(&self, index: usize) -> Option<(usize, Metric)> {
        if index >= self.keys.len() {
            return None;
        }
        Some((index / Metric::ALL.len(), Metric::ALL[index % Metric::ALL.len()]))
    }

    /// Pair each joint with its readings from a bulk-read reply.
    ///
    /// `values` must hold exactly one value per key.
    pub fn readings<'a>(
        &'a self,
        values: &'a [f32],
    ) -> impl Iterator<Item = (&'a str, JointReading)> + 'a {
        self.joints
            .iter()
            .zip(values.chunks_exact(Metric::ALL.len()))
            .map(|(joint, chunk)| (joint.as_str(), JointReading::new(chunk[0], chunk[1], chunk[2])))
    }
}
