//! The joint health aggregator.

use jointwatch_types::{DiagnosticArray, DiagnosticStatus, Level};
use tracing::{debug, error, info, warn};

use crate::classify::Thresholds;
use crate::error::{DiagnosticsError, MemoryError};
use crate::handle::StatusHandle;
use crate::keys::{JointKeys, JointReading, Metric};
use crate::memory::{MemoryProxy, Session};
use crate::output::DiagnosticPublisher;
use crate::summary::JointSummary;

/// Prefix of every per-joint status name.
pub const JOINT_STATUS_PREFIX: &str = "joints:";

/// Polls joint sensors, classifies each joint and publishes one
/// diagnostic array per cycle.
///
/// Cycles are meant to be driven serially by one caller, typically on a
/// timer. The running overall status persists between cycles and can be
/// read with [`status_msg`](Self::status_msg) or shared through a
/// [`StatusHandle`].
///
/// # Example
///
/// ```rust
/// use jointwatch_sdk::{JointDiagnostics, JointReading, MapMemory, Output};
///
/// let memory = MapMemory::new();
/// memory.set_joint("HeadYaw", JointReading::new(45.0, 1.0, 0.1));
/// memory.set_joint("LHand", JointReading::new(70.0, 0.2, 0.0));
///
/// let (output, mut rx) = Output::channel(4);
/// let mut diagnostics = JointDiagnostics::new(&memory, output, ["HeadYaw", "LHand"], 75.0);
///
/// // LHand is hot but below the error level, so the robot is still healthy.
/// assert!(diagnostics.publish().unwrap());
/// assert_eq!(diagnostics.status_msg(), "Hot");
///
/// let array = rx.try_recv().unwrap();
/// assert_eq!(array.len(), 3);
/// ```
pub struct JointDiagnostics<M, P> {
    memory: Option<M>,
    publisher: P,
    keys: JointKeys,
    thresholds: Thresholds,
    status: StatusHandle,
}

impl<M, P> JointDiagnostics<M, P>
where
    M: MemoryProxy,
    P: DiagnosticPublisher,
{
    /// Build an aggregator over an already obtained memory proxy.
    ///
    /// The warn level is fixed at
    /// [`TEMPERATURE_WARN_LEVEL`](crate::TEMPERATURE_WARN_LEVEL).
    pub fn new<I, S>(memory: M, publisher: P, joints: I, temperature_error_level: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(Some(memory), publisher, joints, temperature_error_level)
    }

    /// Build an aggregator, asking `session` for the memory service.
    ///
    /// A session failure is logged and otherwise ignored: the aggregator is
    /// still returned and each cycle then fails at the query step.
    pub fn connect<T, I, S>(
        session: &T,
        publisher: P,
        joints: I,
        temperature_error_level: f32,
    ) -> Self
    where
        T: Session<Memory = M>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let memory = match session.memory_service() {
            Ok(memory) => Some(memory),
            Err(e) => {
                error!("Failed to connect to the memory service: {}", e);
                None
            }
        };
        Self::build(memory, publisher, joints, temperature_error_level)
    }

    fn build<I, S>(memory: Option<M>, publisher: P, joints: I, temperature_error_level: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys = JointKeys::new(joints);
        let thresholds = Thresholds::new(temperature_error_level);
        info!(
            "Joint diagnostics for {} joints (warn at {}°C, error at {}°C)",
            keys.joints().len(),
            thresholds.warn,
            thresholds.error
        );
        Self {
            memory,
            publisher,
            keys,
            thresholds,
            status: StatusHandle::new(),
        }
    }

    /// Run one poll-classify-publish cycle.
    ///
    /// Returns `Ok(true)` when no joint reached `Error`, `Ok(false)` when
    /// one did. `Err` means the cycle did not complete: on a query failure
    /// nothing is published and the running status stays at `Ok`.
    pub fn publish(&mut self) -> Result<bool, DiagnosticsError> {
        self.status.reset();

        let values = self.query().map_err(|e| {
            error!("{}", e);
            e
        })?;

        let array = self.collect(&values);
        debug!(
            "Publishing {} statuses, overall {} ({})",
            array.len(),
            self.status.level(),
            self.status.message()
        );

        if let Err(e) = self.publisher.publish(&array) {
            warn!("Failed to publish joint diagnostics: {}", e);
            return Err(e.into());
        }

        Ok(!self.status.level().is_error())
    }

    fn query(&self) -> Result<Vec<f32>, DiagnosticsError> {
        let memory = self.memory.as_ref().ok_or(MemoryError::NotConnected)?;
        let values = memory.get_list_data(self.keys.keys())?;
        if values.len() != self.keys.keys().len() {
            return Err(DiagnosticsError::ResponseLength {
                expected: self.keys.keys().len(),
                actual: values.len(),
            });
        }
        Ok(values)
    }

    /// Build the cycle's array from a bulk-read reply, escalating the
    /// running status along the way.
    fn collect(&self, values: &[f32]) -> DiagnosticArray {
        let mut array = DiagnosticArray::new();
        let mut summary = JointSummary::new();

        for (joint, reading) in self.keys.readings(values) {
            let status = self.joint_status(joint, &reading);
            if status.level >= Level::Error {
                warn!("{} at {}°C", status.message, reading.temperature);
            }
            self.status.escalate(&status);
            summary.record(joint, &reading, status.level);
            array.push(status);
        }

        array.push(summary.to_status());
        array
    }

    fn joint_status(&self, joint: &str, reading: &JointReading) -> DiagnosticStatus {
        let (level, message) = self.thresholds.classify(joint, reading.temperature);
        let mut status = DiagnosticStatus::new(format!("{JOINT_STATUS_PREFIX}{joint}"), joint);
        for metric in Metric::ALL {
            status.add(metric.field(), reading.get(metric));
        }
        status.set(level, message);
        status
    }

    /// Message of the running overall status.
    pub fn status_msg(&self) -> String {
        self.status.message()
    }

    pub fn status_level(&self) -> Level {
        self.status.level()
    }

    /// Handle for reading the running status from elsewhere.
    pub fn status_handle(&self) -> StatusHandle {
        self.status.clone()
    }

    /// Whether a memory service was obtained at construction.
    pub fn is_connected(&self) -> bool {
        self.memory.is_some()
    }

    pub fn joints(&self) -> &[String] {
        self.keys.joints()
    }

    /// Memory keys read each cycle, three per joint.
    pub fn keys(&self) -> &[String] {
        self.keys.keys()
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }
}

impl<M, P: std::fmt::Debug> std::fmt::Debug for JointDiagnostics<M, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JointDiagnostics")
            .field("connected", &self.memory.is_some())
            .field("joints", &self.keys.joints())
            .field("thresholds", &self.thresholds)
            .field("publisher", &self.publisher)
            .field("status", &self.status)
            .finish()
    }
}

#[cfg(all(test, feature = "tokio"))]
mod tests {
    use super::*;
    use crate::memory::MapMemory;
    use crate::output::Output;
    use crate::summary::STATUS_NAME;
    use crate::TEMPERATURE_WARN_LEVEL;
    use tokio::sync::mpsc::Receiver;

    struct Unreachable;

    impl MemoryProxy for Unreachable {
        fn get_list_data(&self, _keys: &[String]) -> Result<Vec<f32>, MemoryError> {
            Err(MemoryError::Unavailable("ALMemory".into()))
        }
    }

    struct DownSession;

    impl Session for DownSession {
        type Memory = MapMemory;

        fn memory_service(&self) -> Result<MapMemory, MemoryError> {
            Err(MemoryError::Unavailable("robot.local:9559".into()))
        }
    }

    /// Drops the last value of every reply.
    struct Truncating(MapMemory);

    impl MemoryProxy for Truncating {
        fn get_list_data(&self, keys: &[String]) -> Result<Vec<f32>, MemoryError> {
            let mut values = self.0.get_list_data(keys)?;
            values.pop();
            Ok(values)
        }
    }

    fn two_joints(j1_temperature: f32) -> MapMemory {
        let memory = MapMemory::new();
        memory.set_joint("J1", JointReading::new(j1_temperature, 0.5, 2.0));
        memory.set_joint("J2", JointReading::new(60.0, 0.3, 1.0));
        memory
    }

    fn setup(
        memory: &MapMemory,
    ) -> (JointDiagnostics<&MapMemory, Output>, Receiver<DiagnosticArray>) {
        let (output, rx) = Output::channel(8);
        (JointDiagnostics::new(memory, output, ["J1", "J2"], 75.0), rx)
    }

    #[test]
    fn construction_builds_keys_and_thresholds() {
        let memory = MapMemory::new();
        let (diagnostics, _rx) = setup(&memory);

        assert_eq!(diagnostics.joints(), ["J1", "J2"]);
        assert_eq!(diagnostics.keys().len(), 6);
        assert_eq!(diagnostics.keys()[3], Metric::Temperature.key_for("J2"));
        assert_eq!(diagnostics.thresholds().warn, TEMPERATURE_WARN_LEVEL);
        assert_eq!(diagnostics.thresholds().error, 75.0);
        assert!(diagnostics.is_connected());
        assert_eq!(diagnostics.status_msg(), "OK");
    }

    #[test]
    fn warm_joint_is_reported_but_healthy() {
        let memory = two_joints(70.0);
        let (mut diagnostics, mut rx) = setup(&memory);

        assert!(diagnostics.publish().unwrap());

        let array = rx.try_recv().unwrap();
        assert_eq!(array.len(), 3);

        let j1 = &array.status[0];
        assert_eq!(j1.name, "joints:J1");
        assert_eq!(j1.hardware_id, "J1");
        assert_eq!(j1.level, Level::Warn);
        assert_eq!(j1.message, "Hot");
        assert_eq!(j1.value("Temperature"), Some("70"));
        assert_eq!(j1.value("Stiffness"), Some("0.5"));
        assert_eq!(j1.value("ElectricCurrent"), Some("2"));

        let j2 = &array.status[1];
        assert_eq!(j2.level, Level::Ok);
        assert_eq!(j2.message, "OK");

        let aggregate = &array.status[2];
        assert_eq!(aggregate.name, STATUS_NAME);
        assert_eq!(aggregate.level, Level::Warn);
        assert_eq!(aggregate.message, "WARN");
        assert!(aggregate.value("Hot Joints").unwrap().contains("J1: 70°C"));
        assert!(!aggregate.value("Hot Joints").unwrap().contains("J2"));
        assert_eq!(aggregate.value("Highest Temperature"), Some("70"));
        assert_eq!(aggregate.value("Lowest Stiffness"), Some("0.3"));
        assert_eq!(aggregate.value("Highest Electric Current"), Some("2"));
        assert_eq!(aggregate.value("Lowest Electric Current"), Some("1"));

        assert_eq!(diagnostics.status_level(), Level::Warn);
        assert_eq!(diagnostics.status_msg(), "Hot");
    }

    #[test]
    fn overheated_joint_fails_the_cycle() {
        let memory = two_joints(80.0);
        let (mut diagnostics, mut rx) = setup(&memory);

        assert!(!diagnostics.publish().unwrap());

        let array = rx.try_recv().unwrap();
        assert_eq!(array.status[0].level, Level::Error);
        assert_eq!(array.status[0].message, "HIGH JOINT TEMPERATURE: J1");
        assert_eq!(array.status[2].level, Level::Error);
        assert_eq!(array.status[2].message, "ERROR");
        assert_eq!(diagnostics.status_msg(), "HIGH JOINT TEMPERATURE: J1");
    }

    #[test]
    fn running_status_keeps_first_joint_at_highest_level() {
        let memory = MapMemory::new();
        memory.set_joint("A", JointReading::new(70.0, 1.0, 0.0));
        memory.set_joint("B", JointReading::new(90.0, 1.0, 0.0));
        memory.set_joint("C", JointReading::new(95.0, 1.0, 0.0));
        memory.set_joint("D", JointReading::new(71.0, 1.0, 0.0));

        let (output, _rx) = Output::channel(1);
        let mut diagnostics = JointDiagnostics::new(&memory, output, ["A", "B", "C", "D"], 75.0);

        assert!(!diagnostics.publish().unwrap());
        assert_eq!(diagnostics.status_msg(), "HIGH JOINT TEMPERATURE: B");
    }

    #[test]
    fn running_status_resets_each_cycle() {
        let memory = two_joints(80.0);
        let (mut diagnostics, mut rx) = setup(&memory);

        assert!(!diagnostics.publish().unwrap());
        assert_eq!(diagnostics.status_level(), Level::Error);

        memory.set_joint("J1", JointReading::new(40.0, 0.5, 2.0));
        assert!(diagnostics.publish().unwrap());
        assert_eq!(diagnostics.status_level(), Level::Ok);
        assert_eq!(diagnostics.status_msg(), "OK");

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn query_failure_publishes_nothing() {
        let (output, mut rx) = Output::channel(8);
        let mut diagnostics = JointDiagnostics::new(Unreachable, output, ["J1", "J2"], 75.0);

        let err = diagnostics.publish().unwrap_err();
        assert!(matches!(err, DiagnosticsError::Query(MemoryError::Unavailable(_))));
        assert!(rx.try_recv().is_err());
        assert_eq!(diagnostics.status_msg(), "OK");
    }

    #[test]
    fn query_failure_leaves_status_at_reset_value() {
        let memory = two_joints(80.0);
        let removed = Metric::Stiffness.key_for("J2");
        let (mut diagnostics, mut rx) = setup(&memory);

        assert!(!diagnostics.publish().unwrap());
        assert_eq!(diagnostics.status_level(), Level::Error);
        let _ = rx.try_recv();

        memory.remove(&removed);
        let err = diagnostics.publish().unwrap_err();
        assert!(matches!(err, DiagnosticsError::Query(MemoryError::UnknownKey(key)) if key == removed));
        assert_eq!(diagnostics.status_level(), Level::Ok);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn failed_session_still_constructs() {
        let (output, mut rx) = Output::channel(8);
        let mut diagnostics = JointDiagnostics::connect(&DownSession, output, ["J1"], 75.0);

        assert!(!diagnostics.is_connected());
        assert_eq!(diagnostics.keys().len(), 3);

        let err = diagnostics.publish().unwrap_err();
        assert!(matches!(err, DiagnosticsError::Query(MemoryError::NotConnected)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn session_connect_uses_service() {
        let memory = two_joints(70.0);
        let (output, mut rx) = Output::channel(8);
        let mut diagnostics = JointDiagnostics::connect(&memory, output, ["J1", "J2"], 75.0);

        assert!(diagnostics.is_connected());
        assert!(diagnostics.publish().unwrap());
        assert_eq!(rx.try_recv().unwrap().len(), 3);
    }

    #[test]
    fn short_response_is_rejected() {
        let (output, mut rx) = Output::channel(8);
        let mut diagnostics =
            JointDiagnostics::new(Truncating(two_joints(70.0)), output, ["J1", "J2"], 75.0);

        let err = diagnostics.publish().unwrap_err();
        assert!(matches!(
            err,
            DiagnosticsError::ResponseLength {
                expected: 6,
                actual: 5
            }
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn publish_failure_is_reported_after_classification() {
        let memory = two_joints(80.0);
        let mut diagnostics = JointDiagnostics::new(
            &memory,
            Output::file("/nonexistent/dir/diagnostics.json"),
            ["J1", "J2"],
            75.0,
        );

        let err = diagnostics.publish().unwrap_err();
        assert!(matches!(err, DiagnosticsError::Publish(_)));
        assert_eq!(diagnostics.status_level(), Level::Error);
    }

    #[test]
    fn no_joints_publishes_only_the_aggregate() {
        let memory = MapMemory::new();
        let (output, mut rx) = Output::channel(1);
        let mut diagnostics = JointDiagnostics::new(&memory, output, Vec::<String>::new(), 75.0);

        assert!(diagnostics.publish().unwrap());
        let array = rx.try_recv().unwrap();
        assert_eq!(array.len(), 1);
        assert_eq!(array.status[0].name, STATUS_NAME);
        assert_eq!(array.status[0].level, Level::Ok);
    }

    #[test]
    fn status_handle_follows_cycles() {
        let memory = two_joints(70.0);
        let (mut diagnostics, _rx) = setup(&memory);
        let handle = diagnostics.status_handle();

        diagnostics.publish().unwrap();
        assert_eq!(handle.level(), Level::Warn);
        assert_eq!(handle.message(), "Hot");
    }
}
