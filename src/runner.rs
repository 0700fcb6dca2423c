//! Driving publish cycles from the command line.

use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;

use jointwatch_sdk::{DiagnosticPublisher, DiagnosticsError, JointDiagnostics, MemoryProxy};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Result of one publish cycle, as seen by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No joint reached the error level.
    Healthy,
    /// At least one joint is at the error level.
    Unhealthy,
    /// The cycle did not complete (query or publish failure).
    Failed,
}

impl CycleOutcome {
    pub fn from_result(result: &Result<bool, DiagnosticsError>) -> Self {
        match result {
            Ok(true) => CycleOutcome::Healthy,
            Ok(false) => CycleOutcome::Unhealthy,
            Err(_) => CycleOutcome::Failed,
        }
    }

    /// Process exit code for `--once` runs.
    pub fn exit_code(self) -> ExitCode {
        match self {
            CycleOutcome::Healthy => ExitCode::SUCCESS,
            CycleOutcome::Unhealthy => ExitCode::from(1),
            CycleOutcome::Failed => ExitCode::from(2),
        }
    }
}

/// Run one cycle and log its outcome.
pub fn run_cycle<M, P>(diagnostics: &mut JointDiagnostics<M, P>) -> CycleOutcome
where
    M: MemoryProxy,
    P: DiagnosticPublisher,
{
    let result = diagnostics.publish();
    let outcome = CycleOutcome::from_result(&result);
    match outcome {
        CycleOutcome::Healthy => debug!("Joints healthy: {}", diagnostics.status_msg()),
        CycleOutcome::Unhealthy => warn!("Joints unhealthy: {}", diagnostics.status_msg()),
        // Already logged by the aggregator.
        CycleOutcome::Failed => {}
    }
    outcome
}

/// Run a cycle every `period` until `shutdown` completes.
///
/// The first cycle runs immediately. Cycles run one after another on the
/// calling task; a failed cycle does not stop the loop. Returns the number
/// of cycles run.
pub async fn run_until<M, P, F>(
    diagnostics: &mut JointDiagnostics<M, P>,
    period: Duration,
    shutdown: F,
) -> usize
where
    M: MemoryProxy,
    P: DiagnosticPublisher,
    F: Future,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut cycles = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run_cycle(diagnostics);
                cycles += 1;
            }
            _ = &mut shutdown => {
                info!("Stopping after {} cycles", cycles);
                break;
            }
        }
    }
    cycles
}
