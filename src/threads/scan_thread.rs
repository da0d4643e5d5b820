//! Scan worker thread.
//!
//! Runs one session's scan → decide → move loop:
//! 1. Initial scan before any move
//! 2. Navigator picks the next move from the latest readings
//! 3. Move is issued; its reply carries the post-move readings
//! 4. Pose is committed only when the reply holds usable samples
//! 5. Termination is checked after every action
//!
//! The running flag is checked at the top of each iteration, never during a
//! request. On exit the area is computed over whatever path was walked.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, bounded};

use crate::algorithms::estimate_area;
use crate::config::ScannerConfig;
use crate::core::types::PoseTracker;
use crate::io::{RESULT_TARGET, RetryingClient, RoverTransport, SessionLogSink};
use crate::navigation::{NavCommand, NavPhase, Navigator, TerminationReason};
use crate::state::{ScanReport, SessionState, SharedStatusHandle, publish_status};

/// Run one complete scan session on the current thread.
///
/// Clears `running` before returning.
pub fn run_scan<T: RoverTransport>(
    config: &ScannerConfig,
    client: &mut RetryingClient<T>,
    running: &AtomicBool,
    status: &SharedStatusHandle,
) -> ScanReport {
    let navigator = Navigator::new(config.navigation.clone());
    let tracker = PoseTracker::new(config.navigation.step_distance_m);
    let settle_time = config.settle_time();
    let mut session = SessionState::new();

    log::info!("Starting room scan...");
    publish_status(status, session.status(true));

    log::info!("Phase 1: Initial scan");
    let initial = client.scan();
    session.record_outliers(initial.outliers);
    let mut distances = initial.distances();
    if distances.is_none() {
        log::error!("Initial scan failed. Stopping.");
    }

    let reason = loop {
        if !running.load(Ordering::Relaxed) {
            log::info!("Scan stopped on request.");
            break TerminationReason::Cancelled;
        }

        let decision = navigator.decide(session.phase, distances.as_ref());
        session.phase = decision.phase;
        let action = match decision.command {
            NavCommand::Finish(reason) => break reason,
            NavCommand::Move(action) => action,
        };

        let batch = client.send_move(action);
        session.record_outliers(batch.outliers);
        distances = batch.distances();
        if distances.is_some() {
            session.record_move(&tracker, action);
            if !settle_time.is_zero() {
                thread::sleep(settle_time);
            }
        } else {
            log::error!("Move {} failed: no valid data from move command", action);
        }
        publish_status(status, session.status(true));

        if let Some(reason) = navigator.check_termination(
            session.phase,
            session.step_count,
            &session.start_pose,
            &session.pose,
        ) {
            break reason;
        }
    };

    session.phase = NavPhase::Done(reason);
    running.store(false, Ordering::Relaxed);

    log::info!("Scan ended: {} ({})", reason, reason.description());
    log::info!(
        "Scan complete. Steps: {}, Outliers: {}",
        session.step_count,
        session.outlier_count
    );
    let area = estimate_area(&session.path);
    log::info!(target: RESULT_TARGET, "Estimated room area: {:.2} m²", area.area_m2);

    publish_status(status, session.status(false));
    session.into_report(reason, area)
}

/// Where a finished session leaves its artifacts.
#[derive(Clone, Default)]
pub struct SessionOutputs {
    /// Report file to write on completion.
    pub report_path: Option<PathBuf>,
    /// Log sink whose session file is closed on completion.
    pub log_sink: Option<SessionLogSink>,
}

/// Handle to the scan worker thread.
pub struct ScanThread {
    handle: JoinHandle<()>,
    done_rx: Receiver<ScanReport>,
}

impl ScanThread {
    /// Spawn the scan worker.
    ///
    /// # Arguments
    ///
    /// - `config`: Immutable scanner configuration.
    /// - `client`: Retrying rover client, moved into the worker.
    /// - `running`: Atomic flag; clearing it stops the session.
    /// - `status`: Shared status published after each iteration.
    /// - `outputs`: Report file and log sink to finalize on completion.
    pub fn spawn<T: RoverTransport + 'static>(
        config: Arc<ScannerConfig>,
        mut client: RetryingClient<T>,
        running: Arc<AtomicBool>,
        status: SharedStatusHandle,
        outputs: SessionOutputs,
    ) -> Self {
        let (done_tx, done_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name("scan".into())
            .spawn(move || {
                let report = run_scan(&config, &mut client, &running, &status);

                if let Some(path) = &outputs.report_path {
                    match report.write_json(path) {
                        Ok(()) => log::info!("Report written to {}", path.display()),
                        Err(e) => log::warn!("Failed to write report {}: {}", path.display(), e),
                    }
                }
                if let Some(sink) = &outputs.log_sink {
                    sink.close_session();
                }

                // Receiver may already be gone if the controller was dropped
                let _ = done_tx.send(report);
            })
            .expect("Failed to spawn scan thread");

        Self { handle, done_rx }
    }

    /// Whether the worker has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Completion channel; yields the report once the session ends.
    pub fn completion(&self) -> &Receiver<ScanReport> {
        &self.done_rx
    }

    /// Wait for the thread to finish and collect its report.
    ///
    /// Returns `None` if the worker panicked or the report was already taken
    /// from [`completion`](Self::completion).
    pub fn join(self) -> Option<ScanReport> {
        if let Err(e) = self.handle.join() {
            log::error!("Scan thread panicked: {:?}", e);
            return None;
        }
        self.done_rx.try_recv().ok()
    }
}
