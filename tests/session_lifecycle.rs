//! Session Lifecycle Tests
//!
//! Exercises `SessionController` end to end on the simulator:
//! - Per-session log and JSON report files under the configured directory
//! - Single-session guard and stop on request
//! - Fresh state on every start
//!
//! Run with: `cargo test --test session_lifecycle`

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use room_scanner::io::{RoverTransport, SessionLogSink};
use room_scanner::{
    Heading, Point2D, Pose, ScannerConfig, SessionController, SimulatedRover, StartOutcome,
    TerminationReason,
};

fn simulated_controller(log_dir: &Path, settle_ms: u64) -> SessionController {
    let mut config = ScannerConfig::default();
    config.session.settle_time_ms = settle_ms;
    config.session.log_dir = log_dir.to_path_buf();
    config.retry.backoff_ms = 0;
    config.navigation.max_steps = 30;

    SessionController::new(config, |_: &ScannerConfig| {
        let start = Pose::new(Point2D::new(2.0, 1.25), Heading::North);
        Ok(Box::new(SimulatedRover::new(4.0, 4.0, start)) as Box<dyn RoverTransport>)
    })
    .with_log_sink(SessionLogSink::new())
}

fn files_with_extension(dir: &Path, ext: &str) -> Vec<std::path::PathBuf> {
    let mut files: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|e| e == ext))
        .collect();
    files.sort();
    files
}

#[test]
fn test_session_writes_log_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    let controller = simulated_controller(&log_dir, 0);

    assert_eq!(controller.start().unwrap(), StartOutcome::Started);
    let report = controller.wait().unwrap();
    assert_eq!(report.reason, TerminationReason::StepBudgetExceeded);
    assert_eq!(report.step_count, 30);

    let logs = files_with_extension(&log_dir, "log");
    let reports = files_with_extension(&log_dir, "json");
    assert_eq!(logs.len(), 1);
    assert_eq!(reports.len(), 1);
    assert_eq!(logs[0].file_stem(), reports[0].file_stem());
    assert!(
        logs[0]
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("scan_")
    );

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&reports[0]).unwrap()).unwrap();
    assert_eq!(json["reason"], "StepBudgetExceeded");
    assert_eq!(json["step_count"], 30);
    assert_eq!(json["path"].as_array().unwrap().len(), report.path.len());
}

#[test]
fn test_stop_cancels_running_session() {
    let dir = tempfile::tempdir().unwrap();
    let controller = simulated_controller(dir.path(), 100);

    assert_eq!(controller.start().unwrap(), StartOutcome::Started);
    assert!(controller.is_running());
    assert_eq!(controller.start().unwrap(), StartOutcome::AlreadyRunning);

    // Let a few moves happen before stopping
    let deadline = Instant::now() + Duration::from_secs(5);
    while controller.status().step_count < 2 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(controller.status().running);
    assert!(controller.stop());

    let report = controller.wait().unwrap();
    assert_eq!(report.reason, TerminationReason::Cancelled);
    assert!(report.step_count >= 2);
    assert!(report.step_count < 30);
    assert!(!controller.is_running());

    let status = controller.status();
    assert!(!status.running);
    assert_eq!(status.step_count, report.step_count);
}

#[test]
fn test_each_start_begins_from_scratch() {
    let dir = tempfile::tempdir().unwrap();
    let controller = simulated_controller(dir.path(), 0);

    controller.start().unwrap();
    let first = controller.wait().unwrap();
    controller.start().unwrap();
    let second = controller.wait().unwrap();

    // Same room, same start: identical runs, nothing carried over
    assert_eq!(first, second);
    assert_eq!(second.path[0], Point2D::origin());
    assert_eq!(controller.last_report(), Some(second));

    // Back-to-back sessions each keep their own log and report
    let logs = files_with_extension(dir.path(), "log");
    let reports = files_with_extension(dir.path(), "json");
    assert_eq!(logs.len(), 2);
    assert_eq!(reports.len(), 2);
    assert_ne!(logs[0].file_stem(), logs[1].file_stem());
    for log in &logs {
        assert!(log.with_extension("json").exists());
    }
}
