//! Wall-Following Session Tests
//!
//! Drives complete scan sessions without hardware, against scripted replies
//! and the rectangular-room simulator:
//! - Square loop closure with exact waypoint path and area
//! - Data loss mid-session keeps the partial path
//! - Simulated room: wall found, followed, then left/right oscillation at
//!   a band edge until the step budget runs out
//! - Wall never in range within the seek ceiling
//!
//! Run with: `cargo test --test wall_following`

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use approx::assert_relative_eq;
use room_scanner::io::{ClientError, RetryPolicy, RetryingClient, RoverCommand, RoverTransport};
use room_scanner::state::{create_shared_status, read_status};
use room_scanner::{
    Heading, MoveAction, Point2D, Pose, SampleValidator, ScanReport, ScannerConfig,
    SimulatedRover, TerminationReason, run_scan,
};
use serde_json::{Value, json};

// ============================================================================
// Helpers
// ============================================================================

type Reply = Result<Vec<Value>, ClientError>;

/// Replays replies in order and records every request.
struct ScriptedRover {
    replies: VecDeque<Reply>,
    requests: Vec<RoverCommand>,
}

impl ScriptedRover {
    fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: replies.into(),
            requests: Vec::new(),
        }
    }
}

impl RoverTransport for ScriptedRover {
    fn request(&mut self, command: RoverCommand) -> Reply {
        self.requests.push(command);
        self.replies
            .pop_front()
            .unwrap_or(Err(ClientError::Disconnected))
    }
}

/// Wall on the right in band, clear ahead.
fn clear() -> Reply {
    Ok(vec![
        json!({"angle": 10, "distance": 30}),
        json!({"angle": 70, "distance": 200}),
    ])
}

/// Wall on the right in band, obstacle ahead.
fn blocked() -> Reply {
    Ok(vec![
        json!({"angle": 10, "distance": 30}),
        json!({"angle": 70, "distance": 40}),
    ])
}

fn test_config() -> ScannerConfig {
    let mut config = ScannerConfig::default();
    config.session.settle_time_ms = 0;
    config.retry.backoff_ms = 0;
    config
}

/// Run one session to completion and check the published status agrees.
fn run<T: RoverTransport>(config: &ScannerConfig, transport: T) -> (ScanReport, T) {
    let mut client = RetryingClient::new(
        transport,
        RetryPolicy::new(config.retry.max_attempts, Duration::ZERO),
        SampleValidator::new(config.sensor),
    );
    let running = AtomicBool::new(true);
    let status = create_shared_status();
    let report = run_scan(config, &mut client, &running, &status);

    let final_status = read_status(&status);
    assert!(!final_status.running);
    assert_eq!(final_status.step_count, report.step_count);
    assert_eq!(final_status.path_len, report.path.len());
    assert_eq!(final_status.phase.reason(), Some(report.reason));

    (report, client.into_inner())
}

fn pts(coords: &[(f32, f32)]) -> Vec<Point2D> {
    coords.iter().map(|&(x, y)| Point2D::new(x, y)).collect()
}

// ============================================================================
// Scripted sessions
// ============================================================================

#[test]
fn test_square_loop_closes_with_unit_area() {
    // Initial scan sees a wall ahead: follow phase starts with a left turn.
    // Each reply decides the next move: two forwards, then a left corner.
    let mut replies = vec![Ok(vec![json!({"angle": 70, "distance": 40})])];
    for _ in 0..3 {
        replies.extend([clear(), clear(), blocked()]);
    }
    replies.extend([clear(), clear(), clear()]);
    let (report, rover) = run(&test_config(), ScriptedRover::new(replies));

    assert_eq!(report.reason, TerminationReason::LoopClosed);
    assert_eq!(report.step_count, 12);
    assert_eq!(report.outlier_count, 0);
    assert_eq!(report.final_pose, Pose::new(Point2D::origin(), Heading::North));
    assert_eq!(
        report.path,
        pts(&[
            (0.0, 0.0),
            (-0.5, 0.0),
            (-1.0, 0.0),
            (-1.0, -0.5),
            (-1.0, -1.0),
            (-0.5, -1.0),
            (0.0, -1.0),
            (0.0, -0.5),
            (0.0, 0.0),
        ])
    );
    assert_relative_eq!(report.area.area_m2, 1.0, epsilon = 1e-6);

    // Initial scan, then one request per confirmed move
    assert_eq!(rover.requests.len(), 13);
    assert_eq!(rover.requests[0], RoverCommand::Scan);
    assert_eq!(rover.requests[1], RoverCommand::Move(MoveAction::Left));
    assert_eq!(rover.requests[2], RoverCommand::Move(MoveAction::Forward));
}

#[test]
fn test_outliers_are_dropped_and_counted() {
    // The negative forward reading would otherwise read as an obstacle
    let noisy = || -> Reply {
        Ok(vec![
            json!({"angle": 10, "distance": 30}),
            json!({"angle": 40, "distance": 4000}),
            json!({"angle": 70, "distance": -3}),
            json!({"angle": 100, "distance": 200}),
        ])
    };
    let mut config = test_config();
    config.navigation.max_steps = 4;
    let replies = vec![blocked(), noisy(), noisy(), noisy(), noisy()];
    let (report, rover) = run(&config, ScriptedRover::new(replies));

    assert_eq!(report.reason, TerminationReason::StepBudgetExceeded);
    assert_eq!(report.step_count, 4);
    assert_eq!(report.outlier_count, 8);
    assert!(
        rover.requests[2..]
            .iter()
            .all(|c| *c == RoverCommand::Move(MoveAction::Forward))
    );
}

#[test]
fn test_data_loss_keeps_partial_path() {
    // Three forward moves succeed, then the rover stops answering
    let far = || -> Reply { Ok(vec![json!({"angle": 70, "distance": 300})]) };
    let replies = vec![far(), far(), far(), far()];
    let (report, rover) = run(&test_config(), ScriptedRover::new(replies));

    assert_eq!(report.reason, TerminationReason::DataLoss);
    assert!(report.reason.is_failure());
    assert_eq!(report.step_count, 3);
    assert_eq!(
        report.path,
        pts(&[(0.0, 0.0), (0.0, 0.5), (0.0, 1.0), (0.0, 1.5)])
    );
    // Collinear path encloses nothing
    assert_relative_eq!(report.area.area_m2, 0.0, epsilon = 1e-6);
    // Fourth move tried once per attempt, then the session ended
    assert_eq!(rover.requests.len(), 4 + 3);
}

#[test]
fn test_malformed_reply_is_retried_then_fatal() {
    let bad = || -> Reply { Ok(vec![json!({"angle": 70, "distance": "near"})]) };
    let (report, rover) = run(&test_config(), ScriptedRover::new(vec![bad(), bad(), bad()]));

    assert_eq!(report.reason, TerminationReason::DataLoss);
    assert_eq!(report.step_count, 0);
    assert_eq!(report.path, vec![Point2D::origin()]);
    assert_eq!(rover.requests, vec![RoverCommand::Scan; 3]);
}

#[test]
fn test_seek_ceiling_stops_even_if_last_reply_sees_wall() {
    // Initial scan plus nine clear replies keep seeking; the tenth forward
    // move's reply sees a wall, but the ceiling has already been reached
    let far = || -> Reply { Ok(vec![json!({"angle": 70, "distance": 300})]) };
    let mut replies: Vec<Reply> = (0..10).map(|_| far()).collect();
    replies.push(Ok(vec![json!({"angle": 70, "distance": 40})]));
    let (report, rover) = run(&test_config(), ScriptedRover::new(replies));

    assert_eq!(report.reason, TerminationReason::WallNotFound);
    assert_eq!(report.step_count, 10);
    assert_eq!(report.path.len(), 11);
    // No turn was issued after the ceiling
    assert_eq!(rover.requests.len(), 11);
    assert!(
        rover.requests[1..]
            .iter()
            .all(|c| *c == RoverCommand::Move(MoveAction::Forward))
    );
}

// ============================================================================
// Simulated rooms
// ============================================================================

#[test]
fn test_simulated_room_oscillates_at_band_edge() {
    // 4 m x 4 m room. The rover reaches the north wall after five steps,
    // turns left and follows it west until the corner. There the west wall
    // reads 50.8 cm on the right after a left turn (just outside the band),
    // so it alternates left and right in place until the budget runs out.
    let start = Pose::new(Point2D::new(2.0, 1.25), Heading::North);
    let (report, rover) = run(&test_config(), SimulatedRover::new(4.0, 4.0, start));

    assert_eq!(report.reason, TerminationReason::StepBudgetExceeded);
    assert_eq!(report.step_count, 100);
    assert_eq!(report.path.len(), 9);
    assert_eq!(report.final_pose.position, Point2D::new(-1.5, 2.5));
    assert_eq!(report.final_pose.heading, Heading::South);
    assert_relative_eq!(report.area.area_m2, 1.875, epsilon = 1e-5);

    // Dead reckoning agrees with the simulator's ground truth
    let truth = rover.pose();
    assert_eq!(truth.position, Point2D::new(0.5, 3.75));
    assert_eq!(truth.heading, report.final_pose.heading);
}

#[test]
fn test_wall_not_found_within_seek_ceiling() {
    // Long hall: side walls keep the forward readings valid but never close
    let start = Pose::new(Point2D::new(3.0, 1.25), Heading::North);
    let (report, _) = run(&test_config(), SimulatedRover::new(6.0, 30.0, start));

    assert_eq!(report.reason, TerminationReason::WallNotFound);
    assert!(!report.reason.is_failure());
    assert_eq!(report.step_count, 10);
    assert_eq!(report.path.len(), 11);
    assert_relative_eq!(report.path[10].y, 5.0, epsilon = 1e-6);
}
