//! Per-run session state and the final report.
//!
//! A fresh [`SessionState`] is built for every run and owned by the scan
//! worker; nothing carries over between runs.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::shared::SessionStatus;
use crate::algorithms::AreaEstimate;
use crate::core::types::{MoveAction, Point2D, Pose, PoseTracker};
use crate::navigation::{NavPhase, TerminationReason};

/// Mutable state of one scan session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Navigation phase.
    pub phase: NavPhase,
    /// Confirmed moves so far.
    pub step_count: u32,
    /// Out-of-range samples dropped so far.
    pub outlier_count: u32,
    /// Pose at session start.
    pub start_pose: Pose,
    /// Current dead-reckoned pose.
    pub pose: Pose,
    /// Waypoints visited, starting at the origin.
    pub path: Vec<Point2D>,
}

impl SessionState {
    /// State at the start of a run: origin, facing north, seeking a wall.
    pub fn new() -> Self {
        let start = Pose::identity();
        Self {
            phase: NavPhase::initial(),
            step_count: 0,
            outlier_count: 0,
            start_pose: start,
            pose: start,
            path: vec![start.position],
        }
    }

    /// Add a batch's outliers to the session total.
    pub fn record_outliers(&mut self, outliers: u32) {
        self.outlier_count += outliers;
    }

    /// Commit a move the rover has confirmed.
    pub fn record_move(&mut self, tracker: &PoseTracker, action: MoveAction) {
        self.pose = tracker.commit(&self.pose, action, &mut self.path);
        self.step_count += 1;
        log::info!(
            "Moved {}. Position: ({:.2}, {:.2}), Orientation: {}, Path length: {}",
            action,
            self.pose.position.x,
            self.pose.position.y,
            self.pose.heading,
            self.path.len()
        );
    }

    /// Snapshot for status lookups.
    pub fn status(&self, running: bool) -> SessionStatus {
        SessionStatus {
            running,
            phase: self.phase,
            step_count: self.step_count,
            outlier_count: self.outlier_count,
            pose: self.pose,
            path_len: self.path.len(),
        }
    }

    /// Freeze the session into its report.
    pub fn into_report(self, reason: TerminationReason, area: AreaEstimate) -> ScanReport {
        ScanReport {
            reason,
            step_count: self.step_count,
            outlier_count: self.outlier_count,
            final_pose: self.pose,
            path: self.path,
            area,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Final outcome of a scan session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub reason: TerminationReason,
    pub step_count: u32,
    pub outlier_count: u32,
    pub final_pose: Pose,
    pub path: Vec<Point2D>,
    pub area: AreaEstimate,
}

impl ScanReport {
    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()
    }
}
