//! Status snapshot shared between the scan worker and the command surface.
//!
//! The worker is the only writer; it publishes a fresh [`SessionStatus`]
//! after each loop iteration. Readers take a short read lock and copy it.

use std::fmt;
use std::sync::{Arc, RwLock};

use crate::core::types::Pose;
use crate::navigation::NavPhase;

/// Point-in-time view of the active (or last) session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionStatus {
    /// Whether a session is currently running.
    pub running: bool,
    /// Navigation phase.
    pub phase: NavPhase,
    /// Confirmed moves so far.
    pub step_count: u32,
    /// Out-of-range samples dropped so far.
    pub outlier_count: u32,
    /// Current dead-reckoned pose.
    pub pose: Pose,
    /// Number of waypoints recorded.
    pub path_len: usize,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | phase: {} | steps: {} | outliers: {} | pose: {} | waypoints: {}",
            if self.running { "running" } else { "idle" },
            self.phase.name(),
            self.step_count,
            self.outlier_count,
            self.pose,
            self.path_len
        )?;
        if let Some(reason) = self.phase.reason() {
            write!(f, " | ended: {}", reason)?;
        }
        Ok(())
    }
}

/// Handle type for the shared status (Arc<RwLock<SessionStatus>>).
pub type SharedStatusHandle = Arc<RwLock<SessionStatus>>;

/// Create a new idle status wrapped in Arc<RwLock>.
pub fn create_shared_status() -> SharedStatusHandle {
    Arc::new(RwLock::new(SessionStatus::default()))
}

/// Replace the shared snapshot.
pub fn publish_status(handle: &SharedStatusHandle, status: SessionStatus) {
    *handle.write().unwrap_or_else(|e| e.into_inner()) = status;
}

/// Copy the shared snapshot.
pub fn read_status(handle: &SharedStatusHandle) -> SessionStatus {
    *handle.read().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::TerminationReason;

    #[test]
    fn test_publish_and_read() {
        let handle = create_shared_status();
        assert!(!read_status(&handle).running);

        let status = SessionStatus {
            running: true,
            phase: NavPhase::FollowingWall,
            step_count: 7,
            ..Default::default()
        };
        publish_status(&handle, status);
        assert_eq!(read_status(&handle), status);
    }

    #[test]
    fn test_display_includes_reason_when_done() {
        let status = SessionStatus {
            phase: NavPhase::Done(TerminationReason::WallNotFound),
            ..Default::default()
        };
        let text = status.to_string();
        assert!(text.starts_with("idle | phase: DONE"));
        assert!(text.ends_with("ended: WALL_NOT_FOUND"));
    }
}
