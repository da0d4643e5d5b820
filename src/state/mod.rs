//! Session state for the scan worker and command surface.
//!
//! This module provides:
//! - `SessionState`: per-run mutable state, owned by the worker
//! - `SharedStatusHandle`: status snapshot readable from the command surface
//! - `ScanReport`: frozen outcome of a finished run

mod session;
mod shared;

pub use session::{ScanReport, SessionState};
pub use shared::{
    SessionStatus, SharedStatusHandle, create_shared_status, publish_status, read_status,
};
