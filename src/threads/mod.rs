//! Thread management for scan sessions.
//!
//! One worker thread per session:
//! - `ScanThread`: runs the scan → decide → move loop until the session ends

mod scan_thread;

pub use scan_thread::{ScanThread, SessionOutputs, run_scan};
