//! Room Scanner - autonomous wall-following floor-area estimation for a
//! remote-controlled rover
//!
//! # Architecture
//!
//! The crate is organized into layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   main.rs (REPL)                    │  ← Command surface
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │            controller / threads / state             │  ← Session lifecycle
//! │      (start/stop guard, scan worker, status)        │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                      io/                            │  ← Infrastructure
//! │     (rover_client, simulated_rover, session_log)    │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │             navigation/ + algorithms/               │  ← Decision + estimation
//! │        (seek / follow state machine, area)          │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   sensors/                          │  ← Sensor processing
//! │        (range validation, direction buckets)        │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │        (pose, heading, pose tracker, math)          │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Session flow
//!
//! 1. Initial scan
//! 2. Seek: drive forward until a wall is within range ahead, then turn left
//! 3. Follow: keep the wall on the right until the path closes on itself or
//!    the step budget runs out
//! 4. Estimate the enclosed area of the walked path (shoelace formula)

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Sensor processing (depends on core)
// ============================================================================
pub mod sensors;

// ============================================================================
// Layer 3: Navigation and estimation (depends on core)
// ============================================================================
pub mod algorithms;
pub mod navigation;

// ============================================================================
// Layer 4: I/O infrastructure (depends on core, sensors)
// ============================================================================
pub mod io;

// ============================================================================
// Layer 5: Session lifecycle (depends on all layers)
// ============================================================================
pub mod config;
pub mod controller;
pub mod state;
pub mod threads;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use crate::core::math;
pub use crate::core::types::{Heading, MoveAction, Point2D, Pose, PoseTracker};

// Sensors
pub use sensors::{SampleValidator, ValidatedBatch, ValidationError, ValidatorConfig};

// Navigation and area
pub use algorithms::{AreaEstimate, estimate_area};
pub use navigation::{NavPhase, Navigator, NavigatorConfig, TerminationReason};

// I/O
pub use io::{
    ClientError, HttpRoverClient, RetryPolicy, RetryingClient, RoverCommand, RoverTransport,
    SessionLogSink, SimulatedRover,
};

// Session
pub use config::{ConfigError, ScannerConfig, load_config};
pub use controller::{SessionController, StartOutcome};
pub use state::{ScanReport, SessionStatus};
pub use threads::run_scan;
