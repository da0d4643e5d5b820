//! I/O and infrastructure layer.
//!
//! This layer handles communication with the rover and log persistence.
//!
//! # Contents
//!
//! - [`rover_client`]: transport trait, HTTP client, retry policy
//! - [`simulated_rover`]: rectangular-room simulator for offline runs
//! - [`session_log`]: per-session log files and the log line format

pub mod rover_client;
pub mod session_log;
pub mod simulated_rover;

// Re-export common types
pub use rover_client::{
    ClientError, HttpRoverClient, RetryConfig, RetryPolicy, RetryingClient, RoverCommand,
    RoverConfig, RoverTransport,
};
pub use session_log::{RESULT_TARGET, SessionLogSink, init_logging};
pub use simulated_rover::SimulatedRover;
