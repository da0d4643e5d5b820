//! Rover transport and retrying client.
//!
//! The rover's onboard controller answers plain HTTP GETs. The scan path
//! returns the current readings; each move path executes the move and then
//! returns the post-move readings. Both reply with:
//!
//! ```text
//! { "distance_measurements": [ { "angle": 70, "distance": 42.5 }, ... ] }
//! ```
//!
//! [`RetryingClient`] wraps any [`RoverTransport`] with a [`RetryPolicy`] and
//! the [`SampleValidator`], so callers only ever see a [`ValidatedBatch`]. An
//! exhausted request resolves to an empty batch.
//!
//! # Example
//!
//! ```ignore
//! use room_scanner::io::{HttpRoverClient, RetryingClient, RetryPolicy, RoverConfig};
//!
//! let transport = HttpRoverClient::new(RoverConfig::default())?;
//! let mut client = RetryingClient::new(transport, RetryPolicy::default(), Default::default());
//! let batch = client.scan();
//! ```

use std::fmt;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::types::MoveAction;
use crate::sensors::{SampleValidator, ValidatedBatch, ValidationError};

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Move rejected: {0}")]
    Rejected(String),

    #[error("Rover disconnected")]
    Disconnected,
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// One request to the rover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoverCommand {
    /// Read the sensor without moving.
    Scan,
    /// Execute a move and read the sensor afterwards.
    Move(MoveAction),
}

impl RoverCommand {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            RoverCommand::Scan => "scan",
            RoverCommand::Move(action) => action.as_str(),
        }
    }
}

impl fmt::Display for RoverCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of raw rover measurements.
///
/// Implementations return the raw `distance_measurements` list; validation
/// happens in [`RetryingClient`].
pub trait RoverTransport: Send {
    /// Issue one request and return the raw measurement entries.
    fn request(&mut self, command: RoverCommand) -> Result<Vec<Value>>;
}

impl<T: RoverTransport + ?Sized> RoverTransport for Box<T> {
    fn request(&mut self, command: RoverCommand) -> Result<Vec<Value>> {
        (**self).request(command)
    }
}

/// HTTP endpoint configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoverConfig {
    /// Base address of the rover controller.
    pub base_url: String,
    pub scan_path: String,
    pub forward_path: String,
    pub left_path: String,
    pub right_path: String,
    pub back_path: String,
    /// Timeout for scan requests (seconds).
    pub scan_timeout_secs: u64,
    /// Timeout for move requests (seconds). Moves take longer to answer.
    pub move_timeout_secs: u64,
}

impl Default for RoverConfig {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.100.236".to_string(),
            scan_path: "/".to_string(),
            forward_path: "/forward".to_string(),
            left_path: "/left".to_string(),
            right_path: "/right".to_string(),
            back_path: "/back".to_string(),
            scan_timeout_secs: 15,
            move_timeout_secs: 17,
        }
    }
}

impl RoverConfig {
    /// Request path for a command.
    pub fn path_for(&self, command: RoverCommand) -> &str {
        match command {
            RoverCommand::Scan => &self.scan_path,
            RoverCommand::Move(MoveAction::Forward) => &self.forward_path,
            RoverCommand::Move(MoveAction::Left) => &self.left_path,
            RoverCommand::Move(MoveAction::Right) => &self.right_path,
            RoverCommand::Move(MoveAction::Back) => &self.back_path,
        }
    }

    /// Full URL for a command.
    pub fn url_for(&self, command: RoverCommand) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.path_for(command)
        )
    }

    /// Request timeout for a command.
    pub fn timeout_for(&self, command: RoverCommand) -> Duration {
        match command {
            RoverCommand::Scan => Duration::from_secs(self.scan_timeout_secs),
            RoverCommand::Move(_) => Duration::from_secs(self.move_timeout_secs),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawScanResponse {
    #[serde(default)]
    distance_measurements: Vec<Value>,
}

/// Parse a response body into its raw measurement entries.
///
/// A body without `distance_measurements` yields an empty list.
pub fn parse_measurements(body: &str) -> Result<Vec<Value>> {
    let response: RawScanResponse = serde_json::from_str(body)?;
    Ok(response.distance_measurements)
}

/// Blocking HTTP transport to the rover controller.
pub struct HttpRoverClient {
    client: reqwest::blocking::Client,
    config: RoverConfig,
}

impl HttpRoverClient {
    /// Build a client for the configured rover.
    pub fn new(config: RoverConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { client, config })
    }

    /// Get configuration.
    pub fn config(&self) -> &RoverConfig {
        &self.config
    }
}

impl RoverTransport for HttpRoverClient {
    fn request(&mut self, command: RoverCommand) -> Result<Vec<Value>> {
        let path = self.config.path_for(command);
        log::info!("Sending request to {}...", path);

        let response = self
            .client
            .get(self.config.url_for(command))
            .timeout(self.config.timeout_for(command))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let body = response.text()?;
        log::debug!("Raw response: {}", body);
        parse_measurements(&body)
    }
}

/// Retry settings as they appear in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per request, including the first.
    pub max_attempts: u32,
    /// Fixed delay between attempts (milliseconds).
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 2000,
        }
    }
}

/// Fixed-count, fixed-delay retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Run `op` until it succeeds or attempts run out.
    ///
    /// Sleeps `backoff` between failed attempts, not after the last one.
    /// Returns `None` when every attempt failed.
    pub fn run<T, E, F>(&self, label: &str, mut op: F) -> Option<T>
    where
        E: fmt::Display,
        F: FnMut() -> std::result::Result<T, E>,
    {
        for attempt in 1..=self.max_attempts {
            match op() {
                Ok(value) => return Some(value),
                Err(e) => {
                    log::error!(
                        "Request to {} failed (attempt {}/{}): {}",
                        label,
                        attempt,
                        self.max_attempts,
                        e
                    );
                    if attempt < self.max_attempts && !self.backoff.is_zero() {
                        thread::sleep(self.backoff);
                    }
                }
            }
        }
        None
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.backoff_ms))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryConfig::default().into()
    }
}

/// Transport wrapper applying retries and validation uniformly.
pub struct RetryingClient<T: RoverTransport> {
    transport: T,
    policy: RetryPolicy,
    validator: SampleValidator,
}

impl<T: RoverTransport> RetryingClient<T> {
    pub fn new(transport: T, policy: RetryPolicy, validator: SampleValidator) -> Self {
        Self {
            transport,
            policy,
            validator,
        }
    }

    /// Read the sensor without moving.
    pub fn scan(&mut self) -> ValidatedBatch {
        self.execute(RoverCommand::Scan)
    }

    /// Execute a move and return the post-move readings.
    pub fn send_move(&mut self, action: MoveAction) -> ValidatedBatch {
        self.execute(RoverCommand::Move(action))
    }

    /// Issue a command with retries; empty batch once attempts are exhausted.
    ///
    /// A batch rejected by validation counts as a failed attempt. Outliers
    /// it dropped before being rejected are added to the returned batch.
    pub fn execute(&mut self, command: RoverCommand) -> ValidatedBatch {
        let transport = &mut self.transport;
        let validator = &self.validator;
        let mut rejected_outliers = 0;
        let outcome = self.policy.run(command.name(), || -> Result<ValidatedBatch> {
            let raw = transport.request(command)?;
            let batch = validator
                .validate(&raw)
                .inspect_err(|e| rejected_outliers += e.outliers())?;
            log::debug!("Valid measurements: {:?}", batch.samples);
            Ok(batch)
        });
        let mut batch = outcome.unwrap_or_else(|| {
            log::error!("Giving up on {} after {} attempts", command, self.policy.max_attempts);
            ValidatedBatch::empty()
        });
        batch.outliers += rejected_outliers;
        batch
    }

    /// Get the wrapped transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get the wrapped transport mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Unwrap the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }
}
