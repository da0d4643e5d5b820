//! Scanner configuration.
//!
//! Loaded from TOML; every section and field is optional and falls back to
//! the defaults below.
//!
//! ```toml
//! [rover]
//! base_url = "http://192.168.100.236"
//! scan_timeout_secs = 15
//!
//! [retry]
//! max_attempts = 3
//! backoff_ms = 2000
//!
//! [navigation]
//! min_distance_cm = 60.0
//! max_steps = 100
//!
//! [session]
//! settle_time_ms = 1000
//! log_dir = "logs"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::io::{RetryConfig, RetryPolicy, RoverConfig};
use crate::navigation::NavigatorConfig;
use crate::sensors::ValidatorConfig;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_PATH: &str = "room-scanner.toml";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] basic_toml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Session timing and persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Pause after each confirmed move before trusting the next reading (ms).
    pub settle_time_ms: u64,
    /// Directory for per-session log and report files.
    pub log_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle_time_ms: 1000,
            log_dir: PathBuf::from("logs"),
        }
    }
}

/// Complete scanner configuration. Immutable once a session starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default)]
    pub rover: RoverConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub sensor: ValidatorConfig,
    #[serde(default)]
    pub navigation: NavigatorConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl ScannerConfig {
    /// Parse from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(basic_toml::from_str(contents)?)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let nav = &self.navigation;
        if nav.step_distance_m <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "step_distance_m must be positive (got {})",
                nav.step_distance_m
            )));
        }
        let step_cm = nav.step_distance_m as f64 * 100.0;
        if nav.min_distance_cm <= step_cm {
            return Err(ConfigError::Invalid(format!(
                "min_distance_cm ({}) must exceed one step ({} cm)",
                nav.min_distance_cm, step_cm
            )));
        }
        if nav.target_wall_distance_cm > nav.max_wall_distance_cm {
            return Err(ConfigError::Invalid(format!(
                "target_wall_distance_cm ({}) must not exceed max_wall_distance_cm ({})",
                nav.target_wall_distance_cm, nav.max_wall_distance_cm
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.sensor.max_valid_distance_cm <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_valid_distance_cm must be positive (got {})",
                self.sensor.max_valid_distance_cm
            )));
        }
        Ok(())
    }

    /// Retry policy for rover requests.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.into()
    }

    /// Settle delay after each confirmed move.
    pub fn settle_time(&self) -> Duration {
        Duration::from_millis(self.session.settle_time_ms)
    }
}

/// Load configuration, falling back to defaults.
///
/// With an explicit path, read and parse failures are logged and defaults
/// are used. Without one, [`DEFAULT_CONFIG_PATH`] is tried silently.
pub fn load_config(path: Option<&Path>) -> ScannerConfig {
    match path {
        Some(path) => match ScannerConfig::from_file(path) {
            Ok(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("{} ({}); using defaults", e, path.display());
                ScannerConfig::default()
            }
        },
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if let Ok(contents) = fs::read_to_string(default_path)
                && let Ok(cfg) = ScannerConfig::from_toml_str(&contents)
            {
                log::info!("Loaded config from {}", DEFAULT_CONFIG_PATH);
                return cfg;
            }
            ScannerConfig::default()
        }
    }
}
