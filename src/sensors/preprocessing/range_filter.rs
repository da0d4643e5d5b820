//! Type and range gating for raw sensor batches.
//!
//! A raw batch is whatever the rover returned under `distance_measurements`.
//! Every entry must carry numeric `angle` and `distance` fields; a single
//! malformed entry rejects the whole batch. Numeric entries whose distance
//! falls outside `[0, max_valid_distance_cm]` are dropped and counted as
//! outliers, including those seen before a malformed entry.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::summarize;
use crate::core::types::{DirectionDistances, SensorSample};

/// Batch rejection reasons.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid measurement format: entry {index} has non-numeric `{field}`")]
    NonNumeric {
        index: usize,
        field: &'static str,
        /// Outliers dropped before the malformed entry.
        outliers: u32,
    },
}

impl ValidationError {
    /// Outliers counted before validation stopped.
    pub fn outliers(&self) -> u32 {
        match self {
            ValidationError::NonNumeric { outliers, .. } => *outliers,
        }
    }
}

/// Configuration for range validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Maximum plausible distance in centimeters.
    ///
    /// Readings beyond this are treated as sensor glitches.
    /// Default: 1000 cm
    pub max_valid_distance_cm: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_valid_distance_cm: 1000.0,
        }
    }
}

/// Validated subset of one raw batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedBatch {
    /// In-range samples, in arrival order.
    pub samples: Vec<SensorSample>,
    /// Number of samples dropped for an out-of-range distance.
    pub outliers: u32,
}

impl ValidatedBatch {
    /// An empty batch (what a failed request resolves to).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the batch holds no usable samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of usable samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Direction minima for this batch, or `None` when it holds no samples.
    pub fn distances(&self) -> Option<DirectionDistances> {
        if self.is_empty() {
            None
        } else {
            Some(summarize(&self.samples))
        }
    }
}

/// Range validator for raw rover measurements.
#[derive(Debug, Clone, Default)]
pub struct SampleValidator {
    config: ValidatorConfig,
}

impl SampleValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Check if a distance value is within the accepted range.
    #[inline]
    pub fn is_valid_distance(&self, distance: f64) -> bool {
        distance.is_finite() && (0.0..=self.config.max_valid_distance_cm).contains(&distance)
    }

    /// Validate a raw batch.
    ///
    /// Entries are checked in order. The first entry lacking a numeric
    /// `angle` or `distance` fails the batch; the error carries the outliers
    /// already dropped ahead of it.
    pub fn validate(&self, raw: &[Value]) -> Result<ValidatedBatch, ValidationError> {
        let mut batch = ValidatedBatch {
            samples: Vec::with_capacity(raw.len()),
            outliers: 0,
        };
        for (index, point) in raw.iter().enumerate() {
            let non_numeric = |field| ValidationError::NonNumeric {
                index,
                field,
                outliers: batch.outliers,
            };
            let angle = numeric_field(point, "angle").ok_or_else(|| non_numeric("angle"))?;
            let distance =
                numeric_field(point, "distance").ok_or_else(|| non_numeric("distance"))?;

            if self.is_valid_distance(distance) {
                batch.samples.push(SensorSample::new(angle, distance));
            } else {
                batch.outliers += 1;
                log::warn!(
                    "Ignoring invalid distance: {} cm at angle {}",
                    distance,
                    angle
                );
            }
        }
        Ok(batch)
    }
}

fn numeric_field(point: &Value, field: &str) -> Option<f64> {
    point.get(field).and_then(Value::as_f64)
}
