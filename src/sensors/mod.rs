//! Sensor processing layer.
//!
//! Turns raw rover measurements into the distance signal used for
//! navigation. Depends only on [`crate::core`].

pub mod preprocessing;

pub use preprocessing::{SampleValidator, ValidatedBatch, ValidationError, ValidatorConfig};
