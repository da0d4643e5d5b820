//! Raw measurement preprocessing.
//!
//! - [`SampleValidator`]: rejects malformed batches, drops out-of-range readings
//! - [`summarize`]: reduces a validated batch to per-direction minima

mod direction_buckets;
mod range_filter;

pub use direction_buckets::summarize;
pub use range_filter::{SampleValidator, ValidatedBatch, ValidationError, ValidatorConfig};

