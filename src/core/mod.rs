//! Core foundation layer.
//!
//! This is the bottom layer of the scanner with no internal dependencies.
//! All other layers depend on core.
//!
//! # Contents
//!
//! - [`types`]: Core data types (poses, samples, motion commands)
//! - [`math`]: Geometry helpers (polygon area, heading difference)

pub mod math;
pub mod types;
