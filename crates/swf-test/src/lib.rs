//! SWF Test Harness - End-to-end validation and benchmarking
//!
//! This crate provides:
//! - Seeded scenario runs over every base preset
//! - Invariant checks shared by the scenarios and the benches
//! - End-to-end tests across mesh, wavelet, optimizer and panner

pub mod integration;
pub mod properties;
pub mod scenario;

pub use properties::*;
pub use scenario::*;
