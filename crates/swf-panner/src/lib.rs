//! SWF Panner - Real-time direction to speaker-weight mapping
//!
//! This crate provides:
//! - Closest-point search over the faces of the finest mesh
//! - Area-weighted barycentric interpolation with hop-size decimation
//! - The `/position` and `/interpolation` payload codec
//! - A synchronous pan service with counters
//! - Logging initialization for hosts embedding the service

pub mod interpolate;
pub mod logging;
pub mod nearest;
pub mod payload;
pub mod service;

pub use interpolate::*;
pub use logging::*;
pub use nearest::*;
pub use payload::*;
pub use service::*;
