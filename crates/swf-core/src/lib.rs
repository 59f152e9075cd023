//! SWF Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every layer of the spherical
//! wavelet panner:
//! - Error type and result alias
//! - Geometry primitives (points, triangle areas, spherical coordinates)
//! - Lifting coefficients and the closure constraint
//! - Build configuration (depth, lifting variant, projection)

pub mod coefficients;
pub mod config;
pub mod error;
pub mod geometry;

pub use coefficients::*;
pub use config::*;
pub use error::*;
pub use geometry::*;
