//! SWF Wavelet - Biorthogonal lifting on subdivided spherical meshes
//!
//! Each subdivision level refines the trivial coarse/detail split with a
//! prediction operator `S` and an update operator `T`, giving four filters:
//!
//! - `P` (fine × coarse): synthesis of coarse coefficients
//! - `Q` (fine × detail): synthesis of detail coefficients
//! - `A` (coarse × fine): analysis onto the coarse level
//! - `B` (detail × fine): analysis onto the details
//!
//! with `A·P = I`, `B·Q = I`, `A·Q = 0`, `B·P = 0`.
//!
//! A [`Model`] chains `n` levels over a base mesh and composes the filters
//! into cross-level scaling and wavelet operators used for encoding.

pub mod compose;
pub mod filters;
pub mod level;
pub mod model;

pub use filters::*;
pub use level::*;
pub use model::*;
