//! SWF Optimize - Lifting coefficient search
//!
//! This crate provides:
//! - The panning-fidelity cost of a model (velocity vector of each unit source)
//! - A derivative-free Nelder-Mead simplex minimizer
//! - The coefficient optimizer searching `(alpha, beta)` with `gamma` closed

pub mod cost;
pub mod nelder_mead;
pub mod optimizer;

pub use cost::*;
pub use nelder_mead::*;
pub use optimizer::*;
