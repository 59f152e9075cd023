//! SWF Mesh - Triangle meshes inscribed on the unit sphere
//!
//! This crate provides:
//! - Validated meshes (vertices + faces + subdivision level)
//! - Unique-edge extraction in first-encountered order
//! - Neighbor rings derived from edge adjacency
//! - One-level 1-to-4 midpoint subdivision
//! - Named base layouts (octahedron, 3.0.1, 7.0.4)

pub mod adjacency;
pub mod mesh;
pub mod preset;
pub mod subdivide;

pub use adjacency::*;
pub use mesh::*;
pub use preset::*;
pub use subdivide::*;
