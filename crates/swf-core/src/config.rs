//! Build configuration shared by the mesh and wavelet layers

use serde::{Deserialize, Serialize};

use crate::LiftingCoefficients;

/// Default number of subdivision levels
pub const DEFAULT_DEPTH: usize = 3;

/// Where subdivision places new midpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Rescale base vertices and every midpoint to unit norm
    #[default]
    Sphere,
    /// Leave vertices where they are (planar test meshes)
    Flat,
}

/// Lifting formula used to refine the trivial split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiftingVariant {
    /// Predict first, update the coarse operators
    Classical,
    /// Update first, correct the detail operators
    #[default]
    Modified,
}

/// Model build configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Number of subdivision levels above the base mesh
    pub depth: usize,
    /// Lifting coefficients used at every level
    pub coefficients: LiftingCoefficients,
    pub variant: LiftingVariant,
    pub projection: Projection,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            depth: DEFAULT_DEPTH,
            coefficients: LiftingCoefficients::default(),
            variant: LiftingVariant::default(),
            projection: Projection::default(),
        }
    }
}

impl ModelConfig {
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_coefficients(mut self, coefficients: LiftingCoefficients) -> Self {
        self.coefficients = coefficients;
        self
    }

    pub fn with_variant(mut self, variant: LiftingVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }
}
