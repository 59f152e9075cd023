//! End-to-end pipeline
//!
//! Pans a direction on the finest mesh and encodes the resulting weight
//! vector into the scaling and wavelet coefficients of a coarser level.

use nalgebra::DVector;
use swf_core::{ModelConfig, Point3, SwfResult};
use swf_mesh::BaseMesh;
use swf_panner::{InterpolationEngine, PanWeights};
use swf_wavelet::Model;

/// Encoded panning result for one direction
#[derive(Debug, Clone)]
pub struct EncodedPan {
    pub weights: PanWeights,
    /// `phi2(level)` applied to the dense weights
    pub scaling: DVector<f64>,
    /// `psi2(level)` applied to the dense weights
    pub details: DVector<f64>,
}

/// Model plus interpolation engine over its finest mesh
pub struct Pipeline {
    model: Model,
    engine: InterpolationEngine,
}

impl Pipeline {
    pub fn build(base: &BaseMesh, config: &ModelConfig) -> SwfResult<Self> {
        let model = Model::build(base, config)?;
        let engine = InterpolationEngine::from_model(&model);
        Ok(Self { model, engine })
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn engine(&self) -> &InterpolationEngine {
        &self.engine
    }

    /// Pan `direction` and encode the weights at `level`
    pub fn pan_and_encode(&self, direction: &Point3, level: usize) -> SwfResult<EncodedPan> {
        let weights = self.engine.weights(direction)?;
        let dense = weights.to_dense(self.engine.vertex_count());
        let scaling = self.model.encode(&dense, level)?;
        let details = self.model.encode_details(&dense, level)?;
        Ok(EncodedPan {
            weights,
            scaling,
            details,
        })
    }
}
