//! Panning-fidelity cost
//!
//! A unit virtual source is placed on every finest-level vertex `u_i` and
//! encoded down to `level`. Weighting the vertices of that level's mesh by the
//! resulting coefficients gives the velocity vector
//!
//! `V_i = sum_k phi2(level)[k, i] * U_k`
//!
//! An ideal panner reproduces the source direction with unit gain, so the
//! cost penalizes `V_i · u_i` away from 1 and any component of `V_i`
//! orthogonal to `u_i`.

use serde::{Deserialize, Serialize};
use swf_core::{Point3, SwfResult};
use swf_wavelet::Model;

/// Weights of the two velocity error terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    /// Weight of `(Vl - 1)^2`
    pub longitudinal: f64,
    /// Weight of `Vt^2`
    pub transverse: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            longitudinal: 1.0,
            transverse: 1.0,
        }
    }
}

impl CostWeights {
    pub fn new(longitudinal: f64, transverse: f64) -> Self {
        Self {
            longitudinal,
            transverse,
        }
    }
}

/// Reproduced velocity for one virtual source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceVelocity {
    /// Velocity vector `V_i`
    pub velocity: Point3,
    /// `V_i · u_i`
    pub longitudinal: f64,
    /// `|V_i × u_i|`
    pub transverse: f64,
}

impl SourceVelocity {
    fn new(velocity: Point3, source: &Point3) -> Self {
        Self {
            velocity,
            longitudinal: velocity.dot(source),
            transverse: velocity.cross(source).norm(),
        }
    }

    /// Weighted error of this source
    pub fn error(&self, weights: &CostWeights) -> f64 {
        weights.longitudinal * (self.longitudinal - 1.0).powi(2)
            + weights.transverse * self.transverse.powi(2)
    }
}

/// Velocity of a unit source on each finest vertex, in vertex order
pub fn source_velocities(model: &Model, level: usize) -> SwfResult<Vec<SourceVelocity>> {
    let dual = model.phi2(level)?;
    let speakers = model.mesh(level)?.vertices();
    let sources = model.finest().vertices();

    Ok(sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let velocity = dual
                .column(i)
                .iter()
                .zip(speakers)
                .fold(Point3::zeros(), |acc, (&gain, speaker)| acc + speaker * gain);
            SourceVelocity::new(velocity, source)
        })
        .collect())
}

/// Mean weighted velocity error over all finest vertices
pub fn panning_cost(model: &Model, level: usize, weights: &CostWeights) -> SwfResult<f64> {
    let velocities = source_velocities(model, level)?;
    let total: f64 = velocities.iter().map(|v| v.error(weights)).sum();
    Ok(total / velocities.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use swf_core::{ModelConfig, SwfError};
    use swf_mesh::{BaseMesh, BasePreset};

    fn octahedron_model(depth: usize) -> Model {
        Model::build(
            &BaseMesh::Preset(BasePreset::Octahedron),
            &ModelConfig::default().with_depth(depth),
        )
        .unwrap()
    }

    #[test]
    fn test_cost_finite_and_nonnegative() {
        let model = octahedron_model(2);
        let cost = panning_cost(&model, 0, &CostWeights::default()).unwrap();
        assert!(cost.is_finite());
        assert!(cost >= 0.0);
    }

    #[test]
    fn test_zero_weights_zero_cost() {
        let model = octahedron_model(2);
        let cost = panning_cost(&model, 0, &CostWeights::new(0.0, 0.0)).unwrap();
        assert_eq!(cost, 0.0);
    }

    #[test]
    fn test_one_velocity_per_finest_vertex() {
        let model = octahedron_model(2);
        assert_eq!(source_velocities(&model, 0).unwrap().len(), 66);
        assert_eq!(source_velocities(&model, 1).unwrap().len(), 66);
    }

    #[test]
    fn test_axis_sources_have_no_transverse_error() {
        // The octahedron's own vertices sit on 4-fold symmetry axes, so the
        // reproduced velocity must point along the source
        let model = octahedron_model(2);
        let velocities = source_velocities(&model, 0).unwrap();
        for v in &velocities[..6] {
            assert!(v.transverse < 1e-9, "{v:?}");
        }
    }

    #[test]
    fn test_terms_split_by_weight() {
        let model = octahedron_model(2);
        let both = panning_cost(&model, 0, &CostWeights::new(1.0, 1.0)).unwrap();
        let longitudinal = panning_cost(&model, 0, &CostWeights::new(1.0, 0.0)).unwrap();
        let transverse = panning_cost(&model, 0, &CostWeights::new(0.0, 1.0)).unwrap();
        assert!((both - longitudinal - transverse).abs() < 1e-12);
    }

    #[test]
    fn test_level_out_of_range() {
        let model = octahedron_model(2);
        assert_eq!(
            panning_cost(&model, 2, &CostWeights::default()).unwrap_err(),
            SwfError::LevelOutOfRange { level: 2, depth: 2 }
        );
    }

    #[test]
    fn test_partial_weights_json() {
        let weights: CostWeights = serde_json::from_str(r#"{"transverse":0.5}"#).unwrap();
        assert_eq!(weights, CostWeights::new(1.0, 0.5));
    }
}
